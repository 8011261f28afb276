pub mod classifier;
pub mod judge;
pub mod keywords;
pub mod pipeline;
#[cfg(test)]
pub mod testing;

pub use classifier::{ClassifierOptions, LinkFilter, RelevanceClassifier};
pub use judge::{DEFAULT_MODEL, OPENROUTER_API_URL, OpenRouterJudge, RemoteJudge};
pub use pipeline::{Outcome, Pipeline, SkipReason};
