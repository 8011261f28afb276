mod community;
mod message;
mod verdict;

pub use community::CommunityId;
pub use message::{InboundMessage, preview};
pub use verdict::{Provenance, Verdict};
