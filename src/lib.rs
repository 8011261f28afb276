//! Discord auto-replier that answers "how do I get Firka on iOS?" questions
//! with the sideload guide.
//!
//! A message goes through a keyword pre-filter, then an optional
//! language-model confirmation, behind a per-server cooldown. Every guide
//! sent is counted per server in a JSON file.

pub mod config;
pub mod display;
pub mod handler;
pub mod models;
pub mod processing;
pub mod state;
pub mod utils;
