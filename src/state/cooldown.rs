use std::{collections::HashMap, time::{Duration, Instant}};

use clap::ValueEnum;
use parking_lot::Mutex;

use crate::models::CommunityId;

/// When the per-guild window gets (re)started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CooldownPolicy {
    /// Only a message that actually produced a reply starts the window.
    #[default]
    OnTrigger,
    /// Every non-bot message that gets past the gate starts the window,
    /// whatever the classifier says. Stricter, but a miss can hide a real
    /// question asked right after it.
    EveryMessage,
}

pub trait CooldownGate: Send + Sync {
    fn is_blocked(&self, community: &CommunityId, now: Instant) -> bool;
    fn mark_triggered(&self, community: &CommunityId, now: Instant);
}

/// Process-lifetime cooldown map. A restart reopens every window.
pub struct MemoryCooldown {
    window: Duration,
    last: Mutex<HashMap<CommunityId, Instant>>,
}

impl MemoryCooldown {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last: Mutex::new(HashMap::new()),
        }
    }
}

impl CooldownGate for MemoryCooldown {
    fn is_blocked(&self, community: &CommunityId, now: Instant) -> bool {
        self.last
            .lock()
            .get(community)
            .is_some_and(|at| now.saturating_duration_since(*at) < self.window)
    }

    fn mark_triggered(&self, community: &CommunityId, now: Instant) {
        self.last.lock().insert(community.clone(), now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guild(id: &str) -> CommunityId {
        CommunityId::new(id)
    }

    #[test]
    fn test_unknown_guild_is_open() {
        let gate = MemoryCooldown::new(Duration::from_secs(30));
        assert!(!gate.is_blocked(&guild("1"), Instant::now()));
    }

    #[test]
    fn test_blocks_inside_window_and_reopens_after() {
        let gate = MemoryCooldown::new(Duration::from_secs(30));
        let start = Instant::now();
        gate.mark_triggered(&guild("1"), start);

        assert!(gate.is_blocked(&guild("1"), start + Duration::from_secs(29)));
        assert!(!gate.is_blocked(&guild("1"), start + Duration::from_secs(30)));
        assert!(!gate.is_blocked(&guild("1"), start + Duration::from_secs(31)));
    }

    #[test]
    fn test_guilds_do_not_share_windows() {
        let gate = MemoryCooldown::new(Duration::from_secs(30));
        let start = Instant::now();
        gate.mark_triggered(&guild("1"), start);

        assert!(!gate.is_blocked(&guild("2"), start));
    }

    #[test]
    fn test_mark_overwrites_previous_reference_point() {
        let gate = MemoryCooldown::new(Duration::from_secs(30));
        let start = Instant::now();
        gate.mark_triggered(&guild("1"), start);
        gate.mark_triggered(&guild("1"), start + Duration::from_secs(20));

        assert!(gate.is_blocked(&guild("1"), start + Duration::from_secs(45)));
    }

    #[test]
    fn test_checking_does_not_extend_window() {
        let gate = MemoryCooldown::new(Duration::from_secs(30));
        let start = Instant::now();
        gate.mark_triggered(&guild("1"), start);

        for secs in [5, 10, 20, 29] {
            assert!(gate.is_blocked(&guild("1"), start + Duration::from_secs(secs)));
        }
        assert!(!gate.is_blocked(&guild("1"), start + Duration::from_secs(30)));
    }
}
