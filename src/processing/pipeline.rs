use std::{sync::Arc, time::Instant};

use tracing::{debug, info, warn};

use super::classifier::RelevanceClassifier;
use crate::display::GuideReply;
use crate::models::{CommunityId, InboundMessage, Verdict};
use crate::state::{CooldownGate, CooldownPolicy, CounterStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    BotAuthor,
    NoCommunity,
    Cooldown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Skipped(SkipReason),
    NotRelevant(Verdict),
    Reply(GuideReply),
}

/// Wires the gate, the classifier and the counter together for each message.
pub struct Pipeline {
    classifier: RelevanceClassifier,
    cooldown: Arc<dyn CooldownGate>,
    counters: Arc<dyn CounterStore>,
    policy: CooldownPolicy,
}

impl Pipeline {
    pub fn new(
        classifier: RelevanceClassifier,
        cooldown: Arc<dyn CooldownGate>,
        counters: Arc<dyn CounterStore>,
        policy: CooldownPolicy,
    ) -> Self {
        Self { classifier, cooldown, counters, policy }
    }

    pub async fn on_message(&self, msg: &InboundMessage, now: Instant) -> Outcome {
        if msg.author_is_bot {
            debug!(author = %msg.author_tag, "Ignored bot message");
            return Outcome::Skipped(SkipReason::BotAuthor);
        }
        let Some(community) = &msg.community else {
            return Outcome::Skipped(SkipReason::NoCommunity);
        };

        info!(
            author = %msg.author_tag,
            guild = %msg.community_name,
            guild_id = %community,
            message = %msg.preview(50),
            "Message received"
        );

        if self.cooldown.is_blocked(community, now) {
            info!(guild_id = %community, "Guild is on cooldown, skipping");
            return Outcome::Skipped(SkipReason::Cooldown);
        }
        if self.policy == CooldownPolicy::EveryMessage {
            self.cooldown.mark_triggered(community, now);
        }

        let verdict = self.classifier.classify(&msg.content).await;
        if !verdict.relevant {
            debug!(provenance = ?verdict.provenance, "Not sending guide, message not relevant");
            return Outcome::NotRelevant(verdict);
        }

        info!(author = %msg.author_tag, guild = %msg.community_name, provenance = ?verdict.provenance, "Sending iOS guide");
        self.cooldown.mark_triggered(community, now);
        Outcome::Reply(GuideReply::new(self.record_send(community)))
    }

    /// Explicit `/iosguide`: no bot, cooldown or relevance checks.
    pub fn on_command(&self, community: Option<&CommunityId>) -> GuideReply {
        match community {
            Some(community) => GuideReply::new(self.record_send(community)),
            None => GuideReply::new(0),
        }
    }

    fn record_send(&self, community: &CommunityId) -> u64 {
        let bumped = self.counters.increment(community);
        if let Err(e) = bumped.persisted {
            warn!(error = %e, guild_id = %community, "Could not save reply counters");
        }
        bumped.count
    }
}
