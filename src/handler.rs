use std::{
    panic::{AssertUnwindSafe, catch_unwind},
    sync::Arc,
    time::Instant,
};

use futures::FutureExt;
use serenity::all::{
    ActivityData, Command, Context, CreateCommand, EventHandler, Interaction, Message, OnlineStatus, Ready,
};
use serenity::async_trait;
use tracing::{error, info, warn};

use crate::display::GuideReply;
use crate::models::{CommunityId, InboundMessage};
use crate::processing::{Outcome, Pipeline};

pub const COMMAND_NAME: &str = "iosguide";

pub fn guide_command() -> CreateCommand {
    CreateCommand::new(COMMAND_NAME).description("Megmutatja a Firka iOS sideload útmutatót")
}

pub struct Handler {
    pipeline: Arc<Pipeline>,
}

impl Handler {
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        Self { pipeline }
    }
}

fn inbound(ctx: &Context, msg: &Message) -> InboundMessage {
    let community_name = msg
        .guild_id
        .map(|id| {
            ctx.cache
                .guild(id)
                .map(|guild| guild.name.clone())
                .unwrap_or_else(|| id.to_string())
        })
        .unwrap_or_default();

    InboundMessage {
        community: msg.guild_id.map(CommunityId::from),
        community_name,
        author_tag: msg.author.tag(),
        author_is_bot: msg.author.bot,
        content: msg.content.clone(),
    }
}

/// Command path of the pipeline; a panic drops the command instead of the task.
fn command_reply(pipeline: &Pipeline, community: Option<&CommunityId>) -> Option<GuideReply> {
    catch_unwind(AssertUnwindSafe(|| pipeline.on_command(community))).ok()
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        ctx.set_presence(Some(ActivityData::watching("Firka iOS útmutató")), OnlineStatus::Online);
        info!(user = %ready.user.name, guilds = ready.guilds.len(), "Bot is online and ready");

        match Command::create_global_command(&ctx.http, guide_command()).await {
            Ok(command) => info!(name = %command.name, "Registered application command"),
            Err(e) => error!(error = %e, "Failed to register application command"),
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        let inbound = inbound(&ctx, &msg);

        // One bad message must not take the handler down with it.
        let outcome = AssertUnwindSafe(self.pipeline.on_message(&inbound, Instant::now()))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Outcome::Reply(reply)) => {
                if let Err(e) = msg.channel_id.send_message(&ctx.http, reply.reply_to(&msg)).await {
                    error!(error = %e, channel_id = %msg.channel_id, "Failed to send guide reply");
                }
            }
            Ok(_) => {}
            Err(_) => warn!(message_id = %msg.id, "Message handler panicked, dropping message"),
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };
        if command.data.name != COMMAND_NAME {
            return;
        }

        let community = command.guild_id.map(CommunityId::from);
        let Some(reply) = command_reply(&self.pipeline, community.as_ref()) else {
            warn!(user = %command.user.tag(), "Command handler panicked, dropping command");
            return;
        };
        info!(user = %command.user.tag(), guild_id = ?community, count = reply.count, "Guide requested by command");

        if let Err(e) = command.create_response(&ctx.http, reply.interaction_response()).await {
            error!(error = %e, "Failed to answer guide command");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::{ClassifierOptions, RelevanceClassifier};
    use crate::state::{
        CooldownPolicy, CounterStore, Incremented, MemoryCooldown, MemoryCounterStore,
    };

    struct BrokenCounters;

    impl CounterStore for BrokenCounters {
        fn get(&self, _community: &CommunityId) -> u64 {
            0
        }

        fn increment(&self, _community: &CommunityId) -> Incremented {
            panic!("counter map corrupted");
        }
    }

    fn pipeline(counters: Arc<dyn CounterStore>) -> Pipeline {
        Pipeline::new(
            RelevanceClassifier::new(None, ClassifierOptions::default()),
            Arc::new(MemoryCooldown::new(std::time::Duration::from_secs(30))),
            counters,
            CooldownPolicy::OnTrigger,
        )
    }

    #[test]
    fn test_command_reply_counts_in_guild() {
        let pipeline = pipeline(Arc::new(MemoryCounterStore::new()));
        let guild = CommunityId::new("g");

        assert_eq!(command_reply(&pipeline, Some(&guild)), Some(GuideReply::new(1)));
        assert_eq!(command_reply(&pipeline, None), Some(GuideReply::new(0)));
    }

    #[test]
    fn test_command_reply_survives_panicking_store() {
        let pipeline = pipeline(Arc::new(BrokenCounters));

        assert_eq!(command_reply(&pipeline, Some(&CommunityId::new("g"))), None);
        assert_eq!(command_reply(&pipeline, None), Some(GuideReply::new(0)));
    }
}
