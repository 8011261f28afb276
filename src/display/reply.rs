use serenity::all::{
    Colour, CreateActionRow, CreateButton, CreateEmbed, CreateEmbedFooter,
    CreateInteractionResponse, CreateInteractionResponseMessage, CreateMessage, Message, Timestamp,
};

pub const GUIDE_URL: &str = "https://docs.qwit.org/Firka/ipa_telepites.html";
const HELP_CHANNEL_ID: u64 = 1365805545478426754;
const ICON_URL: &str = "https://files.catbox.moe/4uchq0.gif";
const COLOUR: Colour = Colour::new(0x00BFFF);
const ROCKET_AFTER: u64 = 10;

/// The guide reply for one guild, parameterised by how often it has been sent there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuideReply {
    pub count: u64,
}

impl GuideReply {
    pub fn new(count: u64) -> Self {
        Self { count }
    }

    pub fn title(&self) -> &'static str {
        "📱 Firka iOS Sideload Útmutató"
    }

    pub fn description(&self) -> String {
        format!(
            "Szeretnéd telepíteni vagy sideloadolni a Firka alkalmazást iOS eszközödre? Itt egy lépésről lépésre útmutató, ami segít az indulásban!\n\n\
             **Útmutató:** [Kattints ide a Firka iOS Sideload Útmutatóhoz]({GUIDE_URL})\n\
             **További segítség:** <#{HELP_CHANNEL_ID}>!"
        )
    }

    pub fn footer(&self) -> String {
        let mut text = format!(
            "Firka iOS Guide Autoreplyer • Ebben a szerveren elküldve: {} alkalommal",
            self.count
        );
        if self.count > ROCKET_AFTER {
            text.push_str(" 🚀");
        }
        text
    }

    pub fn embed(&self) -> CreateEmbed {
        CreateEmbed::new()
            .colour(COLOUR)
            .title(self.title())
            .description(self.description())
            .thumbnail(ICON_URL)
            .footer(CreateEmbedFooter::new(self.footer()).icon_url(ICON_URL))
            .timestamp(Timestamp::now())
    }

    pub fn components(&self) -> Vec<CreateActionRow> {
        let button = CreateButton::new_link(GUIDE_URL).label("📚 Útmutató megnyitása");
        vec![CreateActionRow::Buttons(vec![button])]
    }

    /// Threaded reply to the message that triggered it.
    pub fn reply_to(&self, trigger: &Message) -> CreateMessage {
        CreateMessage::new()
            .embed(self.embed())
            .components(self.components())
            .reference_message(trigger)
    }

    pub fn interaction_response(&self) -> CreateInteractionResponse {
        CreateInteractionResponse::Message(
            CreateInteractionResponseMessage::new()
                .embed(self.embed())
                .components(self.components()),
        )
    }
}
