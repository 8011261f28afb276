use super::CommunityId;

/// A chat message as seen by the pipeline, stripped of transport details.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub community: Option<CommunityId>,
    pub community_name: String,
    pub author_tag: String,
    pub author_is_bot: bool,
    pub content: String,
}

impl InboundMessage {
    /// Content cut to `max` characters for log lines.
    pub fn preview(&self, max: usize) -> String {
        preview(&self.content, max)
    }
}

pub fn preview(text: &str, max: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
