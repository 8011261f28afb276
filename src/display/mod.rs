mod reply;

pub use reply::{GUIDE_URL, GuideReply};
