use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

/// Keyword fragments for one category, split by language so the lists can
/// be maintained independently. Entries are regex fragments matched
/// anywhere in the lower-cased message. Stems that change under Hungarian
/// suffixes spell out both vowels ("firk[aá]" for "firkát"); short English
/// words that hide inside longer ones ("ipad", "together") are anchored
/// with `\b`.
#[derive(Debug, Clone)]
pub struct Family {
    pub name: &'static str,
    pub hungarian: Vec<&'static str>,
    pub english: Vec<&'static str>,
}

impl Family {
    fn fragments(&self) -> impl Iterator<Item = &&'static str> {
        self.hungarian.iter().chain(self.english.iter())
    }
}

#[derive(Debug, Clone)]
pub struct KeywordLists {
    pub brand: Family,
    pub platform: Family,
    pub intent: Family,
}

impl Default for KeywordLists {
    fn default() -> Self {
        Self {
            brand: Family {
                name: "brand",
                hungarian: vec!["fírk[aá]"],
                english: vec!["firk[aá]", "f1rk[aá]", "firk4"],
            },
            platform: Family {
                name: "platform",
                hungarian: vec!["ios-re", "iosra", "iphonera", "ipadra"],
                english: vec![r"ios", r"i\.os", "i-os", "apple", "ipad", "iphone", "iph0ne"],
            },
            intent: Family {
                name: "intent",
                hungarian: vec![
                    "letölt",
                    "letolteni",
                    "letoltes",
                    "letöltés",
                    "telep[ií]t",
                    "telepites",
                    "felrak",
                    "feltelep[ií]t",
                    "hogyan tudom",
                    "hogy tudom",
                    "hogy toltom",
                    "hogy lehet",
                ],
                english: vec!["install", "download", "sideload", r"\bipa\b", r"\bget\b", r"\badd\b", "setup"],
            },
        }
    }
}

/// Which keyword families a message hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scan {
    pub brand: bool,
    pub platform: bool,
    pub intent: bool,
}

impl Scan {
    /// Any two of the three families.
    pub fn passes(&self) -> bool {
        (self.brand && self.platform) || (self.brand && self.intent) || (self.platform && self.intent)
    }
}

/// Compiled keyword families. Pure: the same text always gives the same scan.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    brand: Option<Regex>,
    platform: Option<Regex>,
    intent: Option<Regex>,
}

impl KeywordMatcher {
    pub fn new(lists: &KeywordLists) -> Result<Self, regex::Error> {
        Ok(Self {
            brand: compile(&lists.brand)?,
            platform: compile(&lists.platform)?,
            intent: compile(&lists.intent)?,
        })
    }

    pub fn scan(&self, text: &str) -> Scan {
        let lower = text.to_lowercase();
        Scan {
            brand: hit(&self.brand, &lower),
            platform: hit(&self.platform, &lower),
            intent: hit(&self.intent, &lower),
        }
    }

    pub fn passes(&self, text: &str) -> bool {
        self.scan(text).passes()
    }
}

fn hit(family: &Option<Regex>, text: &str) -> bool {
    family.as_ref().is_some_and(|re| re.is_match(text))
}

/// An empty family never matches.
fn compile(family: &Family) -> Result<Option<Regex>, regex::Error> {
    if family.fragments().next().is_none() {
        return Ok(None);
    }
    let alternation = family
        .fragments()
        .map(|f| format!("(?:{})", f))
        .collect::<Vec<_>>()
        .join("|");
    debug!(family = family.name, pattern = %alternation, "Compiling keyword family");
    Regex::new(&alternation).map(Some)
}

static DEFAULT_MATCHER: LazyLock<KeywordMatcher> = LazyLock::new(|| {
    KeywordMatcher::new(&KeywordLists::default()).expect("Invalid built-in keyword lists")
});

pub fn default_matcher() -> &'static KeywordMatcher {
    &DEFAULT_MATCHER
}

/// Stage-1 relevance check against the built-in keyword lists.
pub fn stage_one(text: &str) -> bool {
    DEFAULT_MATCHER.passes(text)
}

static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:https?://|www\.)\S+").expect("Invalid url regex")
});

/// A short message carrying a URL is someone sharing a link, not asking.
pub fn is_link_share(text: &str, max_len: usize) -> bool {
    URL.is_match(text) && text.chars().count() < max_len
}
