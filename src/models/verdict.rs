/// How a classification arrived at its answer. Only used for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Fewer than two keyword families matched; the remote model was not asked.
    KeywordReject,
    /// Short message carrying a URL, treated as link sharing.
    LinkShare,
    /// Remote classification is switched off, the keyword pass stands.
    KeywordOnly,
    /// The remote model answered.
    Confirmed,
    /// The remote model failed, the keyword pass stands.
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub relevant: bool,
    pub provenance: Provenance,
}

impl Verdict {
    pub fn new(relevant: bool, provenance: Provenance) -> Self {
        Self { relevant, provenance }
    }

    pub fn reject(provenance: Provenance) -> Self {
        Self::new(false, provenance)
    }
}
