use std::{sync::Arc, time::Duration};

use clap::ValueEnum;
use tracing::{debug, info, warn};

use super::judge::{ClassifierError, RemoteJudge};
use super::keywords::{KeywordMatcher, default_matcher, is_link_share};
use crate::models::{Provenance, Verdict, preview};

/// Where the short-message-with-URL check sits relative to the remote judge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LinkFilter {
    /// Never suppress link shares.
    Off,
    /// Reject link shares after the keyword pass, before the remote call.
    /// Applies whether or not the remote judge is reachable.
    #[default]
    BeforeRemote,
    /// Trust a remote answer; only filter the keyword-only verdict used when
    /// the judge is disabled or failing.
    FallbackOnly,
}

#[derive(Debug, Clone)]
pub struct ClassifierOptions {
    pub link_filter: LinkFilter,
    pub link_max_len: usize,
    pub retries: u32,
    pub retry_backoff: Duration,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self {
            link_filter: LinkFilter::BeforeRemote,
            link_max_len: 100,
            retries: 0,
            retry_backoff: Duration::from_millis(500),
        }
    }
}

/// Keyword pre-filter followed by an optional remote confirmation.
pub struct RelevanceClassifier {
    matcher: KeywordMatcher,
    judge: Option<Arc<dyn RemoteJudge>>,
    options: ClassifierOptions,
}

impl RelevanceClassifier {
    pub fn new(judge: Option<Arc<dyn RemoteJudge>>, options: ClassifierOptions) -> Self {
        Self::with_matcher(default_matcher().clone(), judge, options)
    }

    pub fn with_matcher(matcher: KeywordMatcher, judge: Option<Arc<dyn RemoteJudge>>, options: ClassifierOptions) -> Self {
        Self { matcher, judge, options }
    }

    pub async fn classify(&self, text: &str) -> Verdict {
        let scan = self.matcher.scan(text);
        debug!(
            message = %preview(text, 50),
            firka = scan.brand,
            ios = scan.platform,
            install = scan.intent,
            "Keyword check"
        );

        if !scan.passes() {
            debug!("Skipping, fewer than two keyword families matched");
            return Verdict::reject(Provenance::KeywordReject);
        }

        let link_share = is_link_share(text, self.options.link_max_len);
        if link_share && self.options.link_filter == LinkFilter::BeforeRemote {
            info!(message = %preview(text, 50), "Looks like a shared link, not a question");
            return Verdict::reject(Provenance::LinkShare);
        }

        let Some(judge) = &self.judge else {
            return self.keyword_verdict(link_share, Provenance::KeywordOnly);
        };

        match self.ask(judge.as_ref(), text).await {
            Ok(answer) => {
                let relevant = is_affirmative(&answer);
                info!(message = %preview(text, 30), answer = %answer.trim(), relevant, "AI classification");
                Verdict::new(relevant, Provenance::Confirmed)
            }
            Err(e) => {
                warn!(error = %e, "AI classification failed, using keyword match result");
                self.keyword_verdict(link_share, Provenance::Fallback)
            }
        }
    }

    fn keyword_verdict(&self, link_share: bool, provenance: Provenance) -> Verdict {
        if link_share && self.options.link_filter == LinkFilter::FallbackOnly {
            return Verdict::reject(Provenance::LinkShare);
        }
        Verdict::new(true, provenance)
    }

    /// One attempt, plus `retries` more for transport failures only.
    async fn ask(&self, judge: &dyn RemoteJudge, text: &str) -> Result<String, ClassifierError> {
        let mut attempt = 0;
        loop {
            match judge.judge(text).await {
                Err(e) if e.is_transient() && attempt < self.options.retries => {
                    let delay = retry_delay(self.options.retry_backoff, attempt);
                    attempt += 1;
                    debug!(error = %e, attempt, ?delay, "Retrying AI classification");
                    tokio::time::sleep(delay).await;
                }
                result => return result,
            }
        }
    }
}

/// Longest pause between two attempts.
pub const MAX_RETRY_BACKOFF: Duration = Duration::from_secs(30);

/// Exponential backoff from `base`, capped at [`MAX_RETRY_BACKOFF`].
pub fn retry_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt)).min(MAX_RETRY_BACKOFF)
}

/// The model must answer exactly `true`, modulo case and surrounding space.
pub fn is_affirmative(answer: &str) -> bool {
    answer.trim().to_lowercase() == "true"
}
