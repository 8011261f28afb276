//! Test doubles shared by the processing tests.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::judge::{ClassifierError, RemoteJudge};

/// Replays scripted answers in order and counts calls. Once the script runs
/// out every call times out.
pub struct ScriptedJudge {
    answers: Mutex<Vec<Result<String, ClassifierError>>>,
    calls: AtomicUsize,
}

impl ScriptedJudge {
    pub fn new(mut answers: Vec<Result<String, ClassifierError>>) -> Arc<Self> {
        answers.reverse();
        Arc::new(Self {
            answers: Mutex::new(answers),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn answering(answer: &str) -> Arc<Self> {
        Self::new(vec![Ok(answer.to_string())])
    }

    /// Answers `answer` for the first `times` calls.
    pub fn always(answer: &str, times: usize) -> Arc<Self> {
        Self::new((0..times).map(|_| Ok(answer.to_string())).collect())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteJudge for ScriptedJudge {
    async fn judge(&self, _text: &str) -> Result<String, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answers.lock().pop().unwrap_or(Err(ClassifierError::Timeout))
    }
}
