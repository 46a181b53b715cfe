use async_trait::async_trait;
use tokio::sync::Mutex;

use orbis_core::{OrbisError, SummaryRenderer, SummarySnapshot};

/// Keeps every snapshot it is asked to render.
#[derive(Default)]
pub struct RecordingRenderer {
    seen: Mutex<Vec<SummarySnapshot>>,
}

impl RecordingRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshots rendered so far, oldest first.
    pub async fn snapshots(&self) -> Vec<SummarySnapshot> {
        self.seen.lock().await.clone()
    }

    /// The most recent snapshot, if any.
    pub async fn last(&self) -> Option<SummarySnapshot> {
        self.seen.lock().await.last().cloned()
    }
}

#[async_trait]
impl SummaryRenderer for RecordingRenderer {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn render(&self, snapshot: &SummarySnapshot) -> Result<(), OrbisError> {
        self.seen.lock().await.push(snapshot.clone());
        Ok(())
    }
}

/// Always fails with a `Render` error.
pub struct FailingRenderer {
    cause: String,
}

impl FailingRenderer {
    #[must_use]
    pub fn new(cause: impl Into<String>) -> Self {
        Self {
            cause: cause.into(),
        }
    }
}

#[async_trait]
impl SummaryRenderer for FailingRenderer {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn render(&self, _snapshot: &SummarySnapshot) -> Result<(), OrbisError> {
        Err(OrbisError::render(&self.cause))
    }
}
