use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use orbis::Orbis;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    /// The orchestrator serving refreshes and queries.
    pub orbis: Arc<Orbis>,
    /// Where the summary image is written.
    pub image_path: PathBuf,
    /// Process start, for `/health`.
    pub started: Instant,
}

impl AppState {
    /// State for `orbis`, serving the summary image from `image_path`.
    pub fn new(orbis: Arc<Orbis>, image_path: impl Into<PathBuf>) -> Self {
        Self {
            orbis,
            image_path: image_path.into(),
            started: Instant::now(),
        }
    }
}
