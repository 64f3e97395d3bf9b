use std::sync::Arc;

use crate::storage::Storage;

/// Upper bound on a decoded raster. The drawing surface is a few hundred
/// logical pixels, so anything near this is not a pad submission.
pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
}
