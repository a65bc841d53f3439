use std::sync::Arc;
use object_store::{path::Path, ObjectStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ObjectStore>,
    pub model_path: Path,
}

impl AppState {
    pub fn new(store: Arc<dyn ObjectStore>, model_path: impl Into<Path>) -> Self {
        Self {
            store,
            model_path: model_path.into(),
        }
    }
}
