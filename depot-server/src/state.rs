use content_store::{ContentStore, TextAnalytics};

/// Shared handler state. Both members clone cheaply and share the same
/// underlying repository.
#[derive(Clone)]
pub struct AppState {
    pub store: ContentStore,
    pub analytics: TextAnalytics,
}
