pub mod config;
pub mod rest;
pub mod storage;
pub mod tasks;

use std::sync::Arc;

use config::TaskdConfig;
use storage::Storage;
use tasks::TaskService;

/// Shared application state passed to every HTTP handler.
///
/// Built once at startup and passed to handlers via axum `State`. Process-wide
/// state is limited to the store connection pool held inside `storage`; tasks
/// themselves never live in memory between requests.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<TaskdConfig>,
    pub storage: Arc<Storage>,
    /// The four task operations (list / create / toggle / delete).
    pub tasks: Arc<TaskService>,
    pub started_at: std::time::Instant,
}
