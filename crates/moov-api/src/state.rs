use std::sync::Arc;

use moov_db::Database;

use crate::AppError;
use crate::catalog::VenueCatalog;
use crate::session::SessionKeys;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    /// Loaded once at startup, read-only afterwards.
    pub venues: VenueCatalog,
    pub session: SessionKeys,
}

/// Runs blocking database (and hashing) work off the async runtime.
pub(crate) async fn blocking<F, T>(state: &AppState, f: F) -> Result<T, AppError>
where
    F: FnOnce(&Database) -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || f(&state.db)).await?
}
