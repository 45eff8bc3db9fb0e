use std::sync::Arc;

use catalog::GenreLookup;
use storage::Database;
use storage::services::hooks::RevealHooks;

/// Shared handler state: the database plus the two collaborator interfaces
/// the core calls through.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub catalog: Arc<dyn GenreLookup>,
    pub hooks: Arc<dyn RevealHooks>,
}
