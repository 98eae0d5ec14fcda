pub mod account;
pub mod advisor;
pub mod loans;
pub mod rosca;
pub mod system;
pub mod token;

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// Assemble the API router.
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(system::routes())
        .merge(account::routes())
        .merge(loans::routes())
        .merge(advisor::routes())
        .merge(rosca::routes())
        .merge(token::routes())
}
