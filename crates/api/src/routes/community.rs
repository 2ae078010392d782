use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/communities/:community_id/teams",
            get(handlers::community::list_teams),
        )
        .route(
            "/api/communities/:community_id/events/:event_id",
            get(handlers::community::get_event),
        )
}
