/**
 * API Route Handlers
 *
 * Routes beyond the room lifecycle and live channel:
 *
 * - `GET /users/search` - user directory prefix search (debounced,
 *   2-character minimum)
 * - `POST /rooms/{room_id}/participants` - admin-gated admission
 * - `POST /compile` - execution sandbox pass-through
 *
 * All of these require a verified identity; admission additionally checks
 * room ownership in the handler.
 */
use axum::routing::{get, post};
use axum::Router;

use crate::backend::membership::handlers::{add_participant, search_users};
use crate::backend::sandbox::handlers::compile;
use crate::backend::server::state::AppState;

/// Configure API routes
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        // User directory search
        .route("/users/search", get(search_users))
        // Participant admission
        .route("/rooms/{room_id}/participants", post(add_participant))
        // Execution sandbox
        .route("/compile", post(compile))
}
