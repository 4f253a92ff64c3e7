/**
 * Router Configuration
 *
 * Assembles all HTTP routes. Room lifecycle and the live channel come
 * first, then the API routes (search, admission, compile), then the trace
 * layer and the 404 fallback.
 */
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// # Route Details
///
/// ## Room lifecycle
///
/// - `POST /rooms` - create a room
/// - `GET /rooms` - rooms the caller participates in
/// - `GET /rooms/{room_id}` - metadata + participants
/// - `GET /rooms/{room_id}/buffer` - authoritative buffer content
///
/// ## Live channel
///
/// - `GET /rooms/{room_id}/events` - SSE subscription (join-room)
/// - `POST /rooms/{room_id}/code` - publish an edit
///
/// ## API routes
///
/// - `GET /users/search` - directory prefix search
/// - `POST /rooms/{room_id}/participants` - admit a participant
/// - `POST /compile` - run code in the sandbox
pub fn create_router(app_state: AppState) -> Router {
    let router = Router::new()
        .route(
            "/rooms",
            post(crate::backend::rooms::handlers::create_room)
                .get(crate::backend::rooms::handlers::list_rooms),
        )
        .route(
            "/rooms/{room_id}",
            get(crate::backend::rooms::handlers::get_room),
        )
        .route(
            "/rooms/{room_id}/buffer",
            get(crate::backend::rooms::handlers::get_buffer),
        )
        // Live channel routes
        .route(
            "/rooms/{room_id}/events",
            get(crate::backend::sync::subscription::room_events),
        )
        .route(
            "/rooms/{room_id}/code",
            post(crate::backend::sync::handlers::publish_code),
        );

    // Add API routes
    let router = configure_api_routes(router);

    // Fallback handler for 404
    let router = router.fallback(|| async { "404 Not Found" });

    router
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
