// libs/availability-cell/src/router.rs
use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};

use shared_utils::extractor::auth_middleware;

use crate::handlers;
use crate::AvailabilityState;

pub fn availability_routes(state: AvailabilityState) -> Router {
    // All slot operations require authentication
    let protected_routes = Router::new()
        .route("/slots", post(handlers::create_slot))
        .route("/slots/{slot_id}", patch(handlers::update_slot))
        .route("/slots/{slot_id}", delete(handlers::delete_slot))
        .route("/{doctor_id}/slots", get(handlers::list_doctor_slots))
        .layer(middleware::from_fn_with_state(
            state.config.clone(),
            auth_middleware,
        ));

    Router::new().merge(protected_routes).with_state(state)
}
