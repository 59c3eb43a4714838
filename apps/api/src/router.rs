use std::sync::Arc;

use axum::{routing::get, Router};

use availability_cell::router::availability_routes;
use availability_cell::services::profile::{DoctorDirectory, StaticDirectory};
use availability_cell::services::store::SlotStore;
use availability_cell::AvailabilityState;
use appointment_cell::router::appointment_routes;
use appointment_cell::services::store::AppointmentStore;
use appointment_cell::AppointmentState;
use shared_config::AppConfig;

pub fn create_router(config: Arc<AppConfig>) -> Router {
    // One slot store instance shared by both cells: slot maintenance and
    // booking must observe the same state.
    let slots = Arc::new(SlotStore::new());
    let appointments = Arc::new(AppointmentStore::new());
    let directory: Arc<dyn DoctorDirectory> = Arc::new(StaticDirectory::new());

    let availability_state = AvailabilityState {
        config: config.clone(),
        slots: slots.clone(),
        directory,
    };
    let appointment_state = AppointmentState {
        config,
        slots,
        appointments,
    };

    Router::new()
        .route("/", get(|| async { "MediTrust booking API is running!" }))
        .nest("/doctors", availability_routes(availability_state))
        .nest("/appointments", appointment_routes(appointment_state))
}
