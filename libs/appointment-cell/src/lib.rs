use std::sync::Arc;

use shared_config::AppConfig;

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

use availability_cell::services::store::SlotStore;
use services::store::AppointmentStore;

/// Shared state for the appointment cell's routes. The slot store is the
/// same instance the availability cell serves, so reservations and slot
/// maintenance observe one consistent world.
#[derive(Clone)]
pub struct AppointmentState {
    pub config: Arc<AppConfig>,
    pub slots: Arc<SlotStore>,
    pub appointments: Arc<AppointmentStore>,
}
