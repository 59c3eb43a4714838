use std::sync::Arc;

use shared_config::AppConfig;

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

use services::profile::DoctorDirectory;
use services::store::SlotStore;

/// Shared state for the availability cell's routes.
#[derive(Clone)]
pub struct AvailabilityState {
    pub config: Arc<AppConfig>,
    pub slots: Arc<SlotStore>,
    pub directory: Arc<dyn DoctorDirectory>,
}
