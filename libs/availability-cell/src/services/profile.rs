// libs/availability-cell/src/services/profile.rs
use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::DoctorProfile;

/// Boundary to the external doctor profile service. The engine stores only
/// doctor ids; listings are decorated with whatever the directory returns.
#[async_trait]
pub trait DoctorDirectory: Send + Sync {
    async fn lookup(&self, doctor_id: Uuid) -> Option<DoctorProfile>;
}

/// Fixed in-memory directory for tests and local runs.
pub struct StaticDirectory {
    profiles: HashMap<Uuid, DoctorProfile>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self {
            profiles: HashMap::new(),
        }
    }

    pub fn with_profiles(profiles: Vec<DoctorProfile>) -> Self {
        Self {
            profiles: profiles.into_iter().map(|p| (p.doctor_id, p)).collect(),
        }
    }
}

impl Default for StaticDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DoctorDirectory for StaticDirectory {
    async fn lookup(&self, doctor_id: Uuid) -> Option<DoctorProfile> {
        self.profiles.get(&doctor_id).cloned()
    }
}
