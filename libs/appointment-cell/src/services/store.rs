// libs/appointment-cell/src/services/store.rs
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use shared_database::MemTable;
use shared_models::error::BookingError;

use crate::models::{Appointment, AppointmentStatus};

/// Owns the persisted set of appointments and enforces the partial
/// uniqueness constraint: at most one non-cancelled appointment per slot.
/// That constraint is the durable backstop for the reservation guard.
pub struct AppointmentStore {
    appointments: MemTable<Appointment>,
}

impl AppointmentStore {
    pub fn new() -> Self {
        Self {
            appointments: MemTable::new(),
        }
    }

    /// Create a pending appointment. Refused when a non-cancelled
    /// appointment already references the slot.
    pub async fn create(
        &self,
        patient_id: Uuid,
        doctor_id: Uuid,
        slot_id: Uuid,
    ) -> Result<Appointment, BookingError> {
        self.appointments
            .write(|rows| {
                if rows.values().any(|a| a.slot_id == slot_id && a.is_active()) {
                    return Err(BookingError::SlotAlreadyBooked(slot_id));
                }

                let now = Utc::now();
                let appointment = Appointment {
                    appointment_id: Uuid::new_v4(),
                    patient_id,
                    doctor_id,
                    slot_id,
                    status: AppointmentStatus::Pending,
                    created_at: now,
                    updated_at: now,
                };
                rows.insert(appointment.appointment_id, appointment.clone());
                debug!(
                    "Appointment {} created for patient {} on slot {}",
                    appointment.appointment_id, patient_id, slot_id
                );
                Ok(appointment)
            })
            .await
    }

    pub async fn get(&self, appointment_id: Uuid) -> Result<Appointment, BookingError> {
        self.appointments
            .get(appointment_id)
            .await
            .ok_or(BookingError::AppointmentNotFound(appointment_id))
    }

    /// A patient's appointments, newest first.
    pub async fn list_for_patient(&self, patient_id: Uuid) -> Vec<Appointment> {
        self.list_where(|a| a.patient_id == patient_id).await
    }

    /// A doctor's appointments, newest first.
    pub async fn list_for_doctor(&self, doctor_id: Uuid) -> Vec<Appointment> {
        self.list_where(|a| a.doctor_id == doctor_id).await
    }

    /// Apply a status transition, enforcing the legal-transition table.
    pub async fn set_status(
        &self,
        appointment_id: Uuid,
        new_status: AppointmentStatus,
    ) -> Result<Appointment, BookingError> {
        self.appointments
            .update(appointment_id, |appointment| {
                if !appointment.status.can_transition_to(&new_status) {
                    return Err(BookingError::IllegalTransition {
                        from: appointment.status.to_string(),
                        to: new_status.to_string(),
                    });
                }

                appointment.status = new_status;
                appointment.updated_at = Utc::now();
                debug!(
                    "Appointment {} transitioned to {}",
                    appointment_id, new_status
                );
                Ok(appointment.clone())
            })
            .await
            .map_err(|_| BookingError::AppointmentNotFound(appointment_id))?
    }

    async fn list_where(&self, pred: impl Fn(&Appointment) -> bool) -> Vec<Appointment> {
        let mut appointments = self
            .appointments
            .read(|rows| rows.values().filter(|a| pred(a)).cloned().collect::<Vec<_>>())
            .await;
        appointments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        appointments
    }
}

impl Default for AppointmentStore {
    fn default() -> Self {
        Self::new()
    }
}
