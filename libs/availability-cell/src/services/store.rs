// libs/availability-cell/src/services/store.rs
use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use shared_database::MemTable;
use shared_models::error::BookingError;

use crate::models::Slot;

/// Owns the persisted set of availability slots.
///
/// All check-then-act sequences (overlap validation, the booked-state guard)
/// run inside the table's write lock, so concurrent callers observe them as
/// atomic.
pub struct SlotStore {
    slots: MemTable<Slot>,
}

impl SlotStore {
    pub fn new() -> Self {
        Self {
            slots: MemTable::new(),
        }
    }

    /// Create a slot for `doctor_id`, rejecting intervals that intersect any
    /// existing slot of the same doctor.
    pub async fn create(
        &self,
        doctor_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Slot, BookingError> {
        self.slots
            .write(|rows| {
                if let Some(existing) = rows
                    .values()
                    .find(|s| s.doctor_id == doctor_id && s.overlaps(start, end))
                {
                    return Err(BookingError::OverlappingSlot {
                        doctor_id,
                        conflicting: existing.slot_id,
                    });
                }

                let now = Utc::now();
                let slot = Slot {
                    slot_id: Uuid::new_v4(),
                    doctor_id,
                    start,
                    end,
                    is_booked: false,
                    created_at: now,
                    updated_at: now,
                };
                rows.insert(slot.slot_id, slot.clone());
                debug!("Slot {} created for doctor {}", slot.slot_id, doctor_id);
                Ok(slot)
            })
            .await
    }

    pub async fn get(&self, slot_id: Uuid) -> Result<Slot, BookingError> {
        self.slots
            .get(slot_id)
            .await
            .ok_or(BookingError::SlotNotFound(slot_id))
    }

    /// All slots for a doctor, ordered by start ascending.
    pub async fn list_for_doctor(&self, doctor_id: Uuid) -> Vec<Slot> {
        let mut slots = self
            .slots
            .read(|rows| {
                rows.values()
                    .filter(|s| s.doctor_id == doctor_id)
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .await;
        slots.sort_by_key(|s| s.start);
        slots
    }

    /// Move a slot to a new interval. Refused while the slot is booked;
    /// overlap is re-validated against the doctor's other slots.
    pub async fn update_time(
        &self,
        slot_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Slot, BookingError> {
        self.slots
            .write(|rows| {
                let current = rows
                    .get(&slot_id)
                    .ok_or(BookingError::SlotNotFound(slot_id))?;

                if current.is_booked {
                    return Err(BookingError::SlotBooked(slot_id));
                }

                let doctor_id = current.doctor_id;
                if let Some(existing) = rows.values().find(|s| {
                    s.slot_id != slot_id && s.doctor_id == doctor_id && s.overlaps(start, end)
                }) {
                    return Err(BookingError::OverlappingSlot {
                        doctor_id,
                        conflicting: existing.slot_id,
                    });
                }

                let slot = rows.get_mut(&slot_id).expect("checked above");
                slot.start = start;
                slot.end = end;
                slot.updated_at = Utc::now();
                debug!("Slot {} moved to [{}, {})", slot_id, start, end);
                Ok(slot.clone())
            })
            .await
    }

    /// Remove a free slot. A booked slot must have its appointment cancelled
    /// first.
    pub async fn delete(&self, slot_id: Uuid) -> Result<(), BookingError> {
        self.slots
            .write(|rows| {
                let slot = rows
                    .get(&slot_id)
                    .ok_or(BookingError::SlotNotFound(slot_id))?;

                if slot.is_booked {
                    return Err(BookingError::SlotBooked(slot_id));
                }

                rows.remove(&slot_id);
                debug!("Slot {} deleted", slot_id);
                Ok(())
            })
            .await
    }

    /// Atomic conditional flip to booked: the reservation guard. Invoked
    /// exclusively by the booking engine; the losing concurrent caller gets
    /// `SlotAlreadyBooked` rather than corrupting state.
    pub async fn mark_booked(&self, slot_id: Uuid) -> Result<Slot, BookingError> {
        self.slots
            .update(slot_id, |slot| {
                if slot.is_booked {
                    return Err(BookingError::SlotAlreadyBooked(slot_id));
                }
                slot.is_booked = true;
                slot.updated_at = Utc::now();
                Ok(slot.clone())
            })
            .await
            .map_err(|_| BookingError::SlotNotFound(slot_id))?
    }

    /// Flip a slot back to free after its appointment is cancelled. Invoked
    /// exclusively by the lifecycle manager; idempotent on a free slot.
    pub async fn mark_free(&self, slot_id: Uuid) -> Result<(), BookingError> {
        self.slots
            .update(slot_id, |slot| {
                slot.is_booked = false;
                slot.updated_at = Utc::now();
            })
            .await
            .map_err(|_| BookingError::SlotNotFound(slot_id))
    }
}

impl Default for SlotStore {
    fn default() -> Self {
        Self::new()
    }
}
