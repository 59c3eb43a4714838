use assert_matches::assert_matches;
use uuid::Uuid;

use appointment_cell::models::AppointmentStatus;
use appointment_cell::services::store::AppointmentStore;
use shared_models::error::BookingError;

#[tokio::test]
async fn second_active_appointment_for_a_slot_is_refused() {
    let store = AppointmentStore::new();
    let slot_id = Uuid::new_v4();
    let doctor_id = Uuid::new_v4();

    store
        .create(Uuid::new_v4(), doctor_id, slot_id)
        .await
        .unwrap();

    let second = store.create(Uuid::new_v4(), doctor_id, slot_id).await;
    assert_matches!(
        second,
        Err(BookingError::SlotAlreadyBooked(id)) if id == slot_id
    );
}

#[tokio::test]
async fn a_cancelled_appointment_frees_the_slot_for_a_new_row() {
    let store = AppointmentStore::new();
    let slot_id = Uuid::new_v4();
    let doctor_id = Uuid::new_v4();

    let first = store
        .create(Uuid::new_v4(), doctor_id, slot_id)
        .await
        .unwrap();
    store
        .set_status(first.appointment_id, AppointmentStatus::Cancelled)
        .await
        .unwrap();

    let second = store.create(Uuid::new_v4(), doctor_id, slot_id).await;
    assert!(second.is_ok());
}

#[tokio::test]
async fn set_status_enforces_the_transition_table() {
    let store = AppointmentStore::new();
    let appointment = store
        .create(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4())
        .await
        .unwrap();

    // pending -> confirmed
    let confirmed = store
        .set_status(appointment.appointment_id, AppointmentStatus::Confirmed)
        .await
        .unwrap();
    assert_eq!(confirmed.status, AppointmentStatus::Confirmed);

    // confirmed -> pending is not in the table
    let back = store
        .set_status(appointment.appointment_id, AppointmentStatus::Pending)
        .await;
    assert_matches!(back, Err(BookingError::IllegalTransition { .. }));

    // confirmed -> cancelled, then nothing further
    store
        .set_status(appointment.appointment_id, AppointmentStatus::Cancelled)
        .await
        .unwrap();
    let after_terminal = store
        .set_status(appointment.appointment_id, AppointmentStatus::Confirmed)
        .await;
    assert_matches!(after_terminal, Err(BookingError::IllegalTransition { .. }));
}

#[tokio::test]
async fn unknown_appointment_reports_not_found() {
    let store = AppointmentStore::new();
    let missing = Uuid::new_v4();

    assert_matches!(
        store.get(missing).await,
        Err(BookingError::AppointmentNotFound(id)) if id == missing
    );
    assert_matches!(
        store
            .set_status(missing, AppointmentStatus::Cancelled)
            .await,
        Err(BookingError::AppointmentNotFound(_))
    );
}

#[tokio::test]
async fn listings_are_scoped_and_newest_first() {
    let store = AppointmentStore::new();
    let patient = Uuid::new_v4();
    let doctor = Uuid::new_v4();

    let first = store
        .create(patient, doctor, Uuid::new_v4())
        .await
        .unwrap();
    let second = store
        .create(patient, doctor, Uuid::new_v4())
        .await
        .unwrap();
    store
        .create(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4())
        .await
        .unwrap();

    let for_patient = store.list_for_patient(patient).await;
    assert_eq!(for_patient.len(), 2);
    assert!(for_patient[0].created_at >= for_patient[1].created_at);

    let ids: Vec<_> = for_patient.iter().map(|a| a.appointment_id).collect();
    assert!(ids.contains(&first.appointment_id));
    assert!(ids.contains(&second.appointment_id));

    assert_eq!(store.list_for_doctor(doctor).await.len(), 2);
}
