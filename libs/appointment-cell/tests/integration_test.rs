use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use appointment_cell::router::appointment_routes;
use appointment_cell::services::store::AppointmentStore;
use appointment_cell::AppointmentState;
use availability_cell::router::availability_routes;
use availability_cell::services::profile::StaticDirectory;
use availability_cell::services::store::SlotStore;
use availability_cell::AvailabilityState;
use shared_utils::test_utils::{JwtTestUtils, TestConfig, TestUser};

/// Both cells mounted the way the api binary mounts them, over one shared
/// slot store.
fn create_test_app() -> Router {
    let config = TestConfig::default().to_arc();
    let slots = Arc::new(SlotStore::new());
    let appointments = Arc::new(AppointmentStore::new());

    let availability_state = AvailabilityState {
        config: config.clone(),
        slots: slots.clone(),
        directory: Arc::new(StaticDirectory::new()),
    };
    let appointment_state = AppointmentState {
        config,
        slots,
        appointments,
    };

    Router::new()
        .nest("/doctors", availability_routes(availability_state))
        .nest("/appointments", appointment_routes(appointment_state))
}

fn bearer(user: &TestUser) -> String {
    let secret = TestConfig::default().jwt_secret;
    format!("Bearer {}", JwtTestUtils::create_test_token(user, &secret, None))
}

fn post(uri: &str, user: &TestUser, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("Authorization", bearer(user))
        .header("content-type", "application/json");
    match body {
        Some(value) => builder.body(Body::from(value.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn get(uri: &str, user: &TestUser) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("Authorization", bearer(user))
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn publish_slot(app: &Router, doctor: &TestUser) -> String {
    let date = (Utc::now() + Duration::days(1)).date_naive();
    let body = json!({
        "date": date.to_string(),
        "start_time": "10:00:00",
        "duration_minutes": 30
    });

    let response = app
        .clone()
        .oneshot(post("/doctors/slots", doctor, Some(body)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    body_json(response).await["slot"]["slot_id"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn booking_flow_end_to_end() {
    let app = create_test_app();
    let doctor = TestUser::doctor("doctor@example.com");
    let p1 = TestUser::patient("p1@example.com");
    let p2 = TestUser::patient("p2@example.com");

    let slot_id = publish_slot(&app, &doctor).await;

    // P1 books the slot
    let response = app
        .clone()
        .oneshot(post(
            "/appointments",
            &p1,
            Some(json!({ "slot_id": slot_id })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let booked = body_json(response).await;
    assert_eq!(booked["appointment"]["status"], json!("pending"));
    let appointment_id = booked["appointment"]["appointment_id"]
        .as_str()
        .unwrap()
        .to_string();

    // Doctor accepts
    let response = app
        .clone()
        .oneshot(post(
            &format!("/appointments/{}/accept", appointment_id),
            &doctor,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["appointment"]["status"],
        json!("confirmed")
    );

    // P2 is refused while the slot is held
    let response = app
        .clone()
        .oneshot(post(
            "/appointments",
            &p2,
            Some(json!({ "slot_id": slot_id })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // P1 cancels, releasing the slot
    let response = app
        .clone()
        .oneshot(post(
            &format!("/appointments/{}/cancel", appointment_id),
            &p1,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The doctor's listing shows the slot free again
    let response = app
        .clone()
        .oneshot(get(&format!("/doctors/{}/slots", doctor.id), &p2))
        .await
        .unwrap();
    let listing = body_json(response).await;
    assert_eq!(listing["slots"][0]["is_booked"], json!(false));

    // P2 books the freed slot
    let response = app
        .clone()
        .oneshot(post(
            "/appointments",
            &p2,
            Some(json!({ "slot_id": slot_id })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["appointment"]["status"],
        json!("pending")
    );
}

#[tokio::test]
async fn doctor_cannot_book_an_appointment() {
    let app = create_test_app();
    let doctor = TestUser::doctor("doctor@example.com");

    let slot_id = publish_slot(&app, &doctor).await;

    let response = app
        .oneshot(post(
            "/appointments",
            &doctor,
            Some(json!({ "slot_id": slot_id })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn patient_only_sees_their_own_appointments() {
    let app = create_test_app();
    let doctor = TestUser::doctor("doctor@example.com");
    let p1 = TestUser::patient("p1@example.com");
    let p2 = TestUser::patient("p2@example.com");

    let slot_id = publish_slot(&app, &doctor).await;
    let response = app
        .clone()
        .oneshot(post(
            "/appointments",
            &p1,
            Some(json!({ "slot_id": slot_id })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let own = app
        .clone()
        .oneshot(get(&format!("/appointments/patients/{}", p1.id), &p1))
        .await
        .unwrap();
    assert_eq!(own.status(), StatusCode::OK);
    assert_eq!(
        body_json(own).await["appointments"].as_array().unwrap().len(),
        1
    );

    let foreign = app
        .oneshot(get(&format!("/appointments/patients/{}", p1.id), &p2))
        .await
        .unwrap();
    assert_eq!(foreign.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn stranger_cannot_cancel_over_http() {
    let app = create_test_app();
    let doctor = TestUser::doctor("doctor@example.com");
    let patient = TestUser::patient("p1@example.com");
    let stranger = TestUser::patient("p2@example.com");

    let slot_id = publish_slot(&app, &doctor).await;
    let response = app
        .clone()
        .oneshot(post(
            "/appointments",
            &patient,
            Some(json!({ "slot_id": slot_id })),
        ))
        .await
        .unwrap();
    let appointment_id = body_json(response).await["appointment"]["appointment_id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .oneshot(post(
            &format!("/appointments/{}/cancel", appointment_id),
            &stranger,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn requests_without_token_are_unauthorized() {
    let app = create_test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/appointments")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "slot_id": "x" }).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let app = create_test_app();
    let patient = TestUser::patient("p1@example.com");
    let secret = TestConfig::default().jwt_secret;

    let token = JwtTestUtils::expired_token(&patient, &secret);
    let request = Request::builder()
        .method("GET")
        .uri(format!("/appointments/patients/{}", patient.id))
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
