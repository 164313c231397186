//! End-to-end tests over the in-memory dispatch path.
//!
//! Every request goes through `App::handle`, the same code the serve loop
//! runs per request, so these cover routing, extraction, the create
//! pipeline and the error mapping without opening a socket.

use std::sync::Arc;

use bytes::Bytes;
use http::{Method, Response, StatusCode, Uri};

use offerbook_core::{geo, names, Offer, OfferStore, OfferSubmission, DEFAULT_MAX_QUANTITY};
use offerbook_server::{App, RequestParts, RequestPartsBuilder};

fn app() -> App {
    App::new(Arc::new(OfferStore::generate(DEFAULT_MAX_QUANTITY)))
}

fn get(uri: &str) -> RequestParts {
    RequestPartsBuilder::new()
        .method(Method::GET)
        .uri(uri.parse::<Uri>().expect("valid uri"))
        .build()
}

fn post_json(body: &str) -> RequestParts {
    RequestPartsBuilder::new()
        .method(Method::POST)
        .uri(Uri::from_static("/api/offers"))
        .header("content-type", "application/json")
        .body(body.to_string())
        .build()
}

fn content_type(response: &Response<Bytes>) -> &str {
    response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

fn offers_body(response: &Response<Bytes>) -> Vec<Offer> {
    serde_json::from_slice(response.body()).expect("json array of offers")
}

const BOUNDARY: &str = "----offerbook-test-boundary";

fn multipart_body(parts: &[(&str, &str, Option<&str>, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();

    for (name, content_type, filename, data) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        if let Some(fname) = filename {
            body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"; filename=\"{fname}\"\r\n")
                    .as_bytes(),
            );
        } else {
            body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n").as_bytes(),
            );
        }
        body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn post_multipart(parts: &[(&str, &str, Option<&str>, &[u8])]) -> RequestParts {
    RequestPartsBuilder::new()
        .method(Method::POST)
        .uri(Uri::from_static("/api/offers"))
        .header(
            "content-type",
            &format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(multipart_body(parts))
        .build()
}

#[tokio::test]
async fn list_returns_the_whole_fixture_by_default() {
    let response = app().handle(get("/api/offers")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(content_type(&response).starts_with("application/json"));
    assert_eq!(offers_body(&response).len(), DEFAULT_MAX_QUANTITY);
}

#[tokio::test]
async fn list_respects_limit() {
    let response = app().handle(get("/api/offers?limit=5")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(offers_body(&response).len(), 5);
}

#[tokio::test]
async fn list_clips_limit_to_the_fixture() {
    let response = app().handle(get("/api/offers?limit=40")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(offers_body(&response).len(), DEFAULT_MAX_QUANTITY);
}

#[tokio::test]
async fn list_slices_with_skip() {
    let app = app();
    let response = app.handle(get("/api/offers?skip=3&limit=6")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let offers = offers_body(&response);
    assert_eq!(offers.len(), 6);
    assert_eq!(offers[0].date, app.store().offers()[3].date);
}

#[tokio::test]
async fn list_beyond_the_fixture_is_empty() {
    let response = app().handle(get("/api/offers?skip=20&limit=25")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(offers_body(&response).is_empty());
}

#[tokio::test]
async fn list_rejects_skip_greater_than_limit() {
    let response = app().handle(get("/api/offers?skip=10&limit=5")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(content_type(&response).starts_with("text/html"));
}

#[tokio::test]
async fn list_rejects_negative_values() {
    let app = app();

    let response = app.handle(get("/api/offers?skip=-1")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.handle(get("/api/offers?limit=-5")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_falls_back_on_non_numeric_params() {
    let response = app().handle(get("/api/offers?skip=abc&limit=xyz")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(offers_body(&response).len(), DEFAULT_MAX_QUANTITY);
}

#[tokio::test]
async fn get_returns_the_entry_with_the_requested_date() {
    let app = app();
    let response = app.handle(get("/api/offers/111")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(content_type(&response).starts_with("application/json"));

    let offer: Offer = serde_json::from_slice(response.body()).expect("json offer");
    assert_eq!(offer.date, 111);
    assert_eq!(&offer, &app.store().offers()[0]);
}

#[tokio::test]
async fn get_unknown_date_is_not_found() {
    let response = app().handle(get("/api/offers/999999")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(content_type(&response).starts_with("text/html"));
}

#[tokio::test]
async fn get_non_numeric_date_is_bad_request() {
    let response = app().handle(get("/api/offers/abc")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(content_type(&response).starts_with("text/html"));
}

#[tokio::test]
async fn put_on_the_collection_is_not_implemented() {
    let parts = RequestPartsBuilder::new()
        .method(Method::PUT)
        .uri(Uri::from_static("/api/offers"))
        .body(r#"{"price": 1}"#)
        .build();
    let response = app().handle(parts).await;

    assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    assert!(content_type(&response).starts_with("text/html"));
}

#[tokio::test]
async fn unknown_paths_render_the_html_not_found_page() {
    let response = app().handle(get("/api/blahblah")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(content_type(&response).starts_with("text/html"));
}

#[tokio::test]
async fn create_returns_the_record_with_a_derived_location() {
    let response = app()
        .handle(post_json(
            r#"{"name": "Seaside flat", "price": "42000", "rooms": "3",
                "guests": 4, "address": "12 Harbour street"}"#,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(content_type(&response).starts_with("application/json"));

    let submission: OfferSubmission =
        serde_json::from_slice(response.body()).expect("json submission");
    assert_eq!(submission.name, "Seaside flat");
    assert!((submission.price - 42_000.0).abs() < f64::EPSILON);
    assert_eq!(submission.rooms, 3);
    assert_eq!(submission.guests, 4);
    assert_eq!(submission.address, "12 Harbour street");
    assert!(geo::X_BOUNDS.contains(&submission.location.x));
    assert!(geo::Y_BOUNDS.contains(&submission.location.y));
}

#[tokio::test]
async fn create_location_is_stable_within_the_run() {
    let app = app();
    let body = r#"{"name": "Loft", "price": 1000, "rooms": 1, "guests": 2,
                   "address": "1 Main street"}"#;

    let first = app.handle(post_json(body)).await;
    let second = app.handle(post_json(body)).await;

    let first: OfferSubmission = serde_json::from_slice(first.body()).unwrap();
    let second: OfferSubmission = serde_json::from_slice(second.body()).unwrap();
    assert_eq!(first.location, second.location);
}

#[tokio::test]
async fn create_without_a_name_draws_one_from_the_pool() {
    let response = app()
        .handle(post_json(
            r#"{"price": 1000, "rooms": 1, "guests": 2, "address": "1 Main street"}"#,
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let submission: OfferSubmission = serde_json::from_slice(response.body()).unwrap();
    assert!(names::DEFAULT_NAMES.contains(&submission.name.as_str()));
}

#[tokio::test]
async fn create_reports_every_violation_in_a_json_envelope() {
    let response = app()
        .handle(post_json(r#"{"price": "cheap", "guests": 0}"#))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(content_type(&response).starts_with("application/json"));

    let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    for field in ["address", "price", "rooms", "guests"] {
        assert!(
            body["error"]["errors"][field].is_array(),
            "expected errors for {field}"
        );
    }
}

#[tokio::test]
async fn create_rejects_malformed_json() {
    let response = app().handle(post_json("not valid json")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_multipart_echoes_attachment_filenames() {
    let response = app()
        .handle(post_multipart(&[
            ("name", "text/plain", None, b"Seaside flat"),
            ("price", "text/plain", None, b"42000"),
            ("rooms", "text/plain", None, b"3"),
            ("guests", "text/plain", None, b"4"),
            ("address", "text/plain", None, b"12 Harbour street"),
            ("avatar", "image/png", Some("me.png"), b"PNG_DATA"),
            ("preview", "image/jpeg", Some("flat.jpg"), b"JPG_DATA"),
        ]))
        .await;

    assert_eq!(response.status(), StatusCode::OK);

    let submission: OfferSubmission = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(submission.avatar.as_deref(), Some("me.png"));
    assert_eq!(submission.preview.as_deref(), Some("flat.jpg"));
    assert_eq!(submission.rooms, 3);
    assert_eq!(submission.guests, 4);
}

#[tokio::test]
async fn create_multipart_without_attachments_leaves_slots_absent() {
    let response = app()
        .handle(post_multipart(&[
            ("price", "text/plain", None, b"1000"),
            ("rooms", "text/plain", None, b"1"),
            ("guests", "text/plain", None, b"2"),
            ("address", "text/plain", None, b"1 Main street"),
        ]))
        .await;

    assert_eq!(response.status(), StatusCode::OK);

    let submission: OfferSubmission = serde_json::from_slice(response.body()).unwrap();
    assert!(submission.avatar.is_none());
    assert!(submission.preview.is_none());
}

#[tokio::test]
async fn create_multipart_rejects_disallowed_file_types() {
    let response = app()
        .handle(post_multipart(&[
            ("address", "text/plain", None, b"1 Main street"),
            ("avatar", "application/pdf", Some("cv.pdf"), b"PDF_DATA"),
        ]))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(content_type(&response).starts_with("application/json"));

    let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["errors"]["avatar"].is_array());
}

#[tokio::test]
async fn create_multipart_rejects_a_duplicated_slot() {
    let response = app()
        .handle(post_multipart(&[
            ("avatar", "image/png", Some("one.png"), b"A"),
            ("avatar", "image/png", Some("two.png"), b"B"),
        ]))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_multipart_rejects_an_unknown_file_slot() {
    let response = app()
        .handle(post_multipart(&[(
            "banner",
            "image/png",
            Some("banner.png"),
            b"PNG_DATA",
        )]))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_reports_the_service() {
    let response = app().handle(get("/health")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "offerbook");
}
