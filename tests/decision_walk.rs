//! Black-box round-trip scenarios, one per numbered case in the
//! testable-properties list: build a handler through the public API only,
//! drive a request through it, and check the response that comes out the
//! other side. Mirrors the role `angular-rust-ux-webmachine`'s
//! `tests/content_negotiation.rs` plays for that crate — the engine's own
//! external contract, exercised without reaching into any internal module.

use std::collections::HashSet;
use std::sync::Arc;

use http::{HeaderValue, Method, StatusCode};

use decision_engine::{
    build_handler, Body, CallbackEntry, CallbackOutcome, Request, Response, ALLOWED_METHODS,
    CONTENT_TYPES_PROVIDED, MALFORMED_REQUEST, RESOURCE_EXISTS,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn default_get_against_existing_resource_no_providers() {
    init_logging();
    let handler = build_handler(Default::default()).unwrap();
    let req = Request::new(Method::GET);

    let resp = handler.handle(&req);

    assert_eq!(resp.status, StatusCode::OK);
    assert!(!resp.body.is_non_empty());
}

#[test]
fn unknown_method() {
    let handler = build_handler(Default::default()).unwrap();
    let req = Request::new(Method::from_bytes(b"FROB").unwrap());

    let resp = handler.handle(&req);

    assert_eq!(resp.status, StatusCode::NOT_IMPLEMENTED);
}

#[test]
fn disallowed_method() {
    let mut callbacks = std::collections::HashMap::new();
    callbacks.insert(
        ALLOWED_METHODS.to_string(),
        CallbackEntry::AllowedMethods(Arc::new(|_req, _heap, _resp| {
            let mut methods = HashSet::new();
            methods.insert(Method::GET);
            CallbackOutcome::new(methods)
        })),
    );
    let handler = build_handler(callbacks).unwrap();
    let req = Request::new(Method::POST);

    let resp = handler.handle(&req);

    assert_eq!(resp.status, StatusCode::METHOD_NOT_ALLOWED);
}

#[test]
fn malformed_request_carries_body_from_the_callback() {
    let mut callbacks = std::collections::HashMap::new();
    callbacks.insert(
        MALFORMED_REQUEST.to_string(),
        CallbackEntry::MalformedRequest(Arc::new(|_req, _heap, _resp| {
            let mut response = Response::sentinel();
            response.body = Body::Value(b"missing node".to_vec());
            CallbackOutcome::with_response(true, response)
        })),
    );
    let handler = build_handler(callbacks).unwrap();
    let req = Request::new(Method::GET);

    let resp = handler.handle(&req);

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    match resp.body {
        Body::Value(bytes) => assert_eq!(bytes, b"missing node"),
        other => panic!("expected a literal body, got {:?}", other),
    }
}

#[test]
fn not_found_carries_body_from_the_callback() {
    let mut callbacks = std::collections::HashMap::new();
    callbacks.insert(
        RESOURCE_EXISTS.to_string(),
        CallbackEntry::ResourceExists(Arc::new(|_req, _heap, _resp| {
            let mut response = Response::sentinel();
            response.body =
                Body::Value(b"{\"error\":\"Could not find facts for n1\"}".to_vec());
            CallbackOutcome::with_response(false, response)
        })),
    );
    let handler = build_handler(callbacks).unwrap();
    let req = Request::new(Method::GET);

    let resp = handler.handle(&req);

    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    match resp.body {
        Body::Value(bytes) => assert_eq!(bytes, b"{\"error\":\"Could not find facts for n1\"}"),
        other => panic!("expected a literal body, got {:?}", other),
    }
}

#[test]
fn content_negotiation_success() {
    let handler = build_handler(providing_json()).unwrap();
    let mut req = Request::new(Method::GET);
    req.headers
        .insert(http::header::ACCEPT, HeaderValue::from_static("application/json"));

    let resp = handler.handle(&req);

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(
        resp.headers.get(http::header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    match resp.body {
        Body::Value(bytes) => assert_eq!(bytes, b"{\"ok\":true}"),
        other => panic!("expected a literal body, got {:?}", other),
    }
}

#[test]
fn content_negotiation_failure() {
    let handler = build_handler(providing_json()).unwrap();
    let mut req = Request::new(Method::GET);
    req.headers
        .insert(http::header::ACCEPT, HeaderValue::from_static("text/html"));

    let resp = handler.handle(&req);

    assert_eq!(resp.status, StatusCode::NOT_ACCEPTABLE);
}

#[test]
fn unknown_callback_name_at_construction() {
    let mut callbacks = std::collections::HashMap::new();
    callbacks.insert(
        "not-a-callback".to_string(),
        CallbackEntry::ResourceExists(Arc::new(|_req, _heap, _resp| CallbackOutcome::new(true))),
    );

    assert!(build_handler(callbacks).is_err());
}

#[test]
fn mismatched_callback_map_stays_usable() {
    // A construction failure must not leave a half-built handler lying
    // around for a caller to accidentally use (§8 validation property).
    let mut callbacks = std::collections::HashMap::new();
    callbacks.insert(
        "not-a-callback".to_string(),
        CallbackEntry::ResourceExists(Arc::new(|_req, _heap, _resp| CallbackOutcome::new(true))),
    );
    match build_handler(callbacks) {
        Ok(_) => panic!("expected construction to fail"),
        Err(err) => assert!(err.to_string().contains("not-a-callback")),
    }
}

fn providing_json() -> std::collections::HashMap<String, CallbackEntry> {
    let mut callbacks = std::collections::HashMap::new();
    callbacks.insert(
        CONTENT_TYPES_PROVIDED.to_string(),
        CallbackEntry::ContentTypesProvided(Arc::new(|_req, _heap, _resp| {
            let provider: decision_engine::Provider = Arc::new(|_req, _heap, resp| {
                let mut resp = resp.clone();
                resp.body = Body::Value(b"{\"ok\":true}".to_vec());
                resp
            });
            CallbackOutcome::new(vec![("application/json".to_string(), provider)])
        })),
    );
    callbacks
}
