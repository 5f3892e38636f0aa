//! Transition functions: one per non-terminal [`crate::graph::State`].
//!
//! `kellymclaughlin-airship-rust`'s `decision.rs` gives each node its own
//! `fn` that calls the next node directly (`b13` calls `b12` or halts). Here
//! the functions only compute a boolean; [`crate::driver`] does the actual
//! walking by looking the boolean up in [`crate::graph::successors`]. Fixed
//! nodes read the request or dispatch a callback; stubbed nodes are a
//! hardcoded polarity; residual nodes implement real conditional-request
//! logic against data sources (etag, last-modified, moved-to) that this
//! engine's four callback names have no way to supply, so they always
//! observe those sources as absent.

use http::Method;

use crate::callback;
use crate::context::{Heap, Request, Response};
use crate::content_negotiation;
use crate::graph::State;

/// Evaluates the transition for `state`, logging its name to the trace
/// first. Panics if called with a [`State::Terminal`] — the driver never
/// does this; terminal states are detected before a transition is looked
/// up.
pub(crate) fn evaluate(state: State, req: &Request, heap: &mut Heap, resp: &mut Response) -> bool {
    let name = state_name(state);
    log::trace!("decision: {}", name);
    heap.trace(name);

    use State::*;
    match state {
        // Fixed: real request-derived logic.
        B12 => known_method(&req.method),
        B10 => allowed_methods_contains(req, heap, resp),
        B9 => malformed_request(req, heap, resp),
        C3 => req.headers.contains_key(http::header::ACCEPT),
        C4 => negotiate_content_type(req, heap, resp),
        G7 => resource_exists(req, heap, resp),
        H7 => header_is_star(req, http::header::IF_MATCH),
        I7 | O16 => req.method == Method::PUT,
        L7 | M5 | N16 => req.method == Method::POST,
        M16 => req.method == Method::DELETE,
        O20 => resp.body.is_non_empty(),
        P11 => resp.headers.contains_key(http::header::LOCATION),

        // Stubbed: true.
        B8 | B13 | M7 | M20 | N5 => true,

        // Stubbed: false.
        B3 | B4 | B5 | B6 | B7 | B11 | D4 | E5 | F6 | G8 | H10 | I12 | K5 | K7 | L5 | L13
        | N11 | O14 | O18 | P3 => false,

        // Residual: real conditional-request logic against always-absent
        // etag/last-modified/moved-to data (§4.2 residual-node note).
        G9 => header_is_star(req, http::header::IF_MATCH),
        G11 => etag_matches(req, http::header::IF_MATCH),
        H11 => parses_as_http_date(req, http::header::IF_UNMODIFIED_SINCE),
        H12 => last_modified_after(req, http::header::IF_UNMODIFIED_SINCE),
        I4 => moved_permanently(),
        I13 => header_is_star(req, http::header::IF_NONE_MATCH),
        J18 => req.method == Method::GET || req.method == Method::HEAD,
        K13 => etag_matches(req, http::header::IF_NONE_MATCH),
        L14 => moved_permanently(),
        L15 => parses_as_http_date(req, http::header::IF_MODIFIED_SINCE),
        L17 => last_modified_after(req, http::header::IF_MODIFIED_SINCE),

        Terminal(code) => unreachable!("evaluate() called on terminal state {}", code),
    }
}

fn state_name(state: State) -> &'static str {
    use State::*;
    match state {
        B13 => "b13",
        B12 => "b12",
        B11 => "b11",
        B10 => "b10",
        B9 => "b9",
        B8 => "b8",
        B7 => "b7",
        B6 => "b6",
        B5 => "b5",
        B4 => "b4",
        B3 => "b3",
        C3 => "c3",
        C4 => "c4",
        D4 => "d4",
        E5 => "e5",
        F6 => "f6",
        G7 => "g7",
        G8 => "g8",
        G9 => "g9",
        G11 => "g11",
        H7 => "h7",
        H10 => "h10",
        H11 => "h11",
        H12 => "h12",
        I4 => "i4",
        I7 => "i7",
        I12 => "i12",
        I13 => "i13",
        J18 => "j18",
        K5 => "k5",
        K7 => "k7",
        K13 => "k13",
        L5 => "l5",
        L7 => "l7",
        L13 => "l13",
        L14 => "l14",
        L15 => "l15",
        L17 => "l17",
        M5 => "m5",
        M7 => "m7",
        M16 => "m16",
        M20 => "m20",
        N5 => "n5",
        N11 => "n11",
        N16 => "n16",
        O14 => "o14",
        O16 => "o16",
        O18 => "o18",
        O20 => "o20",
        P3 => "p3",
        P11 => "p11",
        State::Terminal(_) => "terminal",
    }
}

const KNOWN_METHODS: [Method; 8] = [
    Method::GET,
    Method::HEAD,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::TRACE,
    Method::CONNECT,
    Method::OPTIONS,
];

fn known_method(method: &Method) -> bool {
    KNOWN_METHODS.contains(method)
}

fn allowed_methods_contains(req: &Request, heap: &mut Heap, resp: &mut Response) -> bool {
    let allowed_methods = heap.callbacks().allowed_methods().clone();
    let methods = callback::dispatch(allowed_methods.as_ref(), req, heap, resp);
    methods.contains(&req.method)
}

fn malformed_request(req: &Request, heap: &mut Heap, resp: &mut Response) -> bool {
    let malformed_request = heap.callbacks().malformed_request().clone();
    callback::dispatch(malformed_request.as_ref(), req, heap, resp)
}

fn resource_exists(req: &Request, heap: &mut Heap, resp: &mut Response) -> bool {
    let resource_exists = heap.callbacks().resource_exists().clone();
    callback::dispatch(resource_exists.as_ref(), req, heap, resp)
}

/// `c4`: content negotiation. On a match, sets `Content-Type` and stashes
/// the provider in the body slot so the driver can invoke it at the end of
/// the walk (§4.3, §4.5 step 4).
fn negotiate_content_type(req: &Request, heap: &mut Heap, resp: &mut Response) -> bool {
    let content_types_provided = heap.callbacks().content_types_provided().clone();
    let offered = callback::dispatch(content_types_provided.as_ref(), req, heap, resp);

    let accept = req
        .headers
        .get(http::header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("*/*");

    for (media_type, provider) in offered {
        if content_negotiation::is_acceptable(&media_type, accept) {
            if let Ok(value) = http::HeaderValue::from_str(&media_type) {
                resp.headers.insert(http::header::CONTENT_TYPE, value);
            }
            resp.body = crate::context::Body::Provider(provider);
            return true;
        }
    }
    false
}

fn header_is_star(req: &Request, name: http::HeaderName) -> bool {
    req.headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim() == "*")
        .unwrap_or(false)
}

/// No callback name exposes an entity tag, so there is never anything to
/// compare a client's conditional header against. Kept as its own function
/// (rather than folded into a constant) so the day an `etag` callback is
/// added, only this function needs to change.
fn etag_matches(_req: &Request, _name: http::HeaderName) -> bool {
    false
}

fn parses_as_http_date(req: &Request, name: http::HeaderName) -> bool {
    req.headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(|value| httpdate::parse_http_date(value).is_ok())
        .unwrap_or(false)
}

/// No callback name exposes a last-modified timestamp, so the resource is
/// never considered newer than a conditional date the client sent.
fn last_modified_after(_req: &Request, _name: http::HeaderName) -> bool {
    false
}

/// No callback name exposes a moved-to target, so the resource is never
/// reported as moved.
fn moved_permanently() -> bool {
    false
}
