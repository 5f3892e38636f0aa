//! The request/response context threaded through a single decision walk.
//!
//! This plays the role `airship`'s `AirshipState` (`src/types.rs`) and
//! `webmachine-rust`'s `Context` (`src/context/mod.rs`) play in the two
//! crates this one is descended from, but re-cast as a driver-owned,
//! explicitly-threaded pair of values rather than a trait-bound generic
//! `S: HasAirshipState` or an implicit `self` field.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

use http::{HeaderMap, Method, StatusCode, Uri};

use crate::callback::CallbackMap;

/// A provider renders a response body once content negotiation has picked a
/// media type for it. Invoked exactly once, at the end of the walk, with
/// the request, the final heap, and the response accumulated so far
/// (status and headers already set — a provider ordinarily just attaches a
/// body to it and returns it unchanged otherwise).
pub type Provider =
    Arc<dyn Fn(&Request, &Heap, &Response) -> Response + Send + Sync>;

/// The response body slot. `Empty` and `Value` are set directly by
/// callbacks or transitions; `Provider` is set only by content negotiation
/// (`c4`) and is resolved by the driver at the very end of the walk.
#[derive(Clone)]
pub enum Body {
    /// No body has been set.
    Empty,
    /// A literal body, already rendered.
    Value(Vec<u8>),
    /// A provider selected during content negotiation, not yet invoked.
    Provider(Provider),
}

impl Body {
    /// True for `Value` with a non-empty payload, and for `Provider` (a
    /// provider is a promise of content, so it counts as non-empty for the
    /// purposes of the `o20` transition). False for `Empty` and for a
    /// `Value` holding zero bytes.
    pub fn is_non_empty(&self) -> bool {
        match self {
            Body::Empty => false,
            Body::Value(bytes) => !bytes.is_empty(),
            Body::Provider(_) => true,
        }
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Empty => write!(f, "Body::Empty"),
            Body::Value(bytes) => write!(f, "Body::Value({} bytes)", bytes.len()),
            Body::Provider(_) => write!(f, "Body::Provider(..)"),
        }
    }
}

/// The HTTP request the walk is executing against. Method and headers are
/// read by the engine's fixed transitions; `params` and `globals` are
/// opaque to the engine and exist purely so resource-author callbacks have
/// somewhere to find path parameters and shared application state.
#[derive(Clone)]
pub struct Request {
    /// Request method.
    pub method: Method,
    /// Request URI (used only for its length by the `b11` transition;
    /// parsing/serialization of the wire request is the embedder's job).
    pub uri: Uri,
    /// Request headers. Lookups are case-insensitive, courtesy of
    /// `http::HeaderMap`'s `HeaderName` keys.
    pub headers: HeaderMap,
    /// Opaque path/query parameters, populated by the embedder's router.
    pub params: HashMap<String, String>,
    /// Opaque application state carried through for callbacks' use. The
    /// engine never reads or writes this.
    pub globals: Option<Arc<dyn Any + Send + Sync>>,
}

impl Request {
    /// Builds a minimal request: the given method, root URI, no headers,
    /// no params, no globals.
    pub fn new(method: Method) -> Request {
        Request {
            method,
            uri: Uri::from_static("/"),
            headers: HeaderMap::new(),
            params: HashMap::new(),
            globals: None,
        }
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("uri", &self.uri)
            .field("headers", &self.headers)
            .field("params", &self.params)
            .finish()
    }
}

/// The response under construction. Starts at the sentinel status `400`
/// (overwritten unconditionally once a terminal state is reached) with
/// empty headers and an empty body.
#[derive(Clone, Debug)]
pub struct Response {
    /// Status code. Set once, when a terminal state is reached.
    pub status: StatusCode,
    /// Response headers, built up as the walk progresses (e.g. `c4` sets
    /// `Content-Type`, `b10` sets `Allow` on a `405`).
    pub headers: HeaderMap,
    /// Response body.
    pub body: Body,
}

impl Response {
    /// The sentinel response a walk starts with: status `400`, no headers,
    /// no body. The status is always overwritten before the response is
    /// returned to the embedder; if it is not, that is itself a bug in the
    /// state graph (a transition returned without reaching a terminal).
    pub fn sentinel() -> Response {
        Response {
            status: StatusCode::BAD_REQUEST,
            headers: HeaderMap::new(),
            body: Body::Empty,
        }
    }
}

/// The per-request scratch mapping threaded alongside the response.
///
/// Plays the role of a Lisp-ish "heap": it always carries the merged
/// callback map (so transitions can reach resource-author callbacks
/// without themselves being generic over a callback type), plus whatever
/// arbitrary entries callbacks choose to stash there, plus the decision
/// trace used for diagnostics (mirroring `airship`'s
/// `AirshipState::decision_trace`).
#[derive(Clone)]
pub struct Heap {
    callbacks: Arc<CallbackMap>,
    entries: HashMap<String, Arc<dyn Any + Send + Sync>>,
    decision_trace: Vec<String>,
    request_time: SystemTime,
}

impl Heap {
    pub(crate) fn new(callbacks: Arc<CallbackMap>, request_time: SystemTime) -> Heap {
        Heap {
            callbacks,
            entries: HashMap::new(),
            decision_trace: Vec::new(),
            request_time,
        }
    }

    /// The callback map merged at construction time. Transitions dispatch
    /// through this; resource-author callbacks never need to see it.
    pub(crate) fn callbacks(&self) -> &CallbackMap {
        &self.callbacks
    }

    /// Records that the walk passed through the named state. Appends to the
    /// trace rather than replacing it, so a callback that returns a
    /// replacement heap does not erase the history of the walk so far.
    pub(crate) fn trace(&mut self, state: &str) {
        self.decision_trace.push(state.to_string());
    }

    /// The list of state names visited so far, in order.
    pub fn decision_trace(&self) -> &[String] {
        &self.decision_trace
    }

    /// The time the request arrived, captured once when the heap was
    /// created.
    pub fn request_time(&self) -> SystemTime {
        self.request_time
    }

    /// Stores an arbitrary value under a symbolic key, for a later callback
    /// in the same walk to retrieve with [`Heap::get`].
    pub fn insert(&mut self, key: impl Into<String>, value: Arc<dyn Any + Send + Sync>) {
        self.entries.insert(key.into(), value);
    }

    /// Retrieves a previously stored value by key, downcast to `T`. Returns
    /// `None` if the key is absent or the stored value is not a `T`.
    pub fn get<T: Send + Sync + 'static>(&self, key: &str) -> Option<Arc<T>> {
        self.entries
            .get(key)
            .and_then(|value| value.clone().downcast::<T>().ok())
    }
}

impl fmt::Debug for Heap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Heap")
            .field("entries", &self.entries.keys().collect::<Vec<_>>())
            .field("decision_trace", &self.decision_trace)
            .finish()
    }
}
