//! A small HTTP decision engine in the Webmachine / Clothesline tradition:
//! given a request and a handful of resource-author callbacks, walk a fixed
//! state graph to an HTTP status code and a content-negotiated body.
//!
//! Resource authors supply up to four named callbacks (`allowed-methods`,
//! `resource-exists?`, `malformed-request?`, `content-types-provided`) via
//! [`build_handler`]; everything else — method validation, Accept
//! negotiation, the tail of conditional-request and mutation-dispatch
//! nodes — is the engine's own fixed logic. See [`graph`] for the state
//! table, [`decision`] for what each node computes, and [`driver`] for how
//! a request is walked end to end.

pub mod callback;
pub mod context;
pub mod content_negotiation;
mod decision;
pub mod error;
pub mod graph;
mod driver;

pub use callback::{
    CallbackEntry, CallbackMap, CallbackOutcome, ALLOWED_METHODS, CONTENT_TYPES_PROVIDED,
    MALFORMED_REQUEST, RESOURCE_EXISTS,
};
pub use context::{Body, Heap, Provider, Request, Response};
pub use driver::{build_handler, Handler};
pub use error::BuildError;
