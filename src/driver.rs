//! The driver (§4.5): turns a validated callback map into a request
//! handler, and runs one request through the graph per call.
//!
//! Plays the role `airship`'s `resource::Webmachine::create` plus its
//! `server.rs` `run()` loop play together, collapsed into the single
//! synchronous entry point the spec calls for (§5: one walk per request, no
//! suspension points).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::SystemTime;

use crate::callback::{CallbackEntry, CallbackMap};
use crate::context::{Body, Heap, Request, Response};
use crate::decision;
use crate::error::BuildError;
use crate::graph::{self, State};

/// A validated, reusable request handler. Cheap to clone (it only holds an
/// `Arc` to the merged callback map) and safe to call from multiple threads
/// concurrently — see §5's reentrancy note.
#[derive(Clone)]
pub struct Handler {
    callbacks: Arc<CallbackMap>,
}

impl Handler {
    /// Runs one request through the decision graph from [`graph::START`] to
    /// a terminal state, and returns the finished response.
    pub fn handle(&self, req: &Request) -> Response {
        let mut heap = Heap::new(self.callbacks.clone(), SystemTime::now());
        let mut resp = Response::sentinel();

        let mut state = graph::START;
        let status = loop {
            if let Some(code) = state.terminal_code() {
                break code;
            }
            let outcome = decision::evaluate(state, req, &mut heap, &mut resp);
            let (on_false, on_true) = match graph::successors(state) {
                Some(successors) => successors,
                None => {
                    log::error!("state {:?} has no successors() entry", state);
                    break 500;
                }
            };
            state = if outcome { on_true } else { on_false };
        };

        log::debug!(
            "decision walk -> {}: {}",
            status,
            heap.decision_trace().join(" -> ")
        );

        resp.status =
            http::StatusCode::from_u16(status).unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR);

        match std::mem::replace(&mut resp.body, Body::Empty) {
            Body::Provider(provider) => provider(req, &heap, &resp),
            other => {
                resp.body = other;
                resp
            }
        }
    }
}

/// Validates `callbacks` and builds a [`Handler`] (§4.5 construction-time
/// step). Fails with [`BuildError::UnknownCallback`] (or
/// [`BuildError::MismatchedCallbackKind`], unreachable through the public
/// constructors but kept as a distinct variant — see `error.rs`) if any
/// supplied name is not one of the four recognized callbacks.
pub fn build_handler(callbacks: HashMap<String, CallbackEntry>) -> Result<Handler, BuildError> {
    let callbacks = CallbackMap::build(callbacks)?;
    Ok(Handler {
        callbacks: Arc::new(callbacks),
    })
}
