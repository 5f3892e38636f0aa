//! Errors the engine can raise. Per the design, these are strictly
//! programmer errors (a misconfigured callback map) — never a stand-in for
//! an HTTP status code. A client-visible outcome is always a terminal state
//! in the decision walk, not a `Result::Err` from this crate.

use thiserror::Error;

/// Raised by [`crate::build_handler`] when a supplied callback map cannot be
/// turned into a valid handler.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    /// A key in the callback map was not one of the four recognized names:
    /// `allowed-methods`, `resource-exists?`, `malformed-request?`,
    /// `content-types-provided`.
    #[error("unknown callback name {0:?}; expected one of allowed-methods, resource-exists?, malformed-request?, content-types-provided")]
    UnknownCallback(String),

    /// A key matched one of the recognized names but was paired with a
    /// callback entry of the wrong kind (e.g. the `resource-exists?` key
    /// paired with an `allowed-methods` closure). This can only happen if a
    /// caller builds the map entry by hand instead of going through the
    /// name-specific constructors; it is kept as a distinct variant so
    /// embedders can tell the two misuses apart when logging.
    #[error("callback {name:?} was supplied with the wrong callback kind")]
    MismatchedCallbackKind {
        /// The recognized name whose entry did not match its own kind.
        name: &'static str,
    },
}
