//! The callback map: the resource-author-facing extension surface, and its
//! dispatch rule.
//!
//! `airship`'s answer to this is a trait (`resource::Webmachine`) with
//! default-implemented methods, dispatched by monomorphization over `R:
//! Webmachine`. This crate takes `webmachine-ruby`'s shape instead: a map
//! from a small fixed set of *names* to callback values, validated at
//! construction time rather than at compile time. Construction-time
//! validation (and the "unknown name" failure mode) comes from keeping the
//! public entry point string-keyed and converting it into this typed,
//! internally-dispatched struct once, in [`CallbackMap::build`].

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use http::Method;

use crate::context::{Heap, Request, Response};
use crate::error::BuildError;

/// The four recognized callback names. Any other key supplied at
/// construction is a [`BuildError::UnknownCallback`].
pub const ALLOWED_METHODS: &str = "allowed-methods";
pub const RESOURCE_EXISTS: &str = "resource-exists?";
pub const MALFORMED_REQUEST: &str = "malformed-request?";
pub const CONTENT_TYPES_PROVIDED: &str = "content-types-provided";

/// The result of any callback invocation: the value the caller actually
/// wants (`result`), plus optional replacement heap/response snapshots.
///
/// This is the typed equivalent of an open `{result, heap?, response?}`
/// map — recognized keys are fields, so "any other key is a hard error" is
/// enforced by the type system for every callback built through this
/// crate's public constructors, rather than needing a runtime check.
#[derive(Clone)]
pub struct CallbackOutcome<T> {
    /// The boolean/value outcome consumed by the transition that invoked
    /// this callback.
    pub result: T,
    /// If present, replaces the heap for the rest of the walk.
    pub heap: Option<Heap>,
    /// If present, replaces the response for the rest of the walk.
    pub response: Option<Response>,
}

impl<T> CallbackOutcome<T> {
    /// A bare result with no heap/response update.
    pub fn new(result: T) -> CallbackOutcome<T> {
        CallbackOutcome {
            result,
            heap: None,
            response: None,
        }
    }

    /// A result that also replaces the response (e.g. to attach an error
    /// body before returning `false`).
    pub fn with_response(result: T, response: Response) -> CallbackOutcome<T> {
        CallbackOutcome {
            result,
            heap: None,
            response: Some(response),
        }
    }

    /// A result that also replaces the heap.
    pub fn with_heap(result: T, heap: Heap) -> CallbackOutcome<T> {
        CallbackOutcome {
            result,
            heap: Some(heap),
            response: None,
        }
    }
}

/// `resource-exists?`, `malformed-request?`: a predicate over the request.
pub type PredicateFn =
    Arc<dyn Fn(&Request, &Heap, &Response) -> CallbackOutcome<bool> + Send + Sync>;

/// `allowed-methods`: the set of methods this resource accepts.
pub type AllowedMethodsFn = Arc<
    dyn Fn(&Request, &Heap, &Response) -> CallbackOutcome<HashSet<Method>> + Send + Sync,
>;

/// `content-types-provided`: an ordered list of (media type, provider)
/// pairs. A `Vec` rather than a map so iteration order — and therefore
/// which acceptable offer wins a multi-way tie — is the caller's
/// insertion order, not hash-map order.
pub type ContentTypesProvidedFn = Arc<
    dyn Fn(&Request, &Heap, &Response) -> CallbackOutcome<Vec<(String, crate::context::Provider)>>
        + Send
        + Sync,
>;

/// One entry in the callback map supplied to [`crate::build_handler`],
/// tagged by which of the four recognized callbacks it implements.
#[derive(Clone)]
pub enum CallbackEntry {
    /// An `allowed-methods` implementation.
    AllowedMethods(AllowedMethodsFn),
    /// A `resource-exists?` implementation.
    ResourceExists(PredicateFn),
    /// A `malformed-request?` implementation.
    MalformedRequest(PredicateFn),
    /// A `content-types-provided` implementation.
    ContentTypesProvided(ContentTypesProvidedFn),
}

impl CallbackEntry {
    fn kind_name(&self) -> &'static str {
        match self {
            CallbackEntry::AllowedMethods(_) => ALLOWED_METHODS,
            CallbackEntry::ResourceExists(_) => RESOURCE_EXISTS,
            CallbackEntry::MalformedRequest(_) => MALFORMED_REQUEST,
            CallbackEntry::ContentTypesProvided(_) => CONTENT_TYPES_PROVIDED,
        }
    }
}

/// The merged, validated callback map a [`crate::Handler`] carries. Built
/// once at construction time via [`CallbackMap::build`] and shared
/// read-only across every request the handler serves.
pub struct CallbackMap {
    allowed_methods: AllowedMethodsFn,
    resource_exists: PredicateFn,
    malformed_request: PredicateFn,
    content_types_provided: ContentTypesProvidedFn,
}

fn default_allowed_methods() -> AllowedMethodsFn {
    Arc::new(|_req, _heap, _resp| {
        let mut methods = HashSet::new();
        methods.insert(Method::GET);
        methods.insert(Method::HEAD);
        CallbackOutcome::new(methods)
    })
}

fn default_resource_exists() -> PredicateFn {
    Arc::new(|_req, _heap, _resp| CallbackOutcome::new(true))
}

fn default_malformed_request() -> PredicateFn {
    Arc::new(|_req, _heap, _resp| CallbackOutcome::new(false))
}

fn default_content_types_provided() -> ContentTypesProvidedFn {
    Arc::new(|_req, _heap, _resp| CallbackOutcome::new(Vec::new()))
}

impl CallbackMap {
    /// Validates the supplied `(name, entry)` pairs against the recognized
    /// callback names, then merges them over the defaults. Unknown names
    /// and name/kind mismatches fail fast, before any request is served.
    pub fn build(callbacks: HashMap<String, CallbackEntry>) -> Result<CallbackMap, BuildError> {
        let mut allowed_methods = None;
        let mut resource_exists = None;
        let mut malformed_request = None;
        let mut content_types_provided = None;

        for (name, entry) in callbacks {
            match name.as_str() {
                ALLOWED_METHODS => match entry {
                    CallbackEntry::AllowedMethods(f) => allowed_methods = Some(f),
                    other => {
                        log::error!("callback {:?} supplied with the wrong kind ({})", name, other.kind_name());
                        return Err(BuildError::MismatchedCallbackKind { name: ALLOWED_METHODS });
                    }
                },
                RESOURCE_EXISTS => match entry {
                    CallbackEntry::ResourceExists(f) => resource_exists = Some(f),
                    other => {
                        log::error!("callback {:?} supplied with the wrong kind ({})", name, other.kind_name());
                        return Err(BuildError::MismatchedCallbackKind { name: RESOURCE_EXISTS });
                    }
                },
                MALFORMED_REQUEST => match entry {
                    CallbackEntry::MalformedRequest(f) => malformed_request = Some(f),
                    other => {
                        log::error!("callback {:?} supplied with the wrong kind ({})", name, other.kind_name());
                        return Err(BuildError::MismatchedCallbackKind { name: MALFORMED_REQUEST });
                    }
                },
                CONTENT_TYPES_PROVIDED => match entry {
                    CallbackEntry::ContentTypesProvided(f) => content_types_provided = Some(f),
                    other => {
                        log::error!("callback {:?} supplied with the wrong kind ({})", name, other.kind_name());
                        return Err(BuildError::MismatchedCallbackKind { name: CONTENT_TYPES_PROVIDED });
                    }
                },
                _ => {
                    log::error!("unknown callback name {:?}", name);
                    return Err(BuildError::UnknownCallback(name));
                }
            }
        }

        Ok(CallbackMap {
            allowed_methods: allowed_methods.unwrap_or_else(default_allowed_methods),
            resource_exists: resource_exists.unwrap_or_else(default_resource_exists),
            malformed_request: malformed_request.unwrap_or_else(default_malformed_request),
            content_types_provided: content_types_provided
                .unwrap_or_else(default_content_types_provided),
        })
    }

    pub(crate) fn allowed_methods(&self) -> &AllowedMethodsFn {
        &self.allowed_methods
    }

    pub(crate) fn resource_exists(&self) -> &PredicateFn {
        &self.resource_exists
    }

    pub(crate) fn malformed_request(&self) -> &PredicateFn {
        &self.malformed_request
    }

    pub(crate) fn content_types_provided(&self) -> &ContentTypesProvidedFn {
        &self.content_types_provided
    }
}

/// Invokes a callback and applies its returned heap/response updates.
///
/// The callback sees the request and the heap/response as they stand
/// *before* this call, and any replacement it returns becomes what every
/// later transition in this walk sees. Since a walk owns its heap/response
/// exclusively (no other thread can be touching them while this runs), the
/// update is atomic with respect to the next transition purely by passing
/// `&mut` — there is nothing else that could observe a half-applied
/// update.
pub(crate) fn dispatch<T>(
    callback: &(impl Fn(&Request, &Heap, &Response) -> CallbackOutcome<T> + ?Sized),
    req: &Request,
    heap: &mut Heap,
    resp: &mut Response,
) -> T {
    let outcome = callback(req, heap, resp);
    if let Some(new_heap) = outcome.heap {
        *heap = new_heap;
    }
    if let Some(new_response) = outcome.response {
        *resp = new_response;
    }
    outcome.result
}
