//! hmproto - Protocol types for the Home Modules hub API
//!
//! This crate is the contract between the hub and every client that talks to
//! it. It carries no I/O; the `hmclient` crate does the dispatching.
//!
//! ## Shape of the protocol
//!
//! A request is a JSON object discriminated by `type` (`"account.login"`,
//! `"devices.addDevice"`, ...). The request set is closed: [`RequestKind`]
//! enumerates it and [`HubRequest`] carries the typed payload of each kind.
//!
//! The hub answers with an [`Envelope`]:
//!
//! ```json
//! {"type": "ok", "data": {"token": "..."}}
//! {"type": "error", "error": {"code": 401, "message": "TOKEN_INVALID"}}
//! ```
//!
//! ## Registry
//!
//! For every kind the [`registry`] module knows the request parameters, the
//! success payload shape ([`response_for`]) and the closed set of errors the
//! hub may answer with ([`error_set_for`]). Typed callers get the same mapping
//! at compile time through [`HubCall::Response`].
//!
//! ```rust
//! use hmproto::{error_set_for, ErrorCode, RequestKind};
//!
//! let errors = error_set_for(RequestKind::AccountLogin);
//! assert!(errors.includes(ErrorCode::LoginPasswordIncorrect));
//! assert!(!errors.includes(ErrorCode::TokenInvalid));
//! ```

pub mod domain;
pub mod envelope;
pub mod error;
pub mod params;
pub mod registry;
pub mod request;
pub mod responses;

pub use envelope::{decode_data, Envelope};
pub use error::{ErrorCode, ErrorKind, ErrorSignature, HubError, ObjectKind};
pub use params::{ParameterPath, ParsePathError, PathSegment};
pub use registry::{error_set_for, response_for, ErrorSet, RequestSpec, ResponseShape};
pub use request::{HubCall, HubRequest, RequestKind};
