//! `client` crate — credentials, transport, pacing and pagination for the
//! Gridbase open API.
//!
//! Everything here is host-agnostic: one authenticated HTTP request per
//! call, strictly sequential, no retry. Higher layers decide how failures
//! map onto workflow items; the only failure this crate gives special
//! meaning to is the remote not-found signal
//! ([`ClientError::is_not_found`]).

pub mod credentials;
pub mod error;
pub mod ids;
pub mod mock;
pub mod pacing;
pub mod pagination;
pub mod transport;

pub use credentials::{Credentials, DEFAULT_API_ENDPOINT};
pub use error::ClientError;
pub use pacing::{FixedInterval, NoDelay, Pacing};
pub use pagination::{fetch_records, RecordQuery, MAX_PAGE_SIZE};
pub use transport::{query_of, HttpTransport, Method, Query, Transport};
