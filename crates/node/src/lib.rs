//! `node` crate — the host-facing integration surface for the Gridbase API.
//!
//! The embedding workflow host supplies items and settings; the operations
//! here turn them into authenticated API calls through the `client` crate's
//! transport seam and fan responses back into per-item result rows. The
//! host's own concerns — credential storage, property panels, execution
//! lifecycle, webhook plumbing — stay on the host's side of that seam.

pub mod batch;
pub mod error;
pub mod item;
pub mod list;
pub mod mapper;
pub mod record;
pub mod trigger;
pub mod types;

pub use batch::{run_batched, Batch, BatchConfig};
pub use error::NodeError;
pub use item::OutputItem;
