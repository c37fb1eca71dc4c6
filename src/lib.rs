//! serrs — structured error accumulation.
//!
//! Collect leveled, structured records while an operation runs, merge them
//! into the caller's store as the operation unwinds, then render the whole
//! chain as text, as a JSON array, or forward it to a live sink. This crate
//! re-exports the workspace layers so integration tests and the binary can
//! import them from one place.
//!
//! # Architecture
//!
//! ```text
//! serrs-core:  types ──► Store ──► format (Text / JSON) ──► String / JSON array
//!                          │
//!                          └──► flush ──► serrs-sinks (SharedBuffer, TracingSink, any io::Write)
//! ```

pub use serrs_core::*;
pub use serrs_sinks as sinks;
