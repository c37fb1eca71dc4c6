//! serrs-sinks — live-log sink adapters for serrs.
//!
//! A store forwards rendered records to any [`std::io::Write`]. The adapters
//! here cover the two cases plain writers don't: capturing forwarded bytes
//! while the store still owns the writer ([`SharedBuffer`]), and re-emitting
//! each forwarded line through the process's own `tracing` subscriber
//! ([`TracingSink`]).
//!
//! An absent sink is simply [`std::io::Sink`], which discards everything.

pub mod shared;
pub mod tracing_sink;

pub use shared::SharedBuffer;
pub use tracing_sink::TracingSink;
