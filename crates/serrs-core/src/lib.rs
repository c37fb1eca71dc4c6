//! serrs-core — structured error accumulation.
//!
//! Collects leveled, structured records into an ordered in-memory [`Store`],
//! tracks the highest level seen, and renders the whole sequence as text
//! lines, as a JSON array, or forwards it record by record to a live sink.
//!
//! # Architecture
//!
//! ```text
//! add / add_from_args ──► Store ──► render_all / render_each / to_json / Serialize
//!                           │
//!                           └──────► flush ──► sink (io::Write)
//! ```
//!
//! Both paths go through the same [`RecordFormatter`], chosen once from the
//! store's [`RenderConfig`].

pub mod config;
pub mod error;
pub mod format;
pub mod store;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use format::{Format, JsonFormatter, KeyCase, RecordFormatter, RenderConfig, TextFormatter};
pub use store::Store;
pub use types::{attrs_from_args, Arg, Attr, LogLevel, Record, Value};
