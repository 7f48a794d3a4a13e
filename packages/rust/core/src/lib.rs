//! Record location, enrichment splicing, and the two catalog pipelines.
//!
//! - [`text_catalog`]: merge placeholder metadata into text-block records
//! - [`json_catalog`]: assign identifiers to record-sequence entries
//!
//! Both share [`slug::normalize`] for identifiers and write through
//! [`persist`] once all records were processed in memory.

pub mod fragment;
pub mod guard;
pub mod json_catalog;
pub mod locate;
pub mod persist;
pub mod pipeline;
pub mod slug;
pub mod splice;
pub mod text_catalog;

pub use pipeline::{RecordReporter, SilentReporter};
pub use slug::{find_collisions, normalize};
