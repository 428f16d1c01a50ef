//! Status tracking for uploaded files
//!
//! The registry maps each file identifier to the state of its most recent
//! pipeline run. It is the only mutable structure shared between request
//! handlers and detached processing tasks.

mod registry;

pub use registry::{FileStatus, StatusEntry, StatusRegistry, StatusSummary};
