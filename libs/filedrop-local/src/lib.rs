//! # Filedrop Local Adapters
//!
//! Implementations of the domain ports backed by the local machine:
//!
//! - [`FsStorageWriter`]: flat `uploads` and `processed` directories
//! - [`ShellAction`]: the post-processing command, run through a shell

pub mod infrastructure;

pub use infrastructure::{FsStorageWriter, ShellAction, ShellActionConfig};
