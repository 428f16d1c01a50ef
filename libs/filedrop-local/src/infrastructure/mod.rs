//! Infrastructure adapters

mod fs_storage;
mod shell_action;
pub mod sniff;

pub use fs_storage::FsStorageWriter;
pub use shell_action::{ShellAction, ShellActionConfig, DEFAULT_COMMAND_TEMPLATE};
