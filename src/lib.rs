//! cmdtree Library
//! 
//! A minimal command dispatcher: commands form a tree, an argument vector is
//! routed to the deepest matching command, and output and error sinks are
//! inherited down the tree.

pub mod cli;
pub mod core;
pub mod domain;
pub mod infrastructure;

pub use crate::core::command::{Command, Handler};
pub use crate::core::stream::{sink, MemorySink, Sink, Streams};
pub use crate::domain::config::{CmdTreeConfig, OutputFormat};
pub use crate::domain::error::{CmdTreeError, CmdTreeResult};
