// Core module - Command tree and stream resolution
pub mod command;
pub mod stream;

pub use command::{Command, Handler};
pub use stream::{MemorySink, Sink, Streams};
