// CLI module - The cmdtree binary's command tree and output
pub mod app;
pub mod output;

pub use app::{build_app, App};
pub use output::{OutputWriter, SinkWriter};
