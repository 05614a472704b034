//! Command Handlers

mod mirror_handlers;
mod toolkit_handlers;

pub use mirror_handlers::{MirrorOutcome, PublishMirrorHandler, Resolution};
pub use toolkit_handlers::{GenerateToolkitHandler, RunReport, RunSettings};
