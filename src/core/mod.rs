// Public modules
pub mod build;
pub mod config;
pub mod context;
pub mod defaults;
pub mod env_file;
pub mod error;
pub mod lifecycle;
pub mod orchestrator;
pub mod package;
pub mod pipeline;
pub mod remote;
pub mod requirements;
pub mod runner;

// Re-export common types for convenience
pub use config::Config;
pub use context::DeployContext;
pub use error::{Error, ErrorCode, Result};
pub use orchestrator::{perform, Action, ActionOutcome};
pub use runner::{CommandRunner, CommandStatus, RecordingRunner, ShellRunner, StepRecord};
