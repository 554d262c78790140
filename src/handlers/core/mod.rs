//! Core command infrastructure.
//!
//! This module contains the command model and the pipeline every message
//! goes through:
//!
//! - [`traits`]: [`CommandHandler`] and the immutable [`CommandDescriptor`]
//! - [`discovery`]: [`CommandSource`] implementations feeding the registry
//! - [`registry`]: the copy-on-write command catalogue
//! - [`context`]: prefix resolution and the per-invocation [`Context`]
//! - [`dispatch`]: gating, execution and error recovery
//! - [`report`]: operator error reports, redaction and the panic fallback
//! - [`help`]: help text formatting

pub mod context;
pub mod discovery;
pub mod dispatch;
pub mod help;
pub mod registry;
pub mod report;
pub mod traits;

// Re-export commonly used types
pub use context::{Context, Invocation, resolve_invocation};
pub use discovery::{CommandFactory, CommandSource, StaticSource};
pub use dispatch::{Dispatcher, Outcome};
pub use registry::{Catalog, Registry};
pub use report::{ErrorReport, LogReporter, Redactor};
pub use traits::{CommandDescriptor, CommandHandler};
