//! Command execution engine for searchsh
//!
//! This module provides the execution layer that runs parsed commands
//! against the search cluster and the local store. It includes:
//! - Execution context shared across commands
//! - Command router dispatching each command type
//! - A spinner for requests in flight
//! - Result types consumed by the formatter

mod context;
mod progress;
mod result;
mod router;

pub use context::ExecutionContext;
pub use result::{ExecutionResult, ExecutionStats, ResultData};
pub use router::CommandRouter;
