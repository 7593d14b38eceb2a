pub mod case_checker;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod loader;
pub mod pointer;
pub mod rules;
pub mod telemetry;
pub mod violation;

pub use config::RulesConfig;
pub use context::Context;
pub use engine::{Engine, EngineOptions, Report};
pub use error::{LintError, Result};
pub use pointer::JsonPointer;
pub use violation::{Finding, Severity, Violation};
