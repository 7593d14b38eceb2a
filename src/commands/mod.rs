pub mod lint;
pub mod rules;

pub use lint::{LintArgs, execute_lint};
pub use rules::execute_rules;

use crate::{Result, RulesConfig};
use std::path::Path;

/// The configuration file if given, else the built-in one
fn load_config(path: Option<&Path>) -> Result<RulesConfig> {
    match path {
        Some(path) => RulesConfig::load(path),
        None => RulesConfig::builtin(),
    }
}
