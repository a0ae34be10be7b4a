//! Command trait definition for CLI commands.
//!
//! Subcommands implement [`Command`]; `enum_dispatch` forwards `execute` from the
//! `Subcommand` enum in `main.rs` to the selected variant.

use anyhow::Result;
use enum_dispatch::enum_dispatch;

/// Trait implemented by all fqdemux CLI commands.
///
/// `command_line` is the full invocation, available for logging or provenance.
#[enum_dispatch]
pub trait Command {
    #[allow(clippy::missing_errors_doc)]
    fn execute(&self, command_line: &str) -> Result<()>;
}
