//! Integration tests for fqdemux.
//!
//! These tests run the built binary end to end on small generated inputs.

mod helpers;
mod test_demux_command;
