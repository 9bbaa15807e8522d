//! Integration test suite for the launcher
//!
//! These tests drive the compiled `autoupdater` binary end to end against a
//! local mock release server.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **cli**: Flags, settings file handling and error reporting
//! - **update_flow**: Full update-then-launch runs against a mock release index

mod common;

mod cli;
mod update_flow;
