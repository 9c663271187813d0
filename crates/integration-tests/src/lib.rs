//! Integration tests for Statewise.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p statewise-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `engine_scenarios` - End-to-end scenarios against the state engine
//! - `server_api` - HTTP tests against a server spawned on an ephemeral port
//!
//! The server tests build the same router the binary serves
//! (`statewise_server::app`), so no external process or database is needed.
