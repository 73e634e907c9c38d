//! Test Module
//!
//! Cross-module test suite for ChatBuddy core.
//!
//! ## Test Categories
//! - `brain_tests`: Pipeline precedence, sentiment cutoffs, scorer failures, reply sampling
//! - `session_tests`: Turn loop, quit token, end of input, interrupts
//! - `config_tests`: Flags, environment fallbacks, validation, profile loading
