//! bytepatch - fixed-offset binary file patching
//!
//! Overwrites a known byte range of an existing file after checking that the
//! target exists, is writable, is not under OS file protection and is large
//! enough to hold the patch.

// Enforce strict code quality and reliability
#![deny(
    // Safety
    unsafe_code,

    // Correctness
    missing_debug_implementations,
    unreachable_pub,

    // Future compatibility
    future_incompatible,

    // Rust 2018 idioms
    rust_2018_idioms,

    // All warnings must be fixed
    warnings,
)]
#![warn(
    // Error handling best practices
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::unimplemented,
    clippy::todo,

    // Performance
    clippy::inefficient_to_string,
    clippy::large_enum_variant,

    // Code clarity and maintainability
    clippy::cognitive_complexity,
    clippy::too_many_arguments,
    clippy::type_complexity,

    // Best practices
    clippy::clone_on_ref_ptr,
    clippy::wildcard_imports,
    clippy::enum_glob_use,
    clippy::if_not_else,
    clippy::single_match_else,
    clippy::needless_continue,
    clippy::explicit_iter_loop,
    clippy::explicit_into_iter_loop,
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod api;
pub mod config;
pub mod exceptions;
pub mod exit_codes;
pub mod logger;
pub mod patch;
pub mod report;
pub mod utils;
pub mod version;

// Re-export main API functions
pub use api::{PatchOptions, ReportFormat, apply_patch, run_patch};
pub use exceptions::{ConfigError, PatchError};
pub use patch::{FilePatcher, PatchOutcome, PatchRequest, PatchSummary};
