//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain    | Description                                |
//! |---------|-----------|--------------------------------------------|
//! | 0       | Universal | Success                                    |
//! | 1       | Universal | General error (unspecified)                |
//! | 2       | Universal | CLI usage error (bad args, bad key)        |
//! | 3       | Universal | IO error (cannot read/write files)         |
//! | 4       | reconcile | Mismatches found (with --fail-on-mismatch) |
//! | 10-19   | fetch     | Product data service codes                 |
//! | 20-29   | document  | Workbook structure codes                   |

// =============================================================================
// Universal (0-4)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

// Exit 1 is reserved for unspecified failures (panics, clap errors);
// no command returns it deliberately.

/// Usage error - bad arguments, ineligible product key.
pub const EXIT_USAGE: u8 = 2;

/// IO error - cannot read or write a local file.
pub const EXIT_IO: u8 = 3;

/// Reconciliation found mismatches and --fail-on-mismatch was set.
pub const EXIT_MISMATCH: u8 = 4;

// =============================================================================
// Fetch (10-19)
// =============================================================================

/// The product data service rejected the credentials.
pub const EXIT_FETCH_AUTH: u8 = 10;

/// No record exists for the requested key.
pub const EXIT_FETCH_NOT_FOUND: u8 = 11;

/// Upstream transport/server failure or unusable response.
pub const EXIT_FETCH_UPSTREAM: u8 = 12;

// =============================================================================
// Document (20-29)
// =============================================================================

/// The uploaded workbook could not be read.
pub const EXIT_DOC_STRUCTURE: u8 = 20;
