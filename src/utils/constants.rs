//! Shared configuration constants for element lookup
//!
//! Default values used by `FinderConfig` and `SearchRequest` so that the
//! retry policy is defined in exactly one place.

/// Default number of query rounds: 10
///
/// With the default interval this bounds a search to roughly one second of
/// polling before it settles as not found.
pub const DEFAULT_ATTEMPTS: u32 = 10;

/// Default delay between rounds: 100 milliseconds
pub const DEFAULT_INTERVAL_MS: u64 = 100;

/// Raw attempt count that disables the attempt counter entirely
pub const UNBOUNDED_ATTEMPTS: i64 = -1;

/// Tag names treated as frame-like roots whose search is redirected into the
/// nested document
pub const FRAME_TAGS: [&str; 2] = ["iframe", "frame"];
