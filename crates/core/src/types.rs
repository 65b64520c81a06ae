//! Shared type aliases.

/// All database primary keys are 64-bit integer rowids.
pub type DbId = i64;

/// All audit timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
