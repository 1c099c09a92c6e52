/// Identifiers assigned by the studio service are opaque UUID strings.
pub type EntityId = String;

/// The service emits naive ISO-8601 timestamps (no timezone suffix).
pub type Timestamp = chrono::NaiveDateTime;
