/// Machine identifiers are opaque strings supplied by the snapshot producer.
pub type MachineId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
