//! `phm-core` -- predictive health monitoring domain logic.
//!
//! Everything in this crate is pure: no I/O, no async, no clocks read
//! implicitly. Callers pass in the snapshot, the timestamp, and (for the
//! simulator) the random source.

pub mod alert;
pub mod bands;
pub mod error;
pub mod ingest;
pub mod machine;
pub mod maintenance;
pub mod simulation;
pub mod status;
pub mod summary;
pub mod threshold_validation;
pub mod types;
