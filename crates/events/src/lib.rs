//! PHM fleet event bus.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`FleetEvent`]: what a tick hands to the presentation layer: either
//!   the new snapshot with its alert list, or the failure that left the
//!   previous state in place.

pub mod bus;

pub use bus::{EventBus, FleetEvent, TickEvent};
