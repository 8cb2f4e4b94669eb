//! Change-notification boundary.
//!
//! Core store logic never implements delivery, filtering, or listener
//! registration. All it does is hand each successful mutation to the sink
//! configured on the store, if any.

pub mod sink;

pub use sink::{ChangeEvent, ChangeSink};
