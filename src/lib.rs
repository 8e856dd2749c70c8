//! Re-derives loom production figures for the AA/BB two-shift scheme from
//! an event log recorded under the A/B/C three-shift scheme.
//!
//! Stages, in order: [`validate`], [`correction`], [`remap`] (which calls
//! [`runtime`]) and [`assemble`]. [`pipeline`] runs them end to end.

pub mod assemble;
pub mod config;
pub mod correction;
pub mod error;
pub mod io;
pub mod model;
pub mod pipeline;
pub mod remap;
pub mod runtime;
pub mod schema;
pub mod validate;

#[cfg(feature = "python")]
mod python;

pub use config::{EndPairing, NewShift, ShiftConfig};
pub use error::ShiftError;
pub use model::{DroppedRow, InputRecord, ResultRecord};
pub use pipeline::{convert, transform, Conversion, TransformReport};
