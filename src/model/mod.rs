//! Core data model for the labeller.
//!
//! The label tree (labels owning choices owning further labels) and the
//! flat records an interview produces.

mod label;
mod record;

pub use label::{Choice, Label, LabelKind, Schema};
pub use record::{Record, Value};
