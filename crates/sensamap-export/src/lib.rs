//! sensamap-export: Pure record serializers (sans-IO)
//!
//! Converts a resolved selection and its accompanying form state into
//! the persisted CSV shape. All functions return `String`s; writing
//! them to disk is the application shell's job.

pub mod area;
pub mod record;

pub use area::{area_string, centroid_fields};
pub use record::{Modulation, SensationRecord, csv_header};
