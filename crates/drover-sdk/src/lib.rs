//! High-level Drover API.
//!
//! [`Drover`] wires the canonical registries and the stockyard together
//! behind one facade: calf intake (single and bulk) with breed/seller
//! resolution and date normalization, ranch CRUD, load transfers, and the
//! read-side reports. Callers hand it raw, sheet-shaped input; everything
//! it passes down is already canonical.

pub mod drover;
pub mod error;
pub mod intake;

pub use drover::Drover;
pub use error::{DroverError, DroverResult, ErrorKind};
pub use intake::{
    ArrivalAmendment, BatchFailure, BatchOutcome, CalfIntake, CalfUpdate, LoadAmendment,
    LoadRequest,
};
