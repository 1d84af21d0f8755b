//! Foundation types for Drover.
//!
//! This crate provides the identifier, lifecycle, and temporal types used
//! throughout the Drover system. Every other Drover crate depends on
//! `drover-types`.
//!
//! # Key Types
//!
//! - [`RanchId`], [`CalfId`], [`LoadId`], [`CalfLoadId`], [`MovementId`],
//!   [`BreedId`], [`SellerId`] — time-ordered entity identifiers (UUID v7)
//! - [`CalfStatus`] — the animal lifecycle enum
//! - [`Sex`], [`CalfType`], [`SellStatus`], [`ArrivalStatus`] — intake and
//!   shipment classification enums
//! - [`MovementKind`] — discriminant for movement-history records
//! - [`DateInput`] — ISO-8601 or spreadsheet day-serial, normalized to a
//!   UTC-midnight timestamp

pub mod error;
pub mod id;
pub mod status;
pub mod temporal;

pub use error::TypeError;
pub use id::{BreedId, CalfId, CalfLoadId, LoadId, MovementId, RanchId, SellerId};
pub use status::{ArrivalStatus, CalfStatus, CalfType, MovementKind, SellStatus, Sex};
pub use temporal::{parse_event_date, utc_midnight, DateInput};
