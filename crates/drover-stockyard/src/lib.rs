//! Core ledger and transfer engine for Drover.
//!
//! This crate is the heart of the system. It provides:
//! - Entity records: [`Ranch`], [`Calf`], [`Load`], [`CalfLoad`], and the
//!   append-only [`MovementRecord`] audit trail
//! - [`StockReader`] / [`StockWriter`] trait boundaries
//! - [`InMemoryStockyard`], the shared store every operation runs against
//! - The atomic load-transfer operation (`create_load`): match calves into
//!   a shipment, relocate them, link them, and append history as one unit
//! - Read projections (inventory, manage view, per-ranch rollup, movement
//!   timeline) and history-stream validation
//!
//! All writes to the shared tables execute under a single write lock, so a
//! transfer's "resolve matching calves" read and the subsequent mutation
//! can never be torn apart by a concurrent transfer of the same calf.

pub mod error;
pub mod memory;
pub mod projection;
pub mod records;
pub mod traits;
pub mod transfer;
pub mod validation;

pub use error::{StockResult, StockyardError};
pub use memory::InMemoryStockyard;
pub use projection::{ProjectionBuilder, RanchRollup, TimelineEntry};
pub use records::{
    Calf, CalfDraft, CalfLoad, CalfPatch, Destination, LabeledRange, Load, LoadDraft,
    LoadManifest, LoadPatch, Movement, MovementRecord, Ranch, RanchDraft, RanchPatch,
};
pub use traits::{StockReader, StockWriter};
pub use transfer::{CalfSelector, TagValue, TransferReceipt};
pub use validation::{HistoryReport, HistoryValidator, Violation, ViolationKind};
