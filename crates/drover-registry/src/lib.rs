//! Canonical master-data registry for Drover.
//!
//! Breed and seller names arrive as free text from intake sheets and must
//! be stored exactly once per real-world entity. This crate provides:
//! - Normalization functions ([`canonical_display`], [`identity_key`])
//! - The [`CanonicalEntity`] trait and the generic [`CanonicalRegistry`]
//!   lookup-or-create store
//! - The [`Breed`] and [`Seller`] entities
//!
//! Two raw strings name the same entity when their identity keys are equal:
//! diacritics stripped, case folded, punctuation and whitespace collapsed.
//! Sellers additionally fold their address tuple into the key, so two
//! sellers with the same name at different addresses stay distinct.

pub mod canonical;
pub mod entity;
pub mod error;
pub mod registry;

pub use canonical::{canonical_display, identity_key};
pub use entity::{Breed, BreedDraft, CanonicalEntity, Seller, SellerDraft};
pub use error::{RegistryError, RegistryResult};
pub use registry::CanonicalRegistry;

/// Registry of canonical breed rows.
pub type BreedRegistry = CanonicalRegistry<Breed>;

/// Registry of canonical seller rows.
pub type SellerRegistry = CanonicalRegistry<Seller>;
