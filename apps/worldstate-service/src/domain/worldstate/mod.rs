//! World state model.
//!
//! Two record families live here: [`raw`] records straight out of the
//! schema decoder and [`enriched`] records produced by the enrichment pass.
//! [`snapshot`] holds the aggregates built from each.

pub mod category;
pub mod enriched;
pub mod identifier;
pub mod raw;
pub mod snapshot;
pub mod tiers;

pub use category::Category;
pub use identifier::IdentifierKind;
pub use snapshot::{DecodedWorldState, SnapshotHeader, WorldStateSnapshot};
