//! Domain layer.
//!
//! Pure types with no I/O: feed date normalization and the world state
//! model in both its raw and enriched forms.

pub mod feed_date;
pub mod worldstate;
