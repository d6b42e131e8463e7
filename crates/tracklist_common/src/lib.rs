//! Tracklist Common - extraction, normalization and export of media library metadata
//!
//! The pipeline is: query kind -> extraction runner -> record parser ->
//! normalizer -> serializer. Every run starts from fresh state.

pub mod classify;
pub mod error;
pub mod extract;
pub mod listing;
pub mod normalize;
pub mod query;
pub mod record;
pub mod serialize;

pub use classify::{classify, ErrorKind};
pub use error::{ExportError, Result};
pub use extract::{AutomationEngine, ExtractOptions, ExtractionResult, ExtractionRunner};
pub use listing::{build_table, export, Listing, ListingOptions};
pub use normalize::{AlbumFormat, Normalizer, NormalizerConfig, RowSet};
pub use query::{QueryKind, ScriptRegistry};
pub use serialize::Table;
