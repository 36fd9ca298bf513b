// Tasnifoh Tools - Core Library
// Batch utilities for the bilingual POI/category taxonomy data files:
// CSV import with taxonomy reconciliation, keyword expansion, keyword
// bundles, and keyword validation.

pub mod bundles;
pub mod encoding;
pub mod keywords;
pub mod poi;
pub mod reconcile;
pub mod taxonomy;
pub mod validate;

// Re-export commonly used types
pub use bundles::BundleStats;
pub use encoding::{decode_text, read_text_multi};
pub use poi::{parse_poi_csv, read_poi_csv, PoiId, PoiRecord, PoiRow, UnmatchedRow};
pub use reconcile::{
    derive_from_csv, resolve_pois, resolve_pois_direct, CategoryKey, DualMatch, ImportCounters,
    ImportReport, PoiResolution, Reconciliation, SubcategoryKey, UNMATCHED_SAMPLE_CAP,
};
pub use taxonomy::{
    load_nodes, sanitize_code, save_nodes, CategoryNode, NodeIndex, AUTO_CODE_PREFIX,
};
pub use validate::{ValidationIssue, ValidationOutcome, ValidationStats};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
