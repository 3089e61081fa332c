//! Video import: turn a pasted video or playlist link into normalized
//! [`Video`](watchcash_core::types::Video) records via the hosting
//! platform's data API.

pub mod api;
pub mod candidates;
pub mod duration;
pub mod link;
pub mod resolver;
pub mod youtube;

pub use api::{MetadataSource, StaticCatalog};
pub use candidates::ImportCandidates;
pub use duration::format_iso8601_duration;
pub use link::{parse_import_url, ImportTarget};
pub use resolver::{ImportOutcome, ImportTicket, ImportTracker, VideoImporter};
pub use youtube::YouTubeClient;
