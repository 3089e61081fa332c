//! Admin-side state: the content library, the campaign store, and the
//! approved-only projection the viewer feed is built from.
//!
//! Everything here is plain owned data mutated through `&mut self`; the
//! session crate decides how access is serialized.

pub mod demo;
pub mod library;
pub mod models;
pub mod projection;
pub mod store;

pub use library::ContentLibrary;
pub use models::{CreateCampaignRequest, NewCampaign};
pub use projection::visible_videos;
pub use store::CampaignStore;
