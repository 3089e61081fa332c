//! The application session: one owned coordinator holding every piece of
//! mutable state, the role read models built from it, and an actor handle
//! that serializes access when callbacks arrive from several tasks.

pub mod actor;
pub mod role;
pub mod session;
pub mod views;

pub use actor::SessionHandle;
pub use role::Role;
pub use session::{QuickCampaignForm, WatchSession};
pub use views::{AdminView, AdvertiserView, CampaignSummary, Header, RoleView, ViewerView};
