//! Client-side sync layer for the personal-finance backend.
//!
//! Each screen owns one [`ResourceListController`] for its records, at most
//! one open [`FormSessionController`], and optionally a
//! [`FocusRefreshPolicy`] that reloads the list whenever the screen is shown
//! again. All of them talk to the server through a shared
//! [`HttpResourceClient`].
pub use auth::{AuthApi, MIN_PASSWORD_LEN};
pub use categories::CategoryCatalog;
pub use dashboard::DashboardApi;
pub use error::{Result, SyncError};
pub use focus::{FocusEvent, FocusRefreshPolicy};
pub use form::{FormMode, FormSessionController, FormTarget};
pub use http::{DEFAULT_TIMEOUT, HttpMethod, HttpResourceClient};
pub use list::{ListStatus, ResourceListController};
pub use profile::ProfileController;
pub use resource::{Fields, Resource, ResourceId, ResourceKind};
pub use session::SessionStore;

mod auth;
mod categories;
mod dashboard;
mod error;
mod focus;
mod form;
mod http;
mod list;
mod profile;
mod resource;
mod session;
