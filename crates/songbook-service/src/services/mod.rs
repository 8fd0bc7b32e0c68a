//! Business logic services
//!
//! Services borrow a [`ServiceContext`] for the length of one operation; the
//! purge scheduler owns a clone for its background task.

pub mod admin;
pub mod auth;
pub mod context;
pub mod error;
pub mod gate;
pub mod lifecycle;
pub mod notify;
pub mod purge;
pub mod song;
pub mod user;

pub use admin::AdminService;
pub use auth::{normalize_email, AuthService, IssuedCode};
pub use context::{LifecycleSettings, ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use gate::{AccountGate, AuthContext};
pub use lifecycle::LifecycleService;
pub use notify::TracingNotifier;
pub use purge::{PurgeReport, PurgeScheduler, PurgeSchedulerHandle, DEFAULT_PURGE_INTERVAL};
pub use song::SongService;
pub use user::UserService;
