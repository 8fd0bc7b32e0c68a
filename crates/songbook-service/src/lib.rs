//! # songbook-service
//!
//! Application layer: account registration and login, the status gate every
//! authenticated request passes, the deletion lifecycle and the purge sweep.

pub mod dto;
pub mod services;

pub use services::{
    AccountGate, AdminService, AuthContext, AuthService, LifecycleService, LifecycleSettings,
    PurgeReport, PurgeScheduler, PurgeSchedulerHandle, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult, SongService, TracingNotifier, UserService,
};
