//! learnhub: REST backend for an online course platform.
//!
//! Members publish courses and lessons, record payments and subscribe to
//! courses; moderators review and edit everything but create nothing. Row
//! visibility lives in [`policy::Scope`], every write passes through
//! [`policy::authorize`], and free text is screened by
//! [`link_validator::LinkValidator`].

pub mod api;
pub mod app;
pub mod app_info;
pub mod auth;
pub mod boot;
pub mod cli;
pub mod commands;
pub mod config;
pub mod database;
pub mod environment;
pub mod link_validator;
pub mod password;
pub mod policy;
pub mod router;
pub mod setup_tracing;

#[cfg(any(test, feature = "test-utils"))]
pub mod tests;
