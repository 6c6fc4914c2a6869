//! Prelude for request handlers.
//!
//! Brings the authentication, authorization and response types every
//! resource module needs into scope.
//!
//! # Example
//! ```rust,ignore
//! use learnhub::auth::prelude::*;
//!
//! pub async fn destroy(
//!     policy: CoursePolicy,
//!     State(db): State<DatabaseConnection>,
//!     Path(id): Path<i32>,
//! ) -> RequestResult {
//!     let course = courses::find_visible(&db, policy.scope(), id)
//!         .await?
//!         .ok_or(RequestError::NotFound)?;
//!     authorize(&policy, Action::Delete(&course), &())?;
//!     courses::delete(&db, course).await?;
//!     Ok(RequestSuccess::NoContent)
//! }
//! ```

pub use crate::auth::{CurrentUser, Principal};

pub use crate::policy::{authorize, Action, Policy, Scope};

pub use crate::api::request_result::{RequestError, RequestResult, RequestSuccess};
pub use crate::api::view_param::{Renderer, ViewEnum, ViewParam};
