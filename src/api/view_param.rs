use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;

use crate::api::request_result::RequestError;

/// `?view=<name>` selector for resources that render in more than one shape.
///
/// Falls back to [`ViewEnum::default_view`] when the parameter is absent and
/// rejects unknown names with 400.
///
/// # Example
/// ```rust,ignore
/// pub async fn show(policy: UserPolicy, view: ViewParam<UserView>, ...) -> RequestResult {
///     policy.can_view(&user, view.name())?;
///     Ok(RequestSuccess::Ok(view.render(record)))
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ViewParam<T> {
    view: T,
}

impl<T> ViewParam<T> {
    pub const fn inner(&self) -> &T {
        &self.view
    }

    pub fn render<E>(&self, entity: E) -> serde_json::Value
    where
        T: Renderer<E>,
    {
        self.view.render(entity)
    }
}

impl<T> std::ops::Deref for ViewParam<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.view
    }
}

#[derive(Deserialize)]
struct ViewQuery {
    view: Option<String>,
}

impl<S, T> FromRequestParts<S> for ViewParam<T>
where
    S: Send + Sync,
    T: ViewEnum + Send,
{
    type Rejection = RequestError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<ViewQuery>::from_request_parts(parts, state)
            .await
            .map_err(|_| RequestError::bad_request("Invalid view parameter."))?;

        let view = match query.view.as_deref() {
            Some(name) => T::from_name(name)
                .ok_or_else(|| RequestError::bad_request(format!("Unknown view '{name}'.")))?,
            None => T::default_view(),
        };

        Ok(Self { view })
    }
}

/// A closed set of named renderings.
pub trait ViewEnum: Sized {
    fn from_name(name: &str) -> Option<Self>;

    fn name(&self) -> &'static str;

    fn default_view() -> Self;
}

/// Renders `E` as JSON in the shape selected by the view.
pub trait Renderer<E> {
    fn render(&self, entity: E) -> serde_json::Value;
}
