/// Implement `FromRequestParts` for a policy built from the current user.
///
/// The policy type must provide `fn new(principal: Principal) -> Self`.
/// Extraction fails with 401 when the request is not authenticated.
///
/// # Usage
///
/// ```rust,ignore
/// pub struct CoursePolicy {
///     principal: Principal,
/// }
///
/// policy_extractor!(CoursePolicy);
///
/// pub async fn index(policy: CoursePolicy, ...) -> RequestResult { ... }
/// ```
macro_rules! policy_extractor {
    ($policy:ty) => {
        impl<S> ::axum::extract::FromRequestParts<S> for $policy
        where
            S: Send + Sync,
            $crate::config::Config: ::axum::extract::FromRef<S>,
            ::sea_orm::DatabaseConnection: ::axum::extract::FromRef<S>,
        {
            type Rejection = $crate::auth::AuthError;

            async fn from_request_parts(
                parts: &mut ::axum::http::request::Parts,
                state: &S,
            ) -> Result<Self, Self::Rejection> {
                let current_user =
                    <$crate::auth::CurrentUser as ::axum::extract::FromRequestParts<S>>::from_request_parts(
                        parts, state,
                    )
                    .await?;

                Ok(Self::new(current_user.principal()))
            }
        }
    };
}

pub(crate) use policy_extractor;
