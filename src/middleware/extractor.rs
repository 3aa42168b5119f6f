use crate::error::ValidatorError;
use crate::validation::ResultSet;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Read the validation result stored by a [`ValidationLayer`](crate::ValidationLayer)
///
/// Handlers behind the layer only run when validation passed (or an
/// `on_result` hook let the request through), so this is mostly useful for
/// inspecting what was checked.
impl<S> FromRequestParts<S> for ResultSet
where
    S: Send + Sync,
{
    type Rejection = ValidatorError;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let result = parts.extensions.get::<ResultSet>().cloned().ok_or_else(|| {
            ValidatorError::internal("ResultSet not found in request extensions; is a ValidationLayer applied to this route?")
        });
        async move { result }
    }
}
