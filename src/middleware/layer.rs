use crate::config::{LogLevel, ValidationConfig};
use crate::extract::RequestFields;
use crate::validation::{CompiledGroup, ResultSet, evaluate};
use axum::{
    body::Body,
    extract::Request,
    http::Method,
    response::{IntoResponse, Response},
};
use futures::future::BoxFuture;
use std::sync::Arc;
use tower::Service;

/// Hook run after evaluation; returning a response short-circuits the request
pub type OnResult = Arc<dyn Fn(&ResultSet, &Request) -> Option<Response> + Send + Sync>;

pub(crate) struct Validation {
    pub(crate) groups: Vec<CompiledGroup>,
    pub(crate) config: ValidationConfig,
    pub(crate) on_result: Option<OnResult>,
}

/// Tower layer that validates requests before they reach the handler
///
/// Built with [`ValidationBuilder`](crate::ValidationBuilder) or
/// [`validation`](crate::validation()). Rule descriptors are parsed when the
/// layer is built, never per request.
#[derive(Clone)]
pub struct ValidationLayer {
    validation: Arc<Validation>,
}

impl ValidationLayer {
    pub(crate) fn new(validation: Validation) -> Self {
        Self {
            validation: Arc::new(validation),
        }
    }

    /// Number of compiled validation groups
    pub fn group_count(&self) -> usize {
        self.validation.groups.len()
    }
}

impl<S> tower::Layer<S> for ValidationLayer {
    type Service = ValidationService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ValidationService {
            inner,
            validation: self.validation.clone(),
        }
    }
}

/// Tower service produced by [`ValidationLayer`]
#[derive(Clone)]
pub struct ValidationService<S> {
    inner: S,
    validation: Arc<Validation>,
}

impl<S> Service<Request> for ValidationService<S>
where
    S: Service<Request, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response<Body>;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let validation = self.validation.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let method = req.method().clone();
            let path = req.uri().path().to_string();

            let mut fields = RequestFields::new(req, validation.config.max_body_size);
            let current = match evaluate(&validation.groups, &mut fields).await {
                Ok(result) => result,
                Err(err) => return Ok(err.into_response()),
            };
            let mut req = fields.into_request();

            // An outer validation layer may already have stored its result
            let result = match req.extensions_mut().remove::<ResultSet>() {
                Some(mut previous) => {
                    previous.merge(current);
                    previous
                }
                None => current,
            };
            req.extensions_mut().insert(result.clone());

            if let Some(on_result) = &validation.on_result {
                if let Some(response) = on_result(&result, &req) {
                    return Ok(response);
                }
            }

            if result.has_error() {
                log_failure(validation.config.failure_level, &method, &path, &result);
                return Ok(result.into_response());
            }

            inner.call(req).await
        })
    }
}

fn log_failure(level: LogLevel, method: &Method, path: &str, result: &ResultSet) {
    let failures = result.messages().len();
    let messages = result.messages();

    match level {
        LogLevel::Trace => {
            tracing::trace!(method = %method, path = %path, failures, ?messages, "Request failed validation")
        }
        LogLevel::Debug => {
            tracing::debug!(method = %method, path = %path, failures, ?messages, "Request failed validation")
        }
        LogLevel::Info => {
            tracing::info!(method = %method, path = %path, failures, ?messages, "Request failed validation")
        }
        LogLevel::Warn => {
            tracing::warn!(method = %method, path = %path, failures, ?messages, "Request failed validation")
        }
        LogLevel::Error => {
            tracing::error!(method = %method, path = %path, failures, ?messages, "Request failed validation")
        }
    }
}
