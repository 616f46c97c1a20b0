//! The logging service and its response future.
//!
//! # Responsibilities
//! - Emit the request record synchronously, before the inner call
//! - Wrap the inner future so the outcome is logged on completion
//! - Hand the response or the original error back untouched
//!
//! # Design Decisions
//! - `call` never awaits; logging of the outcome happens inside `poll`
//! - A failed request record fails the call before the inner service runs
//! - Sink and formatter errors replace the outcome (`S::Error: From<LoggingFailure>`)

use std::error::Error;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{ready, Context, Poll};

use bytes::Bytes;
use http::{Request, Response};
use pin_project_lite::pin_project;
use tower::Service;

use crate::format::Formatter;
use crate::level::{LevelPolicy, Outcome, Severity};
use crate::middleware::{FailureReason, LogPolicy, LoggingFailure};
use crate::sink::{LogContext, LogRecord, Sink};

/// Configuration shared, read-only, by every service a layer produces.
pub(crate) struct Shared {
    pub(crate) sink: Arc<dyn Sink>,
    pub(crate) formatter: Arc<dyn Formatter>,
    pub(crate) levels: LevelPolicy,
    pub(crate) policy: LogPolicy,
}

impl Shared {
    /// Emit the request record if the policy asks for one. Returns whether
    /// a record was emitted.
    fn log_request(&self, request: &Request<Bytes>) -> Result<bool, LoggingFailure> {
        let Some(level) = self.policy.request_level(&self.levels) else {
            return Ok(false);
        };
        self.emit(level, LogContext::request(request))?;
        Ok(true)
    }

    fn log_outcome(
        &self,
        request: &Request<Bytes>,
        outcome: Outcome<'_>,
        reason: Option<&(dyn Error + 'static)>,
    ) -> Result<(), LoggingFailure> {
        let Some(level) = self.levels.level(&outcome) else {
            tracing::debug!(
                method = %request.method(),
                uri = %request.uri(),
                status = outcome.response().map(|r| r.status().as_u16()),
                "no severity for outcome, record skipped"
            );
            return Ok(());
        };

        self.emit(
            level,
            LogContext {
                request,
                response: outcome.response(),
                reason,
            },
        )
    }

    fn emit(&self, level: Severity, context: LogContext<'_>) -> Result<(), LoggingFailure> {
        let message = self
            .formatter
            .format(context.request, context.response, context.reason)?;

        LogRecord {
            level,
            message,
            context,
        }
        .emit(self.sink.as_ref())?;
        Ok(())
    }
}

/// Logs every request passing through the wrapped service.
///
/// Built by [`LoggerLayer`](crate::middleware::LoggerLayer).
pub struct Logger<S> {
    inner: S,
    shared: Arc<Shared>,
}

impl<S> Logger<S> {
    pub(crate) fn new(inner: S, shared: Arc<Shared>) -> Self {
        Self { inner, shared }
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Clone> Clone for Logger<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            shared: self.shared.clone(),
        }
    }
}

impl<S> Service<Request<Bytes>> for Logger<S>
where
    S: Service<Request<Bytes>, Response = Response<Bytes>>,
    S::Error: FailureReason + From<LoggingFailure>,
{
    type Response = Response<Bytes>;
    type Error = S::Error;
    type Future = ResponseFuture<S::Future, S::Error>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Bytes>) -> Self::Future {
        let request_logged = match self.shared.log_request(&request) {
            Ok(logged) => logged,
            Err(failure) => return ResponseFuture::failed(failure.into()),
        };

        let completion = Completion {
            request: detach(&request),
            request_logged,
            shared: self.shared.clone(),
        };

        ResponseFuture::pending(self.inner.call(request), completion)
    }
}

/// Copy of the request kept for the terminal record. Extensions are not
/// carried over; formatters never see them.
fn detach(request: &Request<Bytes>) -> Request<Bytes> {
    let mut copy = Request::new(request.body().clone());
    *copy.method_mut() = request.method().clone();
    *copy.uri_mut() = request.uri().clone();
    *copy.version_mut() = request.version();
    *copy.headers_mut() = request.headers().clone();
    copy
}

/// Everything the terminal record needs once the inner future resolves.
struct Completion {
    request: Request<Bytes>,
    request_logged: bool,
    shared: Arc<Shared>,
}

impl Completion {
    fn finish<E>(self, result: Result<Response<Bytes>, E>) -> Result<Response<Bytes>, E>
    where
        E: FailureReason + From<LoggingFailure>,
    {
        match result {
            Ok(response) => {
                self.shared
                    .log_outcome(&self.request, Outcome::Success(&response), None)?;
                Ok(response)
            }
            Err(reason) => {
                if self.shared.policy.suppresses_failure(self.request_logged) {
                    return Err(reason);
                }
                self.shared.log_outcome(
                    &self.request,
                    Outcome::Failure {
                        response: reason.response(),
                    },
                    Some(reason.as_error()),
                )?;
                Err(reason)
            }
        }
    }
}

pin_project! {
    /// Response future of [`Logger`].
    pub struct ResponseFuture<F, E> {
        #[pin]
        kind: Kind<F, E>,
    }
}

pin_project! {
    #[project = KindProj]
    enum Kind<F, E> {
        Pending {
            #[pin]
            future: F,
            completion: Option<Completion>,
        },
        Failed {
            error: Option<E>,
        },
    }
}

impl<F, E> ResponseFuture<F, E> {
    fn pending(future: F, completion: Completion) -> Self {
        Self {
            kind: Kind::Pending {
                future,
                completion: Some(completion),
            },
        }
    }

    fn failed(error: E) -> Self {
        Self {
            kind: Kind::Failed { error: Some(error) },
        }
    }
}

impl<F, E> Future for ResponseFuture<F, E>
where
    F: Future<Output = Result<Response<Bytes>, E>>,
    E: FailureReason + From<LoggingFailure>,
{
    type Output = Result<Response<Bytes>, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.project().kind.project() {
            KindProj::Pending { future, completion } => {
                let result = ready!(future.poll(cx));
                let completion = completion
                    .take()
                    .expect("ResponseFuture polled after completion");
                Poll::Ready(completion.finish(result))
            }
            KindProj::Failed { error } => Poll::Ready(Err(error
                .take()
                .expect("ResponseFuture polled after completion"))),
        }
    }
}
