//! `tower` layer and its builder.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use http::{Request, Response};
use tower::Layer;

use crate::config::{ConfigError, MiddlewareConfig};
use crate::format::{FnFormatter, Formatter, MessageFormatter};
use crate::level::{LevelOverride, LevelPolicy, Severity, StatusTable};
use crate::middleware::service::{Logger, Shared};
use crate::middleware::{LogPolicy, RequestPhase};
use crate::sink::{FnSink, LogContext, Sink};

/// Layer adding request/response logging to an HTTP client service.
///
/// Configuration is fixed once built. To change it, derive a new layer with
/// [`LoggerLayer::to_builder`]; services already built keep the old one.
///
/// # Example
///
/// ```ignore
/// use request_logger::{LoggerLayer, TracingSink, ReqwestTransport};
/// use tower::ServiceBuilder;
///
/// let client = ServiceBuilder::new()
///     .layer(LoggerLayer::new(TracingSink::new()))
///     .service(ReqwestTransport::new(reqwest::Client::new()));
/// ```
#[derive(Clone)]
pub struct LoggerLayer {
    shared: Arc<Shared>,
}

impl LoggerLayer {
    /// Log with `sink`, the CLF template, the coarse status table and no
    /// request record.
    pub fn new(sink: impl Sink + 'static) -> Self {
        Self {
            shared: Arc::new(Shared {
                sink: Arc::new(sink),
                formatter: Arc::new(MessageFormatter::clf()),
                levels: LevelPolicy::default(),
                policy: LogPolicy::default(),
            }),
        }
    }

    pub fn builder() -> LoggerLayerBuilder {
        LoggerLayerBuilder::default()
    }

    /// Build from a configuration section. The sink is supplied by code.
    pub fn from_config(config: &MiddlewareConfig, sink: Arc<dyn Sink>) -> Result<Self, ConfigError> {
        Self::builder()
            .shared_sink(sink)
            .formatter(MessageFormatter::named(&config.format)?)
            .levels(config.level_policy())
            .policy(config.log_policy())
            .build()
    }

    /// A builder preloaded with this layer's configuration.
    pub fn to_builder(&self) -> LoggerLayerBuilder {
        LoggerLayerBuilder {
            sink: Some(self.shared.sink.clone()),
            formatter: Some(FormatterSource::Ready(self.shared.formatter.clone())),
            levels: self.shared.levels.clone(),
            policy: self.shared.policy,
        }
    }

    pub fn policy(&self) -> LogPolicy {
        self.shared.policy
    }

    pub fn level_policy(&self) -> &LevelPolicy {
        &self.shared.levels
    }
}

impl<S> Layer<S> for LoggerLayer {
    type Service = Logger<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Logger::new(inner, self.shared.clone())
    }
}

impl fmt::Debug for LoggerLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerLayer")
            .field("levels", &self.shared.levels)
            .field("policy", &self.shared.policy)
            .finish_non_exhaustive()
    }
}

enum FormatterSource {
    Ready(Arc<dyn Formatter>),
    Template(String),
}

/// Assembles a [`LoggerLayer`]. Nothing is validated until [`build`](Self::build).
#[derive(Default)]
pub struct LoggerLayerBuilder {
    sink: Option<Arc<dyn Sink>>,
    formatter: Option<FormatterSource>,
    levels: LevelPolicy,
    policy: LogPolicy,
}

impl LoggerLayerBuilder {
    pub fn sink(self, sink: impl Sink + 'static) -> Self {
        self.shared_sink(Arc::new(sink))
    }

    pub fn shared_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Use a closure taking `(level, message, context)` as the sink.
    pub fn sink_fn<F>(self, f: F) -> Self
    where
        F: Fn(Severity, &str, &LogContext<'_>) + Send + Sync + 'static,
    {
        self.sink(FnSink::new(f))
    }

    pub fn formatter(mut self, formatter: impl Formatter + 'static) -> Self {
        self.formatter = Some(FormatterSource::Ready(Arc::new(formatter)));
        self
    }

    /// Use a closure taking `(request, response, reason)` as the formatter.
    pub fn formatter_fn<F>(self, f: F) -> Self
    where
        F: Fn(&Request<Bytes>, Option<&Response<Bytes>>, Option<&(dyn Error + 'static)>) -> String
            + Send
            + Sync
            + 'static,
    {
        self.formatter(FnFormatter::new(f))
    }

    /// Use a `{placeholder}` template, parsed at build time.
    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.formatter = Some(FormatterSource::Template(template.into()));
        self
    }

    /// Explicit level: a [`Severity`], a [`LevelOverride::Rule`], or
    /// `None` for the status table.
    pub fn level(mut self, level: impl Into<LevelOverride>) -> Self {
        self.levels = self.levels.with_level(level);
        self
    }

    pub fn status_table(mut self, table: StatusTable) -> Self {
        self.levels = self.levels.with_table(table);
        self
    }

    pub fn levels(mut self, levels: LevelPolicy) -> Self {
        self.levels = levels;
        self
    }

    pub fn policy(mut self, policy: LogPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Log each request before it is sent.
    ///
    /// Enabling keeps a request phase that is already on, so a fixed level
    /// from [`policy`](Self::policy) survives; otherwise the level policy
    /// picks the level. Disabling turns the request record off and leaves
    /// `suppress_duplicate_failure` as it was, which has no effect without
    /// a request record.
    pub fn request_logging(mut self, enabled: bool) -> Self {
        self.policy.request_phase = match (enabled, self.policy.request_phase) {
            (false, _) => RequestPhase::Off,
            (true, RequestPhase::Off) => RequestPhase::Eager,
            (true, phase) => phase,
        };
        self
    }

    pub fn suppress_duplicate_failure(mut self, suppress: bool) -> Self {
        self.policy.suppress_duplicate_failure = suppress;
        self
    }

    pub fn build(self) -> Result<LoggerLayer, ConfigError> {
        let sink = self.sink.ok_or(ConfigError::MissingSink)?;
        let formatter: Arc<dyn Formatter> = match self.formatter {
            Some(FormatterSource::Ready(formatter)) => formatter,
            Some(FormatterSource::Template(template)) => Arc::new(MessageFormatter::new(template)?),
            None => Arc::new(MessageFormatter::clf()),
        };

        Ok(LoggerLayer {
            shared: Arc::new(Shared {
                sink,
                formatter,
                levels: self.levels,
                policy: self.policy,
            }),
        })
    }
}

impl fmt::Debug for LoggerLayerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerLayerBuilder")
            .field("has_sink", &self.sink.is_some())
            .field("levels", &self.levels)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
