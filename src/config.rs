//! Middleware configuration and its functional options.
//!
//! A [`TraceConfig`] is built once, by folding an ordered list of
//! [`TraceOption`]s over the default value, and is then frozen. Everything
//! the request-handling wrapper needs to decide per request lives on the
//! finished value, as decision methods on [`TraceConfig`].

use std::sync::Arc;

use http::Request;
use opentelemetry::global::BoxedTracer;
use opentelemetry::propagation::TextMapPropagator;
use opentelemetry::trace::{Tracer, TracerProvider};

use crate::DEFAULT_TRACE_RESPONSE_HEADER;

/// A predicate used to determine whether a given request should be traced.
///
/// A filter must return `true` if the request should be traced. Filters are
/// invoked for each processed request, so keep them simple and fast.
pub type Filter<B> = Arc<dyn Fn(&Request<B>) -> bool + Send + Sync>;

pub(crate) type SpanNameFormatter<B> = Arc<dyn Fn(&str, &Request<B>) -> String + Send + Sync>;

pub(crate) type PublicEndpointFn<B> = Arc<dyn Fn(&Request<B>) -> bool + Send + Sync>;

/// Configuration consulted by the tracing middleware for every request.
///
/// Generic over the request body type `B` so the same configuration works
/// with any framework built on the `http` crate. All stored callables are
/// `Send + Sync`, so a finished value can be read concurrently from any
/// number of request handlers without locking.
pub struct TraceConfig<B> {
    pub(crate) tracer: Option<Arc<BoxedTracer>>,
    pub(crate) propagator: Option<Arc<dyn TextMapPropagator + Send + Sync>>,
    pub(crate) span_name_formatter: Option<SpanNameFormatter<B>>,
    pub(crate) public_endpoint: bool,
    pub(crate) public_endpoint_fn: Option<PublicEndpointFn<B>>,
    pub(crate) filters: Vec<Filter<B>>,
    pub(crate) trace_response_header_key: String,
}

impl<B> TraceConfig<B> {
    /// Builds a configuration by applying `options` in order to the default
    /// value.
    ///
    /// Later options override earlier ones when they touch the same field;
    /// [`with_filter`] is the exception and appends instead. Fields no
    /// option touches keep their defaults: global tracer and propagator,
    /// route name as span name, child-span association, trace everything,
    /// no trace-id response header.
    pub fn new<I>(options: I) -> Self
    where
        I: IntoIterator<Item = TraceOption<B>>,
    {
        let mut config = Self::default();
        for option in options {
            option.apply(&mut config);
        }
        config
    }
}

impl<B> Default for TraceConfig<B> {
    fn default() -> Self {
        Self {
            tracer: None,
            propagator: None,
            span_name_formatter: None,
            public_endpoint: false,
            public_endpoint_fn: None,
            filters: Vec::new(),
            trace_response_header_key: String::new(),
        }
    }
}

// Manual impl: derive(Clone) would demand `B: Clone`, but `B` only appears
// behind `Arc<dyn Fn>` fields, which clone regardless.
impl<B> Clone for TraceConfig<B> {
    fn clone(&self) -> Self {
        Self {
            tracer: self.tracer.clone(),
            propagator: self.propagator.clone(),
            span_name_formatter: self.span_name_formatter.clone(),
            public_endpoint: self.public_endpoint,
            public_endpoint_fn: self.public_endpoint_fn.clone(),
            filters: self.filters.clone(),
            trace_response_header_key: self.trace_response_header_key.clone(),
        }
    }
}

/// A single configuration mutation, applied exactly once during
/// [`TraceConfig::new`].
///
/// Options are created by the `with_*` functions in this module and are
/// opaque: the only thing to do with one is hand it to the builder.
pub struct TraceOption<B>(Box<dyn FnOnce(&mut TraceConfig<B>)>);

impl<B> TraceOption<B> {
    fn new(f: impl FnOnce(&mut TraceConfig<B>) + 'static) -> Self {
        Self(Box::new(f))
    }

    fn apply(self, config: &mut TraceConfig<B>) {
        (self.0)(config)
    }
}

/// Specifies a tracer provider to use for creating a tracer. If none is
/// specified, the global provider is used.
///
/// `None` is treated as "no override" rather than an error, so a caller
/// threading an optional provider through cannot accidentally erase an
/// earlier choice or the global fallback.
pub fn with_tracer_provider<B, P>(provider: Option<P>) -> TraceOption<B>
where
    P: TracerProvider + 'static,
    P::Tracer: Tracer + Send + Sync + 'static,
    <P::Tracer as Tracer>::Span: Send + Sync + 'static,
{
    TraceOption::new(move |config| {
        if let Some(provider) = provider {
            let tracer = provider.tracer(crate::INSTRUMENTATION_SCOPE);
            config.tracer = Some(Arc::new(BoxedTracer::new(Box::new(tracer))));
        }
    })
}

/// Specifies a text-map propagator to use for extracting trace context from
/// requests. If none is specified, the global propagator is used.
///
/// As with [`with_tracer_provider`], `None` means "no override".
pub fn with_propagator<B, P>(propagator: Option<P>) -> TraceOption<B>
where
    P: TextMapPropagator + Send + Sync + 'static,
{
    TraceOption::new(move |config| {
        if let Some(propagator) = propagator {
            config.propagator = Some(Arc::new(propagator));
        }
    })
}

/// Specifies a function for generating a custom span name.
///
/// By default the route name (path template) is used. The route name is
/// passed in so the formatter can embed it without re-deriving it from the
/// request.
pub fn with_span_name_formatter<B, F>(formatter: F) -> TraceOption<B>
where
    F: Fn(&str, &Request<B>) -> String + Send + Sync + 'static,
{
    TraceOption::new(move |config| {
        config.span_name_formatter = Some(Arc::new(formatter));
    })
}

/// Marks this service as a public trust boundary: an incoming span context
/// is recorded as a link on the server span instead of becoming its parent.
///
/// Without this option (and without [`with_public_endpoint_fn`]) the
/// association is a child association.
pub fn with_public_endpoint<B>() -> TraceOption<B> {
    TraceOption::new(|config| {
        config.public_endpoint = true;
    })
}

/// Like [`with_public_endpoint`], but decided per request: when `f` returns
/// `true` the incoming span context is linked rather than adopted as parent.
///
/// [`with_public_endpoint`] takes precedence over this predicate.
pub fn with_public_endpoint_fn<B, F>(f: F) -> TraceOption<B>
where
    F: Fn(&Request<B>) -> bool + Send + Sync + 'static,
{
    TraceOption::new(move |config| {
        config.public_endpoint_fn = Some(Arc::new(f));
    })
}

/// Adds a filter to the list of filters used by the middleware.
///
/// Filters accumulate: all of them must allow a request for a span to be
/// created. If no filters are provided, all requests are traced.
pub fn with_filter<B, F>(f: F) -> TraceOption<B>
where
    F: Fn(&Request<B>) -> bool + Send + Sync + 'static,
{
    TraceOption::new(move |config| {
        config.filters.push(Arc::new(f));
    })
}

/// Enables echoing the trace id in a response header.
///
/// `header_key` generates the header name; pass `None::<fn() -> String>` to
/// use the default key, [`DEFAULT_TRACE_RESPONSE_HEADER`]. The generator
/// runs once, while this option is applied.
pub fn with_trace_id_response_header<B, F>(header_key: Option<F>) -> TraceOption<B>
where
    F: FnOnce() -> String + 'static,
{
    TraceOption::new(move |config| {
        config.trace_response_header_key = match header_key {
            Some(generate) => generate(),
            None => DEFAULT_TRACE_RESPONSE_HEADER.to_string(),
        };
    })
}
