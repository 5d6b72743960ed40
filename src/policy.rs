//! Per-request decision rules over a frozen [`TraceConfig`].
//!
//! The request-handling wrapper calls these for every inbound request. All
//! of them are pure with respect to the configuration: evaluating a rule
//! twice against the same request yields the same decision.

use std::sync::Arc;

use http::Request;
use opentelemetry::global::{self, BoxedTracer};
use opentelemetry::Context;
use opentelemetry_http::HeaderExtractor;

use crate::config::TraceConfig;

/// How the server span relates to an incoming remote span context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanAssociation {
    /// The remote context becomes the direct parent of the server span.
    Child,
    /// The remote context is recorded as a link only; the server span starts
    /// a new trace. Used at public trust boundaries where incoming context
    /// is not trusted as a parent.
    Link,
}

impl<B> TraceConfig<B> {
    /// Returns whether this request should be traced: the logical AND of
    /// every configured filter, evaluated in insertion order.
    ///
    /// An empty filter chain traces everything. Evaluation stops at the
    /// first filter that rejects the request.
    pub fn should_trace(&self, request: &Request<B>) -> bool {
        self.filters.iter().all(|filter| filter(request))
    }

    /// Decides how the server span should relate to the incoming span
    /// context, if any.
    ///
    /// The public-endpoint flag wins unconditionally; the per-request
    /// predicate is only consulted when the flag is unset.
    pub fn span_association(&self, request: &Request<B>) -> SpanAssociation {
        if self.public_endpoint {
            return SpanAssociation::Link;
        }
        match &self.public_endpoint_fn {
            Some(is_public) if is_public(request) => SpanAssociation::Link,
            _ => SpanAssociation::Child,
        }
    }

    /// Computes the span name for a request.
    ///
    /// `route` is the matched route identifier (path template). Without a
    /// configured formatter it is used verbatim.
    pub fn span_name(&self, route: &str, request: &Request<B>) -> String {
        match &self.span_name_formatter {
            Some(format) => format(route, request),
            None => route.to_string(),
        }
    }

    /// The response header under which to echo the active span's trace id,
    /// or `None` when no header was requested.
    pub fn trace_response_header(&self) -> Option<&str> {
        if self.trace_response_header_key.is_empty() {
            None
        } else {
            Some(&self.trace_response_header_key)
        }
    }

    /// The tracer the wrapper should create spans with: the one derived
    /// from the configured provider, or one from the global provider under
    /// this crate's instrumentation scope.
    pub fn tracer(&self) -> Arc<BoxedTracer> {
        match &self.tracer {
            Some(tracer) => Arc::clone(tracer),
            None => Arc::new(global::tracer(crate::INSTRUMENTATION_SCOPE)),
        }
    }

    /// Extracts the remote trace context from the request headers using the
    /// configured propagator, falling back to the process-wide one.
    ///
    /// Whether the result becomes the span's parent or a link is decided by
    /// [`TraceConfig::span_association`], not here.
    pub fn extract_remote_context(&self, request: &Request<B>) -> Context {
        let extractor = HeaderExtractor(request.headers());
        match &self.propagator {
            Some(propagator) => propagator.extract(&extractor),
            None => global::get_text_map_propagator(|propagator| propagator.extract(&extractor)),
        }
    }
}
