//! Configuration for OpenTelemetry HTTP server tracing middleware.
//!
//! This crate collects the optional behaviors of a server-side tracing
//! middleware (which tracer and propagator to use, whether the service is
//! a public trust boundary, how to name spans, which requests to skip, and
//! whether to echo the trace id back to the client) into one immutable
//! [`TraceConfig`]. The middleware wrapper itself, typically a tower layer
//! or an axum middleware, is deliberately not part of this crate: it
//! consults the finished configuration through the decision methods on
//! [`TraceConfig`] for every inbound request.
//!
//! ## Usage
//!
//! ### Building a configuration
//! ```
//! use http::Request;
//! use otel_trace_config::{
//!     with_filter, with_public_endpoint, with_trace_id_response_header, SpanAssociation,
//!     TraceConfig,
//! };
//!
//! let config: TraceConfig<()> = TraceConfig::new([
//!     // Skip tracing for health probes.
//!     with_filter(|req: &Request<()>| !req.uri().path().starts_with("/health")),
//!     // Incoming trace context is untrusted; record it as a link.
//!     with_public_endpoint(),
//!     // Echo the trace id under the default "X-Trace-Id" key.
//!     with_trace_id_response_header(None::<fn() -> String>),
//! ]);
//!
//! let request = Request::builder().uri("/api/users").body(()).unwrap();
//! assert!(config.should_trace(&request));
//! assert_eq!(config.span_association(&request), SpanAssociation::Link);
//! assert_eq!(config.trace_response_header(), Some("X-Trace-Id"));
//! ```
//!
//! ### Consuming it from a middleware wrapper
//! ```ignore
//! let config = Arc::new(config);
//! // per request, inside the wrapper:
//! if config.should_trace(&request) {
//!     let remote = config.extract_remote_context(&request);
//!     let name = config.span_name(route, &request);
//!     match config.span_association(&request) {
//!         SpanAssociation::Child => { /* start span with `remote` as parent */ }
//!         SpanAssociation::Link => { /* start root span, add `remote` as link */ }
//!     }
//! }
//! ```
//!
//! Unset fields fall back to process-wide defaults: the global tracer
//! provider and the global text-map propagator. Construction never fails;
//! every option is a total function over the configuration.

mod config;
mod policy;

pub use config::{
    with_filter, with_propagator, with_public_endpoint, with_public_endpoint_fn,
    with_span_name_formatter, with_trace_id_response_header, with_tracer_provider, Filter,
    TraceConfig, TraceOption,
};
pub use policy::SpanAssociation;

/// Response header key used by [`with_trace_id_response_header`] when no
/// custom generator is supplied.
pub const DEFAULT_TRACE_RESPONSE_HEADER: &str = "X-Trace-Id";

/// Instrumentation scope name under which tracers are requested from a
/// provider.
pub const INSTRUMENTATION_SCOPE: &str = env!("CARGO_PKG_NAME");
