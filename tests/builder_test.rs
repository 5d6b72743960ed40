//! Builder semantics observed through the public surface: ordered folding,
//! last-write-wins overrides, and filter-chain additivity.

use http::Request;
use otel_trace_config::{
    with_filter, with_propagator, with_span_name_formatter, with_trace_id_response_header,
    TraceConfig, TraceOption, DEFAULT_TRACE_RESPONSE_HEADER,
};
use opentelemetry_sdk::propagation::TraceContextPropagator;

fn request(path: &str) -> Request<()> {
    Request::builder().uri(path).body(()).unwrap()
}

/// Applying options through the builder equals folding them in order:
/// the last option touching a field determines its value.
#[test]
fn test_last_write_wins_on_scalar_fields() {
    let config: TraceConfig<()> = TraceConfig::new([
        with_trace_id_response_header(Some(|| "X-Early".to_string())),
        with_span_name_formatter(|_route: &str, _req: &Request<()>| "early".to_string()),
        with_span_name_formatter(|_route: &str, _req: &Request<()>| "late".to_string()),
        with_trace_id_response_header(Some(|| "X-Late".to_string())),
    ]);

    assert_eq!(config.trace_response_header(), Some("X-Late"));
    assert_eq!(config.span_name("/route", &request("/route")), "late");
}

/// Reordering two options that touch the same field flips the outcome.
#[test]
fn test_order_dependence() {
    let forward: TraceConfig<()> = TraceConfig::new([
        with_trace_id_response_header(None::<fn() -> String>),
        with_trace_id_response_header(Some(|| "X-Custom".to_string())),
    ]);
    let reversed: TraceConfig<()> = TraceConfig::new([
        with_trace_id_response_header(Some(|| "X-Custom".to_string())),
        with_trace_id_response_header(None::<fn() -> String>),
    ]);

    assert_eq!(forward.trace_response_header(), Some("X-Custom"));
    assert_eq!(reversed.trace_response_header(), Some(DEFAULT_TRACE_RESPONSE_HEADER));
}

/// Filters accumulate rather than replace: the aggregate decision is the
/// AND of every filter added, independent of how they interleave with
/// other options.
#[test]
fn test_filter_additivity() {
    let allow_api = |req: &Request<()>| req.uri().path().starts_with("/api");
    let deny_admin = |req: &Request<()>| !req.uri().path().starts_with("/api/admin");

    let config: TraceConfig<()> = TraceConfig::new([
        with_filter(allow_api),
        with_propagator(Some(TraceContextPropagator::new())),
        with_filter(deny_admin),
    ]);

    for path in ["/api/users", "/api/admin/keys", "/metrics", "/"] {
        let req = request(path);
        assert_eq!(
            config.should_trace(&req),
            allow_api(&req) && deny_admin(&req),
            "disagreement for {path}"
        );
    }
}

/// A builder fed from a dynamically assembled option list behaves the same
/// as one fed a literal array.
#[test]
fn test_options_from_iterator() {
    let mut options: Vec<TraceOption<()>> = Vec::new();
    for prefix in ["/health", "/ready"] {
        options.push(with_filter(move |req: &Request<()>| {
            !req.uri().path().starts_with(prefix)
        }));
    }

    let config = TraceConfig::new(options);
    assert!(!config.should_trace(&request("/health/live")));
    assert!(!config.should_trace(&request("/ready")));
    assert!(config.should_trace(&request("/api/x")));
}
