use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use std::time::Instant;

/// Records request count and latency per route template. Requests that match
/// no route share one label so raw URIs never become label values.
pub async fn metrics_middleware(
    matched_path: Option<MatchedPath>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = matched_path
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(req).await;

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    let labels = [
        ("method", method),
        ("path", path),
        ("status", status),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration);

    response
}

pub fn init_metrics() -> anyhow::Result<metrics_exporter_prometheus::PrometheusHandle> {
    let handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()?;

    describe_counter!("http_requests_total", "HTTP requests served");
    describe_histogram!("http_request_duration_seconds", Unit::Seconds, "HTTP request latency");
    describe_counter!("swipes_recorded_total", "Like/dislike decisions stored, by action");
    describe_counter!("swipes_duplicate_total", "Decisions rejected because the pair was already swiped");

    Ok(handle)
}
