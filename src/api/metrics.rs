use actix_web::HttpResponse;

use crate::utils::metrics::snapshot;

fn counter(out: &mut String, name: &str, help: &str, value: u64) {
    out.push_str(&format!(
        "# HELP {name} {help}\n# TYPE {name} counter\n{name} {value}\n\n"
    ));
}

#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Health",
    responses(
        (status = 200, description = "Prometheus counters (text exposition format)", body = String)
    )
)]
pub async fn get_metrics() -> HttpResponse {
    let m = snapshot();
    let mut body = String::new();
    counter(&mut body, "http_requests_total", "Total number of HTTP requests", m.http_requests_total);
    counter(&mut body, "http_errors_total", "Total number of HTTP responses with status >= 400", m.http_errors_total);
    counter(&mut body, "gateway_requests_total", "Calls made to the document API", m.gateway_requests_total);
    counter(&mut body, "gateway_failures_total", "Document API calls that failed", m.gateway_failures_total);
    counter(
        &mut body,
        "validation_rejections_total",
        "Form submissions rejected before reaching the document API",
        m.validation_rejections_total,
    );

    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::metrics::{record_gateway_call, record_validation_rejection};
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn test_metrics_exposition() {
        record_gateway_call(false);
        record_validation_rejection();

        let response = get_metrics().await;
        let body = to_bytes(response.into_body()).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();

        assert!(text.contains("# TYPE gateway_failures_total counter"));
        assert!(snapshot().gateway_failures_total >= 1);
        assert!(snapshot().validation_rejections_total >= 1);
    }
}
