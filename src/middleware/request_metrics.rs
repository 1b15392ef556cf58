use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};

use crate::utils::metrics;

/// Conta requisições e respostas com erro para o /metrics
pub struct RequestMetrics;

impl<S, B> Transform<S, ServiceRequest> for RequestMetrics
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestMetricsMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestMetricsMiddleware { service }))
    }
}

pub struct RequestMetricsMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestMetricsMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        metrics::increment_request_count();
        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await;
            match &res {
                Ok(response) if response.status().is_client_error() || response.status().is_server_error() => {
                    metrics::increment_error_count()
                }
                Err(_) => metrics::increment_error_count(),
                _ => {}
            }
            res
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App, HttpResponse};

    #[actix_web::test]
    async fn test_counts_requests_and_errors() {
        let app = test::init_service(
            App::new()
                .wrap(RequestMetrics)
                .route("/ok", web::get().to(|| async { HttpResponse::Ok().finish() }))
                .route("/bad", web::get().to(|| async { HttpResponse::BadRequest().finish() })),
        )
        .await;

        let before = metrics::snapshot();
        test::call_service(&app, test::TestRequest::get().uri("/ok").to_request()).await;
        test::call_service(&app, test::TestRequest::get().uri("/bad").to_request()).await;
        let after = metrics::snapshot();

        assert!(after.http_requests_total >= before.http_requests_total + 2);
        assert!(after.http_errors_total >= before.http_errors_total + 1);
    }
}
