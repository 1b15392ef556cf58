use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};

use crate::session::Session;
use crate::utils::AppError;

/// Builds the `Session` once per request from `Authorization: Bearer <jwt>`
/// and stores it in the request extensions (`web::ReqData<Session>`).
pub struct SessionMiddleware;

impl<S, B> Transform<S, ServiceRequest> for SessionMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionMiddlewareService { service }))
    }
}

pub struct SessionMiddlewareService<S> {
    service: S,
}

fn bearer_token(req: &ServiceRequest) -> Result<String, AppError> {
    let header = req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized("Missing authorization token".to_string()))?;

    let value = header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid token format".to_string()))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .ok_or_else(|| AppError::Unauthorized("Invalid token format".to_string()))
}

impl<S, B> Service<ServiceRequest> for SessionMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let session = bearer_token(&req)
            .and_then(|token| Session::from_bearer(&token, chrono::Utc::now().timestamp()));

        match session {
            Ok(session) => {
                log::debug!("🔑 {} {} as {} ({})", req.method(), req.path(), session.user_id, session.role);
                req.extensions_mut().insert(session);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(e) => {
                log::warn!("🚫 {} {} rejected: {}", req.method(), req.path(), e);
                let response = e.to_response();
                Box::pin(async move { Ok(req.into_response(response).map_into_right_body()) })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::jwt::tests::mint_token;
    use actix_web::{http::StatusCode, test, web, App, HttpResponse};

    async fn whoami(session: web::ReqData<Session>) -> HttpResponse {
        HttpResponse::Ok().body(session.user_id.clone())
    }

    #[actix_web::test]
    async fn test_session_injected_from_bearer() {
        let app = test::init_service(
            App::new().service(
                web::resource("/me")
                    .wrap(SessionMiddleware)
                    .route(web::get().to(whoami)),
            ),
        )
        .await;

        let token = mint_token("u9", "mentor", 4_000_000_000);
        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "u9");
    }

    #[actix_web::test]
    async fn test_missing_or_expired_token_is_401() {
        let app = test::init_service(
            App::new().service(
                web::resource("/me")
                    .wrap(SessionMiddleware)
                    .route(web::get().to(whoami)),
            ),
        )
        .await;

        let req = test::TestRequest::get().uri("/me").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let expired = mint_token("u9", "mentor", 1);
        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header(("Authorization", format!("Bearer {}", expired)))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], false);
    }
}
