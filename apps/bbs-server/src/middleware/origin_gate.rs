//! Origin gate middleware.
//!
//! Runs before routing. Requests whose `referer` header does not carry the
//! value injected by the front door are answered with 403 and never reach a
//! handler or the post store.

use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header,
};
use bbs_core::OriginGate;
use bbs_shared::ErrorResponse;
use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::rc::Rc;

use crate::observability::RequestId;

/// Origin gate middleware factory.
pub struct OriginGateMiddleware {
    gate: Rc<OriginGate>,
}

impl OriginGateMiddleware {
    pub fn new(gate: OriginGate) -> Self {
        Self { gate: Rc::new(gate) }
    }
}

impl<S, B> Transform<S, ServiceRequest> for OriginGateMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = OriginGateService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(OriginGateService {
            service,
            gate: self.gate.clone(),
        }))
    }
}

pub struct OriginGateService<S> {
    service: S,
    gate: Rc<OriginGate>,
}

impl<S, B> Service<ServiceRequest> for OriginGateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Non-UTF-8 values count as absent.
        let presented = req
            .headers()
            .get(header::REFERER)
            .and_then(|v| v.to_str().ok());

        if self.gate.check(presented).is_err() {
            let mut error = ErrorResponse::forbidden().with_instance(req.path());
            if let Some(request_id) = req.extensions().get::<RequestId>() {
                error = error.with_request_id(request_id.as_str());
            }

            let response = HttpResponse::Forbidden().json(error);
            let (http_req, _payload) = req.into_parts();
            let srv_response = ServiceResponse::new(http_req, response);

            return Box::pin(async move { Ok(srv_response.map_into_right_body()) });
        }

        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            Ok(res.map_into_left_body())
        })
    }
}
