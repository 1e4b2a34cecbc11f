use std::task::Context;
use std::task::Poll;

use futures::future::BoxFuture;
use tonic::body::BoxBody;
use tonic::codegen::http;
use tonic::Status;
use tower::Layer;
use tower::Service;

use crate::inbound::access::AccessPolicy;

/// Tower layer applying the access policy to every RPC.
///
/// Runs before tonic routing so the full method path
/// (`/user.UserService/UpdateUser`) is the endpoint identity.
#[derive(Clone)]
pub struct GrpcAuthLayer {
    policy: AccessPolicy,
}

impl GrpcAuthLayer {
    pub fn new(policy: AccessPolicy) -> Self {
        Self { policy }
    }
}

impl<S> Layer<S> for GrpcAuthLayer {
    type Service = GrpcAuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        GrpcAuthService {
            inner,
            policy: self.policy.clone(),
        }
    }
}

#[derive(Clone)]
pub struct GrpcAuthService<S> {
    inner: S,
    policy: AccessPolicy,
}

impl<S, B> Service<http::Request<B>> for GrpcAuthService<S>
where
    S: Service<http::Request<B>, Response = http::Response<BoxBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: http::Request<B>) -> Self::Future {
        let endpoint = req.uri().path().to_string();
        let authorization = req
            .headers()
            .get(http::header::AUTHORIZATION)
            .map(|value| value.to_str().unwrap_or_default());

        match self.policy.authorize(&endpoint, authorization) {
            Ok(caller) => {
                if let Some(caller) = caller {
                    tracing::debug!(
                        user_id = %caller.user_id,
                        endpoint = %endpoint,
                        "Caller authenticated"
                    );
                    req.extensions_mut().insert(caller);
                }

                // The clone is not guaranteed to be ready; use the one that was polled.
                let clone = self.inner.clone();
                let mut inner = std::mem::replace(&mut self.inner, clone);
                Box::pin(async move { inner.call(req).await })
            }
            Err(e) => {
                let response = Status::unauthenticated(e.public_message()).to_http();
                Box::pin(async move { Ok(response) })
            }
        }
    }
}
