//! Per-IP rate limiting middleware
//!
//! Token bucket per client IP via the `governor` crate. The default
//! budget is 200 requests per 15-minute window. The client IP is taken
//! from `X-Forwarded-For` when present (proxy deployments), falling
//! back to the peer address.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorTooManyRequests,
    Error,
};
use futures::future::LocalBoxFuture;
use governor::{Quota, RateLimiter};
use std::net::IpAddr;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::RateLimitConfig;

/// Middleware state; the limiter hides governor's generics behind a
/// boxed check closure
struct RateLimitState {
    check_limit: Arc<dyn Fn(IpAddr) -> bool + Send + Sync>,
}

/// Rate limit middleware factory
#[derive(Clone)]
pub struct RateLimitMiddleware {
    state: Arc<RateLimitState>,
}

impl RateLimitMiddleware {
    pub fn new(config: &RateLimitConfig) -> Self {
        let max_requests =
            NonZeroU32::new(config.max_requests).expect("rate limit max_requests must be > 0");

        // Refill so that a full window admits max_requests, with the
        // whole budget available as burst, like a fixed-window limiter
        let period = Duration::from_secs_f64(
            config.window_secs as f64 / f64::from(config.max_requests),
        );
        let quota = Quota::with_period(period)
            .expect("rate limit window must be > 0")
            .allow_burst(max_requests);

        let limiter = RateLimiter::keyed(quota);
        let check_limit = Arc::new(move |ip: IpAddr| limiter.check_key(&ip).is_ok());

        Self {
            state: Arc::new(RateLimitState { check_limit }),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddlewareService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(RateLimitMiddlewareService {
            service,
            state: self.state.clone(),
        }))
    }
}

pub struct RateLimitMiddlewareService<S> {
    service: S,
    state: Arc<RateLimitState>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let ip = extract_client_ip(&req);

        if !(self.state.check_limit)(ip) {
            warn!("Rate limit exceeded for IP: {}", ip);
            return Box::pin(async move { Err(ErrorTooManyRequests("Rate limit exceeded")) });
        }

        debug!("Rate limit check passed for IP: {}", ip);

        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await?;
            Ok(res)
        })
    }
}

/// Extract client IP from request, respecting X-Forwarded-For header
fn extract_client_ip(req: &ServiceRequest) -> IpAddr {
    if let Some(x_forwarded_for) = req.headers().get("X-Forwarded-For") {
        if let Ok(header_value) = x_forwarded_for.to_str() {
            // X-Forwarded-For can contain multiple IPs; take the first one
            if let Some(first_ip) = header_value.split(',').next() {
                if let Ok(ip) = first_ip.trim().parse::<IpAddr>() {
                    return ip;
                }
            }
        }
    }

    req.peer_addr()
        .map(|addr| addr.ip())
        .unwrap_or(IpAddr::from([127, 0, 0, 1]))
}
