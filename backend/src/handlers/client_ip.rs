use std::convert::Infallible;
use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{request::Parts, HeaderMap},
};

/// Best guess at the visitor's address, used as the rate limit key.
///
/// The backend is expected to sit behind a reverse proxy. `X-Real-IP` is set
/// by the proxy and wins. Otherwise the last `X-Forwarded-For` hop is used,
/// since earlier hops are whatever the client sent. The socket address is
/// only a fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let from_socket = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string());

        Ok(ClientIp(
            from_headers(&parts.headers)
                .or(from_socket)
                .unwrap_or_else(|| "unknown".to_string()),
        ))
    }
}

fn from_headers(headers: &HeaderMap) -> Option<String> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    let real_ip = header("x-real-ip")
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    real_ip.or_else(|| {
        header("x-forwarded-for")
            .and_then(|v| v.rsplit(',').next().map(|hop| hop.trim().to_string()))
            .filter(|v| !v.is_empty())
    })
}
