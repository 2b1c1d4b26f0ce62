use {
    super::api_errors::ApiError,
    axum::{
        extract::{ConnectInfo, FromRequest, FromRequestParts, connect_info::MockConnectInfo},
        http::{Extensions, header::USER_AGENT, request::Parts},
    },
    std::{convert::Infallible, net::{IpAddr, SocketAddr}},
};

/// JSON body extractor whose rejections use the uniform error shape.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

/// Peer address recorded by `into_make_service_with_connect_info`, or the
/// one injected with `MockConnectInfo` when the router is driven directly.
pub fn client_ip(extensions: &Extensions) -> Option<IpAddr> {
    extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .or_else(|| {
            extensions
                .get::<MockConnectInfo<SocketAddr>>()
                .map(|MockConnectInfo(addr)| addr.ip())
        })
}

/// Request context captured for audit entries.
#[derive(Debug, Clone, Default)]
pub struct RequestMeta {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl<S: Send + Sync> FromRequestParts<S> for RequestMeta {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_agent = parts
            .headers
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Ok(Self {
            ip_address: client_ip(&parts.extensions).map(|ip| ip.to_string()),
            user_agent,
        })
    }
}
