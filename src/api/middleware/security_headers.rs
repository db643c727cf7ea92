//! Hardening headers added to every response.

use axum::http::{HeaderName, HeaderValue, header};
use tower::ServiceBuilder;
use tower::layer::util::{Identity, Stack};
use tower_http::set_header::SetResponseHeaderLayer;

type HeaderLayer = SetResponseHeaderLayer<HeaderValue>;

/// Stack of the three header layers.
pub type SecurityHeaders = Stack<HeaderLayer, Stack<HeaderLayer, Stack<HeaderLayer, Identity>>>;

/// Sets `X-Content-Type-Options`, `X-Frame-Options` and `Referrer-Policy`
/// unless the handler already did.
pub fn layer() -> ServiceBuilder<SecurityHeaders> {
    ServiceBuilder::new()
        .layer(set(header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
        .layer(set(header::X_FRAME_OPTIONS, "DENY"))
        .layer(set(header::REFERRER_POLICY, "no-referrer"))
}

fn set(name: HeaderName, value: &'static str) -> HeaderLayer {
    SetResponseHeaderLayer::if_not_present(name, HeaderValue::from_static(value))
}
