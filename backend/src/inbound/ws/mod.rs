//! Live-channel inbound adapter pushing ledger changes to browser sessions.
//!
//! Responsibilities:
//! - validate upgrade requests against the configured origin
//! - subscribe each session to the [`SessionHub`] before the upgrade completes
//! - keep WebSocket framing and heartbeats at the edge of the system
//!
//! Sessions pull `/api/rows` and `/api/emails` after connecting; everything
//! committed after the upgrade arrives as a push.
//!
//! [`SessionHub`]: crate::outbound::broadcast::SessionHub

use actix_web::web::{self, Payload};
use actix_web::{
    HttpRequest, HttpResponse,
    http::header::{HeaderValue, ORIGIN},
    routes,
};
use tracing::{debug, error, warn};
use url::Url;

mod session;

pub mod messages;
pub mod state;

/// Handle the live-channel upgrade.
///
/// Served on `/` for front-ends that open `ws://host:port` directly and on
/// `/ws` for deployments that proxy the channel under its own path.
#[routes]
#[get("/")]
#[get("/ws")]
pub async fn ws_entry(
    state: web::Data<state::WsState>,
    req: HttpRequest,
    stream: Payload,
) -> actix_web::Result<HttpResponse> {
    let mut origin_iter = req.headers().get_all(ORIGIN);
    let origin_header = origin_iter.next().ok_or_else(|| {
        error!("Missing Origin header on WebSocket upgrade");
        actix_web::error::ErrorForbidden("Origin not allowed")
    })?;
    if origin_iter.next().is_some() {
        error!("Multiple Origin headers on WebSocket upgrade");
        return Err(actix_web::error::ErrorBadRequest("Invalid Origin header"));
    }

    validate_origin(origin_header, &state.allowed_origin)?;

    let (response, session, stream) = actix_ws::handle(&req, stream).map_err(|error| {
        error!(error = %error, "WebSocket upgrade failed");
        error
    })?;
    let subscription = state.hub.subscribe();
    debug!(subscriber = subscription.id(), "live session opened");
    actix_web::rt::spawn(session::handle_ws_session(subscription, session, stream));
    Ok(response)
}

fn validate_origin(origin_header: &HeaderValue, allowed: &Url) -> actix_web::Result<()> {
    let origin_value = match origin_header.to_str() {
        Ok(value) => value,
        Err(error) => {
            error!(error = %error, "Failed to parse Origin header as string");
            return Err(actix_web::error::ErrorBadRequest("Invalid Origin header"));
        }
    };

    let origin = Url::parse(origin_value).map_err(|error| {
        error!(error = %error, "Failed to parse Origin header as URL");
        actix_web::error::ErrorBadRequest("Invalid Origin header")
    })?;

    if is_allowed_origin(&origin, allowed) {
        Ok(())
    } else {
        warn!(
            origin = origin_value,
            "Rejected WS upgrade due to disallowed Origin"
        );
        Err(actix_web::error::ErrorForbidden("Origin not allowed"))
    }
}

/// Scheme, host, and effective port must all match; opaque origins never do.
fn is_allowed_origin(origin: &Url, allowed: &Url) -> bool {
    let origin = origin.origin();
    origin.is_tuple() && origin == allowed.origin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use rstest::{fixture, rstest};

    #[fixture]
    fn allowed() -> Url {
        Url::parse("http://localhost:5173").expect("valid url")
    }

    fn header(value: &str) -> HeaderValue {
        HeaderValue::from_str(value).expect("valid header value")
    }

    #[rstest]
    #[case("http://localhost:5173")]
    #[case("http://localhost:5173/")]
    #[case("HTTP://LOCALHOST:5173")]
    fn accepts_configured_origin(allowed: Url, #[case] origin: &str) {
        assert!(validate_origin(&header(origin), &allowed).is_ok());
    }

    #[rstest]
    #[case("http://localhost:3000")]
    #[case("https://localhost:5173")]
    #[case("http://localhost")]
    #[case("http://evil.example:5173")]
    fn rejects_other_origins(allowed: Url, #[case] origin: &str) {
        let error = validate_origin(&header(origin), &allowed).expect_err("origin rejected");
        assert_eq!(
            error.as_response_error().status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[rstest]
    fn rejects_non_utf8_origin_header(allowed: Url) {
        let header = HeaderValue::from_bytes(&[0x80]).expect("opaque header value");
        let error = validate_origin(&header, &allowed).expect_err("origin rejected");
        assert_eq!(
            error.as_response_error().status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[rstest]
    #[case("not a url")]
    #[case("null")]
    fn rejects_unparsable_origin_header(allowed: Url, #[case] origin: &str) {
        let error = validate_origin(&header(origin), &allowed).expect_err("origin rejected");
        assert_eq!(
            error.as_response_error().status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[rstest]
    fn default_ports_compare_equal() {
        let allowed = Url::parse("https://library.example").expect("valid url");
        let origin = Url::parse("https://library.example:443").expect("valid url");
        assert!(is_allowed_origin(&origin, &allowed));
    }

    #[rstest]
    fn opaque_origins_never_match() {
        let allowed = Url::parse("file:///srv/desk").expect("valid url");
        let origin = Url::parse("file:///srv/desk").expect("valid url");
        assert!(!is_allowed_origin(&origin, &allowed));
    }
}
