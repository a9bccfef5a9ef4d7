//! Server construction and middleware wiring.

mod config;
mod settings;
mod state_builders;
mod tls;

pub use config::{ServerConfig, TlsPaths};
pub use settings::AppSettings;

use state_builders::{AdapterStates, build_adapter_states};

use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::{Method, header};
use actix_web::{App, HttpServer, web};
use tracing::info;
use url::Url;

#[cfg(debug_assertions)]
use loan_ledger::doc::ApiDoc;
use loan_ledger::domain::TRACE_ID_HEADER;
use loan_ledger::inbound::http::api_scope;
use loan_ledger::inbound::http::health::{HealthState, live, ready};
use loan_ledger::inbound::ws;
use loan_ledger::middleware::Trace;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Browser access for the configured front-end origin only.
fn cors_for(allowed_origin: &Url) -> Cors {
    Cors::default()
        .allowed_origin(&allowed_origin.origin().ascii_serialization())
        .allowed_methods([Method::GET, Method::POST])
        .allowed_headers([header::CONTENT_TYPE])
        .expose_headers([header::HeaderName::from_static(TRACE_ID_HEADER)])
        .max_age(3600)
}

fn build_app(
    health_state: web::Data<HealthState>,
    states: AdapterStates,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AdapterStates { http, ws: ws_state } = states;
    let cors = cors_for(&ws_state.allowed_origin);

    let app = App::new()
        .app_data(health_state)
        .app_data(http)
        .app_data(ws_state)
        .wrap(cors)
        .wrap(Trace)
        .service(api_scope())
        .service(ws::ws_entry)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server over the file-backed ledger.
///
/// The ledger snapshot is loaded before the listener binds; readiness is
/// flagged once binding succeeds. With a certificate pair configured the
/// listener speaks HTTPS (and `wss://` for the live channel).
///
/// # Errors
/// Propagates [`std::io::Error`] when the data directory cannot be opened,
/// the certificate pair cannot be loaded, or the socket cannot be bound.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let states = build_adapter_states(&config)?;
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || build_app(server_health_state.clone(), states.clone()));
    let server = match &config.tls {
        Some(paths) => {
            server.bind_rustls_0_23(config.bind_addr(), tls::load_server_config(paths)?)?
        }
        None => server.bind(config.bind_addr())?,
    }
    .run();

    info!(
        bind_addr = %config.bind_addr(),
        https = config.tls.is_some(),
        data_dir = %config.data_dir.display(),
        allowed_origin = %config.allowed_origin,
        "loan ledger listening"
    );
    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    const FRONT_END: &str = "http://localhost:5173";

    struct Harness {
        _data: TempDir,
        states: AdapterStates,
    }

    #[fixture]
    fn harness() -> Harness {
        let data = TempDir::new().expect("temp dir");
        let config = ServerConfig::new(
            "127.0.0.1:0".parse().expect("socket addr"),
            data.path().to_path_buf(),
            Url::parse(FRONT_END).expect("origin"),
        );
        let states = build_adapter_states(&config).expect("states");
        Harness {
            _data: data,
            states,
        }
    }

    fn allow_origin(res: &ServiceResponse<impl MessageBody>) -> Option<&str> {
        res.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|value| value.to_str().ok())
    }

    #[rstest]
    #[actix_web::test]
    async fn preflight_from_the_front_end_is_allowed(harness: Harness) {
        let app = actix_test::init_service(build_app(
            web::Data::new(HealthState::new()),
            harness.states,
        ))
        .await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::default()
                .method(Method::OPTIONS)
                .uri("/api/rows")
                .insert_header((header::ORIGIN, FRONT_END))
                .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "POST"))
                .insert_header((header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type"))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(allow_origin(&res), Some(FRONT_END));
    }

    #[rstest]
    #[actix_web::test]
    async fn reads_from_the_front_end_carry_the_allow_origin_header(harness: Harness) {
        let app = actix_test::init_service(build_app(
            web::Data::new(HealthState::new()),
            harness.states,
        ))
        .await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/rows")
                .insert_header((header::ORIGIN, FRONT_END))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(allow_origin(&res), Some(FRONT_END));
        assert!(res.headers().contains_key(TRACE_ID_HEADER));
    }

    #[rstest]
    #[actix_web::test]
    async fn other_origins_get_no_allow_origin_header(harness: Harness) {
        let app = actix_test::init_service(build_app(
            web::Data::new(HealthState::new()),
            harness.states,
        ))
        .await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::default()
                .method(Method::OPTIONS)
                .uri("/api/rows")
                .insert_header((header::ORIGIN, "http://evil.example"))
                .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "POST"))
                .to_request(),
        )
        .await;

        assert!(res.status().is_client_error());
        assert_eq!(allow_origin(&res), None);
    }
}
