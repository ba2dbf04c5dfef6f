//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::AppConfig;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::{Method, header};
use actix_web::{App, HttpServer, web};
use color_eyre::eyre::{Context, eyre};
use tracing::info;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use wanderlust::ApiDoc;
use wanderlust::Trace;
use wanderlust::inbound::http::health::HealthState;
use wanderlust::inbound::http::routes;
use wanderlust::inbound::http::state::HttpState;
use wanderlust::inbound::http::validation::json_config;
use wanderlust::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};

use state_builders::{build_http_state, build_image_store, build_token_codec};

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    allowed_origins: Vec<String>,
    upload_dir: std::path::PathBuf,
}

fn build_cors(allowed_origins: &[String]) -> Cors {
    allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allowed_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::HeaderName::from_static(wanderlust::domain::TRACE_ID_HEADER)])
        .supports_credentials()
        .max_age(3600)
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        allowed_origins,
        upload_dir,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(json_config())
        .wrap(build_cors(&allowed_origins))
        .wrap(Trace)
        .service(Files::new("/uploads", upload_dir))
        .configure(routes::configure);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Connect to PostgreSQL, wire the adapters and bind the HTTP server.
///
/// Readiness flips once migrations have run and the listener is bound.
///
/// # Errors
///
/// Fails when the database is unreachable, migrations fail, the token
/// secret is unusable, the upload directory cannot be created, or the
/// socket cannot be bound.
pub async fn create_server(
    health_state: web::Data<HealthState>,
    config: AppConfig,
) -> color_eyre::Result<Server> {
    let database_url = config
        .database_url()
        .ok_or_else(|| eyre!("WANDERLUST_DATABASE_URL must be set"))?
        .to_owned();

    run_pending_migrations(&database_url)
        .await
        .wrap_err("failed to apply database migrations")?;
    let pool = DbPool::new(
        PoolConfig::new(database_url).with_max_size(config.db_max_connections()),
    )
    .await
    .wrap_err("failed to build database pool")?;

    let tokens = build_token_codec().wrap_err("invalid token configuration")?;
    let images = build_image_store(&config)
        .await
        .wrap_err("failed to prepare image storage")?;
    let http_state = web::Data::new(build_http_state(&config, &pool, images, tokens));

    let deps = AppDependencies {
        health_state: health_state.clone(),
        http_state,
        allowed_origins: config.allowed_origins(),
        upload_dir: config.upload_dir(),
    };
    let bind_addr = config.bind_addr();
    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind(bind_addr)
        .wrap_err_with(|| format!("failed to bind {bind_addr}"))?
        .run();

    info!(%bind_addr, "server listening");
    health_state.mark_ready();
    Ok(server)
}
