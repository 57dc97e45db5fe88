use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blog_service::config::Config;
use blog_service::middleware::RateLimitMiddleware;
use blog_service::services::EmailService;
use blog_service::{db, routes};

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().expect("Failed to load configuration");

    tracing::info!("Starting blog-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    // Connect to MongoDB and bootstrap the indexes the queries rely on
    let database = db::connect(&config.database.uri, &config.database.db_name)
        .await
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::ConnectionRefused,
                format!("MongoDB connection failed: {}", e),
            )
        })?;

    db::ensure_indexes(&database).await.map_err(|e| {
        io::Error::new(
            io::ErrorKind::Other,
            format!("MongoDB index creation failed: {}", e),
        )
    })?;
    tracing::info!("MongoDB indexes ensured");

    let email_service = web::Data::new(EmailService::new(
        config.email.clone(),
        config.app.url.clone(),
    ));
    if !email_service.is_configured() {
        tracing::warn!("SMTP credentials not configured; welcome emails disabled");
    }

    let rate_limit = RateLimitMiddleware::new(&config.rate_limit);
    tracing::info!(
        "Rate limiter initialized: {} requests per {} seconds per IP",
        config.rate_limit.max_requests,
        config.rate_limit.window_secs
    );

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    let server_config = config.clone();

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(database.clone()))
            .app_data(web::Data::new(server_config.clone()))
            .app_data(email_service.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .wrap(rate_limit.clone())
            .service(routes::api(&server_config.jwt.secret))
    })
    .bind(&bind_address)?
    .workers(4)
    .run()
    .await
}
