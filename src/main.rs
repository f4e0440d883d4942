use poem::{listener::TcpListener, Route, Server};
use poem_openapi::OpenApiService;
use sea_orm::{Database, DatabaseConnection};
use std::time::Duration;

use kantin_backend::api::{AuthApi, HealthApi, UsersApi};
use kantin_backend::app_data::AppData;
use kantin_backend::config::logging::init_logging;
use kantin_backend::config::AppSettings;
use migration::{Migrator, MigratorTrait};

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_logging().expect("Failed to initialize logging");

    let settings = AppSettings::from_env().expect("Invalid configuration");

    // Connect to database
    let db: DatabaseConnection = Database::connect(&settings.database_url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database: {}", settings.database_url);

    // Run migrations
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    tracing::info!("Database migrations completed");

    let app_data = AppData::init(db, &settings);

    // Periodically drop session rows past their natural expiry: expired
    // refresh tokens and revocation entries for access tokens that can no
    // longer pass signature validation anyway
    let purge_store = app_data.session_store.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(3600));
        loop {
            interval.tick().await;
            match purge_store.purge_expired().await {
                Ok(0) => {}
                Ok(removed) => tracing::info!("Purged {} expired session rows", removed),
                Err(e) => tracing::warn!("Session purge failed: {}", e),
            }
        }
    });

    let auth_api = AuthApi::new(app_data.auth_service.clone());
    let users_api = UsersApi::new(
        app_data.auth_service.clone(),
        app_data.user_service.clone(),
    );

    // Create OpenAPI service with API implementations
    let api_service = OpenApiService::new(
        (HealthApi, auth_api, users_api),
        "Kantin Backend API",
        env!("CARGO_PKG_VERSION"),
    )
    .server(format!("http://{}/api", settings.bind_addr));

    // Generate Swagger UI from OpenAPI service
    let ui = api_service.swagger_ui();

    // Compose routes: nest API service under /api and Swagger UI under /swagger
    let app = Route::new()
        .nest("/api", api_service)
        .nest("/swagger", ui);

    tracing::info!("Starting server on http://{}", settings.bind_addr);
    tracing::info!("Swagger UI available at /swagger");

    Server::new(TcpListener::bind(settings.bind_addr.clone()))
        .run(app)
        .await
}
