use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use rental_rank::config::Settings;
use rental_rank::core::Recommender;
use rental_rank::models::RankingConfig;
use rental_rank::routes::{self, recommendations::AppState};
use rental_rank::services::Datasets;
use tracing::{info, error};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e));
        }
    };

    // Initialize logging (LOG_LEVEL / LOG_FORMAT override the config file)
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }

    info!("Starting rental recommendation service...");

    // Load reference data once; it is never mutated afterwards
    let data_settings = settings.data.clone();
    let datasets = tokio::task::spawn_blocking(move || Datasets::load(&data_settings))
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?
        .map_err(|e| {
            error!("Failed to load datasets: {}", e);
            std::io::Error::new(std::io::ErrorKind::InvalidData, e)
        })?;

    info!(
        "Datasets loaded ({} rentals, {} facilities, {} crime clusters)",
        datasets.rentals.len(),
        datasets.facilities.len(),
        datasets.crime_counts.len()
    );

    let ranking = RankingConfig::from(&settings.ranking);
    let recommender = Recommender::new(ranking);

    info!("Recommender initialized with config: {:?}", ranking);

    let app_state = AppState::new(datasets, recommender);

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(2);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
