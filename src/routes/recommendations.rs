use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::models::{
    ErrorResponse, HealthResponse, RankedListing, RecommendRequest, RecommendResponse,
    RecommendationStatus, UserPreference,
};
use crate::services::{Datasets, FilterOptions};
use crate::core::{Recommendation, Recommender};
use std::sync::Arc;

const NO_LISTINGS_MESSAGE: &str =
    "There are no rentals with the selected features. Please select other options and try again";
const UNRANKED_MESSAGE: &str =
    "None of the selected places is within walking distance of the matching rentals; showing them by price";
const NO_CRIME_DATA_MESSAGE: &str =
    "Zip codes were ranked, but none of the matching rentals has crime data for its neighborhood";

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub datasets: Arc<Datasets>,
    pub options: Arc<FilterOptions>,
    pub recommender: Recommender,
}

impl AppState {
    pub fn new(datasets: Datasets, recommender: Recommender) -> Self {
        let options = FilterOptions::from_datasets(&datasets);
        Self {
            datasets: Arc::new(datasets),
            options: Arc::new(options),
            recommender,
        }
    }
}

/// Configure all recommendation-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/options", web::get().to(filter_options))
        .route("/recommendations", web::post().to(recommend));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let datasets = &state.datasets;
    let status = if datasets.rentals.is_empty() || datasets.facilities.is_empty() {
        "degraded"
    } else {
        "healthy"
    };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        rentals: datasets.rentals.len(),
        facilities: datasets.facilities.len(),
        crime_counts: datasets.crime_counts.len(),
    })
}

/// Filter options endpoint
///
/// GET /api/v1/options
async fn filter_options(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.options.as_ref())
}

/// Recommendations endpoint
///
/// POST /api/v1/recommendations
///
/// Request body:
/// ```json
/// {
///   "price_min": 1500,
///   "price_max": 4000,
///   "zip_codes": ["10024", "10025"],
///   "rental_types": "1 Bed",
///   "laundry_code": 3,
///   "parking_code": 0,
///   "pet_code": 1,
///   "categories": ["Health care", "Transportation", "Libraries"]
/// }
/// ```
async fn recommend(
    state: web::Data<AppState>,
    req: web::Json<RecommendRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for recommendation request: {:?}", errors);
        return bad_request("Validation failed", errors.to_string());
    }

    let preferences = match UserPreference::try_from(req.into_inner()) {
        Ok(preferences) => preferences,
        Err(e) => {
            tracing::info!("Invalid preferences: {}", e);
            return bad_request("Invalid preferences", e.to_string());
        }
    };

    let request_id = uuid::Uuid::new_v4().to_string();
    let span = tracing::info_span!("recommend", request_id = %request_id);
    let _guard = span.enter();

    tracing::info!(
        "Generating recommendations for categories {:?}",
        preferences.category_rank.categories()
    );

    let datasets = &state.datasets;
    let result = state.recommender.recommend(
        &preferences,
        &datasets.rentals,
        &datasets.facilities,
        &datasets.crime_counts,
    );

    let (status, message, zip_order, listings, nearby_facilities) = match result.recommendation {
        Recommendation::NoListings => (
            RecommendationStatus::NoListings,
            Some(NO_LISTINGS_MESSAGE.to_string()),
            vec![],
            vec![],
            vec![],
        ),
        Recommendation::Unranked { listings } => (
            RecommendationStatus::Unranked,
            Some(UNRANKED_MESSAGE.to_string()),
            vec![],
            listings
                .into_iter()
                .map(|rental| RankedListing {
                    rental,
                    zip_rank: None,
                    crime_count: None,
                })
                .collect(),
            vec![],
        ),
        Recommendation::Ranked {
            zip_order,
            listings,
            nearby_facilities,
        } => (
            RecommendationStatus::Ranked,
            listings.is_empty().then(|| NO_CRIME_DATA_MESSAGE.to_string()),
            zip_order,
            listings,
            nearby_facilities,
        ),
    };

    HttpResponse::Ok().json(RecommendResponse {
        request_id,
        status,
        message,
        total_listings: result.total_listings,
        matched_listings: result.matched_listings,
        best_zip_code: zip_order.first().cloned(),
        zip_order,
        listings,
        nearby_facilities,
        generated_at: chrono::Utc::now(),
    })
}

fn bad_request(error: &str, message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: 400,
    })
}
