use geo::Point;
use crate::models::BoundingBox;

/// Earth's radius in kilometers
const EARTH_RADIUS_KM: f64 = 6373.0;

/// Kilometers to miles
const KM_TO_MILES: f64 = 0.621371;

/// Miles spanned by one degree of latitude on the sphere above
const MILES_PER_DEGREE: f64 = EARTH_RADIUS_KM * KM_TO_MILES * std::f64::consts::PI / 180.0;

/// Widening applied to bounding boxes so they never cut off a point inside the radius
const BOUNDING_BOX_MARGIN: f64 = 1.1;

/// Calculate the Haversine distance between two points in miles
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lon1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lon2` - Longitude of second point in degrees
///
/// # Returns
/// Distance in miles
#[inline]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c * KM_TO_MILES
}

/// Haversine distance in miles between two `(lon, lat)` points
#[inline]
pub fn distance_between(a: Point<f64>, b: Point<f64>) -> f64 {
    haversine_distance(a.y(), a.x(), b.y(), b.x())
}

/// Calculate a bounding box around a center point
///
/// Used to skip the exact distance for points that are clearly out of reach.
/// The box is widened slightly, so every point within `radius_miles` lies inside it.
/// Longitudes may run past ±180; [`is_within_bounding_box`] wraps them. A box
/// reaching a pole spans every longitude.
///
/// # Arguments
/// * `lat` - Center latitude in degrees
/// * `lon` - Center longitude in degrees
/// * `radius_miles` - Radius in miles
pub fn calculate_bounding_box(lat: f64, lon: f64, radius_miles: f64) -> BoundingBox {
    let lat_delta = radius_miles * BOUNDING_BOX_MARGIN / MILES_PER_DEGREE;

    // Degrees of longitude shrink with cos(latitude); take the widest edge of the box
    let edge_lat = lat.abs() + lat_delta;
    let lon_delta = if edge_lat >= 90.0 {
        180.0
    } else {
        (radius_miles * BOUNDING_BOX_MARGIN / (MILES_PER_DEGREE * edge_lat.to_radians().cos()))
            .min(180.0)
    };

    BoundingBox {
        min_lat: lat - lat_delta,
        max_lat: lat + lat_delta,
        min_lon: lon - lon_delta,
        max_lon: lon + lon_delta,
    }
}

/// Check if a point is within a bounding box
///
/// A box crossing the antimeridian also matches the point's longitude shifted by ±360.
#[inline]
pub fn is_within_bounding_box(
    lat: f64,
    lon: f64,
    bbox: &BoundingBox,
) -> bool {
    if lat < bbox.min_lat || lat > bbox.max_lat {
        return false;
    }

    let in_range = |lon: f64| lon >= bbox.min_lon && lon <= bbox.max_lon;
    in_range(lon)
        || (bbox.max_lon > 180.0 && in_range(lon + 360.0))
        || (bbox.min_lon < -180.0 && in_range(lon - 360.0))
}
