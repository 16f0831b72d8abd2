//! Spherical Web Mercator (EPSG:3857) between degrees and planar meters

use crate::error::PlanError;
use crate::spatial::Point2D;

pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Latitude limit of the square Web Mercator extent.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

pub fn project(longitude: f64, latitude: f64) -> Result<Point2D, PlanError> {
    if !longitude.is_finite() || !latitude.is_finite() {
        return Err(PlanError::invalid(format!(
            "non-finite coordinate ({longitude}, {latitude})"
        )));
    }
    if latitude.abs() > MAX_LATITUDE {
        return Err(PlanError::invalid(format!(
            "latitude {latitude} is outside the Web Mercator range"
        )));
    }
    let x = EARTH_RADIUS_M * longitude.to_radians();
    let y = EARTH_RADIUS_M * (std::f64::consts::FRAC_PI_4 + latitude.to_radians() / 2.0).tan().ln();
    Ok(Point2D::new(x, y))
}

/// Inverse of [`project`], returning `(longitude, latitude)` in degrees.
pub fn unproject(point: Point2D) -> (f64, f64) {
    let longitude = (point.x / EARTH_RADIUS_M).to_degrees();
    let latitude = (2.0 * (point.y / EARTH_RADIUS_M).exp().atan() - std::f64::consts::FRAC_PI_2)
        .to_degrees();
    (longitude, latitude)
}
