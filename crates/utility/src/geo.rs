pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// WGS84 semi-major axis, used for the area approximation.
pub const EQUATORIAL_RADIUS_M: f64 = 6378137.0;

/// Anything that has a latitude and a longitude in degrees.
pub trait Coordinate {
    fn lat(&self) -> f64;
    fn lng(&self) -> f64;
}

impl<C: Coordinate + ?Sized> Coordinate for &C {
    fn lat(&self) -> f64 {
        (**self).lat()
    }

    fn lng(&self) -> f64 {
        (**self).lng()
    }
}

fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

pub fn haversine_distance(
    latitude_1: f64,
    longitude_1: f64,
    latitude_2: f64,
    longitude_2: f64,
) -> f64 {
    let lat1_rad = to_radians(latitude_1);
    let lat2_rad = to_radians(latitude_2);

    let dlat = to_radians(latitude_2 - latitude_1);
    let dlon = to_radians(longitude_2 - longitude_1);

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Great-circle distance in meters on a spherical earth.
pub fn great_circle_distance_meters<A, B>(a: A, b: B) -> f64
where
    A: Coordinate,
    B: Coordinate,
{
    haversine_distance(a.lat(), a.lng(), b.lat(), b.lng()) * 1000.0
}

/// Length of the path through `points` in order. Zero for less than two points.
pub fn polyline_length_meters<C: Coordinate>(points: &[C]) -> f64 {
    points
        .windows(2)
        .map(|pair| great_circle_distance_meters(&pair[0], &pair[1]))
        .sum()
}

/// Area enclosed by `points` in square meters. The ring is closed implicitly
/// and the winding direction does not matter. Zero for less than three points.
///
/// Self-intersecting rings give no meaningful result.
pub fn polygon_area_square_meters<C: Coordinate>(points: &[C]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }

    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        let lat_i = to_radians(points[i].lat());
        let lat_j = to_radians(points[j].lat());
        let dlng = to_radians(points[j].lng()) - to_radians(points[i].lng());
        sum += dlng * (2.0 + lat_i.sin() + lat_j.sin());
    }

    sum.abs() * EQUATORIAL_RADIUS_M * EQUATORIAL_RADIUS_M / 2.0
}
