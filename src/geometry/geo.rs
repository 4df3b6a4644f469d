// geometry/geo.rs

// Geodetic locations and the small-area planar math used by the decomposition:
// translation by a local north/east/down offset, the inverse offset query, and
// rotation of a location about a pivot.

// Dependencies
use nalgebra::{Rotation2, Vector2, Vector3};
use serde::{Deserialize, Serialize};

/// WGS-84 semi-major axis (meters)
const WGS84_A: f64 = 6_378_137.0;
/// WGS-84 flattening
const WGS84_F: f64 = 1.0 / 298.257_223_563;

/// Geodetic location: latitude/longitude in degrees plus a depth offset in
/// meters (positive down, negative for altitude).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude (degrees)
    pub latitude: f64,
    /// Longitude (degrees)
    pub longitude: f64,
    /// Depth (meters, positive down)
    #[serde(default)]
    pub depth: f64,
}

impl Location {
    /// Creates a surface location
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Location {
            latitude,
            longitude,
            depth: 0.0,
        }
    }

    /// Latitude in radians
    pub fn latitude_rads(&self) -> f64 {
        self.latitude.to_radians()
    }

    /// Longitude in radians
    pub fn longitude_rads(&self) -> f64 {
        self.longitude.to_radians()
    }

    /// Returns the location reached by moving `north`, `east` and `down`
    /// meters from this one, using the local tangent plane at this location.
    pub fn translated(&self, north: f64, east: f64, down: f64) -> Location {
        let lat = self.latitude_rads();
        let (meridian, prime_vertical) = earth_radii(lat);

        Location {
            latitude: self.latitude + (north / meridian).to_degrees(),
            longitude: self.longitude + (east / (prime_vertical * lat.cos())).to_degrees(),
            depth: self.depth + down,
        }
    }

    /// North/east/down offset (meters) of this location relative to `origin`,
    /// expressed in the tangent plane at `origin`. Inverse of
    /// [`Location::translated`] when called on the same origin.
    pub fn offset_from(&self, origin: &Location) -> Vector3<f64> {
        let lat0 = origin.latitude_rads();
        let (meridian, prime_vertical) = earth_radii(lat0);

        let north = (self.latitude - origin.latitude).to_radians() * meridian;
        let east = (self.longitude - origin.longitude).to_radians() * prime_vertical * lat0.cos();

        Vector3::new(north, east, self.depth - origin.depth)
    }

    /// Horizontal distance (meters) to another location
    pub fn distance_to(&self, other: &Location) -> f64 {
        let offset = other.offset_from(self);
        offset.xy().norm()
    }

    /// Rotates this location by `yaw` radians (counter-clockwise) about `pivot`.
    ///
    /// The latitude/longitude differences to the pivot, in radians, are
    /// treated as planar x/y coordinates and rotated with the standard 2-D
    /// rotation matrix. This is a planar approximation: it skews shapes as
    /// latitude grows and is only meaningful for areas a few kilometers wide.
    pub fn rotate_around(&self, pivot: &Location, yaw: f64) -> Location {
        let shift = Vector2::new(
            self.longitude_rads() - pivot.longitude_rads(),
            self.latitude_rads() - pivot.latitude_rads(),
        );
        let rotated = Rotation2::new(yaw) * shift;

        Location {
            latitude: (pivot.latitude_rads() + rotated.y).to_degrees(),
            longitude: (pivot.longitude_rads() + rotated.x).to_degrees(),
            depth: self.depth,
        }
    }
}

/// Translates `point` by a north/east/down offset in meters
pub fn translate(point: &Location, north: f64, east: f64, down: f64) -> Location {
    point.translated(north, east, down)
}

/// Rotates `point` about `pivot` by `yaw` radians (planar approximation)
pub fn rotate_around(point: &Location, pivot: &Location, yaw: f64) -> Location {
    point.rotate_around(pivot, yaw)
}

/// Arithmetic mean of a set of locations, `None` when empty
pub fn centroid(locations: &[Location]) -> Option<Location> {
    if locations.is_empty() {
        return None;
    }

    let n = locations.len() as f64;
    let (lat, lon, depth) = locations.iter().fold((0.0, 0.0, 0.0), |acc, l| {
        (acc.0 + l.latitude, acc.1 + l.longitude, acc.2 + l.depth)
    });

    Some(Location {
        latitude: lat / n,
        longitude: lon / n,
        depth: depth / n,
    })
}

/// Meridian and prime-vertical radii of curvature at `lat` (radians)
fn earth_radii(lat: f64) -> (f64, f64) {
    let e2 = WGS84_F * (2.0 - WGS84_F);
    let s = 1.0 - e2 * lat.sin().powi(2);
    let prime_vertical = WGS84_A / s.sqrt();
    let meridian = WGS84_A * (1.0 - e2) / s.powf(1.5);
    (meridian, prime_vertical)
}
