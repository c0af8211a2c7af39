use geo::{Distance, Haversine, Point};
use rstar::AABB;

use crate::osm::Loc;

/// Mean earth radius used by `geo`'s haversine metric, so that the
/// degree/meter conversions below agree with `spherical_distance`.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Great-circle distance in meters between two (lon, lat) locations.
pub fn spherical_distance(a: Loc, b: Loc) -> f64 {
    Haversine.distance(Point::new(a[0], a[1]), Point::new(b[0], b[1]))
}

/// Degrees of latitude spanned by `meters` along a meridian.
pub fn meters_to_lat(meters: f64) -> f64 {
    (meters / EARTH_RADIUS_M).to_degrees()
}

/// Degrees of longitude spanned by `meters` along the parallel at `at_lat`.
/// Zero at the poles, where longitude stops meaning anything.
pub fn meters_to_lon(meters: f64, at_lat: f64) -> f64 {
    if at_lat.abs() >= 90.0 {
        return 0.0;
    }
    let parallel_radius = EARTH_RADIUS_M * at_lat.to_radians().cos().abs();
    (meters / parallel_radius).to_degrees()
}

/// Axis aligned bounding box in (lon, lat) degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min: Loc,
    pub max: Loc,
}

impl Extent {
    pub fn new(min: Loc, max: Loc) -> Self {
        Self { min, max }
    }

    /// Box of `meters` total width and height centered on `center`.
    pub fn around(center: Loc, meters: f64) -> Self {
        let lon_range = meters_to_lon(meters, center[1]) / 2.0;
        let lat_range = meters_to_lat(meters) / 2.0;
        Self {
            min: [center[0] - lon_range, center[1] - lat_range],
            max: [center[0] + lon_range, center[1] + lat_range],
        }
    }

    pub fn from_locs(locs: impl IntoIterator<Item = Loc>) -> Option<Self> {
        let mut locs = locs.into_iter();
        let first = locs.next()?;
        let (mut min, mut max) = (first, first);
        for [lon, lat] in locs {
            min[0] = min[0].min(lon);
            min[1] = min[1].min(lat);
            max[0] = max[0].max(lon);
            max[1] = max[1].max(lat);
        }
        Some(Self { min, max })
    }

    /// Great-circle length of the box diagonal.
    pub fn diagonal_m(&self) -> f64 {
        spherical_distance(self.min, self.max)
    }

    pub fn contains(&self, loc: Loc) -> bool {
        loc[0] >= self.min[0] && loc[0] <= self.max[0] && loc[1] >= self.min[1] && loc[1] <= self.max[1]
    }

    pub fn to_aabb(&self) -> AABB<[f64; 2]> {
        AABB::from_corners(self.min, self.max)
    }
}
