use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Geographic point as (longitude, latitude) in degrees.
///
/// Equality and hashing are bit-level: two points compare equal only when
/// their coordinates are identical floats. Mesh vertices shared between
/// adjacent cells are stored once and referenced, so this is exactly the
/// equality the polygon extraction relies on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LonLat(pub f64, pub f64);

impl LonLat {
    pub fn lon(&self) -> f64 {
        self.0
    }

    pub fn lat(&self) -> f64 {
        self.1
    }

    /// Unit vector on the sphere; chord distance between unit vectors is
    /// monotone in great-circle distance, which makes it usable for
    /// nearest-neighbour queries.
    pub fn unit_vector(&self) -> [f64; 3] {
        let lon = self.0.to_radians();
        let lat = self.1.to_radians();
        [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
    }

    /// Total lexicographic order on the raw (lon, lat) values.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.0
            .total_cmp(&other.0)
            .then(self.1.total_cmp(&other.1))
    }
}

impl Eq for LonLat {}

impl Hash for LonLat {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
        self.1.to_bits().hash(state);
    }
}

impl From<(f64, f64)> for LonLat {
    fn from((lon, lat): (f64, f64)) -> Self {
        LonLat(lon, lat)
    }
}

impl From<LonLat> for (f64, f64) {
    fn from(p: LonLat) -> Self {
        (p.0, p.1)
    }
}

impl fmt::Display for LonLat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.0, self.1)
    }
}
