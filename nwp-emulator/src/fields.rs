use extreme_events::error::PluginError;
use extreme_events::host::FunctionSpace;
use extreme_events::geometry::primitives::LonLat;
use ndarray::Array2;
use rand::Rng;
use rand::rngs::SmallRng;

/// Background wind speed in m/s; the demo anomalies are painted over it.
pub const BACKGROUND_WIND: f64 = 10.0;

/// Wind speed inside the scripted storm disk.
pub const STORM_WIND: f64 = 30.0;

/// Angular radius of the scripted anomaly disks, degrees. Wide enough to
/// cover whole HEALPix cells at the demo resolution.
const DISK_RADIUS_DEG: f64 = 20.0;

/// Regular global lon/lat grid with no halo: the emulator runs unpartitioned,
/// so every point is owned.
pub fn regular_grid(
    lon_points: usize,
    lat_points: usize,
    levels: usize,
) -> Result<FunctionSpace, PluginError> {
    let n = lon_points * lat_points;
    let mut lonlat = Array2::zeros((n, 2));
    for j in 0..lat_points {
        for i in 0..lon_points {
            let idx = j * lon_points + i;
            lonlat[[idx, 0]] = 360.0 * i as f64 / lon_points as f64;
            lonlat[[idx, 1]] = -90.0 + 180.0 * (j as f64 + 0.5) / lat_points as f64;
        }
    }
    FunctionSpace::new(lonlat, vec![false; n], levels)
}

/// Smooth large-scale flow pattern in [-1, 1], varying with the normalized
/// vertical coordinate `t`.
pub fn swirl(lon_deg: f64, lat_deg: f64, t: f64) -> f64 {
    let lon = lon_deg.to_radians();
    let lat = lat_deg.to_radians();
    (2.0 * lon + std::f64::consts::PI * t).sin() * (3.0 * lat).cos() * lat.cos()
}

/// Fill a `[point, level]` field with the background flow plus jitter.
pub fn synthetic_field(fs: &FunctionSpace, levels: usize, rng: &mut SmallRng) -> Array2<f64> {
    let mut field = Array2::zeros((fs.len(), levels));
    for idx in 0..fs.len() {
        let point = fs.lonlat(idx);
        for level in 0..levels {
            let t = level as f64 / levels as f64;
            field[[idx, level]] = BACKGROUND_WIND
                + 5.0 * swirl(point.lon(), point.lat(), t)
                + rng.random_range(-0.5..0.5);
        }
    }
    field
}

/// Great-circle separation of two points, degrees.
pub fn angular_distance_deg(a: LonLat, b: LonLat) -> f64 {
    let ua = a.unit_vector();
    let ub = b.unit_vector();
    let dot = ua[0] * ub[0] + ua[1] * ub[1] + ua[2] * ub[2];
    dot.clamp(-1.0, 1.0).acos().to_degrees()
}

/// Scripted surface anomalies: a high-wind disk drifting slowly east along
/// 40°N and a calm disk drifting west across the southern mid-latitudes.
/// Everything else is reset to the steady background so detections over time
/// windows stay reproducible. Applies to the u component; the paired v
/// component is expected to be zeroed by the caller.
pub fn apply_demo_pattern(field: &mut Array2<f64>, fs: &FunctionSpace, step: i64) {
    let storm_center = LonLat((2.0 * step as f64).rem_euclid(360.0), 40.0);
    let calm_center = LonLat((270.0 - step as f64).rem_euclid(360.0), -25.0);
    for idx in 0..fs.len() {
        let point = fs.lonlat(idx);
        field[[idx, 0]] = if angular_distance_deg(point, storm_center) < DISK_RADIUS_DEG {
            STORM_WIND
        } else if angular_distance_deg(point, calm_center) < DISK_RADIUS_DEG {
            0.0
        } else {
            BACKGROUND_WIND
        };
    }
}
