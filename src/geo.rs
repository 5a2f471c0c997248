use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Geographic points
// ---------------------------------------------------------------------------

/// A position in degrees. Longitude is east-positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub const fn new(lon: f64, lat: f64) -> Self {
        GeoPoint { lon, lat }
    }

    fn to_unit(self) -> [f64; 3] {
        let (lon, lat) = (self.lon.to_radians(), self.lat.to_radians());
        [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
    }

    fn from_unit(v: [f64; 3]) -> Self {
        let lat = v[2].clamp(-1.0, 1.0).asin().to_degrees();
        let lon = v[1].atan2(v[0]).to_degrees();
        GeoPoint { lon, lat }
    }
}

// ---------------------------------------------------------------------------
// Country lookup table
// ---------------------------------------------------------------------------

/// Approximate centroids for the countries in the built-in table.
const BUILTIN_COUNTRIES: &[(&str, f64, f64)] = &[
    ("Australia", 134.0, -25.0),
    ("Brazil", -53.0, -10.0),
    ("Canada", -106.0, 56.0),
    ("China", 104.0, 35.0),
    ("France", 2.0, 46.0),
    ("Germany", 10.0, 51.0),
    ("India", 79.0, 22.0),
    ("Japan", 138.0, 36.0),
    ("Mexico", -102.0, 23.0),
    ("South Korea", 128.0, 36.0),
    ("UK", -2.0, 54.0),
    ("USA", -98.0, 39.0),
];

/// Country identifier → coordinates.
///
/// Lookups are exact on the identifier; there is no fuzzy matching or
/// geocoding. Routes touching an unknown country cannot be plotted.
#[derive(Debug, Clone, Default)]
pub struct CountryLocator {
    table: BTreeMap<String, GeoPoint>,
}

impl CountryLocator {
    pub fn builtin() -> Self {
        let mut locator = CountryLocator::default();
        for &(name, lon, lat) in BUILTIN_COUNTRIES {
            locator.insert(name, GeoPoint::new(lon, lat));
        }
        locator
    }

    pub fn insert(&mut self, country: impl Into<String>, point: GeoPoint) {
        self.table.insert(country.into(), point);
    }

    pub fn resolve(&self, country: &str) -> Option<GeoPoint> {
        self.table.get(country).copied()
    }

    /// Both endpoints of a route, or `None` if either is unknown.
    pub fn resolve_pair(&self, origin: &str, destination: &str) -> Option<(GeoPoint, GeoPoint)> {
        Some((self.resolve(origin)?, self.resolve(destination)?))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, GeoPoint)> {
        self.table.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

// ---------------------------------------------------------------------------
// Great-circle arcs
// ---------------------------------------------------------------------------

/// Sample the shorter great-circle arc from `a` to `b` at `segments + 1`
/// points, both endpoints included.
///
/// Longitudes are unwrapped so consecutive points never jump by more than
/// 180°; an arc across the antimeridian therefore extends past ±180 instead
/// of being split. Identical endpoints give a degenerate two-point path.
pub fn great_circle_path(a: GeoPoint, b: GeoPoint, segments: usize) -> Vec<GeoPoint> {
    let segments = segments.max(1);
    let (ua, ub) = (a.to_unit(), b.to_unit());
    let d = dot(ua, ub).clamp(-1.0, 1.0);

    // Nearly identical or antipodal points have no stable interpolation plane.
    if d > 0.999_999 || d < -0.999_999 {
        return vec![a, b];
    }

    let omega = d.acos();
    let sin_omega = omega.sin();

    let mut out = Vec::with_capacity(segments + 1);
    out.push(a);
    for i in 1..segments {
        let t = i as f64 / segments as f64;
        let s0 = ((1.0 - t) * omega).sin() / sin_omega;
        let s1 = (t * omega).sin() / sin_omega;
        let v = [
            ua[0] * s0 + ub[0] * s1,
            ua[1] * s0 + ub[1] * s1,
            ua[2] * s0 + ub[2] * s1,
        ];
        out.push(GeoPoint::from_unit(v));
    }
    out.push(b);

    unwrap_longitudes(&mut out);
    out
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn unwrap_longitudes(points: &mut [GeoPoint]) {
    for i in 1..points.len() {
        let prev = points[i - 1].lon;
        let mut lon = points[i].lon;
        while lon - prev > 180.0 {
            lon -= 360.0;
        }
        while prev - lon > 180.0 {
            lon += 360.0;
        }
        points[i].lon = lon;
    }
}
