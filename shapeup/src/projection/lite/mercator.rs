//! Projection Web Mercator (EPSG:3857)
//!
//! Aussi connu sous le nom de Pseudo-Mercator ou Spherical Mercator.

use super::ellipsoid::WGS84;
use super::Geographic;

/// Latitude maximale représentable (au-delà, y tend vers l'infini)
const MAX_LAT_DEG: f64 = 85.051_128_779_806_59;

/// Convertit coordonnées géographiques vers Web Mercator
pub fn geographic_to_web_mercator(geo: Geographic) -> (f64, f64) {
    // Modèle sphérique avec le rayon équatorial
    let r = WGS84::A;

    let lat = geo
        .lat
        .clamp(-MAX_LAT_DEG.to_radians(), MAX_LAT_DEG.to_radians());

    let x = r * geo.lon;
    let y = r * (std::f64::consts::FRAC_PI_4 + lat / 2.0).tan().ln();

    (x, y)
}

/// Convertit Web Mercator vers coordonnées géographiques
pub fn web_mercator_to_geographic(x: f64, y: f64) -> Geographic {
    let r = WGS84::A;

    let lon = x / r;
    let lat = 2.0 * (y / r).exp().atan() - std::f64::consts::FRAC_PI_2;

    Geographic::new(lon, lat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paris_to_web_mercator() {
        // Paris: 2.35°E, 48.85°N
        let geo = Geographic::from_degrees(2.35, 48.85);
        let (x, y) = geographic_to_web_mercator(geo);

        assert!((x - 261600.0).abs() < 1000.0, "x={}", x);
        assert!((y - 6250000.0).abs() < 10000.0, "y={}", y);
    }

    #[test]
    fn test_roundtrip() {
        let geo = Geographic::from_degrees(-94.14, 45.55);
        let (x, y) = geographic_to_web_mercator(geo);
        let (lon, lat) = web_mercator_to_geographic(x, y).to_degrees();

        assert!((lon - (-94.14)).abs() < 1e-9, "lon={}", lon);
        assert!((lat - 45.55).abs() < 1e-9, "lat={}", lat);
    }

    #[test]
    fn test_pole_is_clamped() {
        let (_, y) = geographic_to_web_mercator(Geographic::from_degrees(0.0, 90.0));
        assert!(y.is_finite());
        assert!((y - 20037508.34).abs() < 1.0, "y={}", y);
    }
}
