//! Projection UTM (Universal Transverse Mercator) sur l'ellipsoïde WGS84
//!
//! Séries de Snyder, précision sub-millimétrique dans le fuseau.

use std::f64::consts::PI;

use super::ellipsoid::WGS84;
use super::Geographic;
use crate::utm::UtmZone;

/// Facteur d'échelle
const K0: f64 = 0.9996;
/// False easting
const X0: f64 = 500000.0;
/// False northing de l'hémisphère sud
const Y0_SOUTH: f64 = 10000000.0;

fn false_northing(zone: UtmZone) -> f64 {
    if zone.south {
        Y0_SOUTH
    } else {
        0.0
    }
}

/// Convertit coordonnées géographiques WGS84 vers UTM
pub fn geographic_to_utm(geo: Geographic, zone: UtmZone) -> (f64, f64) {
    let a = WGS84::A;
    let e2 = WGS84::E2;
    let e4 = e2 * e2;
    let e6 = e4 * e2;
    let ep2 = WGS84::EP2;

    let lon0 = zone.central_meridian().to_radians();
    let lat = geo.lat;

    // Écart au méridien central ramené dans [-π, π] (fuseaux 1 et 60)
    let dlon = (geo.lon - lon0 + PI).rem_euclid(2.0 * PI) - PI;

    let sin_lat = lat.sin();
    let cos_lat = lat.cos();
    let tan_lat = lat.tan();

    let n = a / (1.0 - e2 * sin_lat.powi(2)).sqrt();
    let t = tan_lat.powi(2);
    let c = ep2 * cos_lat.powi(2);
    let aa = dlon * cos_lat;

    // Longueur de l'arc de méridien
    let m = a
        * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * lat
            - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * lat).sin()
            + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * lat).sin()
            - (35.0 * e6 / 3072.0) * (6.0 * lat).sin());

    let x = K0
        * n
        * (aa
            + (1.0 - t + c) * aa.powi(3) / 6.0
            + (5.0 - 18.0 * t + t.powi(2) + 72.0 * c - 58.0 * ep2) * aa.powi(5) / 120.0)
        + X0;

    let y = K0
        * (m + n
            * tan_lat
            * (aa.powi(2) / 2.0
                + (5.0 - t + 9.0 * c + 4.0 * c.powi(2)) * aa.powi(4) / 24.0
                + (61.0 - 58.0 * t + t.powi(2) + 600.0 * c - 330.0 * ep2) * aa.powi(6) / 720.0))
        + false_northing(zone);

    (x, y)
}

/// Convertit UTM vers coordonnées géographiques WGS84
pub fn utm_to_geographic(x: f64, y: f64, zone: UtmZone) -> Geographic {
    let a = WGS84::A;
    let e2 = WGS84::E2;
    let ep2 = WGS84::EP2;

    let lon0 = zone.central_meridian().to_radians();

    // Coordonnées réduites
    let x = x - X0;
    let y = y - false_northing(zone);

    // Latitude du pied de la perpendiculaire
    let m = y / K0;
    let mu = m / (a * (1.0 - e2 / 4.0 - 3.0 * e2.powi(2) / 64.0 - 5.0 * e2.powi(3) / 256.0));

    let e1 = (1.0 - (1.0 - e2).sqrt()) / (1.0 + (1.0 - e2).sqrt());

    let phi1 = mu
        + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
        + (21.0 * e1.powi(2) / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
        + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
        + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

    let sin_phi1 = phi1.sin();
    let cos_phi1 = phi1.cos();
    let tan_phi1 = phi1.tan();

    let n1 = a / (1.0 - e2 * sin_phi1.powi(2)).sqrt();
    let t1 = tan_phi1.powi(2);
    let c1 = ep2 * cos_phi1.powi(2);
    let r1 = a * (1.0 - e2) / (1.0 - e2 * sin_phi1.powi(2)).powf(1.5);
    let d = x / (n1 * K0);

    let lat = phi1
        - (n1 * tan_phi1 / r1)
            * (d.powi(2) / 2.0
                - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1.powi(2) - 9.0 * ep2) * d.powi(4) / 24.0
                + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1.powi(2) - 252.0 * ep2 - 3.0 * c1.powi(2))
                    * d.powi(6)
                    / 720.0);

    let lon = lon0
        + (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
            + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1.powi(2) + 8.0 * ep2 + 24.0 * t1.powi(2))
                * d.powi(5)
                / 120.0)
            / cos_phi1;

    Geographic::new(lon, lat)
}
