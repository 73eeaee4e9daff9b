//! Empreinte blake3 d'une géométrie référencée
//!
//! Les anneaux de polygones sont normalisés (départ au plus petit sommet)
//! pour que deux écritures du même polygone aient la même empreinte.

use std::cmp::Ordering;

use blake3::Hasher;
use geo::{Coord, Geometry, LineString, Polygon};

use crate::Sr;

/// Arrondi des coordonnées avant hachage (1e-9 unité)
const COORD_SCALE: f64 = 1_000_000_000.0;

pub(crate) fn geometry_hash(sr: &Sr, geom: &Geometry) -> [u8; 32] {
    let mut hasher = Hasher::new();
    hasher.update(sr.authority.as_bytes());
    hasher.update(&sr.identifier.to_le_bytes());
    hash_geometry(&mut hasher, geom);
    *hasher.finalize().as_bytes()
}

fn hash_geometry(hasher: &mut Hasher, geom: &Geometry) {
    match geom {
        Geometry::Point(p) => {
            hasher.update(b"POINT");
            hash_coord(hasher, p.0);
        }
        Geometry::Line(line) => {
            hasher.update(b"LINESTRING");
            hash_coord(hasher, line.start);
            hash_coord(hasher, line.end);
        }
        Geometry::LineString(ls) => {
            hasher.update(b"LINESTRING");
            hash_line(hasher, ls);
        }
        Geometry::Polygon(p) => {
            hasher.update(b"POLYGON");
            hash_polygon(hasher, p);
        }
        Geometry::MultiPoint(mp) => {
            hasher.update(b"MULTIPOINT");
            for point in mp.iter() {
                hash_coord(hasher, point.0);
            }
        }
        Geometry::MultiLineString(mls) => {
            hasher.update(b"MULTILINESTRING");
            for ls in mls.iter() {
                hasher.update(b"LS");
                hash_line(hasher, ls);
            }
        }
        Geometry::MultiPolygon(mp) => {
            hasher.update(b"MULTIPOLYGON");
            for poly in mp.iter() {
                hasher.update(b"POLY");
                hash_polygon(hasher, poly);
            }
        }
        Geometry::GeometryCollection(gc) => {
            hasher.update(b"COLLECTION");
            hasher.update(&(gc.len() as u64).to_le_bytes());
            for g in gc.iter() {
                hash_geometry(hasher, g);
            }
        }
        Geometry::Rect(rect) => {
            hasher.update(b"POLYGON");
            hash_polygon(hasher, &rect.to_polygon());
        }
        Geometry::Triangle(tri) => {
            hasher.update(b"POLYGON");
            hash_polygon(hasher, &tri.to_polygon());
        }
    }
}

fn hash_line(hasher: &mut Hasher, ls: &LineString) {
    for coord in ls.0.iter() {
        hash_coord(hasher, *coord);
    }
}

fn hash_polygon(hasher: &mut Hasher, poly: &Polygon) {
    hasher.update(b"EXT");
    hash_ring_normalized(hasher, poly.exterior());
    for interior in poly.interiors() {
        hasher.update(b"INT");
        hash_ring_normalized(hasher, interior);
    }
}

/// Hash un anneau en commençant au sommet lexicographiquement le plus petit
fn hash_ring_normalized(hasher: &mut Hasher, ring: &LineString) {
    // Le point de fermeture répète le premier
    let len = if ring.0.len() > 1 && ring.0.first() == ring.0.last() {
        ring.0.len() - 1
    } else {
        ring.0.len()
    };
    if len == 0 {
        return;
    }

    let min_idx = (0..len)
        .min_by(|&a, &b| {
            let (ca, cb) = (&ring.0[a], &ring.0[b]);
            ca.x.partial_cmp(&cb.x)
                .unwrap_or(Ordering::Equal)
                .then_with(|| ca.y.partial_cmp(&cb.y).unwrap_or(Ordering::Equal))
        })
        .unwrap_or(0);

    for i in 0..len {
        hash_coord(hasher, ring.0[(min_idx + i) % len]);
    }
}

fn hash_coord(hasher: &mut Hasher, coord: Coord) {
    let x = (coord.x * COORD_SCALE).round() as i64;
    let y = (coord.y * COORD_SCALE).round() as i64;
    hasher.update(&x.to_le_bytes());
    hasher.update(&y.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WGS_84;
    use geo::{point, polygon, Rect};

    #[test]
    fn test_same_geometry_same_hash() {
        let p1: Geometry = point!(x: 1.0, y: 2.0).into();
        let p2: Geometry = point!(x: 1.0, y: 2.0).into();
        assert_eq!(geometry_hash(&WGS_84, &p1), geometry_hash(&WGS_84, &p2));
    }

    #[test]
    fn test_reference_changes_hash() {
        let p: Geometry = point!(x: 1.0, y: 2.0).into();
        assert_ne!(
            geometry_hash(&WGS_84, &p),
            geometry_hash(&Sr::epsg(32615), &p)
        );
        assert_ne!(
            geometry_hash(&WGS_84, &p),
            geometry_hash(&Sr::new(4326, "esri"), &p)
        );
    }

    #[test]
    fn test_ring_rotation_same_hash() {
        let a: Geometry = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0)].into();
        let b: Geometry = polygon![(x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 0.0)].into();
        assert_eq!(geometry_hash(&WGS_84, &a), geometry_hash(&WGS_84, &b));
    }

    #[test]
    fn test_rect_hashes_like_polygon() {
        let rect: Geometry = Rect::new((0.0, 0.0), (1.0, 1.0)).into();
        let poly: Geometry = Rect::new((0.0, 0.0), (1.0, 1.0)).to_polygon().into();
        assert_eq!(geometry_hash(&WGS_84, &rect), geometry_hash(&WGS_84, &poly));
    }

    #[test]
    fn test_sub_nanometric_noise_ignored() {
        let a: Geometry = point!(x: 500000.0, y: 4982950.4).into();
        let b: Geometry = point!(x: 500000.0 + 1e-11, y: 4982950.4).into();
        let c: Geometry = point!(x: 500000.001, y: 4982950.4).into();
        let sr = Sr::epsg(32615);
        assert_eq!(geometry_hash(&sr, &a), geometry_hash(&sr, &b));
        assert_ne!(geometry_hash(&sr, &a), geometry_hash(&sr, &c));
    }
}
