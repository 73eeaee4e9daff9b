//! Formats d'échange : mapping GeoJSON, export JSON, WKT et EWKB
//!
//! Forme de l'export :
//! ```json
//! {
//!   "type": "shapeup::geometry::SrPoint",
//!   "baseGeometry": { "type": "Point", "coordinates": [-94.14243, 45.55367] },
//!   "sr": { "identifier": 4326, "authority": "epsg" }
//! }
//! ```

use geo::Geometry;
use geozero::{CoordDimensions, ToWkb, ToWkt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

use super::{GeometryKind, SrGeometry};
use crate::{Sr, SrError};

/// Enregistrement JSON d'une `SrGeometry`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRecord {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_tag: Option<String>,
    #[serde(rename = "baseGeometry")]
    pub base_geometry: geojson::Geometry,
    pub sr: Sr,
}

impl From<&SrGeometry> for ExportRecord {
    fn from(geom: &SrGeometry) -> Self {
        Self {
            type_tag: Some(geom.kind.tag().to_string()),
            base_geometry: geom.mapping(),
            sr: geom.sr.clone(),
        }
    }
}

impl From<SrGeometry> for ExportRecord {
    fn from(geom: SrGeometry) -> Self {
        Self::from(&geom)
    }
}

impl TryFrom<ExportRecord> for SrGeometry {
    type Error = SrError;

    fn try_from(record: ExportRecord) -> Result<Self, SrError> {
        // Étiquette absente ou inconnue : géométrie générique
        let kind = record
            .type_tag
            .as_deref()
            .and_then(GeometryKind::from_tag)
            .unwrap_or_default();

        let base = Geometry::<f64>::try_from(record.base_geometry.value)
            .map_err(|e| SrError::load(format!("baseGeometry: {e}")))?;

        SrGeometry::with_kind(kind, base, record.sr)
    }
}

impl SrGeometry {
    /// Représentation GeoJSON de la géométrie (sans la référence)
    pub fn mapping(&self) -> geojson::Geometry {
        geojson::Geometry::new(geojson::Value::from(&self.base))
    }

    /// Export JSON : type, géométrie GeoJSON et référence spatiale
    pub fn export(&self) -> Result<Value, SrError> {
        Ok(serde_json::to_value(ExportRecord::from(self))?)
    }

    /// Charge une géométrie exportée
    ///
    /// `null` ou un objet vide donnent `None`. Un enregistrement incomplet ou
    /// incohérent échoue avec `SrError::Load`.
    pub fn load(data: &Value) -> Result<Option<Self>, SrError> {
        match data {
            Value::Null => return Ok(None),
            Value::Object(map) if map.is_empty() => return Ok(None),
            _ => {}
        }

        let record = ExportRecord::deserialize(data).map_err(|e| SrError::load(e.to_string()))?;
        trace!(tag = ?record.type_tag, sr = %record.sr, "Loading geometry");
        Self::try_from(record).map(Some)
    }

    /// WKT de la géométrie (sans SRID)
    pub fn to_wkt(&self) -> Result<String, SrError> {
        Ok(self.base.to_wkt()?)
    }

    /// EWKB (PostGIS) 2D, SRID inclus
    pub fn to_ewkb(&self) -> Result<Vec<u8>, SrError> {
        let srid = i32::try_from(self.sr.identifier).ok();
        Ok(self.base.to_ewkb(CoordDimensions::xy(), srid)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WGS_84;
    use geo::{line_string, polygon};
    use serde_json::json;

    #[test]
    fn test_export_shape() {
        let p = SrGeometry::from_lat_lon(45.55367, -94.14243);
        let exported = p.export().unwrap();

        assert_eq!(exported["type"], "shapeup::geometry::SrPoint");
        assert_eq!(exported["baseGeometry"]["type"], "Point");
        assert_eq!(
            exported["baseGeometry"]["coordinates"],
            json!([-94.14243, 45.55367])
        );
        assert_eq!(exported["sr"], json!({ "identifier": 4326, "authority": "epsg" }));
    }

    #[test]
    fn test_load_round_trip() {
        let line = SrGeometry::polyline(
            line_string![(x: 500000.0, y: 4980000.0), (x: 501000.0, y: 4981000.0)],
            Sr::epsg(32615),
        );
        let loaded = SrGeometry::load(&line.export().unwrap()).unwrap().unwrap();
        assert_eq!(loaded, line);
        assert_eq!(loaded.kind(), GeometryKind::Polyline);
        assert_eq!(loaded.base_geometry(), line.base_geometry());
    }

    #[test]
    fn test_load_empty() {
        assert!(SrGeometry::load(&Value::Null).unwrap().is_none());
        assert!(SrGeometry::load(&json!({})).unwrap().is_none());
    }

    #[test]
    fn test_load_missing_fields() {
        let err = SrGeometry::load(&json!({ "type": "shapeup::geometry::SrPoint" })).unwrap_err();
        assert!(matches!(err, SrError::Load(_)));

        let err = SrGeometry::load(&json!({
            "baseGeometry": { "type": "Point", "coordinates": [1.0, 2.0] }
        }))
        .unwrap_err();
        assert!(matches!(err, SrError::Load(_)));
    }

    #[test]
    fn test_load_without_tag_is_generic() {
        let g = SrGeometry::load(&json!({
            "baseGeometry": { "type": "Point", "coordinates": [1.0, 2.0] },
            "sr": { "identifier": 4326, "authority": "epsg" }
        }))
        .unwrap()
        .unwrap();
        assert_eq!(g.kind(), GeometryKind::Generic);
        assert_eq!(g.sr(), &WGS_84);
    }

    #[test]
    fn test_load_kind_mismatch() {
        let err = SrGeometry::load(&json!({
            "type": "shapeup::geometry::SrPoint",
            "baseGeometry": { "type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]] },
            "sr": { "identifier": 4326, "authority": "epsg" }
        }))
        .unwrap_err();
        assert!(matches!(err, SrError::Load(_)));
    }

    #[test]
    fn test_serde_goes_through_record() {
        let poly = SrGeometry::polygon(
            polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0)],
            WGS_84,
        );
        let text = serde_json::to_string(&poly).unwrap();
        assert!(text.contains("\"baseGeometry\""));
        let back: SrGeometry = serde_json::from_str(&text).unwrap();
        assert_eq!(back, poly);
        assert_eq!(back.kind(), GeometryKind::Polygon);
    }

    #[test]
    fn test_wkt() {
        let p = SrGeometry::from_coords(1.5, 2.0, Sr::epsg(32615));
        assert_eq!(p.to_wkt().unwrap(), "POINT(1.5 2)");
    }

    #[test]
    fn test_ewkb_carries_srid() {
        let p = SrGeometry::from_coords(1.0, 2.0, Sr::epsg(32615));
        let ewkb = p.to_ewkb().unwrap();
        // Ordre little-endian, type Point avec drapeau SRID
        assert_eq!(ewkb[0], 1);
        assert_eq!(&ewkb[1..5], &[0x01, 0x00, 0x00, 0x20]);
        assert_eq!(&ewkb[5..9], &32615u32.to_le_bytes());
        assert_eq!(ewkb.len(), 1 + 4 + 4 + 16);
    }
}
