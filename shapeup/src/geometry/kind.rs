//! Types de géométries et registre des étiquettes d'export

use geo::Geometry;

/// Type d'une `SrGeometry`
///
/// Le type est conservé par les transformations et inscrit dans l'export
/// (champ `type`) pour être restitué au chargement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GeometryKind {
    Point,
    Polyline,
    Polygon,
    #[default]
    Generic,
}

/// Étiquettes reconnues au chargement
///
/// La première étiquette de chaque type est celle écrite à l'export.
const REGISTRY: &[(&str, GeometryKind)] = &[
    ("shapeup::geometry::SrPoint", GeometryKind::Point),
    ("shapeup::geometry::SrPolyline", GeometryKind::Polyline),
    ("shapeup::geometry::SrPolygon", GeometryKind::Polygon),
    ("shapeup::geometry::SrGeometry", GeometryKind::Generic),
    ("shapeup::geometry::SrLinestring", GeometryKind::Polyline),
];

impl GeometryKind {
    /// Étiquette qualifiée écrite à l'export
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Point => "shapeup::geometry::SrPoint",
            Self::Polyline => "shapeup::geometry::SrPolyline",
            Self::Polygon => "shapeup::geometry::SrPolygon",
            Self::Generic => "shapeup::geometry::SrGeometry",
        }
    }

    /// Nom court (affichage)
    pub const fn name(self) -> &'static str {
        match self {
            Self::Point => "SrPoint",
            Self::Polyline => "SrPolyline",
            Self::Polygon => "SrPolygon",
            Self::Generic => "SrGeometry",
        }
    }

    /// Retrouve le type d'une étiquette, qualifiée ou courte
    pub fn from_tag(tag: &str) -> Option<Self> {
        REGISTRY.iter().find_map(|&(known, kind)| {
            let short = known.rsplit("::").next().unwrap_or(known);
            (known == tag || short == tag).then_some(kind)
        })
    }

    /// Vérifie que la géométrie correspond au type
    pub fn accepts(self, geom: &Geometry) -> bool {
        match self {
            Self::Point => matches!(geom, Geometry::Point(_)),
            Self::Polyline => matches!(geom, Geometry::LineString(_)),
            Self::Polygon => matches!(geom, Geometry::Polygon(_) | Geometry::MultiPolygon(_)),
            Self::Generic => true,
        }
    }
}
