//! Géométries référencées spatialement
//!
//! `SrGeometry` associe une géométrie `geo` à sa référence spatiale. Les
//! opérations ne modifient jamais la géométrie portée : elles retournent une
//! nouvelle valeur, ou `Cow::Borrowed(self)` quand l'opération est une
//! identité.

mod fingerprint;
mod kind;
mod xchg;

pub use kind::GeometryKind;
pub use xchg::ExportRecord;

use std::borrow::Cow;
use std::fmt;

use geo::{
    Buffer, Centroid, Euclidean, Geometry, HasDimensions, InteriorPoint, InterpolatableLine,
    LineString, MapCoords, MultiPolygon, Point, Polygon, Relate,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::distance::{self, Units};
use crate::projection::ProjectionEngine;
use crate::{Sr, SrContext, SrError, WGS_84};

/// Géométrie associée à sa référence spatiale
///
/// Invariant : les coordonnées de `base` sont exprimées dans `sr`, et `base`
/// correspond à `kind` (voir [`GeometryKind::accepts`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ExportRecord", into = "ExportRecord")]
pub struct SrGeometry {
    base: Geometry,
    sr: Sr,
    kind: GeometryKind,
}

impl SrGeometry {
    /// Géométrie générique
    pub fn new(base: impl Into<Geometry>, sr: Sr) -> Self {
        Self {
            base: base.into(),
            sr,
            kind: GeometryKind::Generic,
        }
    }

    pub fn point(point: Point, sr: Sr) -> Self {
        Self {
            base: Geometry::Point(point),
            sr,
            kind: GeometryKind::Point,
        }
    }

    pub fn polyline(line: LineString, sr: Sr) -> Self {
        Self {
            base: Geometry::LineString(line),
            sr,
            kind: GeometryKind::Polyline,
        }
    }

    pub fn polygon(polygon: Polygon, sr: Sr) -> Self {
        Self {
            base: Geometry::Polygon(polygon),
            sr,
            kind: GeometryKind::Polygon,
        }
    }

    /// Construit une géométrie d'un type donné
    ///
    /// Échoue si la géométrie ne correspond pas au type.
    pub fn with_kind(kind: GeometryKind, base: Geometry, sr: Sr) -> Result<Self, SrError> {
        if !kind.accepts(&base) {
            return Err(SrError::load(format!(
                "{} cannot hold a {}",
                kind.name(),
                geometry_type_name(&base)
            )));
        }
        Ok(Self { base, sr, kind })
    }

    /// Point WGS-84 depuis une latitude et une longitude
    pub fn from_lat_lon(lat: f64, lon: f64) -> Self {
        Self::point(Point::new(lon, lat), WGS_84)
    }

    /// Point depuis des coordonnées exprimées dans `sr`
    pub fn from_coords(x: f64, y: f64, sr: Sr) -> Self {
        Self::point(Point::new(x, y), sr)
    }

    pub fn base_geometry(&self) -> &Geometry {
        &self.base
    }

    pub fn into_base_geometry(self) -> Geometry {
        self.base
    }

    pub fn sr(&self) -> &Sr {
        &self.sr
    }

    pub fn srid(&self) -> u32 {
        self.sr.identifier
    }

    pub fn kind(&self) -> GeometryKind {
        self.kind
    }

    /// La géométrie sous forme de point, si c'en est un
    pub fn as_point(&self) -> Option<&Point> {
        match &self.base {
            Geometry::Point(p) => Some(p),
            _ => None,
        }
    }

    pub fn x(&self) -> Option<f64> {
        self.as_point().map(|p| p.x())
    }

    pub fn y(&self) -> Option<f64> {
        self.as_point().map(|p| p.y())
    }

    /// Point garanti sur ou dans la géométrie
    pub fn representative_point(&self) -> Result<Point, SrError> {
        self.base
            .interior_point()
            .ok_or(SrError::EmptyGeometry("representative point"))
    }

    /// Point qui représente le mieux la position de la géométrie
    ///
    /// - point : lui-même
    /// - polyligne : le point à mi-longueur (son premier point si elle est
    ///   de longueur nulle)
    /// - autres : le centroïde
    pub fn location(&self) -> Result<Cow<'_, SrGeometry>, SrError> {
        let point = match (self.kind, &self.base) {
            (GeometryKind::Point, _) => return Ok(Cow::Borrowed(self)),
            (GeometryKind::Polyline, Geometry::LineString(line)) => {
                line.point_at_ratio_from_start(&Euclidean, 0.5)
                    .or_else(|| line.0.first().map(|c| Point(*c)))
            }
            _ => self.base.centroid(),
        }
        .ok_or(SrError::EmptyGeometry("location"))?;

        Ok(Cow::Owned(Self::point(point, self.sr.clone())))
    }

    /// Cette géométrie en WGS-84 (elle-même si elle y est déjà)
    pub fn as_wgs84<E: ProjectionEngine>(
        &self,
        ctx: &SrContext<E>,
    ) -> Result<Cow<'_, SrGeometry>, SrError> {
        if self.sr.is_wgs84() {
            return Ok(Cow::Borrowed(self));
        }
        self.transform(ctx, &WGS_84, true)
    }

    /// Cette géométrie dans la zone UTM de son point représentatif
    ///
    /// Retourne la géométrie elle-même uniquement si elle est déjà dans la
    /// bonne zone; une autre zone UTM ne suffit pas.
    pub fn as_utm<E: ProjectionEngine>(
        &self,
        ctx: &SrContext<E>,
    ) -> Result<Cow<'_, SrGeometry>, SrError> {
        let rp = if self.sr.is_wgs84() {
            self.representative_point()?
        } else {
            self.transform(ctx, &WGS_84, false)?.representative_point()?
        };

        let utm_sr = ctx.utm(rp.y(), rp.x());
        if utm_sr == self.sr {
            return Ok(Cow::Borrowed(self));
        }
        self.transform(ctx, &utm_sr, true)
    }

    /// Transforme la géométrie vers `target`
    ///
    /// Si `target` est déjà la référence de la géométrie, retourne une copie
    /// (`copy_if_same`) ou la géométrie elle-même.
    pub fn transform<E: ProjectionEngine>(
        &self,
        ctx: &SrContext<E>,
        target: &Sr,
        copy_if_same: bool,
    ) -> Result<Cow<'_, SrGeometry>, SrError> {
        if *target == self.sr {
            return Ok(if copy_if_same {
                Cow::Owned(self.clone())
            } else {
                Cow::Borrowed(self)
            });
        }

        let f = ctx.transform_fn(&self.sr, target)?;
        let base = self.base.try_map_coords(|c| f(c))?;
        trace!(from = %self.sr, to = %target, kind = self.kind.name(), "Geometry transformed");

        Ok(Cow::Owned(Self {
            base,
            sr: target.clone(),
            kind: self.kind,
        }))
    }

    /// Transforme la géométrie sur place
    ///
    /// La géométrie n'est remplacée qu'une fois toutes les coordonnées
    /// transformées.
    pub fn transform_in_place<E: ProjectionEngine>(
        &mut self,
        ctx: &SrContext<E>,
        target: &Sr,
    ) -> Result<(), SrError> {
        if *target == self.sr {
            return Ok(());
        }
        let f = ctx.transform_fn(&self.sr, target)?;
        self.base = self.base.try_map_coords(|c| f(c))?;
        self.sr = target.clone();
        Ok(())
    }

    /// Zone tampon de `distance` autour de la géométrie
    ///
    /// Le tampon est calculé dans la zone UTM de la géométrie (échelle quasi
    /// uniforme) puis ramené dans la référence d'origine.
    pub fn buffer<E: ProjectionEngine>(
        &self,
        ctx: &SrContext<E>,
        distance: f64,
        units: Units,
    ) -> Result<SrGeometry, SrError> {
        let meters = distance::meters(distance, units);
        let utm = self.as_utm(ctx)?;

        let MultiPolygon(mut polygons) = utm.base.buffer(meters);
        let base = if polygons.len() == 1 {
            Geometry::Polygon(polygons.remove(0))
        } else {
            Geometry::MultiPolygon(MultiPolygon::new(polygons))
        };
        debug!(sr = %utm.sr, meters, "Geometry buffered");

        let buffered = Self {
            base,
            sr: utm.sr.clone(),
            kind: GeometryKind::Polygon,
        };
        if buffered.sr == self.sr {
            return Ok(buffered);
        }
        Ok(buffered.transform(ctx, &self.sr, true)?.into_owned())
    }

    /// Empreinte blake3 (hexadécimal) de la référence et des coordonnées
    ///
    /// Stable à travers un export / chargement.
    pub fn fingerprint(&self) -> String {
        hex::encode(fingerprint::geometry_hash(&self.sr, &self.base))
    }
}

/// Transforme un lot de géométries en parallèle
pub fn transform_all<E: ProjectionEngine>(
    ctx: &SrContext<E>,
    geometries: &[SrGeometry],
    target: &Sr,
) -> Result<Vec<SrGeometry>, SrError> {
    geometries
        .par_iter()
        .map(|g| g.transform(ctx, target, true).map(Cow::into_owned))
        .collect()
}

/// Égalité topologique à référence spatiale égale
///
/// Deux géométries vides sont égales; une géométrie vide n'est égale à
/// aucune géométrie non vide.
impl PartialEq for SrGeometry {
    fn eq(&self, other: &Self) -> bool {
        if self.sr != other.sr {
            return false;
        }
        match (self.base.is_empty(), other.base.is_empty()) {
            (true, true) => true,
            (false, false) => self.base.relate(&other.base).is_equal_topo(),
            _ => false,
        }
    }
}

impl fmt::Display for SrGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(SRID={})", self.kind.name(), self.sr.identifier)
    }
}

fn geometry_type_name(geom: &Geometry) -> &'static str {
    match geom {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}
