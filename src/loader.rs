use crate::polyline::{LineId, Polyline};
use geo_types::{Coord, LineString, MultiLineString};
use geojson::feature::Id;
use geojson::{Feature, GeoJson, Geometry, Value};
use log::{debug, info, warn};
use shapefile::dbase::{FieldValue, Record};
use shapefile::{Point, PointM, PointZ, Shape};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid GeoJSON in '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: geojson::Error,
    },
    #[error("Invalid shapefile '{path}': {source}")]
    Shapefile {
        path: PathBuf,
        #[source]
        source: shapefile::Error,
    },
}

/// Reads street polylines from a shapefile (`.shp`) or a GeoJSON file,
/// picked by extension.
pub fn load_lines(path: &Path) -> Result<Vec<Polyline>, LoadError> {
    info!("Loading lines from {:?}", path);
    let is_shp = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("shp"));
    if is_shp {
        return load_shapefile(path);
    }

    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let geojson = text.parse::<GeoJson>().map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(lines_from_geojson(geojson))
}

/// Flattens a GeoJSON document into polylines.
///
/// Feature ids win over an `"id"` property, which wins over the feature's
/// position in the collection. Each part of a MultiLineString becomes its
/// own polyline with id `"{id}:{part}"`.
pub fn lines_from_geojson(geojson: GeoJson) -> Vec<Polyline> {
    let features: Vec<Feature> = match geojson {
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(geometry) => vec![Feature::from(geometry)],
    };

    let mut lines = Vec::with_capacity(features.len());
    let mut skipped = 0;

    for (index, feature) in features.into_iter().enumerate() {
        let id = feature_id(&feature, index);
        let Some(geometry) = feature.geometry else {
            debug!("Feature {} has no geometry", id);
            skipped += 1;
            continue;
        };

        match geometry_lines(&id, geometry) {
            Some(parts) => {
                for line in parts {
                    if line.num_coords() < 2 {
                        warn!("Line {} has fewer than two coordinates, skipping", line.id);
                        skipped += 1;
                        continue;
                    }
                    lines.push(line);
                }
            }
            None => skipped += 1,
        }
    }

    info!("Loaded {} lines ({} features skipped)", lines.len(), skipped);
    lines
}

fn feature_id(feature: &Feature, index: usize) -> String {
    match &feature.id {
        Some(Id::String(s)) => return s.clone(),
        Some(Id::Number(n)) => return n.to_string(),
        None => {}
    }
    match feature.property("id") {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Null) | None => index.to_string(),
        Some(other) => other.to_string(),
    }
}

fn geometry_lines(id: &str, geometry: Geometry) -> Option<Vec<Polyline>> {
    match geometry.value {
        value @ Value::LineString(_) => match LineString::<f64>::try_from(value) {
            Ok(ls) => Some(vec![Polyline::new(LineId::new(id), ls)]),
            Err(e) => {
                warn!("Feature {}: {}", id, e);
                None
            }
        },
        value @ Value::MultiLineString(_) => match MultiLineString::<f64>::try_from(value) {
            Ok(mls) => Some(
                mls.0
                    .into_iter()
                    .enumerate()
                    .map(|(k, ls)| Polyline::new(LineId::new(format!("{}:{}", id, k)), ls))
                    .collect(),
            ),
            Err(e) => {
                warn!("Feature {}: {}", id, e);
                None
            }
        },
        _ => {
            warn!("Feature {} is not a line geometry, skipping", id);
            None
        }
    }
}

/// Reads every polyline record of a shapefile.
///
/// The `id` attribute names a line when present, otherwise the record index
/// does. Records with several parts split into `"{id}:{part}"` lines.
pub fn load_shapefile(path: &Path) -> Result<Vec<Polyline>, LoadError> {
    let shp_err = |source| LoadError::Shapefile {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = shapefile::Reader::from_path(path).map_err(shp_err)?;

    let mut lines = Vec::new();
    let mut skipped = 0;
    for (index, item) in reader.iter_shapes_and_records().enumerate() {
        let (shape, record) = item.map_err(shp_err)?;
        let id = record_id(&record, index);
        let parts = match shape {
            Shape::Polyline(pl) => part_lines(&id, pl.parts(), |p: &Point| (p.x, p.y)),
            Shape::PolylineM(pl) => part_lines(&id, pl.parts(), |p: &PointM| (p.x, p.y)),
            Shape::PolylineZ(pl) => part_lines(&id, pl.parts(), |p: &PointZ| (p.x, p.y)),
            other => {
                warn!(
                    "Record {} is a {:?}, not a polyline, skipping",
                    id,
                    other.shapetype()
                );
                skipped += 1;
                continue;
            }
        };
        for line in parts {
            if line.num_coords() < 2 {
                warn!("Line {} has fewer than two coordinates, skipping", line.id);
                skipped += 1;
                continue;
            }
            lines.push(line);
        }
    }

    info!("Loaded {} lines ({} records skipped)", lines.len(), skipped);
    Ok(lines)
}

fn record_id(record: &Record, index: usize) -> String {
    match record.get("id") {
        Some(FieldValue::Character(Some(s))) if !s.trim().is_empty() => s.trim().to_string(),
        Some(FieldValue::Numeric(Some(n))) => n.to_string(),
        Some(FieldValue::Integer(n)) => n.to_string(),
        _ => index.to_string(),
    }
}

fn part_lines<P>(id: &str, parts: &[Vec<P>], xy: impl Fn(&P) -> (f64, f64)) -> Vec<Polyline> {
    let coords = |part: &Vec<P>| {
        part.iter()
            .map(|p| {
                let (x, y) = xy(p);
                Coord { x, y }
            })
            .collect::<Vec<_>>()
    };
    match parts {
        [single] => vec![Polyline::from_coords(id, coords(single))],
        _ => parts
            .iter()
            .enumerate()
            .map(|(k, part)| Polyline::from_coords(format!("{}:{}", id, k), coords(part)))
            .collect(),
    }
}
