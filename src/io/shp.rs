//! ESRI Shapefile boundary reading (`.shp` geometry + `.dbf` attributes).

use std::io::Cursor;

use anyhow::{Context, Result};
use shapefile::{self as shp, dbase::{self, FieldValue, Record}, Reader, ShapeReader, Shape};

use super::{feature_name, RawFeature};

/// Reads all polygon shapes + county names from in-memory `.shp` and `.dbf` contents.
/// Non-polygon shapes are returned without geometry.
pub(crate) fn read_shapefile_bytes(shp_bytes: &[u8], dbf_bytes: &[u8], name_property: Option<&str>) -> Result<Vec<RawFeature>> {
    let shapes = ShapeReader::new(Cursor::new(shp_bytes))
        .context("[io::shp] Failed to read .shp header")?;
    let records = dbase::Reader::new(Cursor::new(dbf_bytes))
        .context("[io::shp] Failed to read .dbf header")?;
    let mut reader = Reader::new(shapes, records);

    let mut features = Vec::new();
    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result.context("[io::shp] Error reading shape+record")?;

        features.push(RawFeature {
            name: feature_name(name_property, |field| character_field(&record, field)),
            shape: match shape {
                Shape::Polygon(polygon) => Some(shp_to_geo(&polygon)),
                _ => None,
            },
        });
    }
    Ok(features)
}

/// Get the trimmed value of a non-empty character field from a Record.
fn character_field(record: &Record, field: &str) -> Option<String> {
    match record.get(field) {
        Some(FieldValue::Character(Some(s))) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

/// Convert shapefile::Polygon to geo::MultiPolygon<f64>
pub(crate) fn shp_to_geo(p: &shp::Polygon) -> geo::MultiPolygon<f64> {
    /// Ensure first and last are the same for geo::LineString coords
    fn ensure_closed(coords: &mut Vec<geo::Coord<f64>>) {
        if let (Some(&first), Some(&last)) = (coords.first(), coords.last()) {
            if first != last {
                coords.push(first)
            }
        }
    }

    /// Get the signed area of a geo::Coord list (negative for clockwise)
    fn signed_area(pts: &[geo::Coord<f64>]) -> f64 {
        pts.windows(2)
            .map(|w| w[0].x * w[1].y - w[1].x * w[0].y)
            .sum::<f64>() / 2.0
    }

    // Shapefile stores each exterior (clockwise) followed by its holes.
    let mut polys: Vec<geo::Polygon<f64>> = Vec::new();
    let mut current_exterior: Option<geo::LineString<f64>> = None;
    let mut current_holes: Vec<geo::LineString<f64>> = Vec::new();

    for ring in p.rings() {
        let mut coords = ring.points().iter()
            .map(|pt| geo::Coord { x: pt.x, y: pt.y })
            .collect::<Vec<_>>();
        ensure_closed(&mut coords);
        let is_exterior = signed_area(&coords) < 0.0;
        let ls = geo::LineString(coords);

        if is_exterior {
            // flush previous polygon
            if let Some(ext) = current_exterior.take() {
                polys.push(geo::Polygon::new(ext, std::mem::take(&mut current_holes)));
            }
            current_exterior = Some(ls);
        } else if current_exterior.is_some() {
            current_holes.push(ls);
        } else {
            // A counter-clockwise ring before any exterior: treat it as an exterior.
            current_exterior = Some(ls);
        }
    }
    if let Some(ext) = current_exterior {
        polys.push(geo::Polygon::new(ext, current_holes));
    }

    geo::MultiPolygon(polys)
}


/// Write a one-polygon shapefile (`.shp`, `.shx`, `.dbf`) with a `NAME` field.
#[cfg(test)]
pub(crate) fn write_test_shapefile(path: &std::path::Path, name: &str) {
    use shp::{Point, PolygonRing};

    let table = dbase::TableWriterBuilder::new()
        .add_character_field("NAME".try_into().unwrap(), 50);
    let mut writer = shp::Writer::from_path(path, table).unwrap();

    let square = shp::Polygon::new(PolygonRing::Outer(vec![
        Point::new(0.0, 0.0), Point::new(0.0, 1.0), Point::new(1.0, 1.0), Point::new(1.0, 0.0), Point::new(0.0, 0.0),
    ]));
    let mut record = Record::default();
    record.insert("NAME".to_string(), FieldValue::Character(Some(name.to_string())));
    writer.write_shape_and_record(&square, &record).unwrap();
}
