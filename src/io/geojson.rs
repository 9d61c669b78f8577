//! GeoJSON boundary reading.

use anyhow::{anyhow, bail, Context, Result};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::Value;

use super::{feature_name, RawFeature};

/// Reads boundary features from GeoJSON bytes (a FeatureCollection or a single Feature).
pub(crate) fn read_geojson_bytes(bytes: &[u8], name_property: Option<&str>) -> Result<Vec<RawFeature>> {
    let value: Value = serde_json::from_slice(bytes).context("[io::geojson] Failed to parse GeoJSON bytes")?;

    let features = match value["type"].as_str() {
        Some("FeatureCollection") => value["features"].as_array()
            .ok_or_else(|| anyhow!("[io::geojson] FeatureCollection has no features array"))?
            .iter()
            .collect::<Vec<_>>(),
        Some("Feature") => vec![&value],
        other => bail!("[io::geojson] Expected a FeatureCollection or Feature, found {:?}", other),
    };

    features.into_iter().enumerate()
        .map(|(i, feature)| {
            let name = feature["properties"].as_object()
                .and_then(|props| feature_name(name_property, |key| props.get(key)?.as_str().map(str::to_string)));
            let shape = parse_geometry(&feature["geometry"])
                .with_context(|| format!("[io::geojson] Invalid geometry in feature {i}"))?;
            Ok(RawFeature { name, shape })
        })
        .collect()
}

/// Parse a Polygon or MultiPolygon geometry. Other geometry types (and null) yield `None`.
fn parse_geometry(geometry: &Value) -> Result<Option<MultiPolygon<f64>>> {
    let coords = || geometry["coordinates"].as_array()
        .ok_or_else(|| anyhow!("geometry has no coordinates array"));

    match geometry["type"].as_str() {
        Some("Polygon") => Ok(Some(MultiPolygon(vec![parse_polygon_coords(coords()?)?]))),
        Some("MultiPolygon") => Ok(Some(MultiPolygon(
            coords()?.iter()
                .map(|polygon| parse_polygon_coords(polygon.as_array()
                    .ok_or_else(|| anyhow!("MultiPolygon member is not an array"))?))
                .collect::<Result<Vec<_>>>()?
        ))),
        _ => Ok(None),
    }
}

/// Parse polygon coordinates: `[exterior, hole, hole, ...]`.
fn parse_polygon_coords(rings: &[Value]) -> Result<Polygon<f64>> {
    let mut rings = rings.iter()
        .map(|ring| parse_ring_coords(ring.as_array().ok_or_else(|| anyhow!("ring is not an array"))?));

    let exterior = rings.next().ok_or_else(|| anyhow!("Invalid Polygon: missing exterior ring"))??;
    let interiors = rings.collect::<Result<Vec<_>>>()?;

    Ok(Polygon::new(exterior, interiors))
}

/// Parse a ring from GeoJSON coordinates: `[[x, y], [x, y], ...]`.
fn parse_ring_coords(coords: &[Value]) -> Result<LineString<f64>> {
    let points = coords.iter()
        .map(|pair| {
            let pair = pair.as_array().filter(|p| p.len() >= 2)
                .ok_or_else(|| anyhow!("Invalid coordinate: expected [x, y]"))?;
            let x = pair[0].as_f64().ok_or_else(|| anyhow!("Invalid coordinate: x must be a number"))?;
            let y = pair[1].as_f64().ok_or_else(|| anyhow!("Invalid coordinate: y must be a number"))?;
            Ok(Coord { x, y })
        })
        .collect::<Result<Vec<_>>>()?;

    // Polygon::new closes the ring if needed
    Ok(LineString(points))
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLLECTION: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            { "type": "Feature", "properties": { "NAME": "Albany County" },
              "geometry": { "type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 1], [0, 0]]] } },
            { "type": "Feature", "properties": { "name": "Kings" },
              "geometry": { "type": "MultiPolygon", "coordinates": [
                  [[[2, 0], [3, 0], [3, 1], [2, 0]]],
                  [[[4, 0], [6, 0], [6, 2], [4, 2]], [[4.5, 0.5], [5, 0.5], [5, 1]]]
              ] } },
            { "type": "Feature", "properties": { "NAME": "Nowhere" }, "geometry": null },
            { "type": "Feature", "properties": { "other": 1 },
              "geometry": { "type": "Point", "coordinates": [0, 0] } }
        ]
    }"#;

    #[test]
    fn reads_polygons_and_multipolygons() {
        let features = read_geojson_bytes(COLLECTION.as_bytes(), None).unwrap();
        assert_eq!(features.len(), 4);

        assert_eq!(features[0].name.as_deref(), Some("Albany County"));
        assert_eq!(features[0].shape.as_ref().unwrap().0.len(), 1);

        let kings = features[1].shape.as_ref().unwrap();
        assert_eq!(features[1].name.as_deref(), Some("Kings"));
        assert_eq!(kings.0.len(), 2);
        assert_eq!(kings.0[1].interiors().len(), 1);
        // open rings are closed
        assert_eq!(kings.0[1].exterior().0.first(), kings.0[1].exterior().0.last());

        assert!(features[2].shape.is_none());
        assert!(features[3].shape.is_none());
        assert!(features[3].name.is_none());
    }

    #[test]
    fn explicit_name_property_wins() {
        let json = r#"{ "type": "Feature", "properties": { "NAME": "A", "COUNTY_NAME": "B" },
            "geometry": { "type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1]]] } }"#;
        let features = read_geojson_bytes(json.as_bytes(), Some("COUNTY_NAME")).unwrap();
        assert_eq!(features[0].name.as_deref(), Some("B"));
    }

    #[test]
    fn malformed_documents_fail() {
        assert!(read_geojson_bytes(b"not json", None).is_err());
        assert!(read_geojson_bytes(br#"{ "type": "Topology" }"#, None).is_err());

        let bad_coord = r#"{ "type": "Feature", "properties": {},
            "geometry": { "type": "Polygon", "coordinates": [[[0, "x"], [1, 0], [1, 1]]] } }"#;
        assert!(read_geojson_bytes(bad_coord.as_bytes(), None).is_err());
    }
}
