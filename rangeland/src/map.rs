//! Interactive web-map export.
//!
//! [`WebMap`] composes a self-contained HTML document: a Leaflet map over
//! OpenStreetMap tiles with named GeoJSON overlays and a layer control.
//! There is no local rendering; the browser does all the work.

use std::fs;
use std::path::Path;

use log::debug;
use rangeland_engine::{EngineClient, Geometry};

use crate::error::RangelandError;

const TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
const TILE_ATTRIBUTION: &str = "&copy; OpenStreetMap contributors";

/// Builder for an interactive map document.
#[derive(Debug, Clone)]
pub struct WebMap {
    center: (f64, f64),
    zoom: u8,
    overlays: Vec<Overlay>,
}

#[derive(Debug, Clone)]
struct Overlay {
    name: String,
    geojson: serde_json::Value,
}

impl WebMap {
    /// Creates a map centered on `(lat, lon)` at the given zoom level.
    pub fn new(center: (f64, f64), zoom: u8) -> Self {
        Self {
            center,
            zoom,
            overlays: Vec::new(),
        }
    }

    /// Creates a map centered on the centroid of an engine geometry.
    ///
    /// The centroid is evaluated by the engine, so this performs a network
    /// round trip.
    pub fn centered_on(
        client: &EngineClient,
        geometry: &Geometry,
        zoom: u8,
    ) -> Result<Self, RangelandError> {
        let center = geometry.centroid_coordinates(client)?;
        Ok(Self::new(center, zoom))
    }

    /// Adds a local geometry as a named overlay.
    ///
    /// Only the GeoJSON geometry kinds are accepted; anything else (lines,
    /// rectangles, triangles, nested collections) fails with
    /// [`RangelandError::UnsupportedGeometry`].
    pub fn add_geometry(
        &mut self,
        geometry: &geo_types::Geometry<f64>,
        name: impl Into<String>,
    ) -> Result<(), RangelandError> {
        let name = name.into();
        if let Some(kind) = unsupported_kind(geometry) {
            return Err(RangelandError::UnsupportedGeometry { kind, layer: name });
        }

        let geojson = geojson::Geometry::new(geojson::Value::from(geometry));
        self.push_overlay(name, serde_json::to_value(&geojson)?);
        Ok(())
    }

    /// Fetches an engine geometry and adds it as a named overlay.
    pub fn add_engine_geometry(
        &mut self,
        client: &EngineClient,
        geometry: &Geometry,
        name: impl Into<String>,
    ) -> Result<(), RangelandError> {
        let fetched = geometry.fetch(client)?;
        self.push_overlay(name.into(), serde_json::to_value(&fetched)?);
        Ok(())
    }

    fn push_overlay(&mut self, name: String, geojson: serde_json::Value) {
        debug!("adding overlay `{name}`");
        self.overlays.push(Overlay { name, geojson });
    }

    /// Renders the map into an HTML document.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        html.push_str(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\"/>\n\
             <link rel=\"stylesheet\" href=\"https://unpkg.com/leaflet@1.9.4/dist/leaflet.css\"/>\n\
             <script src=\"https://unpkg.com/leaflet@1.9.4/dist/leaflet.js\"></script>\n\
             <style>html, body, #map { height: 100%; margin: 0; }</style>\n\
             </head>\n<body>\n<div id=\"map\"></div>\n<script>\n",
        );
        html.push_str(&format!(
            "var map = L.map(\"map\").setView([{}, {}], {});\n",
            self.center.0, self.center.1, self.zoom
        ));
        html.push_str(&format!(
            "L.tileLayer(\"{TILE_URL}\", {{attribution: \"{TILE_ATTRIBUTION}\"}}).addTo(map);\n"
        ));
        html.push_str("var overlays = {};\n");
        for (index, overlay) in self.overlays.iter().enumerate() {
            let name = js_string(&escape_html(&overlay.name));
            html.push_str(&format!(
                "var layer_{index} = L.geoJSON({}).addTo(map);\noverlays[{name}] = layer_{index};\n",
                overlay.geojson
            ));
        }
        html.push_str("L.control.layers(null, overlays).addTo(map);\n</script>\n</body>\n</html>\n");
        html
    }

    /// Writes the HTML document to a file.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), RangelandError> {
        Ok(fs::write(path, self.to_html())?)
    }
}

fn unsupported_kind(geometry: &geo_types::Geometry<f64>) -> Option<&'static str> {
    match geometry {
        geo_types::Geometry::Point(_)
        | geo_types::Geometry::MultiPoint(_)
        | geo_types::Geometry::LineString(_)
        | geo_types::Geometry::MultiLineString(_)
        | geo_types::Geometry::Polygon(_)
        | geo_types::Geometry::MultiPolygon(_) => None,
        geo_types::Geometry::Line(_) => Some("Line"),
        geo_types::Geometry::Rect(_) => Some("Rect"),
        geo_types::Geometry::Triangle(_) => Some("Triangle"),
        geo_types::Geometry::GeometryCollection(_) => Some("GeometryCollection"),
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn js_string(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| "\"\"".to_string())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use geo_types::{point, polygon, Rect};

    use super::*;

    #[test]
    fn overlays_are_embedded_with_their_names() {
        let mut map = WebMap::new((44.7, 28.3), 12);
        map.add_geometry(&point!(x: 28.3, y: 44.7).into(), "water point")
            .expect("adding failed");
        map.add_geometry(
            &polygon![(x: 28.0, y: 44.0), (x: 28.1, y: 44.0), (x: 28.1, y: 44.1)].into(),
            "exclosure",
        )
        .expect("adding failed");

        let html = map.to_html();
        assert!(html.contains("setView([44.7, 28.3], 12)"));
        assert!(html.contains("\"water point\""));
        assert!(html.contains("\"exclosure\""));
        assert!(html.contains("\"type\":\"Point\""));
        assert!(html.contains("\"type\":\"Polygon\""));
        assert!(html.contains("L.control.layers"));
    }

    #[test]
    fn unsupported_geometry_is_rejected() {
        let mut map = WebMap::new((0.0, 0.0), 3);
        let rect = Rect::new((0.0, 0.0), (1.0, 1.0));
        let result = map.add_geometry(&rect.into(), "bounding box");
        assert_matches!(
            result,
            Err(RangelandError::UnsupportedGeometry { kind: "Rect", layer }) if layer == "bounding box"
        );
    }

    #[test]
    fn layer_names_are_escaped() {
        let mut map = WebMap::new((0.0, 0.0), 3);
        map.add_geometry(&point!(x: 0.0, y: 0.0).into(), "<script>alert(1)</script>")
            .expect("adding failed");
        let html = map.to_html();
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
