//! KML/KMZ import.
//!
//! Vector files come in as a flat [`GeometryFrame`]: one record per
//! placemark, labelled with the document/folder ("layer") it came from.
//! This mirrors how multi-layer KML exports from field-mapping tools are
//! organized, with one folder per pasture, exclosure set, transect, etc.

use std::fs;
use std::io::{Read, Seek};
use std::path::Path;

use kml::types::Geometry as KmlGeometry;
use kml::Kml;
use log::debug;

use crate::error::RangelandError;

mod convert;

/// One imported placemark.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryRecord {
    /// Placemark name, if any.
    pub name: Option<String>,
    /// Placemark description, if any.
    pub description: Option<String>,
    /// Label of the document/folder the placemark came from.
    pub layer: String,
    /// The placemark geometry, always 2-D.
    pub geometry: geo_types::Geometry<f64>,
}

/// A flat table of imported geometries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryFrame {
    records: Vec<GeometryRecord>,
}

impl GeometryFrame {
    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no placemark was imported.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, in document order.
    pub fn records(&self) -> &[GeometryRecord] {
        &self.records
    }

    /// Iterates over the records.
    pub fn iter(&self) -> std::slice::Iter<'_, GeometryRecord> {
        self.records.iter()
    }

    /// Distinct layer labels, in first-appearance order.
    pub fn layers(&self) -> Vec<&str> {
        let mut layers: Vec<&str> = Vec::new();
        for record in &self.records {
            if !layers.contains(&record.layer.as_str()) {
                layers.push(&record.layer);
            }
        }
        layers
    }
}

impl<'a> IntoIterator for &'a GeometryFrame {
    type Item = &'a GeometryRecord;
    type IntoIter = std::slice::Iter<'a, GeometryRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Reads a KML file into a [`GeometryFrame`].
pub fn read_kml(path: impl AsRef<Path>) -> Result<GeometryFrame, RangelandError> {
    let path = path.as_ref();
    debug!("reading KML from {}", path.display());
    parse_kml(&fs::read_to_string(path)?)
}

/// Parses KML text into a [`GeometryFrame`].
pub fn parse_kml(text: &str) -> Result<GeometryFrame, RangelandError> {
    let kml: Kml<f64> = text.parse()?;
    let mut frame = GeometryFrame::default();
    let mut anonymous_layers = 0;
    collect(&kml, None, &mut anonymous_layers, &mut frame.records);
    Ok(frame)
}

/// Reads a KMZ archive into a [`GeometryFrame`].
///
/// A KMZ is a zip archive; the first member with a `.kml` extension
/// (canonically `doc.kml`) is the document.
pub fn read_kmz(path: impl AsRef<Path>) -> Result<GeometryFrame, RangelandError> {
    let path = path.as_ref();
    debug!("reading KMZ from {}", path.display());
    read_kmz_from(fs::File::open(path)?)
}

/// Reads a KMZ archive from any seekable reader.
pub fn read_kmz_from<R: Read + Seek>(reader: R) -> Result<GeometryFrame, RangelandError> {
    let mut archive = zip::ZipArchive::new(reader)?;

    let document = (0..archive.len())
        .filter_map(|index| {
            let entry = archive.by_index(index).ok()?;
            Some(entry.name().to_string())
        })
        .find(|name| name.to_ascii_lowercase().ends_with(".kml"))
        .ok_or(RangelandError::NoKmlEntry)?;

    let mut text = String::new();
    archive.by_name(&document)?.read_to_string(&mut text)?;
    parse_kml(&text)
}

/// Label applied to placemarks sitting outside any document or folder.
const ROOT_LAYER: &str = "document";

fn collect(
    node: &Kml<f64>,
    layer: Option<&str>,
    anonymous_layers: &mut usize,
    out: &mut Vec<GeometryRecord>,
) {
    match node {
        Kml::KmlDocument(document) => {
            for child in &document.elements {
                collect(child, layer, anonymous_layers, out);
            }
        }
        Kml::Document { elements, .. } | Kml::Folder { elements, .. } => {
            let label = container_name(elements).unwrap_or_else(|| {
                *anonymous_layers += 1;
                format!("layer_{anonymous_layers}")
            });
            for child in elements {
                collect(child, Some(&label), anonymous_layers, out);
            }
        }
        Kml::Placemark(placemark) => {
            let Some(geometry) = placemark.geometry.as_ref().and_then(convert::convert_geometry)
            else {
                return;
            };
            out.push(GeometryRecord {
                name: placemark.name.clone(),
                description: placemark.description.clone(),
                layer: layer.unwrap_or(ROOT_LAYER).to_string(),
                geometry,
            });
        }
        // Bare geometry nodes outside a placemark still become records.
        Kml::Point(point) => {
            push_bare(KmlGeometry::Point(point.clone()), layer, out);
        }
        Kml::LineString(line) => {
            push_bare(KmlGeometry::LineString(line.clone()), layer, out);
        }
        Kml::LinearRing(ring) => {
            push_bare(KmlGeometry::LinearRing(ring.clone()), layer, out);
        }
        Kml::Polygon(polygon) => {
            push_bare(KmlGeometry::Polygon(polygon.clone()), layer, out);
        }
        Kml::MultiGeometry(multi) => {
            push_bare(KmlGeometry::MultiGeometry(multi.clone()), layer, out);
        }
        _ => {}
    }
}

fn push_bare(geometry: KmlGeometry<f64>, layer: Option<&str>, out: &mut Vec<GeometryRecord>) {
    if let Some(geometry) = convert::convert_geometry(&geometry) {
        out.push(GeometryRecord {
            name: None,
            description: None,
            layer: layer.unwrap_or(ROOT_LAYER).to_string(),
            geometry,
        });
    }
}

fn container_name(elements: &[Kml<f64>]) -> Option<String> {
    elements.iter().find_map(|element| match element {
        Kml::Element(element) if element.name == "name" => element.content.clone(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use assert_matches::assert_matches;

    use super::*;

    const TWO_FOLDER_KML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <name>pastures</name>
    <Folder>
      <name>north unit</name>
      <Placemark>
        <name>water point</name>
        <Point><coordinates>28.30,44.70,115.0</coordinates></Point>
      </Placemark>
      <Placemark>
        <name>fence line</name>
        <LineString><coordinates>28.0,44.5,0 28.1,44.5,0 28.2,44.6,0</coordinates></LineString>
      </Placemark>
    </Folder>
    <Folder>
      <name>south unit</name>
      <Placemark>
        <name>exclosure</name>
        <description>grazing exclosure, est. 2019</description>
        <Polygon>
          <outerBoundaryIs>
            <LinearRing>
              <coordinates>28.0,44.0,0 28.1,44.0,0 28.1,44.1,0 28.0,44.0,0</coordinates>
            </LinearRing>
          </outerBoundaryIs>
        </Polygon>
      </Placemark>
    </Folder>
  </Document>
</kml>"#;

    #[test]
    fn folders_become_layers() {
        let frame = parse_kml(TWO_FOLDER_KML).expect("parsing failed");
        assert_eq!(frame.len(), 3);
        assert_eq!(frame.layers(), vec!["north unit", "south unit"]);

        let names: Vec<_> = frame
            .iter()
            .map(|record| record.name.as_deref().unwrap_or_default())
            .collect();
        assert_eq!(names, vec!["water point", "fence line", "exclosure"]);

        let exclosure = &frame.records()[2];
        assert_eq!(
            exclosure.description.as_deref(),
            Some("grazing exclosure, est. 2019")
        );
        assert!(matches!(
            exclosure.geometry,
            geo_types::Geometry::Polygon(_)
        ));
    }

    #[test]
    fn geometries_are_two_dimensional() {
        let frame = parse_kml(TWO_FOLDER_KML).expect("parsing failed");
        let geo_types::Geometry::Point(point) = &frame.records()[0].geometry else {
            panic!("expected a point");
        };
        approx::assert_relative_eq!(point.x(), 28.30);
        approx::assert_relative_eq!(point.y(), 44.70);
    }

    #[test]
    fn placemark_outside_folders_gets_the_root_label() {
        let kml = r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Placemark>
    <name>lone point</name>
    <Point><coordinates>1.0,2.0</coordinates></Point>
  </Placemark>
</kml>"#;
        let frame = parse_kml(kml).expect("parsing failed");
        assert_eq!(frame.len(), 1);
        assert_eq!(frame.layers(), vec!["document"]);
    }

    #[test]
    fn malformed_kml_propagates_the_parser_error() {
        assert_matches!(
            parse_kml("not a kml document at all"),
            Err(RangelandError::Kml(_))
        );
    }

    fn kmz_with(entries: &[(&str, &str)]) -> Cursor<Vec<u8>> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in entries {
            writer
                .start_file(name.to_string(), zip::write::SimpleFileOptions::default())
                .expect("zip write failed");
            writer
                .write_all(content.as_bytes())
                .expect("zip write failed");
        }
        writer.finish().expect("zip write failed")
    }

    #[test]
    fn kmz_reads_the_kml_member() {
        let archive = kmz_with(&[("images/icon.png", "not a document"), ("doc.kml", TWO_FOLDER_KML)]);
        let frame = read_kmz_from(archive).expect("reading failed");
        assert_eq!(frame.len(), 3);
        assert_eq!(frame.layers().len(), 2);
    }

    #[test]
    fn kmz_without_document_is_rejected() {
        let archive = kmz_with(&[("readme.txt", "nothing here")]);
        assert_matches!(read_kmz_from(archive), Err(RangelandError::NoKmlEntry));
    }
}
