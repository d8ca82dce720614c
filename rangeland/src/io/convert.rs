//! Conversion of KML geometries into `geo-types`.
//!
//! KML coordinates may carry an altitude; the target types are strictly
//! 2-D, so the conversion drops it.

use kml::types::{
    Coord, Geometry as KmlGeometry, LineString as KmlLineString, LinearRing,
    MultiGeometry, Point as KmlPoint, Polygon as KmlPolygon,
};

pub(crate) fn convert_geometry(geometry: &KmlGeometry<f64>) -> Option<geo_types::Geometry<f64>> {
    match geometry {
        KmlGeometry::Point(point) => Some(convert_point(point).into()),
        KmlGeometry::LineString(line) => Some(convert_line_string(line).into()),
        KmlGeometry::LinearRing(ring) => Some(convert_ring(ring).into()),
        KmlGeometry::Polygon(polygon) => Some(convert_polygon(polygon).into()),
        KmlGeometry::MultiGeometry(multi) => convert_multi_geometry(multi),
        _ => None,
    }
}

fn convert_point(point: &KmlPoint<f64>) -> geo_types::Point<f64> {
    geo_types::Point::new(point.coord.x, point.coord.y)
}

fn convert_coords(coords: &[Coord<f64>]) -> Vec<geo_types::Coord<f64>> {
    coords
        .iter()
        .map(|coord| geo_types::Coord {
            x: coord.x,
            y: coord.y,
        })
        .collect()
}

fn convert_line_string(line: &KmlLineString<f64>) -> geo_types::LineString<f64> {
    geo_types::LineString::new(convert_coords(&line.coords))
}

/// A standalone ring imports as a closed line string; rings that are
/// polygon boundaries go through [`convert_polygon`] instead.
fn convert_ring(ring: &LinearRing<f64>) -> geo_types::LineString<f64> {
    let mut line = geo_types::LineString::new(convert_coords(&ring.coords));
    line.close();
    line
}

fn convert_polygon(polygon: &KmlPolygon<f64>) -> geo_types::Polygon<f64> {
    geo_types::Polygon::new(
        convert_ring(&polygon.outer),
        polygon.inner.iter().map(convert_ring).collect(),
    )
}

/// A homogeneous multi-geometry collapses to the matching `Multi*` type;
/// mixed content becomes a geometry collection.
fn convert_multi_geometry(multi: &MultiGeometry<f64>) -> Option<geo_types::Geometry<f64>> {
    let members: Vec<geo_types::Geometry<f64>> = multi
        .geometries
        .iter()
        .filter_map(convert_geometry)
        .collect();
    if members.is_empty() {
        return None;
    }

    if members
        .iter()
        .all(|member| matches!(member, geo_types::Geometry::Point(_)))
    {
        let points = members.into_iter().filter_map(|member| match member {
            geo_types::Geometry::Point(point) => Some(point),
            _ => None,
        });
        return Some(geo_types::MultiPoint::from_iter(points).into());
    }

    if members
        .iter()
        .all(|member| matches!(member, geo_types::Geometry::LineString(_)))
    {
        let lines = members.into_iter().filter_map(|member| match member {
            geo_types::Geometry::LineString(line) => Some(line),
            _ => None,
        });
        return Some(geo_types::MultiLineString(lines.collect()).into());
    }

    if members
        .iter()
        .all(|member| matches!(member, geo_types::Geometry::Polygon(_)))
    {
        let polygons = members.into_iter().filter_map(|member| match member {
            geo_types::Geometry::Polygon(polygon) => Some(polygon),
            _ => None,
        });
        return Some(geo_types::MultiPolygon(polygons.collect()).into());
    }

    Some(geo_types::Geometry::GeometryCollection(
        geo_types::GeometryCollection(members),
    ))
}
