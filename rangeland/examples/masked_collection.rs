//! Builds the request expressions for masked Landsat and Sentinel-2
//! collections over a small test area and prints the operations involved.
//!
//! No network access is needed; the expressions are only assembled, the
//! way an analysis script would before submitting them for evaluation.

use geo_types::polygon;
use rangeland::data::{LandsatMission, LandsatSr, Sentinel2Sr};
use rangeland::engine::{DateRange, Geometry};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let aoi = Geometry::from_geo(polygon![
        (x: 28.0, y: 44.5),
        (x: 28.5, y: 44.5),
        (x: 28.5, y: 45.0),
        (x: 28.0, y: 45.0),
    ]);

    let landsat = LandsatSr::new(LandsatMission::Landsat9)
        .with_max_cloud_cover(80.0)
        .load(&aoi)
        .expect("Landsat 9 has a default date range");
    println!("Landsat 9 SR: {:?}", landsat.expr().ops());

    let range = DateRange::new("2022-05-01", "2022-09-30").expect("valid dates");
    let sentinel = Sentinel2Sr::new()
        .with_date_range(range)
        .with_cloud_prob_thresh(40.0)
        .load(&aoi);
    println!("Sentinel-2 SR harmonized: {:?}", sentinel.expr().ops());
}
