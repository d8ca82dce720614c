//! USGS Landsat Level 2, Collection 2, Tier 1 surface reflectance.

use rangeland_engine::{DateRange, Filter, Geometry, Image, ImageCollection};

use crate::error::RangelandError;

/// Landsat missions with a surface reflectance product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandsatMission {
    /// Landsat 5 TM, 1984-2012.
    Landsat5,
    /// Landsat 7 ETM+.
    Landsat7,
    /// Landsat 8 OLI/TIRS.
    Landsat8,
    /// Landsat 9 OLI-2/TIRS-2, since 2021.
    Landsat9,
}

impl LandsatMission {
    /// Collection asset id of the mission's L2 C2 T1 product.
    pub fn collection_id(&self) -> &'static str {
        match self {
            LandsatMission::Landsat5 => "LANDSAT/LT05/C02/T1_L2",
            LandsatMission::Landsat7 => "LANDSAT/LE07/C02/T1_L2",
            LandsatMission::Landsat8 => "LANDSAT/LC08/C02/T1_L2",
            LandsatMission::Landsat9 => "LANDSAT/LC09/C02/T1_L2",
        }
    }

    /// Documented acquisition lifetime of the mission, where one is used
    /// as the default date range.
    pub fn lifetime(&self) -> Option<DateRange> {
        match self {
            LandsatMission::Landsat5 => DateRange::new("1984-03-16", "2012-05-05").ok(),
            LandsatMission::Landsat9 => DateRange::from_start("2021-10-31").ok(),
            LandsatMission::Landsat7 | LandsatMission::Landsat8 => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            LandsatMission::Landsat5 => "Landsat 5",
            LandsatMission::Landsat7 => "Landsat 7",
            LandsatMission::Landsat8 => "Landsat 8",
            LandsatMission::Landsat9 => "Landsat 9",
        }
    }
}

/// Loader for a masked Landsat surface reflectance collection.
///
/// Every image of the returned collection has the radiometric scale and
/// offset applied and pixels flagged as cloud or cloud shadow/snow in the
/// `QA_PIXEL` quality band masked out.
#[derive(Debug, Clone)]
pub struct LandsatSr {
    mission: LandsatMission,
    range: Option<DateRange>,
    max_cloud_cover: f64,
}

impl LandsatSr {
    /// Creates a loader for the given mission with no scene cloud-cover
    /// limit.
    pub fn new(mission: LandsatMission) -> Self {
        Self {
            mission,
            range: None,
            max_cloud_cover: 100.0,
        }
    }

    /// Restricts acquisition dates. Without this the mission lifetime is
    /// used, for the missions the crate knows one for.
    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.range = Some(range);
        self
    }

    /// Drops scenes with `CLOUD_COVER` above the given percentage.
    pub fn with_max_cloud_cover(mut self, percentage: f64) -> Self {
        self.max_cloud_cover = percentage;
        self
    }

    /// Builds the collection for the given area of interest.
    pub fn load(&self, aoi: &Geometry) -> Result<ImageCollection, RangelandError> {
        let range = match &self.range {
            Some(range) => range.clone(),
            None => self
                .mission
                .lifetime()
                .ok_or(RangelandError::MissingDateRange(self.mission.name()))?,
        };

        Ok(ImageCollection::load(self.mission.collection_id())
            .filter_bounds(aoi)
            .filter_date(&range)
            .filter(&Filter::lte("CLOUD_COVER", self.max_cloud_cover))
            .scale_and_offset()
            .map(mask_clouds_snow))
    }
}

/// Masks pixels flagged as cloud (bit 3) or cloud shadow/snow (bit 4) in
/// the QA_PIXEL band designations.
fn mask_clouds_snow(image: Image) -> Image {
    let qa = image.select(&["QA_PIXEL"]);
    let clear = qa
        .bitwise_and(1 << 3)
        .eq(0.0)
        .and(&qa.bitwise_and(1 << 4).eq(0.0));
    image.update_mask(&clear)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use geo_types::polygon;

    use super::*;

    fn aoi() -> Geometry {
        Geometry::from_geo(polygon![
            (x: 28.0, y: 44.5),
            (x: 28.5, y: 44.5),
            (x: 28.5, y: 45.0),
        ])
    }

    #[test]
    fn default_ranges_match_mission_lifetimes() {
        let l5 = LandsatMission::Landsat5.lifetime().expect("missing lifetime");
        assert_eq!(l5.start(), "1984-03-16");
        assert_eq!(l5.end(), Some("2012-05-05"));

        let l9 = LandsatMission::Landsat9.lifetime().expect("missing lifetime");
        assert_eq!(l9.start(), "2021-10-31");
        assert_eq!(l9.end(), None);

        assert!(LandsatMission::Landsat7.lifetime().is_none());
        assert!(LandsatMission::Landsat8.lifetime().is_none());
    }

    #[test]
    fn landsat_8_requires_an_explicit_range() {
        let result = LandsatSr::new(LandsatMission::Landsat8).load(&aoi());
        assert_matches!(result, Err(RangelandError::MissingDateRange("Landsat 8")));
    }

    #[test]
    fn collection_pipeline_ops() {
        let range = DateRange::new("2022-01-01", "2022-12-31").expect("valid range rejected");
        let collection = LandsatSr::new(LandsatMission::Landsat8)
            .with_date_range(range)
            .with_max_cloud_cover(80.0)
            .load(&aoi())
            .expect("loading failed");

        let expr = collection.expr();
        assert_eq!(expr.ops()[0], "Collection.map");
        assert!(expr.invokes("ImageCollection.scaleAndOffset"));
        assert!(expr.invokes("Collection.filterBounds"));
        assert!(expr.invokes("Collection.filterDate"));
        assert!(expr.invokes("Filter.lessThanOrEquals"));
        // The mapped QA mask.
        assert!(expr.invokes("Image.bitwiseAnd"));
        assert!(expr.invokes("Image.updateMask"));
    }

    #[test]
    fn landsat_9_loads_with_defaults() {
        let collection = LandsatSr::new(LandsatMission::Landsat9)
            .load(&aoi())
            .expect("loading failed");
        assert!(collection.expr().invokes("ImageCollection.load"));
    }
}
