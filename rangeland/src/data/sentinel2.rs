//! Sentinel-2 surface reflectance with cloud and shadow masking.
//!
//! The surface reflectance collection carries no per-pixel cloud score of
//! its own, so it is joined with the s2cloudless cloud probability dataset
//! and a shadow mask is projected from the clouds along the solar azimuth.
//! All of it is expressed as engine operations; nothing runs locally.

use rangeland_engine::{
    DateRange, EngineNumber, Filter, Geometry, Image, ImageCollection, Join,
};

const S2_SR: &str = "COPERNICUS/S2_SR_HARMONIZED";
const S2_CLOUD_PROBABILITY: &str = "COPERNICUS/S2_CLOUD_PROBABILITY";

/// Property the joined cloud probability image is stored under.
const CLOUD_PROBABILITY_KEY: &str = "s2cloudless";

/// Reflectance bands are scaled by 1e4 in the L2A product.
const SR_BAND_SCALE: f64 = 1e4;

/// Loader for a cloud- and shadow-masked Sentinel-2 surface reflectance
/// collection (S2_SR_HARMONIZED joined with S2_CLOUD_PROBABILITY).
///
/// The defaults reproduce the reference masking recipe: scenes over 60%
/// cloudy are dropped, pixels over 50% cloud probability are clouds,
/// shadows are dark non-water NIR pixels within 1 km of a cloud along the
/// anti-solar direction, and the combined mask is eroded and then dilated
/// by 50 m.
#[derive(Debug, Clone)]
pub struct Sentinel2Sr {
    range: DateRange,
    cloud_filter: f64,
    cloud_prob_thresh: f64,
    nir_dark_thresh: f64,
    cloud_proj_dist_km: f64,
    buffer_m: f64,
}

impl Default for Sentinel2Sr {
    fn default() -> Self {
        Self {
            range: default_range(),
            cloud_filter: 60.0,
            cloud_prob_thresh: 50.0,
            nir_dark_thresh: 0.15,
            cloud_proj_dist_km: 1.0,
            buffer_m: 50.0,
        }
    }
}

fn default_range() -> DateRange {
    DateRange::new("2020-01-01", "2020-12-31").expect("literal dates are well-formed")
}

impl Sentinel2Sr {
    /// Creates a loader with the default masking parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts acquisition dates (default: the year 2020).
    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.range = range;
        self
    }

    /// Drops scenes with `CLOUDY_PIXEL_PERCENTAGE` above this value.
    pub fn with_cloud_filter(mut self, percentage: f64) -> Self {
        self.cloud_filter = percentage;
        self
    }

    /// Cloud probability (percent) above which a pixel counts as cloud.
    pub fn with_cloud_prob_thresh(mut self, percentage: f64) -> Self {
        self.cloud_prob_thresh = percentage;
        self
    }

    /// NIR reflectance below which a non-water pixel counts as dark.
    pub fn with_nir_dark_thresh(mut self, reflectance: f64) -> Self {
        self.nir_dark_thresh = reflectance;
        self
    }

    /// How far from a cloud to search for its shadow, in kilometers.
    pub fn with_cloud_proj_dist(mut self, kilometers: f64) -> Self {
        self.cloud_proj_dist_km = kilometers;
        self
    }

    /// Dilation applied to the final mask, in meters.
    pub fn with_buffer(mut self, meters: f64) -> Self {
        self.buffer_m = meters;
        self
    }

    /// Builds the masked collection for the given area of interest.
    pub fn load(&self, aoi: &Geometry) -> ImageCollection {
        self.with_cloud_probability(aoi)
            .map(|image| self.mask_clouds_and_shadows(image))
    }

    /// Joins the surface reflectance collection with the cloud probability
    /// collection on `system:index`, storing the matched probability image
    /// in the `s2cloudless` property of each reflectance image.
    fn with_cloud_probability(&self, aoi: &Geometry) -> ImageCollection {
        let reflectance = ImageCollection::load(S2_SR)
            .filter_bounds(aoi)
            .filter_date(&self.range)
            .filter(&Filter::lte("CLOUDY_PIXEL_PERCENTAGE", self.cloud_filter));

        let probability = ImageCollection::load(S2_CLOUD_PROBABILITY)
            .filter_bounds(aoi)
            .filter_date(&self.range);

        Join::save_first(CLOUD_PROBABILITY_KEY).apply(
            &reflectance,
            &probability,
            &Filter::equals_fields("system:index", "system:index"),
        )
    }

    /// Number of 100 m steps the shadow search covers, rounded to the
    /// nearest whole step. Negative distances clamp to zero.
    fn shadow_search_steps(&self) -> u32 {
        (self.cloud_proj_dist_km * 10.0).round().max(0.0) as u32
    }

    /// The cloud/shadow pipeline applied to every joined image.
    fn mask_clouds_and_shadows(&self, image: Image) -> Image {
        let cloud_prob = image
            .get_image(CLOUD_PROBABILITY_KEY)
            .select(&["probability"]);
        let is_cloud = cloud_prob.gt(self.cloud_prob_thresh).rename(&["clouds"]);
        let with_clouds = image.add_bands(&Image::cat(&[cloud_prob, is_cloud]));

        // Water pixels never count as shadow candidates (SCL class 6).
        let not_water = with_clouds.select(&["SCL"]).neq(6.0);
        let dark_pixels = with_clouds
            .select(&["B8"])
            .lt(self.nir_dark_thresh * SR_BAND_SCALE)
            .multiply(&not_water)
            .rename(&["dark_pixels"]);

        // Shadows fall away from the sun; assumes a UTM projection.
        let shadow_azimuth = EngineNumber::constant(90.0)
            .subtract(&with_clouds.get_number("MEAN_SOLAR_AZIMUTH_ANGLE"));

        let cloud_projection = with_clouds
            .select(&["clouds"])
            .directional_distance_transform(&shadow_azimuth, self.shadow_search_steps())
            .reproject(&with_clouds.band(0).projection(), 100.0)
            .select(&["distance"])
            .mask_value()
            .rename(&["cloud_transform"]);

        let shadows = cloud_projection.multiply(&dark_pixels).rename(&["shadows"]);

        let with_shadows =
            with_clouds.add_bands(&Image::cat(&[dark_pixels, cloud_projection, shadows]));

        let cloud_or_shadow = with_shadows
            .select(&["clouds"])
            .add(&with_shadows.select(&["shadows"]))
            .gt(0.0);

        // Erode small patches, dilate by the buffer. 20 m is enough
        // precision for clouds and keeps the morphology cheap.
        let cloud_mask = cloud_or_shadow
            .focal_min(2.0)
            .focal_max(self.buffer_m * 2.0 / 20.0)
            .reproject(&image.band(0).projection(), 20.0)
            .rename(&["cloudmask"]);

        let with_mask = image.add_bands(&cloud_mask);
        let keep = with_mask.select(&["cloudmask"]).not();

        with_mask
            .select_pattern("B.*")
            .update_mask(&keep)
            .divide(SR_BAND_SCALE)
    }
}

#[cfg(test)]
mod tests {
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
    fn default_range_is_the_reference_year() {
        let loader = Sentinel2Sr::new();
        assert_eq!(loader.range.start(), "2020-01-01");
        assert_eq!(loader.range.end(), Some("2020-12-31"));
    }

    #[test]
    fn join_connects_both_collections() {
        let joined = Sentinel2Sr::new().with_cloud_probability(&aoi());
        let expr = joined.expr();

        assert_eq!(expr.ops()[0], "Join.apply");
        assert!(expr.invokes("Join.saveFirst"));
        assert!(expr.invokes("Filter.equals"));
        assert!(expr.invokes("Filter.lessThanOrEquals"));

        let serialized = serde_json::to_value(expr).expect("serialization failed");
        let join = &serialized["functionInvocationValue"]["arguments"]["join"];
        assert_eq!(
            join["functionInvocationValue"]["arguments"]["matchKey"]["constantValue"],
            "s2cloudless"
        );
    }

    #[test]
    fn pipeline_contains_the_masking_stages() {
        let collection = Sentinel2Sr::new().load(&aoi());
        let expr = collection.expr();

        assert_eq!(expr.ops()[0], "Collection.map");
        for op in [
            "Element.get",
            "Image.gt",
            "Image.lt",
            "Image.neq",
            "Number.subtract",
            "Image.directionalDistanceTransform",
            "Image.focalMin",
            "Image.focalMax",
            "Image.reproject",
            "Image.not",
            "Image.updateMask",
            "Image.divide",
        ] {
            assert!(expr.invokes(op), "pipeline is missing {op}");
        }
    }

    #[test]
    fn shadow_search_distance_scales_with_projection_distance() {
        let collection = Sentinel2Sr::new().with_cloud_proj_dist(2.0).load(&aoi());
        let serialized =
            serde_json::to_string(collection.expr()).expect("serialization failed");
        // 2 km at the 100 m transform scale -> 20 steps.
        assert!(serialized.contains("\"maxDistance\":{\"constantValue\":20}"));
    }

    #[test]
    fn fractional_projection_distance_rounds_to_whole_steps() {
        assert_eq!(
            Sentinel2Sr::new().with_cloud_proj_dist(1.55).shadow_search_steps(),
            16
        );
        assert_eq!(
            Sentinel2Sr::new().with_cloud_proj_dist(1.54).shadow_search_steps(),
            15
        );
        assert_eq!(
            Sentinel2Sr::new().with_cloud_proj_dist(-1.0).shadow_search_steps(),
            0
        );
    }
}
