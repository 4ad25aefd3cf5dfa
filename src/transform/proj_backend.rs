use super::{CoordinateTransform, ProjectionError, TransformProvider};
use crate::utils::coordinates::parse_epsg_code;
use ::proj4rs::proj::Proj;
use ::proj4rs::transform::transform;
use std::fmt;
use std::sync::Arc;

/// proj.4 definition for the CRS codes this tool handles.
///
/// ETRS89 is realised as GRS80 with a null shift to WGS84.
pub fn proj_definition(epsg: u32) -> Option<String> {
    match epsg {
        4258 => Some("+proj=longlat +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +no_defs".to_string()),
        4326 => Some("+proj=longlat +datum=WGS84 +no_defs".to_string()),
        25829..=25831 => Some(format!(
            "+proj=utm +zone={} +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs",
            epsg - 25800
        )),
        _ => None,
    }
}

fn is_geographic(epsg: u32) -> bool {
    matches!(epsg, 4258 | 4326)
}

/// Builds [`Proj4rsTransform`] handles from `EPSG:<code>` strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct Proj4rsProvider;

impl Proj4rsProvider {
    pub fn new() -> Self {
        Self
    }
}

impl TransformProvider for Proj4rsProvider {
    fn create(
        &self,
        source_crs: &str,
        target_crs: &str,
    ) -> Result<Arc<dyn CoordinateTransform>, ProjectionError> {
        Ok(Arc::new(Proj4rsTransform::new(source_crs, target_crs)?))
    }
}

/// Forward transform between two proj.4 definitions.
pub struct Proj4rsTransform {
    source_proj: Proj,
    target_proj: Proj,
    source_crs: String,
    target_crs: String,
    /// Source uses degrees (needs radian conversion)
    source_is_geographic: bool,
    /// Target uses degrees (needs degree conversion back)
    target_is_geographic: bool,
}

impl fmt::Debug for Proj4rsTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proj4rsTransform")
            .field("source_crs", &self.source_crs)
            .field("target_crs", &self.target_crs)
            .finish_non_exhaustive()
    }
}

impl Proj4rsTransform {
    pub fn new(source_crs: &str, target_crs: &str) -> Result<Self, ProjectionError> {
        let (source_epsg, source_proj) = Self::build_proj(source_crs, target_crs, source_crs)?;
        let (target_epsg, target_proj) = Self::build_proj(source_crs, target_crs, target_crs)?;

        Ok(Self {
            source_proj,
            target_proj,
            source_crs: source_crs.to_string(),
            target_crs: target_crs.to_string(),
            source_is_geographic: is_geographic(source_epsg),
            target_is_geographic: is_geographic(target_epsg),
        })
    }

    fn build_proj(
        source_crs: &str,
        target_crs: &str,
        code: &str,
    ) -> Result<(u32, Proj), ProjectionError> {
        let epsg = parse_epsg_code(code)
            .ok_or_else(|| ProjectionError::UnsupportedCrs(code.to_string()))?;
        let definition = proj_definition(epsg)
            .ok_or_else(|| ProjectionError::UnsupportedCrs(code.to_string()))?;
        let proj = Proj::from_proj_string(&definition).map_err(|e| ProjectionError::Initialization {
            source_crs: source_crs.to_string(),
            target_crs: target_crs.to_string(),
            message: format!("{:?}", e),
        })?;
        Ok((epsg, proj))
    }

    /// Transform a single point.
    pub fn transform_point(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        let (in_x, in_y) = if self.source_is_geographic {
            (x.to_radians(), y.to_radians())
        } else {
            (x, y)
        };

        let mut point = (in_x, in_y, 0.0);
        transform(&self.source_proj, &self.target_proj, &mut point).map_err(|e| {
            ProjectionError::Transform {
                x,
                y,
                message: format!("{:?}", e),
            }
        })?;

        let (out_x, out_y) = if self.target_is_geographic {
            (point.0.to_degrees(), point.1.to_degrees())
        } else {
            (point.0, point.1)
        };

        if !out_x.is_finite() || !out_y.is_finite() {
            return Err(ProjectionError::NonFinite { x, y });
        }
        Ok((out_x, out_y))
    }
}

impl CoordinateTransform for Proj4rsTransform {
    fn transform(&self, xs: &[f64], ys: &[f64]) -> Result<(Vec<f64>, Vec<f64>), ProjectionError> {
        if xs.len() != ys.len() {
            return Err(ProjectionError::LengthMismatch {
                x_len: xs.len(),
                y_len: ys.len(),
            });
        }

        let mut out_x = Vec::with_capacity(xs.len());
        let mut out_y = Vec::with_capacity(ys.len());
        for (&x, &y) in xs.iter().zip(ys) {
            let (px, py) = self.transform_point(x, y)?;
            out_x.push(px);
            out_y.push(py);
        }
        Ok((out_x, out_y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_reference_point_zone_31() {
        let t = Proj4rsTransform::new("EPSG:4258", "EPSG:25831").unwrap();
        let (x, y) = t.transform_point(1.03335, 41.84346).unwrap();
        assert_abs_diff_eq!(x, 336724.563, epsilon = 0.01);
        assert_abs_diff_eq!(y, 4634265.720, epsilon = 0.01);
    }

    #[test]
    fn test_central_meridian_maps_to_false_easting() {
        // Zone 30 central meridian is 3°W
        let t = Proj4rsTransform::new("EPSG:4258", "EPSG:25830").unwrap();
        let (x, _) = t.transform_point(-3.0, 40.0).unwrap();
        assert_abs_diff_eq!(x, 500000.0, epsilon = 0.001);
    }

    #[test]
    fn test_batch_matches_single_points() {
        let t = Proj4rsTransform::new("EPSG:4326", "EPSG:25829").unwrap();
        let lons = [-8.0, -7.5];
        let lats = [43.0, 42.0];
        let (xs, ys) = t.transform(&lons, &lats).unwrap();
        for i in 0..2 {
            let (x, y) = t.transform_point(lons[i], lats[i]).unwrap();
            assert_eq!(xs[i], x);
            assert_eq!(ys[i], y);
        }
    }

    #[test]
    fn test_length_mismatch() {
        let t = Proj4rsTransform::new("EPSG:4258", "EPSG:25831").unwrap();
        let err = t.transform(&[1.0, 2.0], &[41.0]).unwrap_err();
        assert_eq!(err, ProjectionError::LengthMismatch { x_len: 2, y_len: 1 });
    }

    #[test]
    fn test_unsupported_crs() {
        let err = Proj4rsTransform::new("EPSG:999999", "EPSG:25831").unwrap_err();
        assert_eq!(err, ProjectionError::UnsupportedCrs("EPSG:999999".to_string()));
        assert!(Proj4rsProvider::new().create("EPSG:4258", "EPSG:25832").is_err());
    }

    #[test]
    fn test_proj_definition() {
        assert!(proj_definition(25830).unwrap().contains("+zone=30"));
        assert!(proj_definition(23030).is_none());
    }
}
