use crate::foundation::config::ProjectionConfig;
use crate::foundation::core::{GeoPoint, GridPoint};

/// Affine mapping from solver grid space to geographic coordinates.
///
/// `lat = base_lat + y * scale`, `lng = base_lng + x * scale`. Pure and total over finite input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateProjector {
    base_lat: f64,
    base_lng: f64,
    scale: f64,
}

impl CoordinateProjector {
    /// Construct a projector from explicit constants.
    pub const fn new(base_lat: f64, base_lng: f64, scale: f64) -> Self {
        Self {
            base_lat,
            base_lng,
            scale,
        }
    }

    /// Construct a projector from config.
    pub fn from_config(cfg: &ProjectionConfig) -> Self {
        Self::new(cfg.base_lat, cfg.base_lng, cfg.scale)
    }

    /// Project a grid coordinate pair.
    pub fn project(&self, x: f64, y: f64) -> GeoPoint {
        GeoPoint {
            lat: self.base_lat + y * self.scale,
            lng: self.base_lng + x * self.scale,
        }
    }

    /// Project a grid point.
    pub fn project_point(&self, p: GridPoint) -> GeoPoint {
        self.project(p.x, p.y)
    }

    /// Project a whole polyline.
    pub fn project_path(&self, path: &[GridPoint]) -> Vec<GeoPoint> {
        path.iter().map(|p| self.project_point(*p)).collect()
    }
}

impl Default for CoordinateProjector {
    fn default() -> Self {
        Self::from_config(&ProjectionConfig::default())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/projector.rs"]
mod tests;
