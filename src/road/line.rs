//! Segment boundary lines and the perspective transform
//!
//! A `Line` is one edge of a road slice. It carries three fixed-shape
//! coordinate records: the world position set at track build time, and the
//! camera/screen values overwritten by `project` every frame.

use serde::{Deserialize, Serialize};

use crate::settings::RoadSettings;

/// World-space position of a boundary line
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct WorldPoint {
    /// Lateral offset from the road centre (0 for the road itself)
    pub x: f32,
    /// Elevation
    pub y: f32,
    /// Distance along the track
    pub z: f32,
}

/// World position minus camera position, recomputed every frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Projected screen values, overwritten every frame.
///
/// `x`/`y`/`w` hold whole-pixel values; `y` is measured upward from the
/// bottom of the screen. `scale` is the raw perspective factor.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScreenPoint {
    /// Horizontal pixel centre
    pub x: f32,
    /// Vertical pixel position, bottom-up
    pub y: f32,
    /// Half-width of the road in pixels
    pub w: f32,
    /// Perspective scale factor (camera_depth / camera.z)
    pub scale: f32,
}

/// Degenerate projection input. The perspective divide with a zero or
/// non-finite camera depth would emit garbage coordinates that show up as
/// visual corruption, so it fails loudly instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionError {
    DegenerateDepth { z: f32 },
}

impl std::fmt::Display for ProjectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectionError::DegenerateDepth { z } => {
                write!(f, "degenerate camera depth {} in projection", z)
            }
        }
    }
}

/// One boundary edge of a segment
#[derive(Debug, Clone)]
pub struct Line {
    pub world: WorldPoint,
    pub camera: CameraPoint,
    pub screen: ScreenPoint,
}

impl Line {
    /// Build a line at the given elevation, `depth_index` segment-depths
    /// into the track.
    pub fn new(elevation: f32, depth_index: usize, segment_height: f32) -> Self {
        Self {
            world: WorldPoint {
                x: 0.0,
                y: elevation,
                z: depth_index as f32 * segment_height,
            },
            camera: CameraPoint::default(),
            screen: ScreenPoint::default(),
        }
    }

    /// Project the stored world position into screen coordinates.
    ///
    /// Screen x/y/w are rounded half-away-from-zero (`f32::round`) to whole
    /// pixels; the single rounding site keeps sub-pixel boundaries stable
    /// from frame to frame. A negative camera depth is legal here (such
    /// lines are discarded by culling before their screen values are used);
    /// zero or non-finite depth is a contract violation.
    pub fn project(
        &mut self,
        settings: &RoadSettings,
        camera_x: f32,
        camera_z: f32,
        player_y: f32,
    ) -> Result<(), ProjectionError> {
        let half_w = settings.half_width();
        let half_h = settings.half_height();

        self.camera.x = self.world.x - camera_x;
        self.camera.y = self.world.y - (settings.camera_height + player_y);
        self.camera.z = self.world.z - camera_z;

        if self.camera.z == 0.0 || !self.camera.z.is_finite() {
            return Err(ProjectionError::DegenerateDepth { z: self.camera.z });
        }

        let scale = settings.camera_depth / self.camera.z;
        self.screen.scale = scale;
        self.screen.x = (half_w + scale * self.camera.x * half_w).round();
        self.screen.y = (half_h + scale * self.camera.y * half_h).round();
        self.screen.w = (scale * settings.road_width * half_w).round();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> RoadSettings {
        RoadSettings::default()
    }

    #[test]
    fn test_scale_positive_and_decreasing_with_depth() {
        let s = settings();
        let mut previous = f32::INFINITY;
        for depth in [1.0, 10.0, 250.0, 4000.0, 90_000.0] {
            let mut line = Line::new(0.0, 0, s.segment_height);
            line.project(&s, 0.0, -depth, 0.0).unwrap();
            assert!(line.screen.scale > 0.0);
            assert!(line.screen.scale < previous);
            previous = line.screen.scale;
        }
    }

    #[test]
    fn test_projection_centres_straight_road() {
        // 800x600, depth 0.84, camera height 1000, road width 2000; a line
        // one unit ahead on the centreline lands on the exact screen centre
        // column with the half-width the formula demands.
        let s = settings();
        let mut line = Line::new(0.0, 0, s.segment_height);
        line.project(&s, 0.0, -1.0, 0.0).unwrap();

        assert_eq!(line.camera.z, 1.0);
        assert_eq!(line.screen.scale, 0.84);
        assert_eq!(line.screen.x, 400.0);
        assert_eq!(line.screen.w, (0.84f32 * 2000.0 * 400.0).round());
    }

    #[test]
    fn test_project_is_idempotent() {
        let s = settings();
        let mut line = Line::new(35.0, 4, s.segment_height);
        line.project(&s, 120.0, 310.0, 18.0).unwrap();
        let camera = line.camera;
        let screen = line.screen;
        line.project(&s, 120.0, 310.0, 18.0).unwrap();
        assert_eq!(line.camera, camera);
        assert_eq!(line.screen, screen);
    }

    #[test]
    fn test_zero_depth_fails_loudly() {
        let s = settings();
        let mut line = Line::new(0.0, 2, s.segment_height);
        let at_line = 2.0 * s.segment_height;
        assert_eq!(
            line.project(&s, 0.0, at_line, 0.0),
            Err(ProjectionError::DegenerateDepth { z: 0.0 })
        );
    }

    #[test]
    fn test_non_finite_depth_fails_loudly() {
        let s = settings();
        let mut line = Line::new(0.0, 1, s.segment_height);
        assert!(line.project(&s, 0.0, f32::NAN, 0.0).is_err());
    }

    #[test]
    fn test_lateral_offset_shifts_screen_x() {
        let s = settings();
        let mut line = Line::new(0.0, 0, s.segment_height);
        // Camera shifted right of the road centre pushes the line left.
        line.project(&s, 500.0, -1000.0, 0.0).unwrap();
        assert!(line.screen.x < s.half_width());
    }
}
