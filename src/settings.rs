//! Render settings and colour schemes
//!
//! One immutable bundle of the projection constants, road proportions and
//! palette table. Loaded from RON at startup with a default fallback, then
//! treated as read-only for the whole session.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::render::Color;

/// Colours for one palette stripe of the road
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SegmentPalette {
    pub road: Color,
    pub grass: Color,
    pub footpath: Color,
    pub line: Color,
}

/// Full colour table: two alternating stripe palettes plus shared colours
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ColourScheme {
    pub light: SegmentPalette,
    pub dark: SegmentPalette,
    /// Gutter line at the road/footpath boundary, shared by both stripes
    pub gutter: Color,
    pub sky: Color,
}

impl ColourScheme {
    /// Palette a segment captures at construction. Stripes alternate every
    /// `rumble_length` segments, in step with the lane-marking parity.
    pub fn palette_for(&self, index: usize, rumble_length: u32) -> SegmentPalette {
        if (index / rumble_length as usize) % 2 == 0 {
            self.light
        } else {
            self.dark
        }
    }
}

impl Default for ColourScheme {
    fn default() -> Self {
        Self {
            light: SegmentPalette {
                road: Color::new(100, 100, 100),
                grass: Color::new(16, 170, 16),
                footpath: Color::new(190, 179, 160),
                line: Color::new(255, 255, 255),
            },
            dark: SegmentPalette {
                road: Color::new(92, 92, 92),
                grass: Color::new(0, 154, 0),
                footpath: Color::new(180, 170, 152),
                line: Color::new(92, 92, 92),
            },
            gutter: Color::new(42, 40, 34),
            sky: Color::new(108, 176, 224),
        }
    }
}

/// Projection and road-shape constants, immutable for a session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoadSettings {
    /// Distance from the eye to the projection plane (perspective constant);
    /// doubles as the near clipping depth
    pub camera_depth: f32,
    /// Eye height above the road surface, world units
    pub camera_height: f32,
    /// Depth of one track segment, world units
    pub segment_height: f32,
    /// Lateral extent of the road in world units
    pub road_width: f32,
    /// Number of lanes (at least 2)
    pub lanes: u32,
    /// Segment-count period of the rumble striping
    pub rumble_length: u32,
    /// How many segments ahead of the camera get projected each frame
    pub draw_distance: usize,
    /// Output surface size in pixels (width, height)
    pub dimensions: (u32, u32),
    pub colours: ColourScheme,
}

impl RoadSettings {
    pub fn half_width(&self) -> f32 {
        self.dimensions.0 as f32 / 2.0
    }

    pub fn half_height(&self) -> f32 {
        self.dimensions.1 as f32 / 2.0
    }
}

impl Default for RoadSettings {
    fn default() -> Self {
        Self {
            camera_depth: 0.84,
            camera_height: 1000.0,
            segment_height: 200.0,
            road_width: 2000.0,
            lanes: 4,
            rumble_length: 3,
            draw_distance: 110,
            dimensions: (800, 600),
            colours: ColourScheme::default(),
        }
    }
}

/// Error type for settings loading
#[derive(Debug)]
pub enum SettingsError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        SettingsError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for SettingsError {
    fn from(e: ron::error::SpannedError) -> Self {
        SettingsError::ParseError(e)
    }
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::IoError(e) => write!(f, "IO error: {}", e),
            SettingsError::ParseError(e) => write!(f, "Parse error: {}", e),
        }
    }
}

/// Load settings from a RON file
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<RoadSettings, SettingsError> {
    let contents = fs::read_to_string(path)?;
    let settings: RoadSettings = ron::from_str(&contents)?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_alternates_every_rumble_length() {
        let scheme = ColourScheme::default();
        // rumble_length 3: indices 0..2 light, 3..5 dark, 6..8 light again.
        for index in 0..3 {
            assert_eq!(scheme.palette_for(index, 3).grass, scheme.light.grass);
        }
        for index in 3..6 {
            assert_eq!(scheme.palette_for(index, 3).grass, scheme.dark.grass);
        }
        assert_eq!(scheme.palette_for(6, 3).grass, scheme.light.grass);
    }

    #[test]
    fn test_default_settings_sane() {
        let s = RoadSettings::default();
        assert!(s.lanes >= 2);
        assert!(s.camera_depth > 0.0);
        assert_eq!(s.half_width(), s.dimensions.0 as f32 / 2.0);
    }

    #[test]
    fn test_partial_ron_falls_back_to_defaults() {
        let s: RoadSettings = ron::from_str("(lanes: 3, draw_distance: 60)").unwrap();
        assert_eq!(s.lanes, 3);
        assert_eq!(s.draw_distance, 60);
        // Everything omitted keeps its default.
        assert_eq!(s.camera_depth, RoadSettings::default().camera_depth);
        assert_eq!(s.dimensions, RoadSettings::default().dimensions);
    }
}
