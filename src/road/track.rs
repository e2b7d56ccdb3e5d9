//! Track construction, loading and bookkeeping
//!
//! A track is described in RON as a list of sections (so many segments of
//! such-and-such curvature and climb) plus sprite and competitor
//! placements, and is built once into the cyclic segment sequence the
//! compositor walks every frame.

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::fs;
use std::path::Path;

use super::segment::Segment;
use crate::settings::RoadSettings;
use crate::world::{Competitor, Sprite, SpriteId, SpriteLibrary};

/// Error type for track loading
#[derive(Debug)]
pub enum TrackError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    SerializeError(ron::Error),
}

impl From<std::io::Error> for TrackError {
    fn from(e: std::io::Error) -> Self {
        TrackError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for TrackError {
    fn from(e: ron::error::SpannedError) -> Self {
        TrackError::ParseError(e)
    }
}

impl From<ron::Error> for TrackError {
    fn from(e: ron::Error) -> Self {
        TrackError::SerializeError(e)
    }
}

impl std::fmt::Display for TrackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackError::IoError(e) => write!(f, "IO error: {}", e),
            TrackError::ParseError(e) => write!(f, "Parse error: {}", e),
            TrackError::SerializeError(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

/// One run of segments sharing a curvature and climb
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionData {
    pub length: usize,
    /// Peak signed curvature; eased in and out across the section
    #[serde(default)]
    pub curve: f32,
    /// Total elevation change over the section, world units
    #[serde(default)]
    pub hill: f32,
}

/// Scenery placement: a named sprite at a lateral offset, optionally
/// repeated every `every` segments to the end of the track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpritePlacement {
    pub name: String,
    pub segment: usize,
    pub offset: f32,
    #[serde(default)]
    pub offset_y: f32,
    #[serde(default)]
    pub every: usize,
}

/// Starting state for one rival racer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitorPlacement {
    pub name: String,
    pub segment: usize,
    pub offset: f32,
    pub speed: f32,
}

/// A track as written on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackData {
    pub name: String,
    pub sections: Vec<SectionData>,
    #[serde(default)]
    pub sprites: Vec<SpritePlacement>,
    #[serde(default)]
    pub competitors: Vec<CompetitorPlacement>,
}

/// Load a track description from a RON file
pub fn load_track<P: AsRef<Path>>(path: P) -> Result<TrackData, TrackError> {
    let contents = fs::read_to_string(path)?;
    let data: TrackData = ron::from_str(&contents)?;
    Ok(data)
}

/// Save a track description to a RON file
pub fn save_track<P: AsRef<Path>>(data: &TrackData, path: P) -> Result<(), TrackError> {
    let config = ron::ser::PrettyConfig::new().indentor("  ".to_string());
    let contents = ron::ser::to_string_pretty(data, config)?;
    fs::write(path, contents)?;
    Ok(())
}

/// Cosine ease between 0 and 1
fn ease01(t: f32) -> f32 {
    (1.0 - (t * PI).cos()) / 2.0
}

/// Hann window: 0 at both ends of a section, 1 in the middle
fn window(t: f32) -> f32 {
    (1.0 - (2.0 * PI * t).cos()) / 2.0
}

/// The cyclic segment sequence for one lap
pub struct Track {
    pub name: String,
    segments: Vec<Segment>,
    segment_height: f32,
}

impl Track {
    /// Build the segment sequence from a track description. Curvature uses
    /// a Hann window over each section so it enters and leaves smoothly;
    /// elevation eases between section endpoints so hills crest without a
    /// kink. Placements naming unknown sprites are reported and skipped.
    pub fn build(data: &TrackData, settings: &RoadSettings, library: &SpriteLibrary) -> Self {
        let total: usize = data.sections.iter().map(|s| s.length).sum();

        // Elevation at every segment boundary first, so adjacent segments
        // share their boundary elevation exactly.
        let mut boundary = Vec::with_capacity(total + 1);
        let mut base = 0.0f32;
        boundary.push(base);
        for section in &data.sections {
            for k in 1..=section.length {
                boundary.push(base + section.hill * ease01(k as f32 / section.length as f32));
            }
            base += section.hill;
        }

        let mut segments = Vec::with_capacity(total);
        let mut index = 0;
        for section in &data.sections {
            for k in 0..section.length {
                let curve =
                    section.curve * window((k as f32 + 0.5) / section.length as f32);
                segments.push(Segment::new(
                    settings.colours.palette_for(index, settings.rumble_length),
                    index,
                    curve,
                    boundary[index],
                    boundary[index + 1],
                    settings.segment_height,
                ));
                index += 1;
            }
        }

        let mut track = Self {
            name: data.name.clone(),
            segments,
            segment_height: settings.segment_height,
        };
        if track.segments.is_empty() {
            return track;
        }

        let mut next_id = 0u32;
        for placement in &data.sprites {
            let asset = match library.get(&placement.name) {
                Some(asset) => asset,
                None => {
                    eprintln!("Unknown sprite '{}' in track '{}'", placement.name, data.name);
                    continue;
                }
            };
            let stride = placement.every.max(1);
            let mut at = placement.segment;
            loop {
                let sprite = Sprite::new(
                    SpriteId(next_id),
                    asset.clone(),
                    placement.offset,
                    placement.offset_y,
                );
                next_id += 1;
                track.segment_mut(at).sprites.push(sprite);
                if placement.every == 0 {
                    break;
                }
                at += stride;
                if at >= track.len() {
                    break;
                }
            }
        }

        for placement in &data.competitors {
            let asset = match library.get(&placement.name) {
                Some(asset) => asset,
                None => {
                    eprintln!(
                        "Unknown competitor sprite '{}' in track '{}'",
                        placement.name, data.name
                    );
                    continue;
                }
            };
            let position = placement.segment as f32 * track.segment_height;
            let competitor =
                Competitor::new(asset, position, placement.speed, placement.offset);
            let at = placement.segment;
            track.segment_mut(at).competitors.push(competitor);
        }

        track
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Lap length in world units
    pub fn length(&self) -> f32 {
        self.segments.len() as f32 * self.segment_height
    }

    /// Cyclic lookup
    pub fn segment(&self, index: usize) -> &Segment {
        &self.segments[index % self.segments.len()]
    }

    pub fn segment_mut(&mut self, index: usize) -> &mut Segment {
        let n = self.segments.len();
        &mut self.segments[index % n]
    }

    pub fn curve_at(&self, index: usize) -> f32 {
        self.segment(index).curve
    }

    /// Index of the segment containing a forward position
    pub fn index_at(&self, position: f32) -> usize {
        (position / self.segment_height).floor() as usize % self.segments.len()
    }

    /// Wrap a forward position into [0, lap length)
    pub fn wrap_position(&self, position: f32) -> f32 {
        let length = self.length();
        position.rem_euclid(length)
    }

    /// Road elevation at a forward position, interpolated across the
    /// containing segment.
    pub fn elevation_at(&self, position: f32) -> f32 {
        let position = self.wrap_position(position);
        let segment = self.segment(self.index_at(position));
        let t = (position % self.segment_height) / self.segment_height;
        segment.bottom.world.y + (segment.top.world.y - segment.bottom.world.y) * t
    }

    /// Advance every competitor and move those that crossed into another
    /// segment. Runs between frames, never during a draw pass.
    pub fn advance_competitors(&mut self, dt: f32) {
        let n = self.segments.len();
        let length = self.length();
        let segment_height = self.segment_height;

        let mut moved: Vec<(usize, Competitor)> = Vec::new();
        for i in 0..n {
            let seg = &mut self.segments[i];
            let mut j = 0;
            while j < seg.competitors.len() {
                let competitor = &mut seg.competitors[j];
                competitor.position =
                    (competitor.position + competitor.speed * dt).rem_euclid(length);
                let new_index = (competitor.position / segment_height).floor() as usize % n;
                if new_index != i {
                    let competitor = seg.competitors.remove(j);
                    moved.push((new_index, competitor));
                } else {
                    j += 1;
                }
            }
        }
        for (index, competitor) in moved {
            self.segments[index].competitors.push(competitor);
        }
    }
}

/// Built-in track used when no file is available
pub fn demo_track_data() -> TrackData {
    TrackData {
        name: "Seafront".to_string(),
        sections: vec![
            SectionData { length: 20, curve: 0.0, hill: 0.0 },
            SectionData { length: 30, curve: 4.0, hill: 0.0 },
            SectionData { length: 25, curve: 0.0, hill: 1500.0 },
            SectionData { length: 25, curve: -4.0, hill: -1500.0 },
            SectionData { length: 20, curve: 2.0, hill: 800.0 },
            SectionData { length: 30, curve: -2.0, hill: -800.0 },
            SectionData { length: 10, curve: 0.0, hill: 0.0 },
        ],
        sprites: vec![
            SpritePlacement {
                name: "palm".to_string(),
                segment: 4,
                offset: -1.6,
                offset_y: 0.0,
                every: 9,
            },
            SpritePlacement {
                name: "palm".to_string(),
                segment: 7,
                offset: 1.7,
                offset_y: 0.0,
                every: 11,
            },
            SpritePlacement {
                name: "billboard".to_string(),
                segment: 45,
                offset: 1.9,
                offset_y: 0.0,
                every: 0,
            },
            SpritePlacement {
                name: "cone".to_string(),
                segment: 72,
                offset: -0.6,
                offset_y: 0.0,
                every: 0,
            },
        ],
        competitors: vec![
            CompetitorPlacement {
                name: "rival".to_string(),
                segment: 6,
                offset: 0.3,
                speed: 2600.0,
            },
            CompetitorPlacement {
                name: "rival".to_string(),
                segment: 12,
                offset: -0.4,
                speed: 2300.0,
            },
        ],
    }
}
