//! Per-frame road drawing
//!
//! Projects the window of segments ahead of the camera (nearest first,
//! accumulating curvature and maintaining the occlusion horizon), then
//! paints the survivors farthest first so nearer geometry overdraws
//! farther geometry. One bad projection aborts the whole frame; there is
//! no partial-frame repair.

use super::line::ProjectionError;
use super::track::Track;
use crate::render::Framebuffer;
use crate::settings::RoadSettings;

/// Camera state for one frame
#[derive(Debug, Clone, Copy)]
pub struct RoadView {
    /// Forward position along the track, world units
    pub position: f32,
    /// Lateral camera offset in world units
    pub camera_x: f32,
    /// Vertical bob added to the camera height
    pub player_y: f32,
}

/// A frame aborted by a degenerate projection. The surface holds partial
/// output and must not be presented.
#[derive(Debug)]
pub struct FrameError {
    pub segment: usize,
    pub source: ProjectionError,
}

impl std::fmt::Display for FrameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "segment {}: {}", self.segment, self.source)
    }
}

/// Draw one frame of road into the framebuffer.
///
/// The sweep runs nearest to farthest: curvature accumulates segment by
/// segment (`curve` is the total lateral shift so far, `curve_delta` the
/// per-segment increment, seeded so the slice under the camera contributes
/// only its remaining fraction). Culling threads the y-coverage horizon
/// through the same sweep; a surviving segment records the horizon in
/// front of it as its sprite clip before raising it.
pub fn draw_road(
    fb: &mut Framebuffer,
    track: &mut Track,
    settings: &RoadSettings,
    view: &RoadView,
) -> Result<(), FrameError> {
    if track.is_empty() {
        return Ok(());
    }

    let n = track.len();
    let lap = track.length();
    let position = track.wrap_position(view.position);
    let base = track.index_at(position);
    let percent = (position % settings.segment_height) / settings.segment_height;

    let mut curve = 0.0f32;
    let mut curve_delta = -(track.curve_at(base) * percent);
    let mut y_coverage = 0.0f32;
    // A window longer than the lap would sweep segments twice.
    let window = settings.draw_distance.min(n);
    let mut visible: Vec<usize> = Vec::with_capacity(window);

    for step in 0..window {
        let index = (base + step) % n;
        // Segments that wrapped past the lap end sit one lap ahead.
        let camera_z = if index < base { position - lap } else { position };

        let segment = track.segment_mut(index);
        segment
            .project(
                settings,
                view.camera_x,
                curve,
                curve_delta,
                camera_z,
                view.player_y,
            )
            .map_err(|source| FrameError { segment: index, source })?;
        curve += curve_delta;
        curve_delta += segment.curve;

        if segment.should_ignore(settings, y_coverage) {
            continue;
        }
        segment.clip = y_coverage;
        y_coverage = y_coverage.max(segment.top.screen.y);
        visible.push(index);
    }

    // Terrain pass, farthest first.
    for &index in visible.iter().rev() {
        let segment = track.segment(index);
        segment.render_grass(fb, settings);
        segment.render_road(fb, settings);
    }

    // World objects in a second pass so nearer road never overdraws a
    // billboard that overhangs its segment.
    for &index in visible.iter().rev() {
        track.segment(index).render_world_objects(fb, settings);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::road::track::{demo_track_data, SectionData, Track, TrackData};
    use crate::world::SpriteLibrary;

    fn settings() -> RoadSettings {
        RoadSettings::default()
    }

    fn flat_track(s: &RoadSettings, length: usize) -> Track {
        let data = TrackData {
            name: "flat".to_string(),
            sections: vec![SectionData { length, curve: 0.0, hill: 0.0 }],
            sprites: Vec::new(),
            competitors: Vec::new(),
        };
        Track::build(&data, s, &SpriteLibrary::empty())
    }

    fn view(position: f32) -> RoadView {
        RoadView {
            position,
            camera_x: 0.0,
            player_y: 0.0,
        }
    }

    #[test]
    fn test_flat_frame_paints_road_and_grass() {
        let s = settings();
        let mut track = flat_track(&s, 200);
        let mut fb = Framebuffer::new(s.dimensions.0 as usize, s.dimensions.1 as usize);
        fb.clear(s.colours.sky);

        draw_road(&mut fb, &mut track, &s, &view(2.0)).unwrap();

        // Sky above the horizon.
        assert_eq!(fb.get_pixel(400, 50), s.colours.sky);
        // Far left at a mid-distance row lands on grass (either stripe).
        let grass = [s.colours.light.grass, s.colours.dark.grass];
        assert!(grass.contains(&fb.get_pixel(5, 320)));
        // The centre column near the bottom is road surface (road, lane
        // marking or footpath, depending on the stripe the row falls in).
        let road_family = [
            s.colours.light.road,
            s.colours.dark.road,
            s.colours.light.line,
            s.colours.dark.line,
        ];
        assert!(road_family.contains(&fb.get_pixel(400, 590)));
    }

    #[test]
    fn test_frame_is_deterministic() {
        let s = settings();
        let mut track = flat_track(&s, 120);
        let mut first = Framebuffer::new(s.dimensions.0 as usize, s.dimensions.1 as usize);
        let mut second = Framebuffer::new(s.dimensions.0 as usize, s.dimensions.1 as usize);
        first.clear(s.colours.sky);
        second.clear(s.colours.sky);

        draw_road(&mut first, &mut track, &s, &view(777.0)).unwrap();
        draw_road(&mut second, &mut track, &s, &view(777.0)).unwrap();
        assert_eq!(first.pixels, second.pixels);
    }

    #[test]
    fn test_hill_crest_culls_hidden_segments() {
        let s = settings();
        let data = TrackData {
            name: "crest".to_string(),
            sections: vec![
                SectionData { length: 10, curve: 0.0, hill: 4000.0 },
                SectionData { length: 60, curve: 0.0, hill: -4000.0 },
                SectionData { length: 50, curve: 0.0, hill: 0.0 },
            ],
            sprites: Vec::new(),
            competitors: Vec::new(),
        };
        let mut track = Track::build(&data, &s, &SpriteLibrary::empty());
        let mut fb = Framebuffer::new(s.dimensions.0 as usize, s.dimensions.1 as usize);

        draw_road(&mut fb, &mut track, &s, &view(2.0)).unwrap();

        // Climbing toward a crest, the downhill side must project below the
        // horizon already covered and be culled: segments just past the
        // crest cannot out-draw the crest itself. The crest segment's far
        // edge is the coverage peak; anything drawn after it that survives
        // must sit higher on screen.
        let mut peak = 0.0f32;
        let mut strictly_rising = true;
        let mut previous = f32::MIN;
        for index in 0..s.draw_distance.min(track.len()) {
            let top_y = track.segment(index).top.screen.y;
            if top_y > peak {
                peak = top_y;
            }
            if top_y <= previous {
                strictly_rising = false;
            }
            previous = top_y;
        }
        // A crest guarantees the projected tops are not monotonically
        // rising, which is exactly what the coverage horizon exists for.
        assert!(!strictly_rising);
        assert!(peak > 0.0);
    }

    #[test]
    fn test_wrapped_window_projects_past_lap_end() {
        let s = settings();
        let mut track = flat_track(&s, 50); // shorter than the draw window
        let mut fb = Framebuffer::new(s.dimensions.0 as usize, s.dimensions.1 as usize);
        fb.clear(s.colours.sky);

        // Near the lap end the window wraps onto the first segments.
        let position = track.length() - 3.0 * s.segment_height + 2.0;
        draw_road(&mut fb, &mut track, &s, &view(position)).unwrap();

        // The wrapped segments projected a lap ahead: their camera depth is
        // positive, so the frame still fills with road to the horizon.
        let road_family = [
            s.colours.light.road,
            s.colours.dark.road,
            s.colours.light.line,
            s.colours.dark.line,
        ];
        assert!(road_family.contains(&fb.get_pixel(400, 590)));
        assert!(track.segment(0).top.camera.z > 0.0);
    }

    #[test]
    fn test_empty_track_is_a_clean_noop() {
        let s = settings();
        let data = TrackData {
            name: "empty".to_string(),
            sections: Vec::new(),
            sprites: Vec::new(),
            competitors: Vec::new(),
        };
        let mut track = Track::build(&data, &s, &SpriteLibrary::empty());
        let mut fb = Framebuffer::new(8, 8);
        assert!(draw_road(&mut fb, &mut track, &s, &view(0.0)).is_ok());
    }

    #[test]
    fn test_demo_track_renders_every_quarter_lap() {
        let s = settings();
        let mut track = Track::build(&demo_track_data(), &s, &SpriteLibrary::empty());
        let mut fb = Framebuffer::new(s.dimensions.0 as usize, s.dimensions.1 as usize);
        let lap = track.length();
        for quarter in 0..4 {
            fb.clear(s.colours.sky);
            let position = lap * quarter as f32 / 4.0 + 2.0;
            draw_road(&mut fb, &mut track, &s, &view(position)).unwrap();
        }
    }
}
