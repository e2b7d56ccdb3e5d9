//! Road segments: one fixed-depth slice of track
//!
//! A segment owns its two boundary lines, the palette stripe it was built
//! with and whatever is standing on it. It knows how to project itself for
//! the current camera, decide whether it should be skipped, and paint its
//! grass band, road surface and world objects.

use super::line::{Line, ProjectionError};
use crate::render::{Framebuffer, Trapezoid};
use crate::settings::{RoadSettings, SegmentPalette};
use crate::world::{Competitor, Sprite, SpriteId, WorldObject};

pub struct Segment {
    /// Position within the track sequence
    pub index: usize,
    /// Signed curvature applied while this segment is ahead of the camera
    pub curve: f32,
    /// Palette stripe resolved once at construction
    pub palette: SegmentPalette,
    /// Far boundary edge
    pub top: Line,
    /// Near boundary edge
    pub bottom: Line,
    /// Scenery anchored to this slice
    pub sprites: Vec<Sprite>,
    /// Rivals currently occupying this slice
    pub competitors: Vec<Competitor>,
    /// Crest clip horizon recorded by the compositor, bottom-up pixels
    pub clip: f32,
}

impl Segment {
    /// Build the segment spanning elevations `start_y..end_y`, one
    /// segment-depth into the track per index step.
    pub fn new(
        palette: SegmentPalette,
        index: usize,
        curve: f32,
        start_y: f32,
        end_y: f32,
        segment_height: f32,
    ) -> Self {
        Self {
            index,
            curve,
            palette,
            top: Line::new(end_y, index + 1, segment_height),
            bottom: Line::new(start_y, index, segment_height),
            sprites: Vec::new(),
            competitors: Vec::new(),
            clip: 0.0,
        }
    }

    /// Project both boundary lines for the current camera.
    ///
    /// The far edge leans by the extra `curve_delta`, which is what bends a
    /// run of straight trapezoids into the visual curve; the near edge uses
    /// the accumulated `curve` alone, so it always meets the previous
    /// segment's far edge exactly.
    pub fn project(
        &mut self,
        settings: &RoadSettings,
        camera_x: f32,
        curve: f32,
        curve_delta: f32,
        position: f32,
        player_y: f32,
    ) -> Result<(), ProjectionError> {
        self.top
            .project(settings, camera_x - curve - curve_delta, position, player_y)?;
        self.bottom
            .project(settings, camera_x - curve, position, player_y)
    }

    /// True when this segment must not be drawn: at or behind the near
    /// plane, fully hidden behind the terrain already drawn (`y_coverage`
    /// is the running occlusion horizon), or projected inside-out.
    pub fn should_ignore(&self, settings: &RoadSettings, y_coverage: f32) -> bool {
        self.top.camera.z <= settings.camera_depth
            || self.top.screen.y <= y_coverage
            || self.bottom.screen.y >= self.top.screen.y
    }

    /// Paint the full-width grass band behind the road for this slice.
    pub fn render_grass(&self, fb: &mut Framebuffer, settings: &RoadSettings) {
        let height = self.top.screen.y - self.bottom.screen.y;
        let y = settings.dimensions.1 as f32 - self.top.screen.y;

        fb.fill_rect(
            0,
            y as i32,
            settings.dimensions.0 as i32,
            height as i32,
            self.palette.grass,
        );
    }

    /// Paint the road surface: the road trapezoid, footpath strips and
    /// gutter lines on both sides, and the interior lane separators on the
    /// striped parity.
    pub fn render_road(&self, fb: &mut Framebuffer, settings: &RoadSettings) {
        let top = &self.top.screen;
        let bottom = &self.bottom.screen;
        let y_top = settings.dimensions.1 as f32 - top.y;
        let y_bottom = settings.dimensions.1 as f32 - bottom.y;

        // Road.
        fb.fill_trapezoid(
            &Trapezoid::new(
                (bottom.x - bottom.w, y_bottom),
                (bottom.x + bottom.w, y_bottom),
                (top.x + top.w, y_top),
                (top.x - top.w, y_top),
            ),
            self.palette.road,
        );

        let footpath_ratio = settings.lanes as f32 / 2.8;
        let top_footpath_w = top.w / footpath_ratio;
        let bottom_footpath_w = bottom.w / footpath_ratio;

        // Left footpath strip.
        fb.fill_trapezoid(
            &Trapezoid::new(
                (bottom.x - bottom.w - bottom_footpath_w, y_bottom),
                (bottom.x - bottom.w, y_bottom),
                (top.x - top.w, y_top),
                (top.x - top.w - top_footpath_w, y_top),
            ),
            self.palette.footpath,
        );

        // Left gutter: a zero-width strip at the road/footpath boundary,
        // rendered per row so it clips like every other quad.
        fb.fill_trapezoid(
            &Trapezoid::new(
                (bottom.x - bottom.w, y_bottom),
                (bottom.x - bottom.w, y_bottom),
                (top.x - top.w, y_top),
                (top.x - top.w, y_top),
            ),
            settings.colours.gutter,
        );

        // Right footpath strip.
        fb.fill_trapezoid(
            &Trapezoid::new(
                (bottom.x + bottom.w, y_bottom),
                (bottom.x + bottom.w + bottom_footpath_w, y_bottom),
                (top.x + top.w + top_footpath_w, y_top),
                (top.x + top.w, y_top),
            ),
            self.palette.footpath,
        );

        // Right gutter.
        fb.fill_trapezoid(
            &Trapezoid::new(
                (bottom.x + bottom.w, y_bottom),
                (bottom.x + bottom.w, y_bottom),
                (top.x + top.w, y_top),
                (top.x + top.w, y_top),
            ),
            settings.colours.gutter,
        );

        for quad in self.lane_separators(settings) {
            fb.fill_trapezoid(&quad, self.palette.line);
        }
    }

    /// Interior lane separators for this segment. Striped on and off every
    /// `rumble_length` segments; the widths converge in perspective because
    /// they are computed independently at each edge.
    pub fn lane_separators(&self, settings: &RoadSettings) -> Vec<Trapezoid> {
        if (self.index / settings.rumble_length as usize) % 2 != 0 {
            return Vec::new();
        }

        let top = &self.top.screen;
        let bottom = &self.bottom.screen;
        let y_top = settings.dimensions.1 as f32 - top.y;
        let y_bottom = settings.dimensions.1 as f32 - bottom.y;

        let lanes = settings.lanes as f32;
        let top_line_w = top.w / (lanes * 8.0);
        let bottom_line_w = bottom.w / (lanes * 8.0);
        let step = 1.0 / lanes;

        let mut quads = Vec::with_capacity(settings.lanes as usize - 1);
        for lane in 0..settings.lanes - 1 {
            let lane_percent = step * (lane + 1) as f32;
            let lane_bottom_w = (bottom.w * 2.0) * lane_percent;
            let lane_top_w = (top.w * 2.0) * lane_percent;
            let bottom_left = bottom.x - bottom.w + lane_bottom_w;
            let top_left = top.x - top.w + lane_top_w;

            quads.push(Trapezoid::new(
                (bottom_left, y_bottom),
                (bottom_left + bottom_line_w, y_bottom),
                (top_left + top_line_w, y_top),
                (top_left, y_top),
            ));
        }
        quads
    }

    /// Render everything standing on this slice, scenery first so
    /// competitors draw on top of it.
    pub fn render_world_objects(&self, fb: &mut Framebuffer, settings: &RoadSettings) {
        for sprite in &self.sprites {
            sprite.render(fb, settings, &self.bottom.screen, self.clip);
        }
        for competitor in &self.competitors {
            competitor.render(fb, settings, &self.bottom.screen, self.clip);
        }
    }

    /// Permanently remove the sprite with the given id. Removing a sprite
    /// that is not here is a no-op, so cleanup stays idempotent when
    /// gameplay has already taken it elsewhere.
    pub fn remove_sprite(&mut self, id: SpriteId) {
        if let Some(at) = self.sprites.iter().position(|s| s.id == id) {
            self.sprites.remove(at);
        }
    }
}
