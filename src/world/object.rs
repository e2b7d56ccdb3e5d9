//! Shared render contract for things standing on the road

use crate::render::{Color, Framebuffer, Texture};
use crate::road::ScreenPoint;
use crate::settings::RoadSettings;

/// Anything rendered standing on a segment: scenery sprites and
/// competitors. The segment hands each object its near-edge screen record
/// and the clip horizon; the object does its own scaling and placement.
pub trait WorldObject {
    fn render(
        &self,
        fb: &mut Framebuffer,
        settings: &RoadSettings,
        anchor: &ScreenPoint,
        clip_y: f32,
    );
}

/// Draw a perspective-scaled billboard anchored to the road surface.
///
/// `offset` is lateral placement in road-width units (-1 puts the centre on
/// the left road edge), `offset_y` extra elevation in world units. Rows at
/// or below the crest clip row are already covered by nearer terrain and
/// are skipped; `clip_y` is that horizon in bottom-up screen coordinates.
/// Without a texture the billboard is drawn as a flat silhouette so scenes
/// stay legible when artwork is missing.
pub(crate) fn draw_billboard(
    fb: &mut Framebuffer,
    settings: &RoadSettings,
    anchor: &ScreenPoint,
    clip_y: f32,
    texture: Option<&Texture>,
    tint: Color,
    world_w: f32,
    world_h: f32,
    offset: f32,
    offset_y: f32,
) {
    let scale = anchor.scale;
    if scale <= 0.0 {
        // Anchor behind the eye plane; the segment was kept only because its
        // far edge is visible. Nothing sensible to draw.
        return;
    }

    let half_w = settings.half_width();
    let half_h = settings.half_height();
    let w = (scale * world_w * half_w).round();
    let h = (scale * world_h * half_h).round();
    if w < 1.0 || h < 1.0 {
        return;
    }

    let centre_x = anchor.x + scale * offset * settings.road_width * half_w;
    let base_row = fb.height as f32 - anchor.y - scale * offset_y * half_h;
    let clip_row = fb.height as f32 - clip_y;

    // Clip in 64 bits: a billboard right at the near plane can blow far
    // past i32 pixel space.
    let x_start = (centre_x - w * 0.5).round() as i64;
    let x_end = x_start + w as i64;
    let y_start = (base_row - h).round() as i64;
    let y_end = ((base_row.min(clip_row).round() as i64).min(fb.height as i64)).max(0);

    for y in y_start.max(0)..y_end {
        let v = (y - y_start) as f32 / h;
        for x in x_start.max(0)..x_end.min(fb.width as i64) {
            let colour = match texture {
                Some(tex) => {
                    let u = (x - x_start) as f32 / w;
                    tex.sample(u, v)
                }
                None => tint,
            };
            if colour.a < 8 {
                continue;
            }
            fb.set_pixel(x as usize, y as usize, colour);
        }
    }
}
