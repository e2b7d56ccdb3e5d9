//! Rival racers occupying track segments

use std::rc::Rc;

use super::object::{draw_billboard, WorldObject};
use super::sprite::SpriteAsset;
use crate::render::Framebuffer;
use crate::road::ScreenPoint;
use crate::settings::RoadSettings;

/// A rival racer. Lives in the competitor collection of whichever segment
/// its `position` currently falls in; the track moves it between segments
/// as it advances. Drawn after scenery so it stays on top.
#[derive(Debug, Clone)]
pub struct Competitor {
    pub asset: Rc<SpriteAsset>,
    /// Forward position along the lap, world units
    pub position: f32,
    /// Forward speed, world units per second
    pub speed: f32,
    /// Lateral offset in road-width units
    pub offset: f32,
}

impl Competitor {
    pub fn new(asset: Rc<SpriteAsset>, position: f32, speed: f32, offset: f32) -> Self {
        Self {
            asset,
            position,
            speed,
            offset,
        }
    }
}

impl WorldObject for Competitor {
    fn render(
        &self,
        fb: &mut Framebuffer,
        settings: &RoadSettings,
        anchor: &ScreenPoint,
        clip_y: f32,
    ) {
        draw_billboard(
            fb,
            settings,
            anchor,
            clip_y,
            self.asset.texture.as_ref(),
            self.asset.tint,
            self.asset.width,
            self.asset.height,
            self.offset,
            0.0,
        );
    }
}
