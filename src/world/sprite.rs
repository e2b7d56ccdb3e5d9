//! Roadside scenery sprites and the sprite asset registry

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use super::object::{draw_billboard, WorldObject};
use crate::render::{Color, Framebuffer, Texture};
use crate::road::ScreenPoint;
use crate::settings::RoadSettings;

/// Registry entry as written in the RON manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteAssetData {
    /// Image file, relative to the sprite directory
    pub path: String,
    /// Footprint in world units
    pub width: f32,
    pub height: f32,
    /// Flat colour used when the image is unavailable
    pub tint: Color,
    /// Collecting this sprite awards a bonus
    #[serde(default)]
    pub bonus: bool,
    /// Struck sprites swap to their alternate artwork instead of vanishing
    #[serde(default)]
    pub destructible: bool,
    /// Image shown once a destructible sprite has been struck
    #[serde(default)]
    pub struck_path: Option<String>,
}

/// A loaded registry entry: the manifest data plus decoded textures.
/// Asset identity is the registry key.
#[derive(Debug)]
pub struct SpriteAsset {
    pub width: f32,
    pub height: f32,
    pub tint: Color,
    pub bonus: bool,
    pub destructible: bool,
    pub texture: Option<Texture>,
    pub struck_texture: Option<Texture>,
}

/// Error type for sprite registry loading
#[derive(Debug)]
pub enum LibraryError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
}

impl From<std::io::Error> for LibraryError {
    fn from(e: std::io::Error) -> Self {
        LibraryError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for LibraryError {
    fn from(e: ron::error::SpannedError) -> Self {
        LibraryError::ParseError(e)
    }
}

impl std::fmt::Display for LibraryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LibraryError::IoError(e) => write!(f, "IO error: {}", e),
            LibraryError::ParseError(e) => write!(f, "Parse error: {}", e),
        }
    }
}

/// Name -> asset registry shared by every sprite on the track
#[derive(Debug, Default)]
pub struct SpriteLibrary {
    assets: HashMap<String, Rc<SpriteAsset>>,
}

impl SpriteLibrary {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the RON manifest and decode each referenced image. A missing or
    /// broken image is reported and the asset keeps its tint fallback, so
    /// one bad file never takes the whole registry down.
    pub fn load<P: AsRef<Path>>(manifest: P, image_dir: P) -> Result<Self, LibraryError> {
        let contents = fs::read_to_string(manifest)?;
        let entries: HashMap<String, SpriteAssetData> = ron::from_str(&contents)?;
        let image_dir = image_dir.as_ref();

        let mut assets = HashMap::with_capacity(entries.len());
        for (name, data) in entries {
            let texture = match Texture::from_file(image_dir.join(&data.path)) {
                Ok(tex) => {
                    println!("Loaded sprite: {} ({}x{})", name, tex.width, tex.height);
                    Some(tex)
                }
                Err(e) => {
                    eprintln!("{}, using tint fallback", e);
                    None
                }
            };
            let struck_texture = data.struck_path.as_ref().and_then(|p| {
                Texture::from_file(image_dir.join(p))
                    .map_err(|e| eprintln!("{}, struck variant ignored", e))
                    .ok()
            });

            assets.insert(
                name,
                Rc::new(SpriteAsset {
                    width: data.width,
                    height: data.height,
                    tint: data.tint,
                    bonus: data.bonus,
                    destructible: data.destructible,
                    texture,
                    struck_texture,
                }),
            );
        }

        Ok(Self { assets })
    }

    pub fn get(&self, name: &str) -> Option<Rc<SpriteAsset>> {
        self.assets.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

/// Identity of a placed sprite, unique within a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteId(pub u32);

/// A piece of scenery anchored to one segment
#[derive(Debug, Clone)]
pub struct Sprite {
    pub id: SpriteId,
    pub asset: Rc<SpriteAsset>,
    /// Lateral offset from the road centre in road-width units
    pub offset: f32,
    /// Extra elevation above the road surface, world units
    pub offset_y: f32,
    /// Set once a destructible sprite has been struck
    pub hit: bool,
}

impl Sprite {
    pub fn new(id: SpriteId, asset: Rc<SpriteAsset>, offset: f32, offset_y: f32) -> Self {
        Self {
            id,
            asset,
            offset,
            offset_y,
            hit: false,
        }
    }

    pub fn is_bonus(&self) -> bool {
        self.asset.bonus
    }

    /// Mark a destructible sprite as struck; other sprites are unaffected.
    pub fn strike(&mut self) {
        if self.asset.destructible {
            self.hit = true;
        }
    }
}

impl WorldObject for Sprite {
    fn render(
        &self,
        fb: &mut Framebuffer,
        settings: &RoadSettings,
        anchor: &ScreenPoint,
        clip_y: f32,
    ) {
        let texture = if self.hit {
            self.asset
                .struck_texture
                .as_ref()
                .or(self.asset.texture.as_ref())
        } else {
            self.asset.texture.as_ref()
        };
        draw_billboard(
            fb,
            settings,
            anchor,
            clip_y,
            texture,
            self.asset.tint,
            self.asset.width,
            self.asset.height,
            self.offset,
            self.offset_y,
        );
    }
}

#[cfg(test)]
pub(crate) fn test_asset() -> Rc<SpriteAsset> {
    Rc::new(SpriteAsset {
        width: 400.0,
        height: 600.0,
        tint: Color::new(180, 60, 60),
        bonus: false,
        destructible: false,
        texture: None,
        struck_texture: None,
    })
}
