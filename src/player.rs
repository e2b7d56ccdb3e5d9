//! Player state driven by the game loop
//!
//! Forward speed, lap position and lateral drift; the renderer only ever
//! sees the derived camera values.

use crate::road::Track;
use crate::settings::RoadSettings;

/// Top speed, world units per second
const MAX_SPEED: f32 = 6000.0;
/// Throttle acceleration, world units per second squared
const ACCELERATION: f32 = 2400.0;
/// Brake deceleration
const BRAKING: f32 = 4200.0;
/// Coasting drag
const DRAG: f32 = 1200.0;
/// Extra drag while off the road
const OFF_ROAD_DRAG: f32 = 3600.0;
/// Off-road speed floor: drag never stalls the car completely
const OFF_ROAD_FLOOR: f32 = 900.0;
/// Full-speed steering rate, road-width units per second
const STEER_RATE: f32 = 2.2;
/// How far off the road centre the car may drift, road-width units
const MAX_DRIFT: f32 = 2.0;
/// Camera bob smoothing rate, per second
const BOB_RATE: f32 = 6.0;

/// Input state sampled once per frame
#[derive(Debug, Clone, Copy, Default)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub accelerate: bool,
    pub brake: bool,
}

pub struct Player {
    /// Forward position along the lap, world units
    pub position: f32,
    /// Forward speed, world units per second
    pub speed: f32,
    /// Lateral position in road-width units (±1 at the road edges)
    pub x: f32,
    /// Smoothed camera elevation following the road surface
    pub y: f32,
}

impl Player {
    pub fn new() -> Self {
        Self {
            // Spawn a little way past the start line so the near boundary
            // never sits at exactly zero camera depth.
            position: 2.0,
            speed: 0.0,
            x: 0.0,
            y: 0.0,
        }
    }

    /// Advance one frame of movement from the sampled controls.
    pub fn update(&mut self, controls: &Controls, track: &Track, dt: f32) {
        if controls.accelerate {
            self.speed += ACCELERATION * dt;
        } else if controls.brake {
            self.speed -= BRAKING * dt;
        } else {
            self.speed -= DRAG * dt;
        }

        // Off the road the car ploughs through gravel.
        if self.x.abs() > 1.0 && self.speed > OFF_ROAD_FLOOR {
            self.speed = (self.speed - OFF_ROAD_DRAG * dt).max(OFF_ROAD_FLOOR);
        }
        self.speed = self.speed.clamp(0.0, MAX_SPEED);

        // Steering authority grows with speed; a parked car does not slide.
        let steer = STEER_RATE * (self.speed / MAX_SPEED) * dt;
        if controls.left {
            self.x -= steer;
        }
        if controls.right {
            self.x += steer;
        }
        // Curves push the car outward.
        let curve = track.curve_at(track.index_at(track.wrap_position(self.position)));
        self.x -= curve * (self.speed / MAX_SPEED) * 0.12 * dt;
        self.x = self.x.clamp(-MAX_DRIFT, MAX_DRIFT);

        self.position = track.wrap_position(self.position + self.speed * dt);

        // Ease the camera toward the road elevation under the car.
        let target = track.elevation_at(self.position);
        self.y += (target - self.y) * (BOB_RATE * dt).min(1.0);
    }

    /// Lateral camera offset in world units.
    pub fn camera_x(&self, settings: &RoadSettings) -> f32 {
        self.x * settings.road_width
    }

    /// Speed as a fraction of the maximum, for the HUD.
    pub fn speed_fraction(&self) -> f32 {
        self.speed / MAX_SPEED
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::road::{SectionData, Track, TrackData};
    use crate::world::SpriteLibrary;

    fn flat_track(settings: &RoadSettings) -> Track {
        let data = TrackData {
            name: "flat".to_string(),
            sections: vec![SectionData { length: 20, curve: 0.0, hill: 0.0 }],
            sprites: Vec::new(),
            competitors: Vec::new(),
        };
        Track::build(&data, settings, &SpriteLibrary::empty())
    }

    #[test]
    fn test_acceleration_and_lap_wrap() {
        let settings = RoadSettings::default();
        let track = flat_track(&settings);
        let mut player = Player::new();
        let throttle = Controls { accelerate: true, ..Default::default() };

        for _ in 0..600 {
            player.update(&throttle, &track, 1.0 / 60.0);
        }
        assert!(player.speed > 0.0);
        assert!(player.position >= 0.0 && player.position < track.length());
    }

    #[test]
    fn test_off_road_drag_caps_speed() {
        let settings = RoadSettings::default();
        let track = flat_track(&settings);
        let mut player = Player::new();
        player.x = 1.5;
        player.speed = MAX_SPEED;
        let throttle = Controls { accelerate: true, ..Default::default() };

        for _ in 0..300 {
            player.update(&throttle, &track, 1.0 / 60.0);
        }
        assert!(player.speed <= OFF_ROAD_FLOOR + 50.0);
    }

    #[test]
    fn test_parked_car_does_not_steer() {
        let settings = RoadSettings::default();
        let track = flat_track(&settings);
        let mut player = Player::new();
        let hard_left = Controls { left: true, ..Default::default() };
        player.update(&hard_left, &track, 1.0 / 60.0);
        assert_eq!(player.x, 0.0);
    }
}
