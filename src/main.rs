//! Slipstream: arcade pseudo-3D racing engine
//!
//! Classic combat-racer rendering: the track is a cyclic sequence of road
//! segments projected into screen-space trapezoids and painted back to
//! front into a software framebuffer, which macroquad presents once per
//! frame. Steering: arrow keys; up accelerates, down brakes.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod player;
mod render;
mod road;
mod settings;
mod world;

use macroquad::prelude::*;

use player::{Controls, Player};
use render::Framebuffer;
use road::{demo_track_data, draw_road, load_track, RoadView, Track};
use settings::{load_settings, RoadSettings};
use world::SpriteLibrary;

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Slipstream v{}", VERSION),
        window_width: 800,
        window_height: 600,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let road_settings = match load_settings("assets/settings.ron") {
        Ok(s) => {
            println!("Loaded settings");
            s
        }
        Err(e) => {
            println!("Using default settings ({})", e);
            RoadSettings::default()
        }
    };

    let library = match SpriteLibrary::load("assets/sprites/sprites.ron", "assets/sprites") {
        Ok(lib) => {
            println!("Loaded {} sprite assets", lib.len());
            lib
        }
        Err(e) => {
            println!("No sprite registry ({}), scenery disabled", e);
            SpriteLibrary::empty()
        }
    };

    let track_data = match load_track("assets/tracks/seafront.ron") {
        Ok(data) => {
            println!("Loaded track: {}", data.name);
            data
        }
        Err(e) => {
            println!("Falling back to built-in track ({})", e);
            demo_track_data()
        }
    };
    let mut track = Track::build(&track_data, &road_settings, &library);
    println!("Track '{}' built with {} segments", track.name, track.len());

    let mut fb = Framebuffer::new(
        road_settings.dimensions.0 as usize,
        road_settings.dimensions.1 as usize,
    );
    let mut player = Player::new();

    loop {
        let dt = get_frame_time();

        let controls = Controls {
            left: is_key_down(KeyCode::Left),
            right: is_key_down(KeyCode::Right),
            accelerate: is_key_down(KeyCode::Up),
            brake: is_key_down(KeyCode::Down),
        };
        player.update(&controls, &track, dt);
        track.advance_competitors(dt);

        fb.clear(road_settings.colours.sky);
        let view = RoadView {
            position: player.position,
            camera_x: player.camera_x(&road_settings),
            player_y: player.y,
        };

        match draw_road(&mut fb, &mut track, &road_settings, &view) {
            Ok(()) => {
                let texture =
                    Texture2D::from_rgba8(fb.width as u16, fb.height as u16, &fb.pixels);
                texture.set_filter(FilterMode::Nearest);
                draw_texture_ex(
                    &texture,
                    0.0,
                    0.0,
                    WHITE,
                    DrawTextureParams {
                        dest_size: Some(Vec2::new(screen_width(), screen_height())),
                        ..Default::default()
                    },
                );

                draw_text(
                    &format!("{:>3.0}", player.speed_fraction() * 320.0),
                    20.0,
                    screen_height() - 24.0,
                    40.0,
                    WHITE,
                );
            }
            Err(e) => {
                // The surface holds partial garbage; keep the previous
                // frame on screen instead of presenting it.
                eprintln!("Frame dropped: {}", e);
            }
        }

        next_frame().await;
    }
}
