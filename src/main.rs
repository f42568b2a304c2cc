//! CyberSnake -- neon arcade snake.
//!
//! The shell owns every subsystem (screen mapper, audio synth, leaderboard,
//! router, scene manager) and drives a single-threaded frame loop: touch and
//! key events are forwarded first, then one update, then one render. Scene
//! transitions requested during the frame are applied at the frame boundary.

use macroquad::prelude::*;

use cybersnake::audio::AudioSynth;
use cybersnake::leaderboard::Leaderboard;
use cybersnake::router::{ROUTE_GAME, ROUTE_INDEX, ROUTE_LEADERBOARD, Router};
use cybersnake::scene::board::BoardScene;
use cybersnake::scene::game::GameScene;
use cybersnake::scene::manager::SceneManager;
use cybersnake::scene::splash::SplashScene;
use cybersnake::scene::{GameContext, Scene, SceneParams, TouchEvent};
use cybersnake::screen::ScreenMapper;
use cybersnake::storage::FileStore;

const VOLUME_STEP: f32 = 0.1;

fn window_conf() -> Conf {
    Conf {
        window_title: "CyberSnake".to_owned(),
        window_width: 540,
        window_height: 960,
        high_dpi: true,
        ..Default::default()
    }
}

fn register_scenes(manager: &mut SceneManager) {
    manager.register(
        ROUTE_INDEX,
        Box::new(|params| Box::new(SplashScene::new(params)) as Box<dyn Scene>),
    );
    manager.register(
        ROUTE_GAME,
        Box::new(|params| Box::new(GameScene::new(params)) as Box<dyn Scene>),
    );
    manager.register(
        ROUTE_LEADERBOARD,
        Box::new(|params| Box::new(BoardScene::new(params)) as Box<dyn Scene>),
    );
}

/// Touch events, with a mouse fallback so the game is playable on desktop.
fn pump_input(manager: &mut SceneManager, ctx: &mut GameContext) {
    for touch in touches() {
        let event = TouchEvent {
            x: touch.position.x,
            y: touch.position.y,
        };
        match touch.phase {
            TouchPhase::Started => manager.on_touch_start(ctx, event),
            TouchPhase::Moved | TouchPhase::Stationary => manager.on_touch_move(ctx, event),
            TouchPhase::Ended | TouchPhase::Cancelled => manager.on_touch_end(ctx, event),
        }
    }

    let (mx, my) = mouse_position();
    let event = TouchEvent { x: mx, y: my };
    if is_mouse_button_pressed(MouseButton::Left) {
        manager.on_touch_start(ctx, event);
    } else if is_mouse_button_down(MouseButton::Left) {
        manager.on_touch_move(ctx, event);
    }
    if is_mouse_button_released(MouseButton::Left) {
        manager.on_touch_end(ctx, event);
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();
    log::info!("CyberSnake starting");

    let screen = ScreenMapper::new(
        screen_width(),
        screen_height(),
        macroquad::miniquad::window::dpi_scale(),
    );
    log::debug!(
        "viewport {:?} @ {}x dpr, game area {:?}",
        screen.device_size(),
        screen.pixel_ratio(),
        screen.game_size()
    );

    let audio = AudioSynth::new().await;
    let board = Leaderboard::new(Box::new(FileStore::new(".")));
    let mut ctx = GameContext::new(screen, audio, board, Router::new());

    let mut manager = SceneManager::new();
    register_scenes(&mut manager);
    if let Err(e) = manager.switch_to(&mut ctx, ROUTE_INDEX, SceneParams::default()) {
        log::error!("failed to open the index scene: {e}");
    }

    loop {
        let dt = get_frame_time();

        pump_input(&mut manager, &mut ctx);

        if is_key_pressed(KeyCode::Escape) {
            ctx.router.navigate_back();
        }
        if is_key_pressed(KeyCode::Minus) {
            let volume = ctx.audio.master_volume() - VOLUME_STEP;
            ctx.audio.set_master_volume(volume);
        }
        if is_key_pressed(KeyCode::Equal) {
            let volume = ctx.audio.master_volume() + VOLUME_STEP;
            ctx.audio.set_master_volume(volume);
        }

        manager.update(&mut ctx, dt);
        manager.render(&mut ctx);

        // Apply at most one transition per frame, at the frame boundary.
        if let Some((route, route_params)) = ctx.router.take_pending() {
            let params = SceneParams::from_route(&route_params);
            match manager.switch_to(&mut ctx, &route, params) {
                Ok(()) => log::debug!(
                    "route now {} (params {:?}), scene {:?}",
                    ctx.router.current_route(),
                    ctx.router.params(),
                    manager.current_scene_name()
                ),
                Err(e) => log::error!("scene switch failed: {e}"),
            }
        }

        next_frame().await;
    }
}
