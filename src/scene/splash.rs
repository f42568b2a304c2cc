//! Index scene: neon title, start/leaderboard entry points, sound toggle.

use crate::router::{ROUTE_GAME, ROUTE_LEADERBOARD, RouteParams};

use super::{
    GameContext, NEON_DIM, NEON_PRIMARY, NEON_SECONDARY, NEON_TEXT, Scene, SceneParams, TouchEvent,
};

const START_BUTTON: (f32, f32, f32, f32) = (75.0, 760.0, 600.0, 100.0);
const BOARD_BUTTON: (f32, f32, f32, f32) = (75.0, 900.0, 600.0, 100.0);
const SOUND_BUTTON: (f32, f32, f32, f32) = (225.0, 1040.0, 300.0, 70.0);

pub struct SplashScene {
    elapsed: f32,
    startup_played: bool,
}

impl SplashScene {
    pub fn new(_params: SceneParams) -> Self {
        Self {
            elapsed: 0.0,
            startup_played: false,
        }
    }

    fn start_game(&mut self, ctx: &mut GameContext) {
        // First user interaction; safe point for the long startup sweep.
        if !self.startup_played {
            ctx.audio.play_startup_sound();
            self.startup_played = true;
        } else {
            ctx.audio.play_click_sound();
        }
        ctx.router.navigate_to(ROUTE_GAME, RouteParams::new());
    }
}

impl Scene for SplashScene {
    fn init(&mut self, _ctx: &mut GameContext) {
        log::info!("splash scene ready");
    }

    fn update(&mut self, _ctx: &mut GameContext, dt: f32) {
        self.elapsed += dt;
    }

    fn render(&mut self, ctx: &mut GameContext) {
        let canvas = ctx.canvas();
        canvas.clear();

        // Pulsing title glow.
        let pulse = 0.7 + 0.3 * (self.elapsed * 2.0).sin();
        let mut glow = NEON_PRIMARY;
        glow.a = pulse;
        canvas.text_centered("CYBER", 375.0, 380.0, 120.0, glow);
        canvas.text_centered("SNAKE", 375.0, 510.0, 120.0, NEON_SECONDARY);
        canvas.text_centered("A NEON ARCADE", 375.0, 590.0, 36.0, NEON_DIM);

        let high = ctx.board.get_high_score();
        if high > 0 {
            canvas.text_centered(&format!("HIGH SCORE {high}"), 375.0, 680.0, 40.0, NEON_TEXT);
        }

        let (sx, sy, sw, sh) = START_BUTTON;
        canvas.rect_outline(sx, sy, sw, sh, 4.0, NEON_PRIMARY);
        canvas.text_centered("START", 375.0, sy + 65.0, 52.0, NEON_PRIMARY);

        let (bx, by, bw, bh) = BOARD_BUTTON;
        canvas.rect_outline(bx, by, bw, bh, 4.0, NEON_DIM);
        canvas.text_centered("LEADERBOARD", 375.0, by + 65.0, 44.0, NEON_DIM);

        let (ox, oy, ow, oh) = SOUND_BUTTON;
        let label = if ctx.audio.is_enabled() { "SOUND ON" } else { "SOUND OFF" };
        canvas.rect_outline(ox, oy, ow, oh, 2.0, NEON_DIM);
        canvas.text_centered(label, 375.0, oy + 47.0, 30.0, NEON_DIM);
    }

    fn on_touch_end(&mut self, ctx: &mut GameContext, touch: TouchEvent) {
        let canvas = ctx.canvas();
        let (sx, sy, sw, sh) = START_BUTTON;
        let (bx, by, bw, bh) = BOARD_BUTTON;
        let (ox, oy, ow, oh) = SOUND_BUTTON;

        if canvas.hit(touch, sx, sy, sw, sh) {
            self.start_game(ctx);
        } else if canvas.hit(touch, bx, by, bw, bh) {
            ctx.audio.play_click_sound();
            ctx.router.navigate_to(ROUTE_LEADERBOARD, RouteParams::new());
        } else if canvas.hit(touch, ox, oy, ow, oh) {
            let enabled = ctx.audio.toggle_sound();
            log::info!("sound toggled: {enabled}");
            ctx.audio.play_click_sound();
        }
    }

    fn destroy(&mut self, _ctx: &mut GameContext) {
        log::info!("splash scene destroyed");
    }
}
