//! Scene contract and shared scene plumbing.
//!
//! A scene is one self-contained game mode (splash, gameplay, leaderboard).
//! The manager owns at most one boxed scene at a time and forwards frame
//! ticks and touch events to it; anything a scene needs across a transition
//! travels in [`SceneParams`].

pub mod board;
pub mod game;
pub mod manager;
pub mod splash;

use macroquad::prelude::*;

use crate::audio::AudioSynth;
use crate::leaderboard::Leaderboard;
use crate::router::{RouteParams, Router};
use crate::screen::ScreenMapper;

// Neon palette.
pub const NEON_PRIMARY: Color = Color::new(0.04, 1.0, 1.0, 1.0);
pub const NEON_SECONDARY: Color = Color::new(1.0, 0.0, 1.0, 1.0);
pub const NEON_BACKGROUND: Color = Color::new(0.0, 0.067, 0.133, 1.0);
pub const NEON_TEXT: Color = Color::new(1.0, 1.0, 1.0, 1.0);
pub const NEON_DIM: Color = Color::new(0.3, 0.55, 0.6, 1.0);

/// A touch (or synthesized mouse) event in device coordinates. Scenes
/// compare against design-space positions mapped through the screen mapper.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchEvent {
    pub x: f32,
    pub y: f32,
}

/// Explicit construction state handed to a scene factory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneParams {
    /// Final score carried from the game scene to the leaderboard.
    pub score: Option<u32>,
}

impl SceneParams {
    pub fn with_score(score: u32) -> Self {
        Self { score: Some(score) }
    }

    /// Decodes the route params mapping the shell received from the router.
    pub fn from_route(params: &RouteParams) -> Self {
        params
            .get("score")
            .and_then(|s| s.parse().ok())
            .map(Self::with_score)
            .unwrap_or_default()
    }
}

/// Everything a scene collaborates with, constructed once by the
/// application root and passed by reference. No global singletons.
pub struct GameContext {
    pub screen: ScreenMapper,
    pub audio: AudioSynth,
    pub board: Leaderboard,
    pub router: Router,
}

impl GameContext {
    pub fn new(screen: ScreenMapper, audio: AudioSynth, board: Leaderboard, router: Router) -> Self {
        Self {
            screen,
            audio,
            board,
            router,
        }
    }

    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.screen)
    }
}

/// Lifecycle and event contract every scene satisfies.
///
/// `destroy` must be safe to call even if `init` never completed.
pub trait Scene {
    fn init(&mut self, _ctx: &mut GameContext) {}
    fn update(&mut self, ctx: &mut GameContext, dt: f32);
    fn render(&mut self, ctx: &mut GameContext);
    fn on_touch_start(&mut self, _ctx: &mut GameContext, _touch: TouchEvent) {}
    fn on_touch_move(&mut self, _ctx: &mut GameContext, _touch: TouchEvent) {}
    fn on_touch_end(&mut self, _ctx: &mut GameContext, _touch: TouchEvent) {}
    fn destroy(&mut self, _ctx: &mut GameContext) {}
}

/// 2D drawing surface over the design-space mapping: rectangle, circle and
/// text primitives plus a clear operation. Scenes author against 750x1334
/// and the canvas lands everything on device pixels.
#[derive(Clone, Copy)]
pub struct Canvas {
    screen: ScreenMapper,
}

impl Canvas {
    pub fn new(screen: ScreenMapper) -> Self {
        Self { screen }
    }

    pub fn clear(&self) {
        clear_background(NEON_BACKGROUND);
    }

    pub fn rect(&self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        draw_rectangle(
            self.screen.x(x),
            self.screen.y(y),
            self.screen.px(w),
            self.screen.px(h),
            color,
        );
    }

    pub fn rect_outline(&self, x: f32, y: f32, w: f32, h: f32, thickness: f32, color: Color) {
        draw_rectangle_lines(
            self.screen.x(x),
            self.screen.y(y),
            self.screen.px(w),
            self.screen.px(h),
            self.screen.px(thickness).max(1.0),
            color,
        );
    }

    pub fn circle(&self, x: f32, y: f32, radius: f32, color: Color) {
        draw_circle(self.screen.x(x), self.screen.y(y), self.screen.px(radius), color);
    }

    /// Text centered horizontally on a design-space point.
    pub fn text_centered(&self, text: &str, x: f32, y: f32, font_size: f32, color: Color) {
        let size = self.screen.px(font_size).max(6.0) as u16;
        let measured = measure_text(text, None, size, 1.0);
        draw_text(
            text,
            self.screen.x(x) - measured.width / 2.0,
            self.screen.y(y),
            size as f32,
            color,
        );
    }

    /// Left-aligned text at a design-space point.
    pub fn text(&self, text: &str, x: f32, y: f32, font_size: f32, color: Color) {
        let size = self.screen.px(font_size).max(6.0);
        draw_text(text, self.screen.x(x), self.screen.y(y), size, color);
    }

    /// Hit-test a device-space touch against a design-space rectangle.
    pub fn hit(&self, touch: TouchEvent, x: f32, y: f32, w: f32, h: f32) -> bool {
        touch.x >= self.screen.x(x)
            && touch.x <= self.screen.x(x + w)
            && touch.y >= self.screen.y(y)
            && touch.y <= self.screen.y(y + h)
    }
}

#[cfg(test)]
pub(crate) fn test_context() -> GameContext {
    use crate::storage::MemStore;

    GameContext::new(
        ScreenMapper::new(375.0, 667.0, 2.0),
        AudioSynth::disabled(),
        Leaderboard::new(Box::new(MemStore::default())),
        Router::new(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_params_decode_route_score() {
        let mut params = RouteParams::new();
        let _ = params.insert("score".to_string(), "42".to_string());
        assert_eq!(SceneParams::from_route(&params), SceneParams::with_score(42));

        let _ = params.insert("score".to_string(), "not-a-number".to_string());
        assert_eq!(SceneParams::from_route(&params), SceneParams::default());
        assert_eq!(SceneParams::from_route(&RouteParams::new()), SceneParams::default());
    }

    #[test]
    fn canvas_hit_testing_uses_design_space() {
        let ctx = test_context();
        let canvas = ctx.canvas();

        // 375x667 against 750x1334 maps design (100,100) to device (50,50).
        let inside = TouchEvent { x: 55.0, y: 55.0 };
        let outside = TouchEvent { x: 45.0, y: 55.0 };
        assert!(canvas.hit(inside, 100.0, 100.0, 20.0, 20.0));
        assert!(!canvas.hit(outside, 100.0, 100.0, 20.0, 20.0));
    }
}
