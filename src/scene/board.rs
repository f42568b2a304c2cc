//! Leaderboard scene: ranked rows, stats line, back navigation.

use crate::leaderboard::{RankedScore, Stats};

use super::{
    GameContext, NEON_DIM, NEON_PRIMARY, NEON_SECONDARY, NEON_TEXT, Scene, SceneParams, TouchEvent,
};

const BACK_BUTTON: (f32, f32, f32, f32) = (225.0, 1160.0, 300.0, 90.0);
const ROW_TOP: f32 = 330.0;
const ROW_HEIGHT: f32 = 72.0;

pub struct BoardScene {
    rows: Vec<RankedScore>,
    stats: Stats,
    /// Score just carried over from a finished game, for highlighting.
    fresh_score: Option<u32>,
}

impl BoardScene {
    pub fn new(params: SceneParams) -> Self {
        Self {
            rows: Vec::new(),
            stats: Stats::default(),
            fresh_score: params.score,
        }
    }
}

impl Scene for BoardScene {
    fn init(&mut self, ctx: &mut GameContext) {
        // Render snapshot; the store stays the single source of truth.
        self.rows = ctx.board.get_leaderboard();
        self.stats = ctx.board.get_stats();
        log::info!("leaderboard scene ready: {} row(s)", self.rows.len());
    }

    fn update(&mut self, _ctx: &mut GameContext, _dt: f32) {}

    fn render(&mut self, ctx: &mut GameContext) {
        let canvas = ctx.canvas();
        canvas.clear();

        canvas.text_centered("TOP SCORES", 375.0, 180.0, 72.0, NEON_PRIMARY);

        if self.rows.is_empty() {
            canvas.text_centered("NO RECORDS YET", 375.0, 640.0, 44.0, NEON_DIM);
            canvas.text_centered("PLAY A ROUND TO GET ON THE BOARD", 375.0, 700.0, 28.0, NEON_DIM);
        }

        let mut highlight_left = self.fresh_score;
        for row in &self.rows {
            let y = ROW_TOP + (row.rank - 1) as f32 * ROW_HEIGHT;
            // Highlight the first row matching the score we arrived with.
            let is_fresh = highlight_left == Some(row.score);
            if is_fresh {
                highlight_left = None;
                canvas.rect_outline(40.0, y - 48.0, 670.0, 64.0, 2.0, NEON_SECONDARY);
            }
            let color = if is_fresh { NEON_SECONDARY } else { NEON_TEXT };

            canvas.text(&format!("#{}", row.rank), 60.0, y, 40.0, NEON_DIM);
            canvas.text(&row.player, 160.0, y, 40.0, color);
            canvas.text(&row.score.to_string(), 430.0, y, 40.0, color);
            canvas.text(&row.date, 550.0, y, 28.0, NEON_DIM);
        }

        if self.stats.total_games > 0 {
            let line = format!(
                "GAMES {}   BEST {}   AVG {}   TOTAL {}",
                self.stats.total_games,
                self.stats.high_score,
                self.stats.average_score,
                self.stats.total_score
            );
            canvas.text_centered(&line, 375.0, 1100.0, 30.0, NEON_DIM);
        }

        let (bx, by, bw, bh) = BACK_BUTTON;
        canvas.rect_outline(bx, by, bw, bh, 3.0, NEON_PRIMARY);
        canvas.text_centered("BACK", 375.0, by + 60.0, 44.0, NEON_PRIMARY);
    }

    fn on_touch_end(&mut self, ctx: &mut GameContext, touch: TouchEvent) {
        let (bx, by, bw, bh) = BACK_BUTTON;
        if ctx.canvas().hit(touch, bx, by, bw, bh) {
            ctx.audio.play_click_sound();
            ctx.router.navigate_back();
        }
    }

    fn destroy(&mut self, _ctx: &mut GameContext) {
        log::info!("leaderboard scene destroyed");
    }
}
