//! Gameplay scene: grid snake in design space with swipe and key steering.

use macroquad::prelude::*;

use crate::router::{ROUTE_GAME, ROUTE_LEADERBOARD, RouteParams};

use super::{
    GameContext, NEON_DIM, NEON_PRIMARY, NEON_SECONDARY, NEON_TEXT, Scene, SceneParams, TouchEvent,
};

const CELL: f32 = 25.0;
const GRID_W: i32 = 30;
const GRID_H: i32 = 48;
/// Design-space Y where the playfield starts; the strip above is the HUD.
const FIELD_TOP: f32 = 134.0;

const MOVE_INTERVAL: f32 = 0.14;
/// Swipe distance (design units) required to register a steer.
const SWIPE_THRESHOLD: f32 = 60.0;

const RETRY_BUTTON: (f32, f32, f32, f32) = (75.0, 820.0, 600.0, 90.0);
const BOARD_BUTTON: (f32, f32, f32, f32) = (75.0, 940.0, 600.0, 90.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    x: i32,
    y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepOutcome {
    Moved,
    Ate,
    Died,
}

/// Pure snake state; everything macroquad-free so the rules are testable.
struct SnakeCore {
    snake: Vec<Cell>,
    direction: Direction,
    next_direction: Direction,
    food: Cell,
    grow: bool,
    score: u32,
    alive: bool,
}

impl SnakeCore {
    fn new() -> Self {
        let start = Cell {
            x: GRID_W / 2,
            y: GRID_H / 2,
        };
        let snake = vec![
            start,
            Cell {
                x: start.x - 1,
                y: start.y,
            },
            Cell {
                x: start.x - 2,
                y: start.y,
            },
        ];
        let food = Self::spawn_food(&snake);
        Self {
            snake,
            direction: Direction::Right,
            next_direction: Direction::Right,
            food,
            grow: false,
            score: 0,
            alive: true,
        }
    }

    fn spawn_food(occupied: &[Cell]) -> Cell {
        loop {
            let cell = Cell {
                x: macroquad::rand::gen_range(0, GRID_W),
                y: macroquad::rand::gen_range(0, GRID_H),
            };
            if !occupied.contains(&cell) {
                return cell;
            }
        }
    }

    /// Queues a direction change; reversals are rejected.
    fn steer(&mut self, dir: Direction) -> bool {
        if dir == self.direction.opposite() || dir == self.direction {
            return false;
        }
        self.next_direction = dir;
        true
    }

    fn advance(&mut self) -> StepOutcome {
        if !self.alive {
            return StepOutcome::Died;
        }
        self.direction = self.next_direction;

        let head = self.snake[0];
        let (dx, dy) = self.direction.delta();
        let next = Cell {
            x: head.x + dx,
            y: head.y + dy,
        };

        if next.x < 0 || next.y < 0 || next.x >= GRID_W || next.y >= GRID_H {
            self.alive = false;
            return StepOutcome::Died;
        }
        if self.snake.contains(&next) {
            self.alive = false;
            return StepOutcome::Died;
        }

        self.snake.insert(0, next);

        let outcome = if next == self.food {
            self.grow = true;
            self.score += 1;
            self.food = Self::spawn_food(&self.snake);
            StepOutcome::Ate
        } else {
            StepOutcome::Moved
        };

        if self.grow {
            self.grow = false;
        } else {
            let _ = self.snake.pop();
        }
        outcome
    }
}

#[derive(Clone, Copy)]
enum Phase {
    Playing,
    Over { rank: usize, new_record: bool },
}

pub struct GameScene {
    core: SnakeCore,
    move_timer: f32,
    phase: Phase,
    swipe_origin: Option<(f32, f32)>,
}

impl GameScene {
    pub fn new(_params: SceneParams) -> Self {
        Self {
            core: SnakeCore::new(),
            move_timer: 0.0,
            phase: Phase::Playing,
            swipe_origin: None,
        }
    }

    fn steer_with_feedback(&mut self, ctx: &mut GameContext, dir: Direction) {
        if self.core.steer(dir) {
            ctx.audio.play_move_sound();
        }
    }

    fn read_keys(&mut self, ctx: &mut GameContext) {
        if is_key_pressed(KeyCode::Up) || is_key_pressed(KeyCode::W) {
            self.steer_with_feedback(ctx, Direction::Up);
        } else if is_key_pressed(KeyCode::Down) || is_key_pressed(KeyCode::S) {
            self.steer_with_feedback(ctx, Direction::Down);
        } else if is_key_pressed(KeyCode::Left) || is_key_pressed(KeyCode::A) {
            self.steer_with_feedback(ctx, Direction::Left);
        } else if is_key_pressed(KeyCode::Right) || is_key_pressed(KeyCode::D) {
            self.steer_with_feedback(ctx, Direction::Right);
        }
    }

    fn step(&mut self, ctx: &mut GameContext) {
        match self.core.advance() {
            StepOutcome::Moved => {}
            StepOutcome::Ate => ctx.audio.play_eat_sound(),
            StepOutcome::Died => self.finish(ctx),
        }
    }

    fn finish(&mut self, ctx: &mut GameContext) {
        ctx.audio.stop_ambient_sound();
        ctx.audio.play_game_over_sound();

        // New-record check must precede the insert, or the score would be
        // compared against itself.
        let new_record = ctx.board.is_new_record(self.core.score);
        let rank = ctx.board.add_score(self.core.score, "PLAYER");
        log::info!(
            "game over: score {} rank {rank} new_record {new_record}",
            self.core.score
        );
        self.phase = Phase::Over { rank, new_record };
    }

    fn restart(&self, ctx: &mut GameContext) {
        ctx.audio.play_click_sound();
        ctx.router.navigate_to(ROUTE_GAME, RouteParams::new());
    }

    fn open_board(&self, ctx: &mut GameContext) {
        ctx.audio.play_click_sound();
        let mut params = RouteParams::new();
        let _ = params.insert("score".to_string(), self.core.score.to_string());
        ctx.router.navigate_to(ROUTE_LEADERBOARD, params);
    }

    fn cell_origin(cell: Cell) -> (f32, f32) {
        (cell.x as f32 * CELL, FIELD_TOP + cell.y as f32 * CELL)
    }
}

impl Scene for GameScene {
    fn init(&mut self, ctx: &mut GameContext) {
        log::info!("game scene started");
        ctx.audio.play_ambient_sound();
    }

    fn update(&mut self, ctx: &mut GameContext, dt: f32) {
        match self.phase {
            Phase::Playing => {
                self.read_keys(ctx);
                self.move_timer += dt;
                while self.move_timer >= MOVE_INTERVAL && matches!(self.phase, Phase::Playing) {
                    self.move_timer -= MOVE_INTERVAL;
                    self.step(ctx);
                }
            }
            Phase::Over { .. } => {
                if is_key_pressed(KeyCode::R) {
                    self.restart(ctx);
                } else if is_key_pressed(KeyCode::Enter) {
                    self.open_board(ctx);
                }
            }
        }
    }

    fn render(&mut self, ctx: &mut GameContext) {
        let canvas = ctx.canvas();
        canvas.clear();

        // HUD strip.
        canvas.text(&format!("SCORE {}", self.core.score), 30.0, 90.0, 48.0, NEON_PRIMARY);
        let best = ctx.board.get_high_score().max(self.core.score);
        canvas.text(&format!("BEST {best}"), 520.0, 90.0, 48.0, NEON_DIM);

        // Playfield frame.
        canvas.rect_outline(0.0, FIELD_TOP, 750.0, GRID_H as f32 * CELL, 4.0, NEON_DIM);

        for (i, cell) in self.core.snake.iter().enumerate() {
            let (x, y) = Self::cell_origin(*cell);
            let color = if i == 0 {
                NEON_PRIMARY
            } else {
                Color::new(0.04, 0.7, 0.7, 1.0)
            };
            canvas.rect(x + 1.0, y + 1.0, CELL - 2.0, CELL - 2.0, color);
        }

        let (fx, fy) = Self::cell_origin(self.core.food);
        canvas.circle(fx + CELL / 2.0, fy + CELL / 2.0, CELL / 2.0 - 2.0, NEON_SECONDARY);

        if let Phase::Over { rank, new_record } = self.phase {
            canvas.rect(0.0, 0.0, 750.0, 1334.0, Color::new(0.0, 0.0, 0.0, 0.6));
            canvas.text_centered("GAME OVER", 375.0, 480.0, 80.0, NEON_SECONDARY);
            canvas.text_centered(
                &format!("SCORE {}", self.core.score),
                375.0,
                580.0,
                56.0,
                NEON_TEXT,
            );
            canvas.text_centered(&format!("RANK #{rank}"), 375.0, 650.0, 44.0, NEON_DIM);
            if new_record {
                canvas.text_centered("NEW RECORD!", 375.0, 730.0, 48.0, NEON_PRIMARY);
            }

            let (rx, ry, rw, rh) = RETRY_BUTTON;
            canvas.rect_outline(rx, ry, rw, rh, 3.0, NEON_PRIMARY);
            canvas.text_centered("RETRY", 375.0, ry + 60.0, 44.0, NEON_PRIMARY);

            let (bx, by, bw, bh) = BOARD_BUTTON;
            canvas.rect_outline(bx, by, bw, bh, 3.0, NEON_DIM);
            canvas.text_centered("LEADERBOARD", 375.0, by + 60.0, 44.0, NEON_DIM);
        }
    }

    fn on_touch_start(&mut self, _ctx: &mut GameContext, touch: TouchEvent) {
        self.swipe_origin = Some((touch.x, touch.y));
    }

    fn on_touch_move(&mut self, ctx: &mut GameContext, touch: TouchEvent) {
        if !matches!(self.phase, Phase::Playing) {
            return;
        }
        let Some((ox, oy)) = self.swipe_origin else {
            return;
        };
        let (dx, dy) = (touch.x - ox, touch.y - oy);
        let threshold = ctx.screen.px(SWIPE_THRESHOLD);
        if dx.abs() < threshold && dy.abs() < threshold {
            return;
        }

        let dir = if dx.abs() > dy.abs() {
            if dx > 0.0 { Direction::Right } else { Direction::Left }
        } else if dy > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        };
        self.steer_with_feedback(ctx, dir);
        // Re-anchor so a held swipe can steer again.
        self.swipe_origin = Some((touch.x, touch.y));
    }

    fn on_touch_end(&mut self, ctx: &mut GameContext, touch: TouchEvent) {
        self.swipe_origin = None;
        if matches!(self.phase, Phase::Over { .. }) {
            let canvas = ctx.canvas();
            let (rx, ry, rw, rh) = RETRY_BUTTON;
            let (bx, by, bw, bh) = BOARD_BUTTON;
            if canvas.hit(touch, rx, ry, rw, rh) {
                self.restart(ctx);
            } else if canvas.hit(touch, bx, by, bw, bh) {
                self.open_board(ctx);
            }
        }
    }

    fn destroy(&mut self, ctx: &mut GameContext) {
        ctx.audio.stop_ambient_sound();
        log::info!("game scene destroyed");
    }
}
