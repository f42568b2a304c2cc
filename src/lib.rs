//! CyberSnake core: scene lifecycle, procedural audio, leaderboard,
//! design-space screen mapping, and the navigation shim. The binary in
//! `main.rs` wires these into the macroquad frame loop.

pub mod audio;
pub mod error;
pub mod leaderboard;
pub mod router;
pub mod scene;
pub mod screen;
pub mod storage;
