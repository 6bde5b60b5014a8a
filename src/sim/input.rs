//! Pointer input as delivered by the platform

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputKind {
    Down,
    Move,
    Up,
}

/// One physical pointer event in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputEvent {
    pub kind: InputKind,
    pub x: f32,
    pub y: f32,
}

impl InputEvent {
    pub fn new(kind: InputKind, x: f32, y: f32) -> Self {
        Self { kind, x, y }
    }

    pub fn down(x: f32, y: f32) -> Self {
        Self::new(InputKind::Down, x, y)
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self::new(InputKind::Move, x, y)
    }

    pub fn up(x: f32, y: f32) -> Self {
        Self::new(InputKind::Up, x, y)
    }
}
