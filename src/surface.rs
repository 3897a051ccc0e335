//! Display surface abstraction
//!
//! The core never measures pixels itself. A host reports the viewport size and,
//! when it can, the live on-screen bounds of an entity (which may differ from the
//! model while a pop-in animation is running).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Entities the host can be asked about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityId {
    Target,
    BonusActor,
}

/// Axis-aligned rectangle, origin at top-left
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Square of side `size` at `pos`
    pub fn square(pos: Vec2, size: f32) -> Self {
        Self::new(pos.x, pos.y, size, size)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.w
            && point.y >= self.y
            && point.y <= self.y + self.h
    }
}

/// Geometry provider implemented by the host
pub trait DisplaySurface {
    fn viewport_width(&self) -> f32;
    fn viewport_height(&self) -> f32;

    /// Live bounds of an entity, if the host tracks them
    fn element_bounds(&self, _entity: EntityId) -> Option<Rect> {
        None
    }

    fn viewport(&self) -> Vec2 {
        Vec2::new(self.viewport_width(), self.viewport_height())
    }
}

/// Headless surface with a fixed (resizable) viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedSurface {
    pub width: f32,
    pub height: f32,
}

impl FixedSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }
}

impl Default for FixedSurface {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

impl DisplaySurface for FixedSurface {
    fn viewport_width(&self) -> f32 {
        self.width
    }

    fn viewport_height(&self) -> f32 {
        self.height
    }
}
