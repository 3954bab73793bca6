use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::HelperResult;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Screen-space rectangle as reported by the game client, window-relative.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

/// Integer desktop cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CursorPos {
    pub x: i32,
    pub y: i32,
}

impl CursorPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<Point> for CursorPos {
    /// Truncates towards zero, like the game's own cursor math.
    fn from(p: Point) -> Self {
        CursorPos::new(p.x as i32, p.y as i32)
    }
}

/// One element of the game's UI tree.
///
/// The tree belongs to the host and can change under us at any time, so every
/// read is fallible. Handles are only meaningful for the cycle that obtained
/// them.
pub trait UiNode: Send + Sync {
    /// Stable identity of the element while it is alive (its address in the
    /// host). Used for cycle detection.
    fn address(&self) -> usize;

    fn text(&self) -> HelperResult<Option<String>>;

    fn texture_name(&self) -> HelperResult<Option<String>>;

    fn client_rect(&self) -> HelperResult<Rect>;

    fn children(&self) -> HelperResult<Vec<NodeRef>>;
}

pub type NodeRef = Arc<dyn UiNode>;

/// The world entity a ground label belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityHandle {
    pub id: u64,
    /// Entity metadata path, e.g. `Metadata/Chests/StrongBoxes/Arcanist`.
    pub metadata: String,
    pub distance_to_player: f32,
}
