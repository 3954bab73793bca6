use std::sync::Arc;

use crate::errors::HelperResult;
use crate::perception::types::{EntityHandle, NodeRef, Point};

/// An item label currently drawn on the ground.
pub trait GroundLabel: Send + Sync {
    /// The entity the label is attached to, if it still exists.
    fn entity(&self) -> HelperResult<Option<EntityHandle>>;

    /// Root element of the label's UI subtree.
    fn label(&self) -> HelperResult<Option<NodeRef>>;
}

/// Read access to the running game client.
/// Implemented by the host process integration; the snapshot host is the
/// in-memory implementation.
pub trait HostUi: Send + Sync {
    /// Labels visible this frame. Fails when the in-game UI is unavailable
    /// (loading screen, client closing).
    fn visible_ground_labels(&self) -> HelperResult<Vec<Arc<dyn GroundLabel>>>;

    /// Top-left corner of the game window on the desktop.
    fn window_origin(&self) -> HelperResult<Point>;
}
