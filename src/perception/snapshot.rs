//! In-memory UI tree and host.
//!
//! Used by integrations that copy the label tree out of the game client each
//! frame rather than reading it in place, and by the tests. Elements can be
//! invalidated to simulate the client freeing them mid-read.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::errors::{HelperError, HelperResult};
use crate::perception::traits::{GroundLabel, HostUi};
use crate::perception::types::{EntityHandle, NodeRef, Point, Rect, UiNode};

pub struct Element {
    text: Option<String>,
    texture_name: Option<String>,
    rect: Rect,
    children: RwLock<Vec<Arc<Element>>>,
    invalid: AtomicBool,
}

impl Element {
    pub fn new(text: Option<&str>, texture_name: Option<&str>, rect: Rect) -> Arc<Self> {
        Arc::new(Self {
            text: text.map(str::to_string),
            texture_name: texture_name.map(str::to_string),
            rect,
            children: RwLock::new(Vec::new()),
            invalid: AtomicBool::new(false),
        })
    }

    pub fn empty(rect: Rect) -> Arc<Self> {
        Self::new(None, None, rect)
    }

    pub fn labelled(text: &str, rect: Rect) -> Arc<Self> {
        Self::new(Some(text), None, rect)
    }

    pub fn icon(texture_name: &str, rect: Rect) -> Arc<Self> {
        Self::new(None, Some(texture_name), rect)
    }

    pub fn with_children(self: Arc<Self>, children: Vec<Arc<Element>>) -> Arc<Self> {
        for child in children {
            self.push_child(child);
        }
        self
    }

    pub fn push_child(&self, child: Arc<Element>) {
        if let Ok(mut children) = self.children.write() {
            children.push(child);
        }
    }

    /// Removes every direct child at `address`. Returns how many were removed.
    pub fn remove_child(&self, address: usize) -> usize {
        let Ok(mut children) = self.children.write() else { return 0 };
        let before = children.len();
        children.retain(|c| c.address() != address);
        before - children.len()
    }

    pub fn clear_children(&self) {
        if let Ok(mut children) = self.children.write() {
            children.clear();
        }
    }

    /// Every later read of this element fails.
    pub fn invalidate(&self) {
        self.invalid.store(true, Ordering::SeqCst);
    }

    fn check(&self) -> HelperResult<()> {
        if self.invalid.load(Ordering::SeqCst) {
            return Err(HelperError::NodeUnavailable(format!(
                "element {:#x} was freed",
                self.address()
            )));
        }
        Ok(())
    }
}

impl UiNode for Element {
    fn address(&self) -> usize {
        self as *const Element as usize
    }

    fn text(&self) -> HelperResult<Option<String>> {
        self.check()?;
        Ok(self.text.clone())
    }

    fn texture_name(&self) -> HelperResult<Option<String>> {
        self.check()?;
        Ok(self.texture_name.clone())
    }

    fn client_rect(&self) -> HelperResult<Rect> {
        self.check()?;
        Ok(self.rect)
    }

    fn children(&self) -> HelperResult<Vec<NodeRef>> {
        self.check()?;
        let children = self
            .children
            .read()
            .map_err(|e| HelperError::NodeUnavailable(format!("children lock: {e}")))?;
        Ok(children.iter().map(|c| c.clone() as NodeRef).collect())
    }
}

/// A ground label backed by a snapshot tree.
pub struct SnapshotLabel {
    entity: Option<EntityHandle>,
    root: Option<Arc<Element>>,
    broken: bool,
}

impl SnapshotLabel {
    pub fn new(entity: EntityHandle, root: Arc<Element>) -> Arc<Self> {
        Arc::new(Self {
            entity: Some(entity),
            root: Some(root),
            broken: false,
        })
    }

    /// A label with no entity or no UI, as the client reports for items
    /// that are despawning.
    pub fn partial(entity: Option<EntityHandle>, root: Option<Arc<Element>>) -> Arc<Self> {
        Arc::new(Self {
            entity,
            root,
            broken: false,
        })
    }

    /// A label whose entity read fails.
    pub fn broken() -> Arc<Self> {
        Arc::new(Self {
            entity: None,
            root: None,
            broken: true,
        })
    }
}

impl GroundLabel for SnapshotLabel {
    fn entity(&self) -> HelperResult<Option<EntityHandle>> {
        if self.broken {
            return Err(HelperError::Host("label entity unreadable".into()));
        }
        Ok(self.entity.clone())
    }

    fn label(&self) -> HelperResult<Option<NodeRef>> {
        Ok(self.root.clone().map(|r| r as NodeRef))
    }
}

/// Host whose visible labels are whatever was last pushed into it.
pub struct SnapshotHost {
    labels: RwLock<Option<Vec<Arc<dyn GroundLabel>>>>,
    window_origin: Point,
}

impl SnapshotHost {
    pub fn new(window_origin: Point) -> Self {
        Self {
            labels: RwLock::new(Some(Vec::new())),
            window_origin,
        }
    }

    pub fn set_labels<L: GroundLabel + 'static>(&self, labels: Vec<Arc<L>>) {
        let labels = labels
            .into_iter()
            .map(|l| l as Arc<dyn GroundLabel>)
            .collect();
        if let Ok(mut guard) = self.labels.write() {
            *guard = Some(labels);
        }
    }

    /// Simulates the in-game UI going away (loading screen).
    pub fn set_unavailable(&self) {
        if let Ok(mut guard) = self.labels.write() {
            *guard = None;
        }
    }
}

impl HostUi for SnapshotHost {
    fn visible_ground_labels(&self) -> HelperResult<Vec<Arc<dyn GroundLabel>>> {
        let guard = self
            .labels
            .read()
            .map_err(|e| HelperError::Host(format!("labels lock: {e}")))?;
        guard
            .clone()
            .ok_or_else(|| HelperError::Host("ingame UI unavailable".into()))
    }

    fn window_origin(&self) -> HelperResult<Point> {
        Ok(self.window_origin)
    }
}
