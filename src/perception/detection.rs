//! Strongbox detection over the visible ground labels, and the
//! one-strongbox-at-a-time selection policy.
use std::fmt;

use crate::errors::HelperResult;
use crate::perception::traits::{GroundLabel, HostUi};
use crate::perception::tree_search::find_by_text;
use crate::perception::types::{EntityHandle, NodeRef, Point};

/// Entity metadata of every strongbox contains this path segment.
pub const STRONGBOX_METADATA_MARKER: &str = "StrongBoxes";

/// Every strongbox label carries a text element containing this word.
pub const STRONGBOX_NAME_KEYWORD: &str = "Strongbox";

/// A strongbox label found during one detection pass.
#[derive(Clone)]
pub struct DetectedContainer {
    pub entity: EntityHandle,
    /// Root of the label's UI subtree; currency buttons live under it.
    pub label: NodeRef,
    /// Raw label text, e.g. "Researcher's Strongbox".
    pub name: String,
    /// Center of the label rect, window-relative.
    pub anchor: Point,
}

impl DetectedContainer {
    pub fn distance(&self) -> f32 {
        self.entity.distance_to_player
    }
}

impl fmt::Debug for DetectedContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetectedContainer")
            .field("entity", &self.entity)
            .field("label", &format_args!("{:#x}", self.label.address()))
            .field("name", &self.name)
            .field("anchor", &self.anchor)
            .finish()
    }
}

/// Detections sharing one anchor. The client sometimes emits several label
/// fragments for a single strongbox; they are treated as one object.
#[derive(Debug, Clone)]
pub struct CandidateGroup {
    pub anchor: Point,
    representative: DetectedContainer,
    duplicates: Vec<DetectedContainer>,
}

impl CandidateGroup {
    fn new(first: DetectedContainer) -> Self {
        Self {
            anchor: first.anchor,
            representative: first,
            duplicates: Vec::new(),
        }
    }

    /// First detection of the group in label order.
    pub fn representative(&self) -> &DetectedContainer {
        &self.representative
    }

    pub fn into_representative(self) -> DetectedContainer {
        self.representative
    }

    pub fn member_count(&self) -> usize {
        1 + self.duplicates.len()
    }
}

/// Scans the visible ground labels for strongboxes.
///
/// A label that fails to read is skipped; if the label collection itself is
/// unavailable the pass yields nothing.
pub fn detect_candidates(host: &dyn HostUi) -> Vec<DetectedContainer> {
    let labels = match host.visible_ground_labels() {
        Ok(labels) => labels,
        Err(e) => {
            tracing::error!(error = %e, "error detecting strongboxes");
            return Vec::new();
        }
    };

    let mut found = Vec::new();
    for (index, label) in labels.iter().enumerate() {
        match inspect_label(label.as_ref()) {
            Ok(Some(container)) => found.push(container),
            Ok(None) => {}
            Err(e) => {
                tracing::debug!(index, error = %e, "ground label unreadable; skipped");
            }
        }
    }

    tracing::trace!(labels = labels.len(), strongboxes = found.len(), "detection pass");
    found
}

fn inspect_label(label: &dyn GroundLabel) -> HelperResult<Option<DetectedContainer>> {
    let Some(entity) = label.entity()? else { return Ok(None) };
    if !entity.metadata.contains(STRONGBOX_METADATA_MARKER) {
        return Ok(None);
    }

    let Some(root) = label.label()? else { return Ok(None) };
    let anchor = root.client_rect()?.center();

    let Some(name_node) = find_by_text(Some(&root), STRONGBOX_NAME_KEYWORD)? else {
        return Ok(None);
    };
    let name = name_node.text()?.unwrap_or_default();

    Ok(Some(DetectedContainer {
        entity,
        label: root,
        name,
        anchor,
    }))
}

/// Groups detections by exact anchor equality, keeping first-seen order.
pub fn group_by_anchor(candidates: Vec<DetectedContainer>) -> Vec<CandidateGroup> {
    let mut groups: Vec<CandidateGroup> = Vec::new();
    for candidate in candidates {
        match groups.iter_mut().find(|g| g.anchor == candidate.anchor) {
            Some(group) => group.duplicates.push(candidate),
            None => groups.push(CandidateGroup::new(candidate)),
        }
    }
    groups
}

/// The group whose representative is closest to the player. Equal distances
/// keep the group seen first.
pub fn select_nearest(candidates: Vec<DetectedContainer>) -> Option<CandidateGroup> {
    group_by_anchor(candidates)
        .into_iter()
        .min_by(|a, b| {
            a.representative()
                .distance()
                .total_cmp(&b.representative().distance())
        })
}
