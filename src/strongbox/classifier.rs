use crate::strongbox::kinds::{ContainerType, CONTAINER_TABLE};

/// Maps a strongbox label text to its kind.
///
/// Matching is case-insensitive keyword containment. Kinds are tried in
/// table order and the first match wins; the generic `Strongbox` kind is
/// declared last, so "Large Strongbox" is `Large`.
pub fn classify(display_name: &str) -> Option<ContainerType> {
    let name = display_name.to_lowercase();

    CONTAINER_TABLE
        .iter()
        .find(|spec| spec.keywords.iter().any(|kw| name.contains(kw)))
        .map(|spec| spec.kind)
}
