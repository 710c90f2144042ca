//! Ordered insertion into a host document tree.
//!
//! The document format itself is owned elsewhere; this module only needs the
//! small capability surface in [`TreeElement`]: look at a parent's element
//! children, find one by name, splice a new one in at a position, and compare
//! two elements structurally for idempotence.

use std::cmp::Ordering;

/// Capability a host document must provide for ordered insertion.
pub trait TreeElement: Sized {
    /// The element's tag name.
    fn name(&self) -> &str;

    /// Element children in document order, skipping text and comments.
    fn child_elements(&self) -> Vec<&Self>;

    /// First element child with the given name.
    fn child_element_mut(&mut self, name: &str) -> Option<&mut Self>;

    /// Insert `child` so that it becomes the `index`-th element child.
    fn insert_element(&mut self, index: usize, child: Self);

    /// Whether two elements have the same name, attributes, text and
    /// children, ignoring formatting whitespace.
    fn structurally_equal(&self, other: &Self) -> bool;
}

/// The outcome of an insertion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// The element was spliced in at `index` among its new siblings.
    /// `created_container` is set when the enclosing container had to be
    /// created first, in which case `index` is the container's position.
    Inserted {
        index: usize,
        created_container: bool,
    },
    /// An identical element was already present; nothing changed.
    AlreadyPresent,
}

impl Insertion {
    pub fn is_inserted(&self) -> bool {
        matches!(self, Insertion::Inserted { .. })
    }
}

/// Position at which `child` belongs among `siblings`.
///
/// The siblings plus the new child are sorted (stably) by `cmp`; the child is
/// then placed directly after whichever existing sibling precedes it in that
/// ideal order, or first if none does. Existing siblings are never moved, so
/// an unsorted list stays as the author left it.
pub fn insertion_index<E, F>(siblings: &[&E], child: &E, cmp: F) -> usize
where
    F: Fn(&E, &E) -> Ordering,
{
    let new = siblings.len();
    let mut ideal: Vec<usize> = (0..=new).collect();
    let element = |i: usize| if i == new { child } else { siblings[i] };
    ideal.sort_by(|&a, &b| cmp(element(a), element(b)));

    match ideal.iter().position(|&i| i == new) {
        Some(0) | None => 0,
        Some(pos) => ideal[pos - 1] + 1,
    }
}

/// Insert `child` into `parent` at its canonical position under `cmp`.
///
/// A structurally identical sibling makes this a no-op.
pub fn insert_ordered<E, F>(parent: &mut E, child: E, cmp: F) -> Insertion
where
    E: TreeElement,
    F: Fn(&E, &E) -> Ordering,
{
    let index = {
        let siblings = parent.child_elements();
        if siblings.iter().any(|s| s.structurally_equal(&child)) {
            tracing::debug!("<{}> already present under <{}>", child.name(), parent.name());
            return Insertion::AlreadyPresent;
        }
        insertion_index(&siblings, &child, &cmp)
    };
    tracing::debug!(
        "inserting <{}> at element index {index} under <{}>",
        child.name(),
        parent.name()
    );
    parent.insert_element(index, child);
    Insertion::Inserted {
        index,
        created_container: false,
    }
}

/// Insert `child` into the container named like `container` under `parent`.
///
/// When the container is missing, `container` (expected to be empty) is
/// filled with `child` and placed among `parent`'s children by
/// `container_order`. Either way the document is touched exactly once.
pub fn insert_into_container<E, F, G>(
    parent: &mut E,
    mut container: E,
    child: E,
    container_order: F,
    child_order: G,
) -> Insertion
where
    E: TreeElement,
    F: Fn(&E, &E) -> Ordering,
    G: Fn(&E, &E) -> Ordering,
{
    if let Some(existing) = parent.child_element_mut(container.name()) {
        return insert_ordered(existing, child, child_order);
    }

    container.insert_element(0, child);
    match insert_ordered(parent, container, container_order) {
        Insertion::Inserted { index, .. } => Insertion::Inserted {
            index,
            created_container: true,
        },
        Insertion::AlreadyPresent => Insertion::AlreadyPresent,
    }
}
