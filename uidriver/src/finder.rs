use crate::element::UiElement;
use crate::errors::AutomationError;
use crate::matcher::Matcher;
use std::fmt;
use tracing::{debug, trace};

/// Resolves a tree root to a single element.
///
/// A finder is deterministic for an unchanged tree. Its `Display` form is
/// reused in `Timeout` messages, so it should describe what is being looked
/// for.
pub trait Finder: fmt::Display + Send + Sync {
    /// Return the first element under `root` this finder accepts, or
    /// [`AutomationError::ElementNotFound`] when the subtree holds none.
    fn find(&self, root: &UiElement) -> Result<UiElement, AutomationError>;
}

/// The primary finder: a depth-first, pre-order search driven by a
/// [`Matcher`].
pub struct MatchFinder {
    matcher: Box<dyn Matcher>,
    match_root: bool,
}

impl MatchFinder {
    /// Search the descendants of the root; the root itself is not a
    /// candidate.
    pub fn new(matcher: impl Matcher + 'static) -> Self {
        Self {
            matcher: Box::new(matcher),
            match_root: false,
        }
    }

    /// Consider the root itself first, then its descendants.
    pub fn including_root(matcher: impl Matcher + 'static) -> Self {
        Self {
            matcher: Box::new(matcher),
            match_root: true,
        }
    }
}

impl Finder for MatchFinder {
    /// Depth-first pre-order over children in native order: an accepted
    /// child is returned immediately (first match wins), otherwise its
    /// subtree is searched before the next sibling.
    ///
    /// The traversal recurses without tracking visited nodes; the snapshot
    /// is required to be acyclic.
    fn find(&self, root: &UiElement) -> Result<UiElement, AutomationError> {
        if self.match_root && self.matcher.matches(root) {
            return Ok(root.clone());
        }
        match find_in_descendants(root, self.matcher.as_ref())? {
            Some(found) => {
                debug!(matcher = %self.matcher, "Found matching element");
                Ok(found)
            }
            None => Err(AutomationError::ElementNotFound(format!(
                "Could not find any matching element for selector: {}",
                self.matcher
            ))),
        }
    }
}

impl fmt::Display for MatchFinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.matcher)
    }
}

/// Walk `node`'s subtree. `Ok(None)` means "this branch holds no match" and
/// lets the caller continue with the next sibling; backend failures during
/// child enumeration propagate unchanged.
fn find_in_descendants(
    node: &UiElement,
    matcher: &dyn Matcher,
) -> Result<Option<UiElement>, AutomationError> {
    for child in node.children()? {
        if matcher.matches(&child) {
            return Ok(Some(child));
        }
        trace!(%matcher, "No match, descending");
        if let Some(found) = find_in_descendants(&child, matcher)? {
            return Ok(Some(found));
        }
    }
    Ok(None)
}
