//! UI automation driver for accessibility trees
//!
//! This crate locates elements in a snapshot of a hierarchical UI tree,
//! waits for asynchronous UI state changes through condition polling, and
//! dispatches input actions against located elements. It is built for
//! automated test code that cannot rely on synchronous UI updates and must
//! tolerate timing variance.
//!
//! The model is synchronous and single-threaded: tree search, matching and
//! action dispatch all run on the caller's thread, and the only suspension
//! point is the [`Poller`]'s inter-attempt sleep.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{instrument, warn};

pub mod actions;
pub mod element;
pub mod errors;
pub mod finder;
pub mod matcher;
pub mod platforms;
pub mod poller;
#[cfg(test)]
mod tests;

pub use actions::{Action, InputEvent, InputInjector, SwipeDirection};
pub use element::{Rect, UiElement, UiElementAttributes, UiElementImpl};
pub use errors::AutomationError;
pub use finder::{Finder, MatchFinder};
pub use matcher::{By, Matcher};
pub use platforms::{AccessibilityEngine, ScreenshotResult};
pub use poller::{ConditionChecker, Exists, Gone, Poller, Verdict};

/// Represents a node in the UI tree, containing its attributes and children.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiNode {
    pub attributes: UiElementAttributes,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub children: Vec<UiNode>,
}

impl UiNode {
    /// Materialize the subtree rooted at `element` into an owned node tree.
    pub fn from_element(element: &UiElement) -> Result<Self, AutomationError> {
        let children = element
            .children()?
            .iter()
            .map(Self::from_element)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            attributes: element.attributes(),
            children,
        })
    }
}

/// The main entry point for UI automation.
///
/// A driver wraps a platform backend and owns one replaceable [`Poller`];
/// that poller is the sole timeout/retry authority for the `has_within`,
/// `on`, `check_exists` and `check_gone` operations. Drivers are long-lived
/// for the duration of a test session.
pub struct Driver {
    engine: Arc<dyn AccessibilityEngine>,
    poller: Poller,
}

impl Driver {
    pub fn new(engine: Arc<dyn AccessibilityEngine>) -> Self {
        Self {
            engine,
            poller: Poller::default(),
        }
    }

    /// Gets a fresh root element for the current UI state.
    pub fn root(&self) -> UiElement {
        self.engine.root_element()
    }

    /// Immediately resolve `finder` against a fresh snapshot root.
    #[instrument(skip(self, finder), fields(finder = %finder))]
    pub fn find(&self, finder: &dyn Finder) -> Result<UiElement, AutomationError> {
        finder.find(&self.root())
    }

    /// Whether `finder` resolves right now.
    ///
    /// Only the not-found failure folds into `false`; any other failure is
    /// a genuine error and propagates.
    #[instrument(skip(self, finder), fields(finder = %finder))]
    pub fn has(&self, finder: &dyn Finder) -> Result<bool, AutomationError> {
        match self.find(finder) {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Whether `finder` resolves within `timeout`, polling until it does.
    ///
    /// Folds the poller's timeout into `false`; other failures propagate.
    #[instrument(skip(self, finder), fields(finder = %finder))]
    pub fn has_within(
        &self,
        finder: &dyn Finder,
        timeout: Duration,
    ) -> Result<bool, AutomationError> {
        match self.poller.poll_for(self, finder, &Exists, Some(timeout)) {
            Ok(_) => Ok(true),
            Err(AutomationError::Timeout { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Wait for `finder` to resolve and return the element.
    ///
    /// Polls with the driver's default budget; a deadline surfaces as
    /// [`AutomationError::Timeout`].
    #[instrument(skip(self, finder), fields(finder = %finder))]
    pub fn on(&self, finder: &dyn Finder) -> Result<UiElement, AutomationError> {
        self.poller.poll_for(self, finder, &Exists, None)
    }

    /// Assert that `finder` resolves before the default budget elapses.
    #[instrument(skip(self, finder), fields(finder = %finder))]
    pub fn check_exists(&self, finder: &dyn Finder) -> Result<(), AutomationError> {
        self.poller.poll_for(self, finder, &Exists, None)?;
        Ok(())
    }

    /// Assert that `finder` stops resolving before the default budget
    /// elapses. Never succeeds while a matching element still exists.
    #[instrument(skip(self, finder), fields(finder = %finder))]
    pub fn check_gone(&self, finder: &dyn Finder) -> Result<(), AutomationError> {
        self.poller.poll_for(self, finder, &Gone, None)
    }

    pub fn poller(&self) -> &Poller {
        &self.poller
    }

    /// Replace the driver's poller. Per-instance configuration; in-flight
    /// operations keep the poller they started with.
    pub fn set_poller(&mut self, poller: Poller) {
        self.poller = poller;
    }

    /// Capture the screen and write it to `path` as PNG.
    ///
    /// Returns `false` on any capture, encoding or I/O failure; the
    /// in-memory capture is dropped either way.
    #[instrument(skip(self, path))]
    pub fn take_screenshot(&self, path: impl AsRef<Path>) -> bool {
        let screenshot = match self.engine.take_screenshot() {
            Ok(Some(screenshot)) => screenshot,
            Ok(None) => {
                warn!("No screenshot available from backend");
                return false;
            }
            Err(e) => {
                warn!(error = %e, "Screenshot capture failed");
                return false;
            }
        };

        let ScreenshotResult {
            image_data,
            width,
            height,
        } = screenshot;
        let Some(buffer) = image::RgbaImage::from_raw(width, height, image_data) else {
            warn!(width, height, "Screenshot buffer does not match its dimensions");
            return false;
        };
        match buffer.save_with_format(path.as_ref(), image::ImageFormat::Png) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, path = %path.as_ref().display(), "Failed to write screenshot");
                false
            }
        }
    }

    /// Serialize the current UI tree to `path` as a JSON document.
    ///
    /// Returns `false` on any traversal or I/O failure.
    #[instrument(skip(self, path))]
    pub fn dump_tree(&self, path: impl AsRef<Path>) -> bool {
        let node = match UiNode::from_element(&self.root()) {
            Ok(node) => node,
            Err(e) => {
                warn!(error = %e, "Failed to read UI tree for dump");
                return false;
            }
        };
        let file = match File::create(path.as_ref()) {
            Ok(file) => file,
            Err(e) => {
                warn!(error = %e, path = %path.as_ref().display(), "Failed to create dump file");
                return false;
            }
        };
        match serde_json::to_writer_pretty(BufWriter::new(file), &node) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Failed to serialize UI tree");
                false
            }
        }
    }
}

impl Clone for Driver {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
            poller: self.poller.clone(),
        }
    }
}
