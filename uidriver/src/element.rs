use crate::actions::{Action, InputInjector, SwipeDirection};
use crate::errors::AutomationError;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// A rectangle in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Center point of the rectangle, where taps are aimed.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Attributes associated with a UI element, captured from one node of a
/// point-in-time accessibility snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiElementAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    pub bounds: Rect,
    pub visible: bool,
}

/// Interface for platform-specific element implementations.
///
/// An implementation borrows one node of an externally-owned, read-only UI
/// tree snapshot; it owns no native resource. Mutating the UI invalidates
/// elements obtained from earlier snapshots, so callers re-resolve after
/// every state change rather than holding elements across actions.
pub trait UiElementImpl: Send + Sync + Debug {
    /// Identity of the backing node, used for equality and hashing.
    fn object_id(&self) -> usize;

    fn attributes(&self) -> UiElementAttributes;

    fn text(&self) -> Option<String> {
        self.attributes().text
    }

    fn content_description(&self) -> Option<String> {
        self.attributes().content_description
    }

    fn class_name(&self) -> Option<String> {
        self.attributes().class_name
    }

    fn bounds(&self) -> Rect {
        self.attributes().bounds
    }

    fn is_visible(&self) -> bool {
        self.attributes().visible
    }

    /// Direct children in native order. Backends skip absent child slots
    /// instead of reporting them as errors.
    fn children(&self) -> Result<Vec<UiElement>, AutomationError>;

    /// The input capability events for this element are routed through.
    fn injector(&self) -> &dyn InputInjector;

    fn clone_box(&self) -> Box<dyn UiElementImpl>;
}

/// One node of a UI tree snapshot.
///
/// Wraps a platform-specific implementation behind dynamic dispatch; the
/// rest of the crate depends only on this type, never on a concrete backend.
#[derive(Debug)]
pub struct UiElement {
    inner: Box<dyn UiElementImpl>,
}

impl UiElement {
    /// Create a new UI element from a platform-specific implementation.
    pub fn new(impl_: Box<dyn UiElementImpl>) -> Self {
        Self { inner: impl_ }
    }

    /// Get the element's text content
    pub fn text(&self) -> Option<String> {
        self.inner.text()
    }

    /// Get the element's accessibility description
    pub fn content_description(&self) -> Option<String> {
        self.inner.content_description()
    }

    /// Get the element's class name (e.g. the widget type)
    pub fn class_name(&self) -> Option<String> {
        self.inner.class_name()
    }

    /// Get the element's on-screen bounds
    pub fn bounds(&self) -> Rect {
        self.inner.bounds()
    }

    /// Whether the element is visible to the user
    pub fn is_visible(&self) -> bool {
        self.inner.is_visible()
    }

    /// Get all attributes of the element
    pub fn attributes(&self) -> UiElementAttributes {
        self.inner.attributes()
    }

    /// Get child elements in native order
    pub fn children(&self) -> Result<Vec<UiElement>, AutomationError> {
        self.inner.children()
    }

    /// Perform an action against this element, routing the input events it
    /// produces through the element's injector.
    ///
    /// Returns `Ok(true)` only if every injected event was reported as
    /// delivered. Actions that require visibility fail with
    /// [`AutomationError::ElementNotVisible`] before anything is injected.
    pub fn perform(&self, action: &Action) -> Result<bool, AutomationError> {
        action.perform(self.inner.injector(), self)
    }

    /// Tap the center of this element
    pub fn click(&self) -> Result<bool, AutomationError> {
        self.perform(&Action::Click)
    }

    /// Type text into this element
    pub fn type_text(&self, text: &str) -> Result<bool, AutomationError> {
        self.perform(&Action::Type {
            text: text.to_string(),
        })
    }

    /// Scroll the element's content in the given direction (a drag gesture,
    /// slow enough not to fling)
    pub fn scroll(&self, direction: SwipeDirection) -> Result<bool, AutomationError> {
        self.perform(&Action::Swipe {
            direction,
            scroll_only: true,
        })
    }
}

impl PartialEq for UiElement {
    fn eq(&self, other: &Self) -> bool {
        self.inner.object_id() == other.inner.object_id()
    }
}

impl Eq for UiElement {}

impl std::hash::Hash for UiElement {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.inner.object_id().hash(state);
    }
}

impl Clone for UiElement {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone_box(),
        }
    }
}
