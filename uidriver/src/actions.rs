use crate::element::{Rect, UiElement};
use crate::errors::AutomationError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A raw input event handed to the platform for delivery.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    TouchDown { x: f64, y: f64 },
    TouchMove { x: f64, y: f64 },
    TouchUp { x: f64, y: f64 },
    KeyChar { ch: char },
}

/// Capability that delivers raw input events to the underlying platform.
///
/// Consumed, never implemented, by this crate. A `false` return means the
/// platform reported the event as not delivered; failure causes are not
/// interpreted here.
pub trait InputInjector: Send + Sync {
    fn inject(&self, event: &InputEvent) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwipeDirection {
    Up,
    Down,
    Left,
    Right,
}

// Move-point counts for the two gesture speeds. A scroll drags slowly enough
// not to fling; a plain swipe covers the same distance in far fewer events.
const SWIPE_STEPS: usize = 10;
const SCROLL_STEPS: usize = 40;

// Gestures start and end inset from the bounds edge so the first touch lands
// inside the scrollable surface.
const EDGE_INSET_RATIO: f64 = 0.1;

/// An input-producing operation bound to a target element.
///
/// Actions translate themselves into one or more [`InputInjector`] calls and
/// never retry internally; retrying is the caller's job, via the
/// [`Poller`](crate::Poller).
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Tap the center of the element's bounds. Requires visibility.
    Click,
    /// Type the given text, one key event per character. Requires visibility.
    Type { text: String },
    /// Drag across the element's bounds in the given direction.
    /// `scroll_only` selects the slow drag-to-scroll gesture instead of a
    /// full-speed swipe; the success contract is the same.
    Swipe {
        direction: SwipeDirection,
        scroll_only: bool,
    },
}

impl Action {
    /// Dispatch this action against `element` through `injector`.
    ///
    /// `Ok(true)` iff every injected event was reported delivered. Injection
    /// stops at the first undelivered event.
    pub(crate) fn perform(
        &self,
        injector: &dyn InputInjector,
        element: &UiElement,
    ) -> Result<bool, AutomationError> {
        match self {
            Action::Click => {
                require_visible(element)?;
                let (x, y) = element.bounds().center();
                debug!(x, y, "Injecting click");
                Ok(injector.inject(&InputEvent::TouchDown { x, y })
                    && injector.inject(&InputEvent::TouchUp { x, y }))
            }
            Action::Type { text } => {
                require_visible(element)?;
                debug!(len = text.len(), "Injecting key events");
                for ch in text.chars() {
                    if !injector.inject(&InputEvent::KeyChar { ch }) {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Action::Swipe {
                direction,
                scroll_only,
            } => {
                let events = swipe_events(element.bounds(), *direction, *scroll_only)?;
                debug!(?direction, scroll_only, count = events.len(), "Injecting swipe");
                for event in &events {
                    if !injector.inject(event) {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
        }
    }
}

fn require_visible(element: &UiElement) -> Result<(), AutomationError> {
    if element.is_visible() {
        Ok(())
    } else {
        Err(AutomationError::ElementNotVisible(
            "Element is not visible on screen".to_string(),
        ))
    }
}

/// Compute the ordered touch sequence for a swipe across `bounds`.
///
/// The finger travels in `direction`: down at the trailing edge, a run of
/// interpolated moves, up at the leading edge.
pub(crate) fn swipe_events(
    bounds: Rect,
    direction: SwipeDirection,
    scroll_only: bool,
) -> Result<Vec<InputEvent>, AutomationError> {
    if bounds.is_empty() {
        return Err(AutomationError::InvalidArgument(format!(
            "Cannot swipe inside empty bounds {bounds:?}"
        )));
    }

    let (cx, cy) = bounds.center();
    let x_inset = bounds.width * EDGE_INSET_RATIO;
    let y_inset = bounds.height * EDGE_INSET_RATIO;
    let ((start_x, start_y), (end_x, end_y)) = match direction {
        SwipeDirection::Up => (
            (cx, bounds.y + bounds.height - y_inset),
            (cx, bounds.y + y_inset),
        ),
        SwipeDirection::Down => (
            (cx, bounds.y + y_inset),
            (cx, bounds.y + bounds.height - y_inset),
        ),
        SwipeDirection::Left => (
            (bounds.x + bounds.width - x_inset, cy),
            (bounds.x + x_inset, cy),
        ),
        SwipeDirection::Right => (
            (bounds.x + x_inset, cy),
            (bounds.x + bounds.width - x_inset, cy),
        ),
    };

    let steps = if scroll_only {
        SCROLL_STEPS
    } else {
        SWIPE_STEPS
    };
    let mut events = Vec::with_capacity(steps + 2);
    events.push(InputEvent::TouchDown {
        x: start_x,
        y: start_y,
    });
    for i in 1..=steps {
        let t = i as f64 / steps as f64;
        events.push(InputEvent::TouchMove {
            x: start_x + (end_x - start_x) * t,
            y: start_y + (end_y - start_y) * t,
        });
    }
    events.push(InputEvent::TouchUp { x: end_x, y: end_y });
    Ok(events)
}
