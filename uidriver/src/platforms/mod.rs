use crate::element::UiElement;
use crate::errors::AutomationError;

/// Holds the screenshot data
#[derive(Debug, Clone)]
pub struct ScreenshotResult {
    /// Raw image data (RGBA, row-major)
    pub image_data: Vec<u8>,
    /// Width of the image
    pub width: u32,
    /// Height of the image
    pub height: u32,
}

/// The common trait that all platform-specific backends must implement.
///
/// This is the only extension point the driver requires: everything else in
/// the crate works against [`UiElement`] and the traits it exposes.
pub trait AccessibilityEngine: Send + Sync {
    /// Get a fresh, valid snapshot root.
    ///
    /// Each call re-reads the UI. Elements obtained from an earlier call
    /// stay bound to the snapshot that produced them.
    fn root_element(&self) -> UiElement;

    /// Capture the screen as raw RGBA pixels.
    ///
    /// `Ok(None)` means the platform has no capture available right now;
    /// that is distinct from a capture attempt failing.
    fn take_screenshot(&self) -> Result<Option<ScreenshotResult>, AutomationError>;
}
