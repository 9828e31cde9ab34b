//! Display capability

use crate::interaction::{Page, Refresh, Rotation};
use crate::telemetry::{AlertLevel, TelemetrySnapshot};

/// Rendering collaborator
///
/// Receives render commands with a data snapshot; layout and drawing are
/// its own business. Calls are fire-and-forget: a panel that fails to draw
/// has no recovery the control layer could perform.
pub trait Display {
    /// Switch the backlight on or off
    fn set_backlight(&mut self, on: bool);

    /// Set backlight brightness (0-255)
    fn set_brightness(&mut self, level: u8);

    /// Rotate the panel
    fn set_rotation(&mut self, rotation: Rotation);

    /// Draw `page` from `snapshot`
    ///
    /// [`Refresh::Full`] redraws the static layout; [`Refresh::Values`]
    /// updates only the dynamic fields.
    fn render(&mut self, page: Page, snapshot: &TelemetrySnapshot, refresh: Refresh);

    /// Draw the factory-reset countdown overlay
    ///
    /// `full_redraw` is set for the first frame of a countdown; later frames
    /// only update the number.
    fn show_reset_countdown(&mut self, seconds: u8, full_redraw: bool);

    /// Draw or blank the header banner in the colour of `level`
    fn show_alert_banner(&mut self, level: AlertLevel, visible: bool);
}
