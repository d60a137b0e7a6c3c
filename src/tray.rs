//! Accent-tinted tray icon.

use crate::theme::Rgb;

/// Standard macOS tray icon edge length.
pub const ICON_SIZE: u32 = 22;

/// RGBA pixels of a filled, anti-aliased circle in `color`.
pub fn icon_rgba(size: u32, color: Rgb) -> Vec<u8> {
    let mut rgba = Vec::with_capacity((size * size * 4) as usize);

    let center = size as f32 / 2.0;
    let radius = (size as f32 / 2.0) - 2.0;

    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 + 0.5 - center;
            let dy = y as f32 + 0.5 - center;
            let distance = (dx * dx + dy * dy).sqrt();

            let alpha = if distance <= radius {
                255
            } else if distance <= radius + 1.0 {
                // Anti-aliased edge
                ((radius + 1.0 - distance) * 255.0) as u8
            } else {
                0
            };
            rgba.extend_from_slice(&[color.0, color.1, color.2, alpha]);
        }
    }

    rgba
}

#[cfg(target_os = "macos")]
mod native {
    use super::{icon_rgba, ICON_SIZE};
    use crate::theme::Rgb;
    use thiserror::Error;
    use tray_icon::Icon;

    #[derive(Error, Debug)]
    pub enum TrayError {
        #[error("Failed to load icon: {0}")]
        IconLoad(#[from] tray_icon::BadIcon),
        #[error("Failed to build tray icon: {0}")]
        Build(#[from] tray_icon::Error),
    }

    /// Icon tinted with the accent colour of the current mode.
    pub fn load_icon(color: Rgb) -> Result<Icon, TrayError> {
        Ok(Icon::from_rgba(
            icon_rgba(ICON_SIZE, color),
            ICON_SIZE,
            ICON_SIZE,
        )?)
    }
}

#[cfg(target_os = "macos")]
pub use native::{load_icon, TrayError};
