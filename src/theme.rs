//! Colour palettes for the dark and light themes.

use crate::models::{Mode, ThemeMode};

/// An sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// `#RRGGBB` notation.
    #[cfg(test)]
    pub fn hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }

    /// 24-bit ANSI escape that sets this colour as the foreground.
    pub fn ansi_fg(&self) -> String {
        format!("\x1b[38;2;{};{};{}m", self.0, self.1, self.2)
    }

    /// 24-bit ANSI escape that sets this colour as the background.
    pub fn ansi_bg(&self) -> String {
        format!("\x1b[48;2;{};{};{}m", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorPalette {
    pub work: Rgb,
    pub short_break: Rgb,
    pub long_break: Rgb,
    pub bg_primary: Rgb,
    pub text_primary: Rgb,
    pub text_secondary: Rgb,
    pub text_muted: Rgb,
    pub progress_bg: Rgb,
    pub success: Rgb,
    pub error: Rgb,
    pub warning: Rgb,
}

impl ColorPalette {
    /// Accent colour for a timer mode.
    pub fn accent(&self, mode: Mode) -> Rgb {
        match mode {
            Mode::Work => self.work,
            Mode::ShortBreak => self.short_break,
            Mode::LongBreak => self.long_break,
        }
    }
}

pub static DARK: ColorPalette = ColorPalette {
    work: Rgb(0xFF, 0x6B, 0x6B),
    short_break: Rgb(0x4E, 0xCD, 0xC4),
    long_break: Rgb(0x45, 0xB7, 0xD1),
    bg_primary: Rgb(0x1A, 0x1A, 0x2E),
    text_primary: Rgb(0xFF, 0xFF, 0xFF),
    text_secondary: Rgb(0xB8, 0xC5, 0xD6),
    text_muted: Rgb(0x94, 0xA3, 0xB8),
    progress_bg: Rgb(0x2D, 0x37, 0x48),
    success: Rgb(0x10, 0xB9, 0x81),
    error: Rgb(0xDC, 0x35, 0x45),
    warning: Rgb(0xF5, 0x9E, 0x0B),
};

pub static LIGHT: ColorPalette = ColorPalette {
    work: Rgb(0xFF, 0x6B, 0x6B),
    short_break: Rgb(0x4E, 0xCD, 0xC4),
    long_break: Rgb(0x45, 0xB7, 0xD1),
    bg_primary: Rgb(0xF8, 0xF9, 0xFA),
    text_primary: Rgb(0x21, 0x25, 0x29),
    text_secondary: Rgb(0x49, 0x50, 0x57),
    text_muted: Rgb(0x6C, 0x75, 0x7D),
    progress_bg: Rgb(0xDE, 0xE2, 0xE6),
    success: Rgb(0x19, 0x87, 0x54),
    error: Rgb(0xDC, 0x35, 0x45),
    warning: Rgb(0xFF, 0xC1, 0x07),
};

/// Palette for a theme mode.
pub fn palette(mode: ThemeMode) -> &'static ColorPalette {
    match mode {
        ThemeMode::Dark => &DARK,
        ThemeMode::Light => &LIGHT,
    }
}
