//! Marquee theme: cinema-lobby amber on near-black
//!
//! Color palette and style helpers for the TUI.

use ratatui::style::{Color, Modifier, Style};

/// Marquee color palette
pub struct Theme;

impl Theme {
    // ═══════════════════════════════════════════════════════════════════════
    // CORE PALETTE
    // ═══════════════════════════════════════════════════════════════════════

    /// Background: #101014 (projection-room black)
    pub const BACKGROUND: Color = Color::Rgb(0x10, 0x10, 0x14);

    /// Primary: #ffb000 (marquee bulb amber)
    pub const PRIMARY: Color = Color::Rgb(0xff, 0xb0, 0x00);

    /// Secondary: #e50914 (curtain red)
    pub const SECONDARY: Color = Color::Rgb(0xe5, 0x09, 0x14);

    /// Accent: #f5e6c8 (ticket cream)
    pub const ACCENT: Color = Color::Rgb(0xf5, 0xe6, 0xc8);

    /// Highlight: #ff6f3c (neon orange)
    pub const HIGHLIGHT: Color = Color::Rgb(0xff, 0x6f, 0x3c);

    /// Text: #ececec
    pub const TEXT: Color = Color::Rgb(0xec, 0xec, 0xec);

    /// Dim: #5a5a66
    pub const DIM: Color = Color::Rgb(0x5a, 0x5a, 0x66);

    /// Success: #3ddc84
    pub const SUCCESS: Color = Color::Rgb(0x3d, 0xdc, 0x84);

    /// Warning: #ffcc4d
    pub const WARNING: Color = Color::Rgb(0xff, 0xcc, 0x4d);

    /// Error: #ff4d5a
    pub const ERROR: Color = Color::Rgb(0xff, 0x4d, 0x5a);

    // ═══════════════════════════════════════════════════════════════════════
    // DERIVED COLORS
    // ═══════════════════════════════════════════════════════════════════════

    /// Panels, pills and the input field
    pub const BACKGROUND_LIGHT: Color = Color::Rgb(0x1a, 0x1a, 0x21);

    /// Border color (dim amber)
    pub const BORDER: Color = Color::Rgb(0x7a, 0x5a, 0x1e);

    /// Border color when focused
    pub const BORDER_FOCUSED: Color = Self::PRIMARY;

    // ═══════════════════════════════════════════════════════════════════════
    // STYLE HELPERS
    // ═══════════════════════════════════════════════════════════════════════

    /// Default text style
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND)
    }

    /// Dimmed/muted text
    pub fn dimmed() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn error() -> Style {
        Style::default()
            .fg(Self::ERROR)
            .add_modifier(Modifier::BOLD)
    }

    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    pub fn warning() -> Style {
        Style::default().fg(Self::WARNING)
    }

    /// Title/header style
    pub fn title() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn secondary() -> Style {
        Style::default()
            .fg(Self::SECONDARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn accent() -> Style {
        Style::default().fg(Self::ACCENT)
    }

    /// Normal/unfocused border
    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    /// Focused border
    pub fn border_focused() -> Style {
        Style::default()
            .fg(Self::BORDER_FOCUSED)
            .add_modifier(Modifier::BOLD)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // COMPONENT STYLES
    // ═══════════════════════════════════════════════════════════════════════

    /// Suggestion row (normal state)
    pub fn list_item() -> Style {
        Style::default().fg(Self::TEXT)
    }

    /// Suggestion row (highlighted)
    pub fn list_item_selected() -> Style {
        Style::default()
            .fg(Self::BACKGROUND)
            .bg(Self::HIGHLIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for input fields
    pub fn input() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND_LIGHT)
    }

    /// Metadata pill (year, genre, rating, runtime)
    pub fn pill() -> Style {
        Style::default().fg(Self::ACCENT).bg(Self::BACKGROUND_LIGHT)
    }

    /// Initials or photo marker in a cast card
    pub fn avatar() -> Style {
        Style::default()
            .fg(Self::BACKGROUND)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Link text
    pub fn link() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::UNDERLINED)
    }

    /// Keybinding hint style
    pub fn keybind() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    /// Keybinding description style
    pub fn keybind_desc() -> Style {
        Style::default().fg(Self::DIM)
    }

    /// Status bar style
    pub fn status_bar() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND_LIGHT)
    }

    /// Loading/spinner indicator
    pub fn loading() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Year/date metadata
    pub fn year() -> Style {
        Style::default().fg(Self::DIM)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// COLOR UTILITIES
// ═══════════════════════════════════════════════════════════════════════════

/// Relative luminance for a color
/// Formula: https://www.w3.org/TR/WCAG20/#relativeluminancedef
pub fn relative_luminance(r: u8, g: u8, b: u8) -> f64 {
    fn channel_luminance(c: u8) -> f64 {
        let c = c as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }

    0.2126 * channel_luminance(r) + 0.7152 * channel_luminance(g) + 0.0722 * channel_luminance(b)
}

/// Contrast ratio between two colors, from 1 (same) to 21 (black/white)
pub fn contrast_ratio(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> f64 {
    let l1 = relative_luminance(fg.0, fg.1, fg.2);
    let l2 = relative_luminance(bg.0, bg.1, bg.2);

    let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };

    (lighter + 0.05) / (darker + 0.05)
}

/// WCAG AA for normal text
pub fn meets_wcag_aa(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> bool {
    contrast_ratio(fg, bg) >= 4.5
}

/// Extract RGB tuple from ratatui Color (only works for Rgb variant)
pub fn color_to_rgb(color: Color) -> Option<(u8, u8, u8)> {
    match color {
        Color::Rgb(r, g, b) => Some((r, g, b)),
        _ => None,
    }
}
