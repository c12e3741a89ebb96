//! Caption Data Models
//!
//! Defines the caption render directive produced by the segment mapper and
//! the styling burned into the output clip.

use serde::{Deserialize, Serialize};

use crate::core::TimeSec;

/// Fraction of the output frame width the caption box may occupy
pub const BOX_WIDTH_FRACTION: f64 = 0.9;

// =============================================================================
// Color
// =============================================================================

/// RGBA color value (0-255 for each component)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Creates a new color from RGBA components
    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color from RGB components
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// White color
    pub fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    /// Black color
    pub fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    /// Converts to ASS/SSA color format (&HAABBGGRR)
    pub fn to_ass_color(&self) -> String {
        format!(
            "&H{:02X}{:02X}{:02X}{:02X}",
            255 - self.a,
            self.b,
            self.g,
            self.r
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::white()
    }
}

// =============================================================================
// Anchor
// =============================================================================

/// Horizontal caption alignment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Vertical caption position
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VAlign {
    Top,
    #[default]
    Center,
    Bottom,
}

/// Caption anchor on the output frame
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Anchor {
    pub horizontal: HAlign,
    pub vertical: VAlign,
}

impl Anchor {
    /// Dead-center of the frame (the short-form caption default)
    pub fn center() -> Self {
        Self::default()
    }

    /// ASS numpad alignment code for this anchor
    pub fn ass_alignment(&self) -> u8 {
        let row = match self.vertical {
            VAlign::Bottom => 0,
            VAlign::Center => 3,
            VAlign::Top => 6,
        };
        let col = match self.horizontal {
            HAlign::Left => 1,
            HAlign::Center => 2,
            HAlign::Right => 3,
        };
        row + col
    }
}

// =============================================================================
// Caption Styling
// =============================================================================

/// Caption text style burned into the clip
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionStyle {
    /// Font family name
    pub font_family: String,
    /// Font size in points
    pub font_size: u32,
    /// Whether text is bold
    pub bold: bool,
    /// Text color
    pub color: Color,
    /// Outline/stroke color (None = no outline)
    pub outline_color: Option<Color>,
    /// Outline width in pixels
    pub outline_width: f32,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            font_family: "Arial".to_string(),
            font_size: 40,
            bold: true,
            color: Color::white(),
            outline_color: Some(Color::black()),
            outline_width: 2.0,
        }
    }
}

// =============================================================================
// Caption Instruction
// =============================================================================

/// A single timed overlay-text render directive.
///
/// Derived 1:1 from a transcript segment; timing is relative to the trimmed
/// clip. The rendering engine wraps the text to fit the caption box.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionInstruction {
    /// Normalized caption text (upper-cased, trimmed)
    pub text: String,
    /// First instant the caption is visible (clip-local seconds)
    pub visible_from: TimeSec,
    /// Last instant the caption is visible (clip-local seconds)
    pub visible_until: TimeSec,
    /// Fraction of the frame width the caption box may occupy
    pub box_width_fraction: f64,
    /// Placement on the output frame
    pub anchor: Anchor,
}

impl CaptionInstruction {
    /// True when the normalized text carries no renderable content
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
