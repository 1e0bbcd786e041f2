//! Theming - explicit appearance configuration for every widget
//!
//! Widgets never bake colours or metrics into their constructors. Each one
//! takes a style struct (or the whole [`Theme`]) and `Default` supplies the
//! stock look: black text on white, light grey buttons, the 7x13 font.

mod color;

pub use color::Color;

use crate::components::label::TextAlign;
use crate::font::{default_font, Font};

/// Window-level appearance
#[derive(Debug, Clone)]
pub struct WindowStyle {
    /// Colour the canvas is cleared to before each frame (white)
    pub background: Color,
}

impl Default for WindowStyle {
    fn default() -> Self {
        WindowStyle {
            background: Color::white(),
        }
    }
}

/// Label appearance and behaviour defaults
#[derive(Debug, Clone)]
pub struct LabelStyle {
    pub font: Font,
    /// Text colour (black)
    pub color: Color,
    /// Horizontal alignment (left)
    pub alignment: TextAlign,
    /// Wrap on whitespace (off)
    pub word_wrap: bool,
    /// Resize to fit the text (on)
    pub auto_size: bool,
    /// Wrap width used while the label has no width of its own (200px)
    pub default_wrap_width: i32,
    /// Initial size before auto-sizing (100x20)
    pub size: (i32, i32),
}

impl Default for LabelStyle {
    fn default() -> Self {
        LabelStyle {
            font: default_font(),
            color: Color::black(),
            alignment: TextAlign::Left,
            word_wrap: false,
            auto_size: true,
            default_wrap_width: 200,
            size: (100, 20),
        }
    }
}

/// Text input appearance
#[derive(Debug, Clone)]
pub struct InputStyle {
    pub font: Font,
    /// Text colour (black)
    pub text_color: Color,
    /// Fill colour (white)
    pub background: Color,
    /// Outline colour (rgb 179,179,179)
    pub border: Color,
    /// Placeholder colour (rgb 153,153,153)
    pub placeholder: Color,
    /// Caret colour (black)
    pub caret: Color,
    /// Left padding before the first glyph (5px)
    pub padding: i32,
    /// Advance used for glyphs the font cannot measure (7px)
    pub fallback_advance: i32,
    /// Initial size (150x25)
    pub size: (i32, i32),
}

impl Default for InputStyle {
    fn default() -> Self {
        InputStyle {
            font: default_font(),
            text_color: Color::black(),
            background: Color::white(),
            border: Color::from_unit(0.7, 0.7, 0.7),
            placeholder: Color::from_unit(0.6, 0.6, 0.6),
            caret: Color::black(),
            padding: 5,
            fallback_advance: 7,
            size: (150, 25),
        }
    }
}

/// Button appearance
#[derive(Debug, Clone)]
pub struct ButtonStyle {
    pub font: Font,
    /// Background while idle (rgb 230,230,230)
    pub normal_bg: Color,
    /// Background while the pointer is over the button (rgb 204,204,230)
    pub hover_bg: Color,
    /// Background while pressed (rgb 179,179,204)
    pub pressed_bg: Color,
    /// Background while disabled (rgb 242,242,242)
    pub disabled_bg: Color,
    /// Label colour (black)
    pub text_color: Color,
    /// Label colour while disabled (rgb 153,153,153)
    pub disabled_text_color: Color,
    /// Outline colour (rgb 153,153,153)
    pub border_color: Color,
    /// Outline width, 0 disables the outline (1px)
    pub border_width: i32,
    /// Inner padding on every side (8px)
    pub padding: i32,
    /// Gap between icon and text (4px)
    pub icon_spacing: i32,
    /// Per-character width used to centre the label (7px)
    pub approx_char_width: i32,
    /// Initial size (100x30)
    pub size: (i32, i32),
}

impl Default for ButtonStyle {
    fn default() -> Self {
        ButtonStyle {
            font: default_font(),
            normal_bg: Color::from_unit(0.9, 0.9, 0.9),
            hover_bg: Color::from_unit(0.8, 0.8, 0.9),
            pressed_bg: Color::from_unit(0.7, 0.7, 0.8),
            disabled_bg: Color::from_unit(0.95, 0.95, 0.95),
            text_color: Color::black(),
            disabled_text_color: Color::from_unit(0.6, 0.6, 0.6),
            border_color: Color::from_unit(0.6, 0.6, 0.6),
            border_width: 1,
            padding: 8,
            icon_spacing: 4,
            approx_char_width: 7,
            size: (100, 30),
        }
    }
}

/// Theme bundling the style of every widget kind
#[derive(Debug, Clone, Default)]
pub struct Theme {
    pub window: WindowStyle,
    pub label: LabelStyle,
    pub input: InputStyle,
    pub button: ButtonStyle,
}

impl Theme {
    /// Stock theme
    pub fn new() -> Self {
        Self::default()
    }

    /// Use one font for every widget
    pub fn with_font(mut self, font: Font) -> Self {
        self.label.font = font.clone();
        self.input.font = font.clone();
        self.button.font = font;
        self
    }
}
