//! Label component for displaying read-only text
//!
//! With auto-size on (the default) the label's node is resized whenever the
//! text, font or wrapping changes. Wrapping uses the node's current width as
//! the limit, falling back to the style's default wrap width while the node
//! has no width yet.

use crate::component::Widget;
use crate::element::Element;
use crate::font::Font;
use crate::render::Canvas;
use crate::text::{measure_width, normalize, wrap_lines};
use crate::theme::{Color, LabelStyle};
use anyhow::Result;
use parking_lot::RwLock;
use std::sync::Arc;

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    /// Offset of content `content_width` wide inside `available` pixels
    pub fn offset(self, available: i32, content_width: i32) -> i32 {
        match self {
            TextAlign::Left => 0,
            TextAlign::Center => (available - content_width) / 2,
            TextAlign::Right => available - content_width,
        }
    }
}

struct LabelState {
    text: String,
    font: Option<Font>,
    color: Color,
    alignment: TextAlign,
    word_wrap: bool,
    auto_size: bool,
    default_wrap_width: i32,
}

/// Read-only text display
pub struct Label {
    element: Element,
    state: RwLock<LabelState>,
}

impl Label {
    /// Create a label with the default style
    pub fn new(text: &str) -> Arc<Self> {
        Self::with_style(text, &LabelStyle::default())
    }

    pub fn with_style(text: &str, style: &LabelStyle) -> Arc<Self> {
        let (width, height) = style.size;
        let label = Label {
            element: Element::new(0, 0, width, height),
            state: RwLock::new(LabelState {
                text: normalize(text),
                font: Some(style.font.clone()),
                color: style.color,
                alignment: style.alignment,
                word_wrap: style.word_wrap,
                auto_size: style.auto_size,
                default_wrap_width: style.default_wrap_width,
            }),
        };
        label.refresh_size();
        Arc::new(label)
    }

    pub fn set_text(&self, text: &str) -> &Self {
        self.state.write().text = normalize(text);
        self.refresh_size();
        self
    }

    pub fn text(&self) -> String {
        self.state.read().text.clone()
    }

    pub fn set_font(&self, font: Font) -> &Self {
        self.state.write().font = Some(font);
        self.refresh_size();
        self
    }

    /// Remove the font; an auto-sized label collapses to zero size
    pub fn clear_font(&self) -> &Self {
        self.state.write().font = None;
        self.refresh_size();
        self
    }

    pub fn font(&self) -> Option<Font> {
        self.state.read().font.clone()
    }

    pub fn set_color(&self, color: Color) -> &Self {
        self.state.write().color = color;
        self
    }

    pub fn color(&self) -> Color {
        self.state.read().color
    }

    pub fn set_alignment(&self, alignment: TextAlign) -> &Self {
        self.state.write().alignment = alignment;
        self
    }

    pub fn alignment(&self) -> TextAlign {
        self.state.read().alignment
    }

    pub fn set_word_wrap(&self, enable: bool) -> &Self {
        self.state.write().word_wrap = enable;
        self.refresh_size();
        self
    }

    pub fn word_wrap(&self) -> bool {
        self.state.read().word_wrap
    }

    /// Toggle auto-sizing; enabling it resizes immediately
    pub fn set_auto_size(&self, enable: bool) -> &Self {
        self.state.write().auto_size = enable;
        self.refresh_size();
        self
    }

    pub fn auto_size(&self) -> bool {
        self.state.read().auto_size
    }

    /// Lines as they would be drawn at the current width
    pub fn lines(&self) -> Vec<String> {
        let state = self.state.read();
        let width = self.element.bounds().width;
        match &state.font {
            Some(font) if state.word_wrap && width > 0 => {
                wrap_lines(&state.text, width, font.as_ref())
            }
            _ => vec![state.text.clone()],
        }
    }

    fn refresh_size(&self) {
        let state = self.state.read();
        if !state.auto_size {
            return;
        }

        let font = match &state.font {
            Some(font) if !state.text.is_empty() => font,
            _ => {
                self.element.set_size(0, 0);
                return;
            }
        };
        let line_height = font.line_height();

        if !state.word_wrap {
            let width = measure_width(&state.text, font.as_ref());
            self.element.set_size(width, line_height);
            return;
        }

        let mut wrap_width = self.element.bounds().width;
        if wrap_width <= 0 {
            wrap_width = state.default_wrap_width;
        }

        let lines = wrap_lines(&state.text, wrap_width, font.as_ref());
        let widest = lines
            .iter()
            .map(|line| measure_width(line, font.as_ref()))
            .max()
            .unwrap_or(0);
        self.element.set_size(widest, lines.len() as i32 * line_height);
    }
}

impl Widget for Label {
    fn element(&self) -> &Element {
        &self.element
    }

    fn render(&self, canvas: &mut dyn Canvas) -> Result<()> {
        if !self.element.is_visible() {
            return Ok(());
        }

        let state = self.state.read();
        let font = match &state.font {
            Some(font) if !state.text.is_empty() => font,
            _ => return Ok(()),
        };

        let bounds = self.element.bounds();
        let ascent = font.ascent();

        if state.word_wrap && bounds.width > 0 {
            let line_height = font.line_height();
            let lines = wrap_lines(&state.text, bounds.width, font.as_ref());
            for (i, line) in lines.iter().enumerate() {
                let line_width = measure_width(line, font.as_ref());
                let x = bounds.x + state.alignment.offset(bounds.width, line_width);
                let y = bounds.y + i as i32 * line_height + ascent;
                canvas.draw_text(line, x, y, font, state.color)?;
            }
            return Ok(());
        }

        let mut x = bounds.x;
        if state.alignment != TextAlign::Left && bounds.width > 0 {
            let text_width = measure_width(&state.text, font.as_ref());
            x += state.alignment.offset(bounds.width, text_width);
        }
        canvas.draw_text(&state.text, x, bounds.y + ascent, font, state.color)
    }

    fn name(&self) -> &str {
        "Label"
    }
}
