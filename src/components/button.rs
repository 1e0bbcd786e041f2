//! Clickable button with hover feedback and an optional icon

use crate::component::{Listeners, Widget};
use crate::element::Element;
use crate::event::{Event, EventData, EventKind};
use crate::font::Font;
use crate::layout::Rect;
use crate::render::Canvas;
use crate::theme::{ButtonStyle, Color};
use anyhow::Result;
use image::RgbaImage;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

/// Baseline sits this far below the content centre
const BASELINE_OFFSET: i32 = 4;

/// Visual state of a button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonState {
    #[default]
    Normal,
    Hover,
    Pressed,
    Disabled,
}

struct Inner {
    text: String,
    icon: Option<RgbaImage>,
    font: Font,
    state: ButtonState,
    enabled: bool,
    normal_bg: Color,
    hover_bg: Color,
    pressed_bg: Color,
    disabled_bg: Color,
    text_color: Color,
    disabled_text_color: Color,
    border_color: Color,
    border_width: i32,
    padding: i32,
    icon_spacing: i32,
    approx_char_width: i32,
}

impl Inner {
    fn background(&self) -> Color {
        match self.state {
            ButtonState::Normal => self.normal_bg,
            ButtonState::Hover => self.hover_bg,
            ButtonState::Pressed => self.pressed_bg,
            ButtonState::Disabled => self.disabled_bg,
        }
    }

    fn foreground(&self) -> Color {
        if self.state == ButtonState::Disabled {
            self.disabled_text_color
        } else {
            self.text_color
        }
    }
}

/// Push button
pub struct Button {
    element: Element,
    inner: Mutex<Inner>,
    click_listeners: Listeners<()>,
    hover_listeners: Listeners<()>,
    unhover_listeners: Listeners<()>,
}

impl Button {
    pub fn new(text: &str) -> Arc<Self> {
        Self::with_style(text, &ButtonStyle::default())
    }

    pub fn with_style(text: &str, style: &ButtonStyle) -> Arc<Self> {
        let (width, height) = style.size;
        Arc::new_cyclic(|weak: &Weak<Button>| {
            let button = Button {
                element: Element::new(0, 0, width, height),
                inner: Mutex::new(Inner {
                    text: text.to_string(),
                    icon: None,
                    font: style.font.clone(),
                    state: ButtonState::Normal,
                    enabled: true,
                    normal_bg: style.normal_bg,
                    hover_bg: style.hover_bg,
                    pressed_bg: style.pressed_bg,
                    disabled_bg: style.disabled_bg,
                    text_color: style.text_color,
                    disabled_text_color: style.disabled_text_color,
                    border_color: style.border_color,
                    border_width: style.border_width,
                    padding: style.padding,
                    icon_spacing: style.icon_spacing,
                    approx_char_width: style.approx_char_width,
                }),
                click_listeners: Listeners::new(),
                hover_listeners: Listeners::new(),
                unhover_listeners: Listeners::new(),
            };

            let on_click = weak.clone();
            button
                .element
                .add_event_handler(EventKind::Click, move |event: &Event| {
                    on_click
                        .upgrade()
                        .is_some_and(|button| button.handle_click(event))
                });
            let on_move = weak.clone();
            button
                .element
                .add_event_handler(EventKind::MouseMove, move |event: &Event| {
                    on_move
                        .upgrade()
                        .is_some_and(|button| button.handle_mouse_move(event))
                });
            button
        })
    }

    pub fn set_text(&self, text: &str) -> &Self {
        self.inner.lock().text = text.to_string();
        self
    }

    pub fn text(&self) -> String {
        self.inner.lock().text.clone()
    }

    /// Icon drawn left of the text, scaled to a square
    pub fn set_icon(&self, icon: RgbaImage) -> &Self {
        self.inner.lock().icon = Some(icon);
        self
    }

    pub fn clear_icon(&self) -> &Self {
        self.inner.lock().icon = None;
        self
    }

    pub fn has_icon(&self) -> bool {
        self.inner.lock().icon.is_some()
    }

    pub fn set_font(&self, font: Font) -> &Self {
        self.inner.lock().font = font;
        self
    }

    /// Enable or disable the button
    ///
    /// Disabling always moves to `Disabled`; enabling only leaves `Disabled`
    /// (for `Normal`) and keeps a hover or press state as it is.
    pub fn set_enabled(&self, enabled: bool) -> &Self {
        let mut inner = self.inner.lock();
        inner.enabled = enabled;
        if !enabled {
            inner.state = ButtonState::Disabled;
        } else if inner.state == ButtonState::Disabled {
            inner.state = ButtonState::Normal;
        }
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.lock().enabled
    }

    pub fn state(&self) -> ButtonState {
        self.inner.lock().state
    }

    /// Force the visual state without touching the enabled flag
    pub fn set_state(&self, state: ButtonState) -> &Self {
        self.inner.lock().state = state;
        self
    }

    pub fn set_normal_color(&self, color: Color) -> &Self {
        self.inner.lock().normal_bg = color;
        self
    }

    pub fn set_hover_color(&self, color: Color) -> &Self {
        self.inner.lock().hover_bg = color;
        self
    }

    pub fn set_pressed_color(&self, color: Color) -> &Self {
        self.inner.lock().pressed_bg = color;
        self
    }

    pub fn set_disabled_color(&self, color: Color) -> &Self {
        self.inner.lock().disabled_bg = color;
        self
    }

    pub fn set_text_color(&self, color: Color) -> &Self {
        self.inner.lock().text_color = color;
        self
    }

    pub fn set_disabled_text_color(&self, color: Color) -> &Self {
        self.inner.lock().disabled_text_color = color;
        self
    }

    pub fn set_border_color(&self, color: Color) -> &Self {
        self.inner.lock().border_color = color;
        self
    }

    /// Outline width; zero hides the outline
    pub fn set_border_width(&self, width: i32) -> &Self {
        self.inner.lock().border_width = width;
        self
    }

    pub fn on_click<F>(&self, listener: F) -> &Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.click_listeners.add(move |_: &()| listener());
        self
    }

    pub fn on_hover<F>(&self, listener: F) -> &Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.hover_listeners.add(move |_: &()| listener());
        self
    }

    pub fn on_unhover<F>(&self, listener: F) -> &Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.unhover_listeners.add(move |_: &()| listener());
        self
    }

    fn handle_click(&self, event: &Event) -> bool {
        let EventData::Click { x, y, .. } = *event.data() else {
            return false;
        };

        {
            let mut inner = self.inner.lock();
            if !inner.enabled || !self.element.contains_point(x, y) {
                return false;
            }
            inner.state = ButtonState::Pressed;
        }

        self.click_listeners.emit(&());

        // a listener may have disabled the button
        let mut inner = self.inner.lock();
        if inner.state == ButtonState::Pressed {
            inner.state = ButtonState::Normal;
        }
        true
    }

    fn handle_mouse_move(&self, event: &Event) -> bool {
        let EventData::MouseMove { x, y } = *event.data() else {
            return false;
        };

        let inside = self.element.contains_point(x, y);
        let entered = {
            let mut inner = self.inner.lock();
            if !inner.enabled {
                return false;
            }
            let was_hover = inner.state == ButtonState::Hover;
            if inside && !was_hover {
                inner.state = ButtonState::Hover;
                true
            } else if !inside && was_hover {
                inner.state = ButtonState::Normal;
                false
            } else {
                return false;
            }
        };

        if entered {
            self.hover_listeners.emit(&());
        } else {
            self.unhover_listeners.emit(&());
        }
        true
    }
}

impl Widget for Button {
    fn element(&self) -> &Element {
        &self.element
    }

    fn render(&self, canvas: &mut dyn Canvas) -> Result<()> {
        if !self.element.is_visible() {
            return Ok(());
        }

        let bounds = self.element.bounds();
        let inner = self.inner.lock();

        canvas.draw_rect(bounds, inner.background(), true)?;
        if inner.border_width > 0 {
            canvas.draw_rect(bounds, inner.border_color, false)?;
        }

        let content = bounds.inner(inner.padding);

        let mut icon_width = 0;
        if let Some(icon) = &inner.icon {
            let size = content.height.min(content.width / 3);
            let icon_y = content.y + (content.height - size) / 2;
            canvas.draw_image(icon, Rect::new(content.x, icon_y, size, size))?;
            icon_width = size + inner.icon_spacing;
        }

        if inner.text.is_empty() {
            return Ok(());
        }

        let mut text_x = content.x + icon_width;
        let text_width = content.width - icon_width;
        if text_width > 0 {
            let estimated = inner.text.chars().count() as i32 * inner.approx_char_width;
            if estimated < text_width {
                text_x += (text_width - estimated) / 2;
            }
        }
        let text_y = content.y + content.height / 2 + BASELINE_OFFSET;

        canvas.draw_text(&inner.text, text_x, text_y, &inner.font, inner.foreground())
    }

    fn name(&self) -> &str {
        "Button"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::MouseButton;
    use crate::headless::{DrawOp, HeadlessCanvas};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, impl Fn() + Send + Sync + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let inner = count.clone();
        (count, move || {
            inner.fetch_add(1, Ordering::SeqCst);
        })
    }

    fn placed(text: &str) -> Arc<Button> {
        let button = Button::new(text);
        button.element().set_bounds(Rect::new(10, 10, 100, 30));
        button
    }

    #[test]
    fn test_defaults() {
        let button = Button::new("OK");
        assert_eq!(button.state(), ButtonState::Normal);
        assert!(button.is_enabled());
        assert!(!button.has_icon());
        assert_eq!(button.element().bounds(), Rect::new(0, 0, 100, 30));
        assert_eq!(button.element().handler_count(EventKind::Click), 1);
        assert_eq!(button.element().handler_count(EventKind::MouseMove), 1);
    }

    #[test]
    fn test_click_inside_fires_and_returns_to_normal() {
        let button = placed("OK");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let weak = Arc::downgrade(&button);
        button.on_click(move || {
            if let Some(button) = weak.upgrade() {
                sink.lock().push(button.state());
            }
        });

        assert!(button.handle_event(&Event::click(50, 20, MouseButton::Left)));
        assert_eq!(*seen.lock(), vec![ButtonState::Pressed]);
        assert_eq!(button.state(), ButtonState::Normal);
    }

    #[test]
    fn test_click_outside_ignored() {
        let button = placed("OK");
        let (clicks, listener) = counter();
        button.on_click(listener);

        assert!(!button.handle_event(&Event::click(5, 5, MouseButton::Left)));
        assert!(!button.handle_click(&Event::click(110, 20, MouseButton::Left)));
        assert_eq!(clicks.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_disabled_never_clicks() {
        let button = placed("OK");
        let (clicks, listener) = counter();
        button.on_click(listener);
        button.set_enabled(false);

        assert!(!button.handle_event(&Event::click(50, 20, MouseButton::Left)));
        assert!(!button.handle_event(&Event::mouse_move(50, 20)));
        assert_eq!(clicks.load(Ordering::SeqCst), 0);
        assert_eq!(button.state(), ButtonState::Disabled);
    }

    #[test]
    fn test_listener_disabling_button_sticks() {
        let button = placed("OK");
        let weak = Arc::downgrade(&button);
        button.on_click(move || {
            if let Some(button) = weak.upgrade() {
                button.set_enabled(false);
            }
        });
        assert!(button.handle_event(&Event::click(50, 20, MouseButton::Left)));
        assert_eq!(button.state(), ButtonState::Disabled);
    }

    #[test]
    fn test_enable_toggle() {
        let button = Button::new("OK");
        button.set_state(ButtonState::Hover).set_enabled(true);
        assert_eq!(button.state(), ButtonState::Hover);

        button.set_state(ButtonState::Pressed).set_enabled(true);
        assert_eq!(button.state(), ButtonState::Pressed);

        button.set_enabled(false);
        assert_eq!(button.state(), ButtonState::Disabled);
        assert!(!button.is_enabled());

        button.set_enabled(true);
        assert_eq!(button.state(), ButtonState::Normal);
    }

    #[test]
    fn test_hover_transitions() {
        let button = placed("OK");
        let (hovers, on_hover) = counter();
        let (unhovers, on_unhover) = counter();
        button.on_hover(on_hover).on_unhover(on_unhover);

        assert!(button.handle_event(&Event::mouse_move(20, 20)));
        assert_eq!(button.state(), ButtonState::Hover);
        assert!(!button.handle_event(&Event::mouse_move(30, 20)));

        assert!(button.handle_event(&Event::mouse_move(200, 20)));
        assert_eq!(button.state(), ButtonState::Normal);
        assert!(!button.handle_event(&Event::mouse_move(210, 20)));

        assert_eq!(hovers.load(Ordering::SeqCst), 1);
        assert_eq!(unhovers.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_render_centres_text() {
        let button = placed("OK");
        let mut canvas = HeadlessCanvas::new(200, 100);
        button.render(&mut canvas).unwrap();

        let style = ButtonStyle::default();
        let ops = canvas.ops();
        assert_eq!(ops.len(), 3);
        assert_eq!(
            ops[0],
            DrawOp::Rect {
                rect: Rect::new(10, 10, 100, 30),
                color: style.normal_bg,
                filled: true
            }
        );
        assert!(matches!(ops[1], DrawOp::Rect { filled: false, .. }));
        // content 18,18 84x14; "OK" estimated at 14px
        assert_eq!(
            ops[2],
            DrawOp::Text {
                text: "OK".to_string(),
                x: 53,
                y: 29,
                color: style.text_color
            }
        );
    }

    #[test]
    fn test_render_with_icon() {
        let button = placed("OK");
        button.set_icon(RgbaImage::new(16, 16));
        let mut canvas = HeadlessCanvas::new(200, 100);
        button.render(&mut canvas).unwrap();

        let ops = canvas.ops();
        assert_eq!(
            ops[2],
            DrawOp::Image {
                width: 16,
                height: 16,
                target: Rect::new(18, 18, 14, 14)
            }
        );
        assert!(matches!(ops[3], DrawOp::Text { x: 62, y: 29, .. }));
    }

    #[test]
    fn test_render_state_colours() {
        let style = ButtonStyle::default();
        let button = placed("OK");
        button.set_border_width(0);

        button.set_state(ButtonState::Hover);
        let mut canvas = HeadlessCanvas::new(200, 100);
        button.render(&mut canvas).unwrap();
        assert!(matches!(canvas.ops()[0], DrawOp::Rect { color, .. } if color == style.hover_bg));
        assert_eq!(canvas.ops().len(), 2);

        button.set_enabled(false);
        let mut canvas = HeadlessCanvas::new(200, 100);
        button.render(&mut canvas).unwrap();
        assert!(
            matches!(canvas.ops()[0], DrawOp::Rect { color, .. } if color == style.disabled_bg)
        );
        assert!(
            matches!(&canvas.ops()[1], DrawOp::Text { color, .. } if *color == style.disabled_text_color)
        );
    }

    #[test]
    fn test_hidden_or_empty_button() {
        let button = placed("");
        let mut canvas = HeadlessCanvas::new(200, 100);
        button.render(&mut canvas).unwrap();
        assert_eq!(canvas.ops().len(), 2);

        button.element().set_visible(false);
        let mut canvas = HeadlessCanvas::new(200, 100);
        button.render(&mut canvas).unwrap();
        assert!(canvas.ops().is_empty());
    }
}
