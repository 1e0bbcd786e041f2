//! Single-line text input with caret, selection and validation
//!
//! Provides:
//! - Code-point based editing (insert, backspace, delete) that stays correct
//!   for multi-byte text
//! - Caret placement from click position using glyph advances
//! - Selection that is replaced by typed text
//! - Length limit and custom validator; rejected edits leave the input
//!   untouched and are not reported as errors
//! - Change, submit, focus and blur listeners
//!
//! The input registers its own Click, KeyPress, TextInput, Focus and Blur
//! handlers on its node when constructed, so it takes part in dispatch like
//! any other element.

use crate::component::{Listeners, Widget};
use crate::element::Element;
use crate::event::{Event, EventData, EventKind, Key};
use crate::font::Font;
use crate::layout::Rect;
use crate::render::Canvas;
use crate::text::{caret_index_at, caret_offset, normalize};
use crate::theme::{Color, InputStyle};
use anyhow::Result;
use parking_lot::Mutex;
use std::ops::Range;
use std::sync::{Arc, Weak};

/// Predicate over the text an edit would produce
pub type Validator = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Baseline sits this far below the vertical centre
const BASELINE_OFFSET: i32 = 4;
/// Gap between the caret and the top/bottom edges
const CARET_INSET: i32 = 2;

struct InputState {
    text: Vec<char>,
    placeholder: String,
    font: Font,
    text_color: Color,
    background: Color,
    border: Color,
    placeholder_color: Color,
    caret_color: Color,
    padding: i32,
    fallback_advance: i32,
    cursor: usize,
    /// Anchor and end as set; normalized when read
    selection: Option<(usize, usize)>,
    focused: bool,
    max_length: Option<usize>,
    validator: Option<Validator>,
}

impl InputState {
    fn text_string(&self) -> String {
        self.text.iter().collect()
    }

    fn selection_range(&self) -> Option<Range<usize>> {
        match self.selection {
            Some((a, b)) if a != b => Some(a.min(b)..a.max(b)),
            _ => None,
        }
    }

    fn advance(&self, ch: char) -> i32 {
        self.font.advance(ch).unwrap_or(self.fallback_advance)
    }

    fn accepts(&self, candidate: &str) -> bool {
        self.validator.as_ref().is_none_or(|validate| validate(candidate))
    }

    /// Remove the selected range, collapsing the cursor to its start
    fn delete_selection(&mut self) -> bool {
        let Some(range) = self.selection_range() else {
            return false;
        };
        self.cursor = range.start;
        self.text.drain(range);
        self.selection = None;
        true
    }

    /// Insert at the cursor (replacing any selection); returns whether the
    /// edit was applied
    fn insert(&mut self, incoming: &str) -> bool {
        let mut incoming: Vec<char> = normalize(incoming).chars().collect();

        let mut base = self.text.clone();
        let mut cursor = self.cursor.min(base.len());
        if let Some(range) = self.selection_range() {
            cursor = range.start;
            base.drain(range);
        }

        if let Some(max) = self.max_length {
            if base.len() + incoming.len() > max {
                let room = max.saturating_sub(base.len());
                if room == 0 {
                    return false;
                }
                incoming.truncate(room);
            }
        }

        let inserted = incoming.len();
        base.splice(cursor..cursor, incoming);

        let candidate: String = base.iter().collect();
        if !self.accepts(&candidate) {
            return false;
        }

        self.text = base;
        self.cursor = cursor + inserted;
        self.selection = None;
        true
    }
}

/// Editable single-line text field
pub struct Input {
    element: Element,
    state: Mutex<InputState>,
    change_listeners: Listeners<str>,
    submit_listeners: Listeners<str>,
    focus_listeners: Listeners<()>,
    blur_listeners: Listeners<()>,
}

impl Input {
    /// Create an empty input with the default style
    pub fn new() -> Arc<Self> {
        Self::with_style(&InputStyle::default())
    }

    pub fn with_style(style: &InputStyle) -> Arc<Self> {
        let (width, height) = style.size;
        Arc::new_cyclic(|weak: &Weak<Input>| {
            let input = Input {
                element: Element::new(0, 0, width, height),
                state: Mutex::new(InputState {
                    text: Vec::new(),
                    placeholder: String::new(),
                    font: style.font.clone(),
                    text_color: style.text_color,
                    background: style.background,
                    border: style.border,
                    placeholder_color: style.placeholder,
                    caret_color: style.caret,
                    padding: style.padding,
                    fallback_advance: style.fallback_advance,
                    cursor: 0,
                    selection: None,
                    focused: false,
                    max_length: None,
                    validator: None,
                }),
                change_listeners: Listeners::new(),
                submit_listeners: Listeners::new(),
                focus_listeners: Listeners::new(),
                blur_listeners: Listeners::new(),
            };
            input.register_handlers(weak);
            input
        })
    }

    fn register_handlers(&self, weak: &Weak<Input>) {
        let handlers: [(EventKind, fn(&Input, &Event) -> bool); 5] = [
            (EventKind::Click, Input::handle_click),
            (EventKind::KeyPress, Input::handle_key_press),
            (EventKind::TextInput, Input::handle_text_input),
            (EventKind::Focus, Input::handle_focus),
            (EventKind::Blur, Input::handle_blur),
        ];
        for (kind, handler) in handlers {
            let weak = weak.clone();
            self.element.add_event_handler(kind, move |event: &Event| {
                weak.upgrade()
                    .is_some_and(|input| handler(input.as_ref(), event))
            });
        }
    }

    /// Replace the text
    ///
    /// The text is normalized and cut to the length limit; if the validator
    /// rejects the result nothing changes. Otherwise the cursor moves to the
    /// end, the selection is cleared and change listeners fire, even when the
    /// text is identical to what was there.
    pub fn set_text(&self, text: &str) -> &Self {
        let updated = {
            let mut state = self.state.lock();
            let mut chars: Vec<char> = normalize(text).chars().collect();
            if let Some(max) = state.max_length {
                chars.truncate(max);
            }
            let candidate: String = chars.iter().collect();
            if !state.accepts(&candidate) {
                return self;
            }
            state.cursor = chars.len();
            state.text = chars;
            state.selection = None;
            candidate
        };
        self.change_listeners.emit(&updated);
        self
    }

    pub fn text(&self) -> String {
        self.state.lock().text_string()
    }

    pub fn set_placeholder(&self, placeholder: &str) -> &Self {
        self.state.lock().placeholder = placeholder.to_string();
        self
    }

    pub fn placeholder(&self) -> String {
        self.state.lock().placeholder.clone()
    }

    pub fn set_font(&self, font: Font) -> &Self {
        self.state.lock().font = font;
        self
    }

    pub fn set_text_color(&self, color: Color) -> &Self {
        self.state.lock().text_color = color;
        self
    }

    pub fn set_background_color(&self, color: Color) -> &Self {
        self.state.lock().background = color;
        self
    }

    pub fn set_border_color(&self, color: Color) -> &Self {
        self.state.lock().border = color;
        self
    }

    pub fn set_placeholder_color(&self, color: Color) -> &Self {
        self.state.lock().placeholder_color = color;
        self
    }

    /// Limit the text to `max` code points, truncating what is there
    ///
    /// `None` and `Some(0)` both mean unlimited.
    pub fn set_max_length(&self, max: Option<usize>) -> &Self {
        let max = max.filter(|&m| m > 0);
        let mut state = self.state.lock();
        state.max_length = max;
        if let Some(max) = max {
            if state.text.len() > max {
                state.text.truncate(max);
                state.cursor = state.cursor.min(max);
                state.selection = None;
            }
        }
        self
    }

    pub fn max_length(&self) -> Option<usize> {
        self.state.lock().max_length
    }

    /// Install a validator
    ///
    /// Validators run while the input is locked and must not call back into
    /// this input.
    pub fn set_validator<F>(&self, validator: F) -> &Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.state.lock().validator = Some(Arc::new(validator));
        self
    }

    pub fn clear_validator(&self) -> &Self {
        self.state.lock().validator = None;
        self
    }

    /// Fired with the new text after every accepted edit
    pub fn on_change<F>(&self, listener: F) -> &Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.change_listeners.add(listener);
        self
    }

    /// Fired with the current text when Enter is pressed
    pub fn on_submit<F>(&self, listener: F) -> &Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.submit_listeners.add(listener);
        self
    }

    pub fn on_focus<F>(&self, listener: F) -> &Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.focus_listeners.add(move |_: &()| listener());
        self
    }

    pub fn on_blur<F>(&self, listener: F) -> &Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.blur_listeners.add(move |_: &()| listener());
        self
    }

    /// Take focus; focus listeners fire even if already focused
    pub fn focus(&self) {
        self.state.lock().focused = true;
        self.focus_listeners.emit(&());
    }

    /// Drop focus and the selection
    pub fn blur(&self) {
        {
            let mut state = self.state.lock();
            state.focused = false;
            state.selection = None;
        }
        self.blur_listeners.emit(&());
    }

    pub fn is_focused(&self) -> bool {
        self.state.lock().focused
    }

    pub fn cursor_position(&self) -> usize {
        self.state.lock().cursor
    }

    /// Move the caret, clamped to the text length
    pub fn set_cursor_position(&self, position: usize) -> &Self {
        let mut state = self.state.lock();
        state.cursor = position.min(state.text.len());
        self
    }

    /// Select between two caret positions, in either order
    pub fn set_selection(&self, anchor: usize, end: usize) -> &Self {
        let mut state = self.state.lock();
        let len = state.text.len();
        state.selection = Some((anchor.min(len), end.min(len)));
        self
    }

    pub fn select_all(&self) -> &Self {
        let mut state = self.state.lock();
        state.selection = Some((0, state.text.len()));
        self
    }

    pub fn clear_selection(&self) -> &Self {
        self.state.lock().selection = None;
        self
    }

    pub fn has_selection(&self) -> bool {
        self.state.lock().selection_range().is_some()
    }

    /// Normalized selected range, `None` when nothing is selected
    pub fn selection(&self) -> Option<Range<usize>> {
        self.state.lock().selection_range()
    }

    pub fn selected_text(&self) -> String {
        let state = self.state.lock();
        state
            .selection_range()
            .map(|range| state.text[range].iter().collect())
            .unwrap_or_default()
    }

    /// Delete the selected text; change listeners fire if anything was removed
    pub fn delete_selection(&self) -> &Self {
        let updated = {
            let mut state = self.state.lock();
            state.delete_selection().then(|| state.text_string())
        };
        if let Some(text) = updated {
            self.change_listeners.emit(&text);
        }
        self
    }

    /// Insert text at the caret, replacing any selection
    ///
    /// Incoming text is cut to fit the length limit; with no room left, or
    /// when the validator rejects the result, nothing changes.
    pub fn insert_text(&self, text: &str) -> &Self {
        let updated = {
            let mut state = self.state.lock();
            state.insert(text).then(|| state.text_string())
        };
        if let Some(text) = updated {
            self.change_listeners.emit(&text);
        }
        self
    }

    fn handle_click(&self, event: &Event) -> bool {
        let EventData::Click { x, y, .. } = *event.data() else {
            return false;
        };

        if !self.element.contains_point(x, y) {
            if self.is_focused() {
                self.blur();
            }
            return false;
        }

        if !self.is_focused() {
            self.focus();
        }

        let bounds = self.element.bounds();
        let mut state = self.state.lock();
        let offset = x - bounds.x - state.padding;
        state.cursor = caret_index_at(&state.text, offset, |ch| state.advance(ch));
        state.selection = None;
        true
    }

    fn handle_key_press(&self, event: &Event) -> bool {
        let EventData::KeyPress { key, .. } = *event.data() else {
            return false;
        };

        let mut state = self.state.lock();
        if !state.focused {
            return false;
        }

        match key {
            Key::Backspace => {
                if !state.delete_selection() && state.cursor > 0 {
                    state.cursor -= 1;
                    let at = state.cursor;
                    state.text.remove(at);
                }
                let text = state.text_string();
                drop(state);
                self.change_listeners.emit(&text);
            }
            Key::Delete => {
                if !state.delete_selection() && state.cursor < state.text.len() {
                    let at = state.cursor;
                    state.text.remove(at);
                }
                let text = state.text_string();
                drop(state);
                self.change_listeners.emit(&text);
            }
            Key::ArrowLeft => {
                state.cursor = state.cursor.saturating_sub(1);
                state.selection = None;
            }
            Key::ArrowRight => {
                state.cursor = (state.cursor + 1).min(state.text.len());
                state.selection = None;
            }
            Key::Enter => {
                let text = state.text_string();
                drop(state);
                self.submit_listeners.emit(&text);
            }
            _ => return false,
        }
        true
    }

    fn handle_text_input(&self, event: &Event) -> bool {
        let EventData::TextInput { text } = event.data() else {
            return false;
        };
        if !self.is_focused() {
            return false;
        }

        let filtered: String = text
            .chars()
            .filter(|&ch| !ch.is_control() || ch == '\t')
            .collect();
        if !filtered.is_empty() {
            self.insert_text(&filtered);
        }
        true
    }

    fn handle_focus(&self, _event: &Event) -> bool {
        self.focus();
        true
    }

    fn handle_blur(&self, _event: &Event) -> bool {
        self.blur();
        true
    }
}

impl Widget for Input {
    fn element(&self) -> &Element {
        &self.element
    }

    fn render(&self, canvas: &mut dyn Canvas) -> Result<()> {
        if !self.element.is_visible() {
            return Ok(());
        }

        let bounds = self.element.bounds();
        let state = self.state.lock();

        canvas.draw_rect(bounds, state.background, true)?;
        canvas.draw_rect(bounds, state.border, false)?;

        let text_x = bounds.x + state.padding;
        let text_y = bounds.y + bounds.height / 2 + BASELINE_OFFSET;

        if !state.text.is_empty() {
            canvas.draw_text(&state.text_string(), text_x, text_y, &state.font, state.text_color)?;

            if state.focused {
                let cursor = state.cursor.min(state.text.len());
                let caret_x = text_x + caret_offset(&state.text, cursor, |ch| state.advance(ch));
                let caret = Rect::new(
                    caret_x,
                    bounds.y + CARET_INSET,
                    1,
                    bounds.height - 2 * CARET_INSET,
                );
                canvas.draw_rect(caret, state.caret_color, true)?;
            }
        } else if !state.placeholder.is_empty() {
            canvas.draw_text(
                &state.placeholder,
                text_x,
                text_y,
                &state.font,
                state.placeholder_color,
            )?;
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "Input"
    }
}
