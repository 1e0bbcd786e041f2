//! Event system - clicks, keys, text, focus, pointer motion and resizes
//!
//! Events are produced once by a [`Renderer`](crate::render::Renderer) and are
//! never mutated afterwards; the tree only ever sees `&Event`.

use bitflags::bitflags;
use std::sync::Arc;
use std::time::Instant;

/// Keyboard key representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Letter or digit key
    Char(char),
    Space,
    Enter,
    Tab,
    Backspace,
    Delete,
    Escape,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Unknown,
}

bitflags! {
    /// Modifier keys held during a key press
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CTRL = 1 << 1;
        const ALT = 1 << 2;
        const SUPER = 1 << 3;
    }
}

/// Mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Discriminant used to key handler chains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    KeyPress,
    TextInput,
    Focus,
    Blur,
    MouseMove,
    Resize,
}

/// Kind-specific event payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventData {
    /// Mouse click at window coordinates
    Click { x: i32, y: i32, button: MouseButton },
    /// Key pressed with the modifiers held at the time
    KeyPress { key: Key, modifiers: Modifiers },
    /// Committed text (may hold several code points)
    TextInput { text: String },
    /// Focus gained
    Focus,
    /// Focus lost
    Blur,
    /// Pointer moved to window coordinates
    MouseMove { x: i32, y: i32 },
    /// Window resized
    Resize { width: i32, height: i32 },
}

/// UI event with its creation time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    data: EventData,
    created_at: Instant,
}

impl Event {
    /// Wrap a payload, stamping it with the current time
    pub fn new(data: EventData) -> Self {
        Event {
            data,
            created_at: Instant::now(),
        }
    }

    pub fn click(x: i32, y: i32, button: MouseButton) -> Self {
        Self::new(EventData::Click { x, y, button })
    }

    pub fn key_press(key: Key, modifiers: Modifiers) -> Self {
        Self::new(EventData::KeyPress { key, modifiers })
    }

    pub fn text_input(text: impl Into<String>) -> Self {
        Self::new(EventData::TextInput { text: text.into() })
    }

    pub fn focus() -> Self {
        Self::new(EventData::Focus)
    }

    pub fn blur() -> Self {
        Self::new(EventData::Blur)
    }

    pub fn mouse_move(x: i32, y: i32) -> Self {
        Self::new(EventData::MouseMove { x, y })
    }

    pub fn resize(width: i32, height: i32) -> Self {
        Self::new(EventData::Resize { width, height })
    }

    /// Which handler chain this event belongs to
    pub fn kind(&self) -> EventKind {
        match self.data {
            EventData::Click { .. } => EventKind::Click,
            EventData::KeyPress { .. } => EventKind::KeyPress,
            EventData::TextInput { .. } => EventKind::TextInput,
            EventData::Focus => EventKind::Focus,
            EventData::Blur => EventKind::Blur,
            EventData::MouseMove { .. } => EventKind::MouseMove,
            EventData::Resize { .. } => EventKind::Resize,
        }
    }

    pub fn data(&self) -> &EventData {
        &self.data
    }

    /// When the event was created
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// Pointer position for Click and MouseMove events
    pub fn position(&self) -> Option<(i32, i32)> {
        match self.data {
            EventData::Click { x, y, .. } | EventData::MouseMove { x, y } => Some((x, y)),
            _ => None,
        }
    }
}

/// Handler in an element's per-kind chain
///
/// Return `true` to consume the event and stop propagation.
pub trait EventHandler: Send + Sync {
    fn handle(&self, event: &Event) -> bool;
}

impl<F> EventHandler for F
where
    F: Fn(&Event) -> bool + Send + Sync,
{
    fn handle(&self, event: &Event) -> bool {
        self(event)
    }
}

/// Shared handler as stored in handler chains
pub type SharedHandler = Arc<dyn EventHandler>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_payload() {
        assert_eq!(Event::click(1, 2, MouseButton::Left).kind(), EventKind::Click);
        assert_eq!(
            Event::key_press(Key::Enter, Modifiers::empty()).kind(),
            EventKind::KeyPress
        );
        assert_eq!(Event::text_input("hi").kind(), EventKind::TextInput);
        assert_eq!(Event::focus().kind(), EventKind::Focus);
        assert_eq!(Event::blur().kind(), EventKind::Blur);
        assert_eq!(Event::mouse_move(3, 4).kind(), EventKind::MouseMove);
        assert_eq!(Event::resize(640, 480).kind(), EventKind::Resize);
    }

    #[test]
    fn test_position_only_for_pointer_events() {
        assert_eq!(Event::click(5, 6, MouseButton::Right).position(), Some((5, 6)));
        assert_eq!(Event::mouse_move(7, 8).position(), Some((7, 8)));
        assert_eq!(Event::resize(7, 8).position(), None);
        assert_eq!(Event::focus().position(), None);
    }

    #[test]
    fn test_timestamps_are_monotonic() {
        let first = Event::focus();
        let second = Event::blur();
        assert!(second.created_at() >= first.created_at());
    }

    #[test]
    fn test_closure_handler() {
        let handler = |event: &Event| event.kind() == EventKind::Focus;
        assert!(handler.handle(&Event::focus()));
        assert!(!handler.handle(&Event::blur()));
    }

    #[test]
    fn test_modifiers_combine() {
        let mods = Modifiers::SHIFT | Modifiers::CTRL;
        assert!(mods.contains(Modifiers::CTRL));
        assert!(!mods.contains(Modifiers::ALT));
        assert!(Modifiers::default().is_empty());
    }
}
