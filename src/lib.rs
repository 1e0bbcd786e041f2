//! trellis - a small retained-mode widget toolkit
//!
//! Widgets live in a tree of [`Element`] nodes. A [`Window`] owns the root,
//! pumps input from its [`Renderer`] through the tree (topmost child first,
//! first consumer wins) and redraws everything onto a [`Canvas`] each update.
//!
//! - Backend-agnostic: platforms implement [`Renderer`] and [`Canvas`]; an
//!   in-memory [`headless`] pair ships with the crate
//! - Label, single-line Input and Button widgets
//! - Code-point correct text editing with NFC normalization
//! - Thread-safe nodes: every widget is `Send + Sync` and mutable through `&self`

pub mod component;
pub mod components;
pub mod element;
pub mod error;
pub mod event;
pub mod font;
pub mod headless;
pub mod layout;
pub mod render;
pub mod text;
pub mod theme;
pub mod window;

// Re-export commonly used types
pub use component::{same_node, Listeners, Widget};
pub use components::{Button, ButtonState, Input, Label, TextAlign, Validator};
pub use element::Element;
pub use error::GuiError;
pub use event::{Event, EventData, EventHandler, EventKind, Key, Modifiers, MouseButton};
pub use font::{default_font, FixedFont, Font, FontFace};
pub use headless::{DrawOp, Frame, HeadlessCanvas, HeadlessHandle, HeadlessRenderer};
pub use layout::Rect;
pub use render::{Canvas, Renderer};
pub use theme::{ButtonStyle, Color, InputStyle, LabelStyle, Theme, WindowStyle};
pub use window::Window;
