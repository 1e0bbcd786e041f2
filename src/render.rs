//! Rendering capabilities - the drawing surface and the window backend
//!
//! Both traits are implemented outside the widget code. A platform backend
//! supplies a [`Renderer`] that owns the native window and pumps input, and
//! hands out a [`Canvas`] that turns primitive calls into pixels. The
//! [`headless`](crate::headless) module provides an in-memory pair.
//!
//! Every operation may fail; errors are recoverable and are propagated to the
//! caller of [`Window::update`](crate::window::Window::update) untouched.

use crate::event::Event;
use crate::font::Font;
use crate::layout::Rect;
use crate::theme::Color;
use anyhow::Result;
use image::RgbaImage;

/// Primitive drawing surface
pub trait Canvas: Send {
    /// Draw `text` with its baseline starting at `(x, y)`
    fn draw_text(&mut self, text: &str, x: i32, y: i32, font: &Font, color: Color) -> Result<()>;

    /// Fill or outline a rectangle
    fn draw_rect(&mut self, rect: Rect, color: Color, filled: bool) -> Result<()>;

    /// Fill or outline a circle centred on `(cx, cy)`
    fn draw_circle(
        &mut self,
        cx: i32,
        cy: i32,
        radius: i32,
        color: Color,
        filled: bool,
    ) -> Result<()>;

    /// Draw `image` scaled into `target`
    fn draw_image(&mut self, image: &RgbaImage, target: Rect) -> Result<()>;

    /// Restrict subsequent drawing to `rect`
    fn set_clip(&mut self, rect: Rect) -> Result<()>;

    /// Remove the clip region
    fn clear_clip(&mut self) -> Result<()>;

    /// Fill the whole surface with `color`
    fn clear(&mut self, color: Color) -> Result<()>;

    /// Push the accumulated frame to its destination
    fn present(&mut self) -> Result<()>;
}

/// Window backend: lifecycle, size, canvas creation and input
pub trait Renderer: Send {
    /// Show the window; calling twice is backend-defined
    fn show(&mut self, title: &str) -> Result<()>;

    /// Close the window; must tolerate being called when already closed or
    /// report its own error
    fn close(&mut self) -> Result<()>;

    /// Create a canvas bound to the current size
    fn create_canvas(&mut self) -> Result<Box<dyn Canvas>>;

    /// Input accumulated since the previous poll (possibly empty)
    fn poll_events(&mut self) -> Vec<Event>;

    /// Current size in pixels
    fn size(&self) -> (i32, i32);

    /// Resize; non-positive dimensions must be reported as errors
    fn set_size(&mut self, width: i32, height: i32) -> Result<()>;
}
