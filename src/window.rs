//! Top-level window binding one element tree to a renderer
//!
//! A window owns the root [`Element`] (spanning the whole window), the
//! [`Renderer`] backend and the [`Canvas`] it draws on. The host drives it:
//!
//! ```ignore
//! let window = Window::new("Demo", 400, 300)?;
//! window.add_child(Label::new("Hello"))?;
//! window.show()?;
//! while window.is_running() {
//!     for event in window.poll_events() {
//!         window.handle_event(&event);
//!     }
//!     window.update()?;
//! }
//! ```

use crate::component::Widget;
use crate::element::Element;
use crate::error::GuiError;
use crate::event::Event;
use crate::headless::HeadlessRenderer;
use crate::render::{Canvas, Renderer};
use crate::theme::{Color, WindowStyle};
use anyhow::Result;
use log::debug;
use parking_lot::Mutex;
use std::sync::Arc;

struct Backend {
    renderer: Box<dyn Renderer>,
    canvas: Box<dyn Canvas>,
    running: bool,
}

/// Root container and render loop driver
pub struct Window {
    title: String,
    root: Arc<Element>,
    background: Color,
    backend: Mutex<Backend>,
}

impl Window {
    /// Create a window backed by the in-memory renderer
    pub fn new(title: &str, width: i32, height: i32) -> Result<Self> {
        Self::with_renderer(title, width, height, |width, height| {
            let renderer: Box<dyn Renderer> = Box::new(HeadlessRenderer::new(width, height)?);
            Ok(renderer)
        })
    }

    /// Create a window with a renderer built by `factory`
    ///
    /// Failures from the factory or from canvas creation are returned as-is.
    pub fn with_renderer<F>(title: &str, width: i32, height: i32, factory: F) -> Result<Self>
    where
        F: FnOnce(i32, i32) -> Result<Box<dyn Renderer>>,
    {
        let mut renderer = factory(width, height)?;
        let canvas = renderer.create_canvas()?;
        debug!("Created window {title:?} ({width}x{height})");

        Ok(Window {
            title: title.to_string(),
            root: Arc::new(Element::new(0, 0, width, height)),
            background: WindowStyle::default().background,
            backend: Mutex::new(Backend {
                renderer,
                canvas,
                running: false,
            }),
        })
    }

    pub fn with_style(mut self, style: &WindowStyle) -> Self {
        self.background = style.background;
        self
    }

    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    /// Show the window; the backend decides whether a repeated show is an error
    pub fn show(&self) -> Result<()> {
        let mut backend = self.backend.lock();
        backend.running = true;
        debug!("Showing window {:?}", self.title);
        backend.renderer.show(&self.title)
    }

    /// Stop the window; the backend is always told, even if already closed
    pub fn close(&self) -> Result<()> {
        let mut backend = self.backend.lock();
        backend.running = false;
        debug!("Closing window {:?}", self.title);
        backend.renderer.close()
    }

    pub fn is_running(&self) -> bool {
        self.backend.lock().running
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn root(&self) -> &Arc<Element> {
        &self.root
    }

    /// Add a widget on top of the existing ones
    pub fn add_child(&self, child: Arc<dyn Widget>) -> Result<(), GuiError> {
        self.root.add_child(child)
    }

    pub fn remove_child<W: Widget + ?Sized>(&self, child: &W) -> bool {
        self.root.remove_child(child)
    }

    /// Offer an event to the tree; `true` if some widget consumed it
    pub fn handle_event(&self, event: &Event) -> bool {
        self.root.handle_event(event)
    }

    /// Redraw the whole tree and present it; does nothing unless running
    pub fn update(&self) -> Result<()> {
        let mut backend = self.backend.lock();
        if !backend.running {
            return Ok(());
        }

        let canvas = backend.canvas.as_mut();
        canvas.clear(self.background)?;
        self.root.render(canvas)?;
        canvas.present()
    }

    /// Input gathered by the backend since the last poll
    pub fn poll_events(&self) -> Vec<Event> {
        self.backend.lock().renderer.poll_events()
    }

    /// Resize the backend, recreate the canvas and resize the root
    pub fn set_size(&self, width: i32, height: i32) -> Result<()> {
        let mut backend = self.backend.lock();
        backend.renderer.set_size(width, height)?;
        backend.canvas = backend.renderer.create_canvas()?;
        self.root.set_size(width, height);
        debug!("Resized window {:?} to {width}x{height}", self.title);
        Ok(())
    }

    pub fn size(&self) -> (i32, i32) {
        self.backend.lock().renderer.size()
    }
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("title", &self.title)
            .field("root", &self.root)
            .field("running", &self.is_running())
            .finish()
    }
}
