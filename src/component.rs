//! Widget capability - what every member of the element tree provides
//!
//! Widgets compose an [`Element`] node (geometry, visibility, children and
//! handler chains) and layer their own drawing on top. Event behaviour is
//! normally expressed by registering handlers on that node at construction,
//! so the default [`Widget::handle_event`] dispatch is rarely overridden.

use crate::element::Element;
use crate::event::Event;
use crate::render::Canvas;
use anyhow::Result;
use parking_lot::RwLock;
use std::sync::Arc;

/// Core trait for all tree members
///
/// Methods take `&self`: all mutable state lives behind per-node locks so a
/// host may reposition or restyle widgets from another thread.
pub trait Widget: Send + Sync {
    /// The node holding this widget's geometry, children and handlers
    fn element(&self) -> &Element;

    /// Draw the widget; the default draws the node's children
    fn render(&self, canvas: &mut dyn Canvas) -> Result<()> {
        self.element().render(canvas)
    }

    /// Offer an event; `true` means it was consumed
    fn handle_event(&self, event: &Event) -> bool {
        self.element().handle_event(event)
    }

    /// Get widget name for debugging
    fn name(&self) -> &str {
        "Widget"
    }
}

impl<W: Widget + ?Sized> Widget for Arc<W> {
    fn element(&self) -> &Element {
        (**self).element()
    }

    fn render(&self, canvas: &mut dyn Canvas) -> Result<()> {
        (**self).render(canvas)
    }

    fn handle_event(&self, event: &Event) -> bool {
        (**self).handle_event(event)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Whether two widgets are the same tree node
pub fn same_node(a: &(impl Widget + ?Sized), b: &(impl Widget + ?Sized)) -> bool {
    std::ptr::eq(a.element(), b.element())
}

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Ordered list of callbacks fired synchronously on the dispatching thread
///
/// The list lock is released before callbacks run, so a callback may register
/// further listeners or call back into the owning widget.
pub struct Listeners<T: ?Sized> {
    listeners: RwLock<Vec<Listener<T>>>,
}

impl<T: ?Sized> Listeners<T> {
    pub fn new() -> Self {
        Listeners {
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Append a listener; listeners fire in registration order
    pub fn add<F>(&self, listener: F)
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.listeners.write().push(Arc::new(listener));
    }

    /// Invoke every listener with `value`
    pub fn emit(&self, value: &T) {
        let snapshot = self.listeners.read().clone();
        for listener in &snapshot {
            listener(value);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.read().is_empty()
    }

    /// Drop every listener
    pub fn clear(&self) {
        self.listeners.write().clear();
    }
}

impl<T: ?Sized> Default for Listeners<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> std::fmt::Debug for Listeners<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners").field("len", &self.len()).finish()
    }
}
