//! Element tree node - geometry, visibility, children and handler chains
//!
//! Dispatch rules, in order:
//! - a Click outside the node's bounds is rejected before anything else runs
//!   (no other kind is bounds-filtered here; widgets filter those themselves)
//! - children are offered the event topmost first, i.e. in reverse insertion
//!   order, and the first one to consume it ends propagation
//! - otherwise the node's own handlers for the event kind run in
//!   registration order until one consumes it
//!
//! Each node guards its state with its own lock. The lock is only held long
//! enough to snapshot children or handlers, so a render or dispatch pass sees
//! each node as it was when that node was visited, not a tree-wide snapshot.

use crate::component::{same_node, Widget};
use crate::error::GuiError;
use crate::event::{Event, EventData, EventHandler, EventKind, SharedHandler};
use crate::layout::Rect;
use crate::render::Canvas;
use anyhow::Result;
use log::trace;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

struct ElementState {
    bounds: Rect,
    visible: bool,
    children: Vec<Arc<dyn Widget>>,
    handlers: HashMap<EventKind, Vec<SharedHandler>>,
}

/// Composable tree node
pub struct Element {
    state: RwLock<ElementState>,
    /// Set while some node holds this one as a child
    parented: AtomicBool,
}

impl Element {
    /// Create a visible node with no children or handlers
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::with_bounds(Rect::new(x, y, width, height))
    }

    pub fn with_bounds(bounds: Rect) -> Self {
        Element {
            state: RwLock::new(ElementState {
                bounds,
                visible: true,
                children: Vec::new(),
                handlers: HashMap::new(),
            }),
            parented: AtomicBool::new(false),
        }
    }

    pub fn bounds(&self) -> Rect {
        self.state.read().bounds
    }

    pub fn set_position(&self, x: i32, y: i32) {
        let mut state = self.state.write();
        state.bounds.x = x;
        state.bounds.y = y;
    }

    /// Resize; negative sizes are stored as-is
    pub fn set_size(&self, width: i32, height: i32) {
        let mut state = self.state.write();
        state.bounds.width = width;
        state.bounds.height = height;
    }

    pub fn set_bounds(&self, bounds: Rect) {
        self.state.write().bounds = bounds;
    }

    pub fn is_visible(&self) -> bool {
        self.state.read().visible
    }

    /// Hide or show this node and its subtree when rendering
    ///
    /// Hidden nodes still take part in event dispatch.
    pub fn set_visible(&self, visible: bool) {
        self.state.write().visible = visible;
    }

    /// Hit test against the node's half-open bounds
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        self.state.read().bounds.contains(x, y)
    }

    /// Append a child on top of the existing ones
    ///
    /// Fails with [`GuiError::Cycle`] if this node is `child` itself or lives
    /// somewhere inside its subtree, and with [`GuiError::AlreadyParented`] if
    /// `child` already belongs to a node (this one included).
    pub fn add_child(&self, child: Arc<dyn Widget>) -> Result<(), GuiError> {
        if subtree_contains(child.as_ref(), self) {
            return Err(GuiError::Cycle);
        }
        if child
            .element()
            .parented
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(GuiError::AlreadyParented);
        }
        self.state.write().children.push(child);
        Ok(())
    }

    /// Remove a direct child by identity; returns whether it was found
    ///
    /// A removed child may be added to any node again.
    pub fn remove_child<W: Widget + ?Sized>(&self, child: &W) -> bool {
        let removed = {
            let mut state = self.state.write();
            state
                .children
                .iter()
                .position(|c| same_node(c, child))
                .map(|index| state.children.remove(index))
        };
        match removed {
            Some(removed) => {
                removed.element().parented.store(false, Ordering::Release);
                true
            }
            None => false,
        }
    }

    /// Whether this node is currently some node's child
    pub fn has_parent(&self) -> bool {
        self.parented.load(Ordering::Acquire)
    }

    /// Snapshot of the children in insertion (paint) order
    pub fn children(&self) -> Vec<Arc<dyn Widget>> {
        self.state.read().children.clone()
    }

    pub fn child_count(&self) -> usize {
        self.state.read().children.len()
    }

    /// Detach every child; each one may be added elsewhere afterwards
    pub fn clear_children(&self) {
        let children = std::mem::take(&mut self.state.write().children);
        for child in &children {
            child.element().parented.store(false, Ordering::Release);
        }
    }

    /// Append a handler to the chain for `kind`
    pub fn add_event_handler<H>(&self, kind: EventKind, handler: H)
    where
        H: EventHandler + 'static,
    {
        self.state
            .write()
            .handlers
            .entry(kind)
            .or_default()
            .push(Arc::new(handler));
    }

    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.state.read().handlers.get(&kind).map_or(0, Vec::len)
    }

    /// Render children in insertion order, stopping at the first error
    pub fn render(&self, canvas: &mut dyn Canvas) -> Result<()> {
        let children = {
            let state = self.state.read();
            if !state.visible {
                return Ok(());
            }
            state.children.clone()
        };

        for child in &children {
            child.render(canvas)?;
        }
        Ok(())
    }

    /// Dispatch an event through this subtree
    pub fn handle_event(&self, event: &Event) -> bool {
        let (children, handlers) = {
            let state = self.state.read();
            if let EventData::Click { x, y, .. } = *event.data() {
                if !state.bounds.contains(x, y) {
                    return false;
                }
            }
            let handlers = state
                .handlers
                .get(&event.kind())
                .cloned()
                .unwrap_or_default();
            (state.children.clone(), handlers)
        };

        for child in children.iter().rev() {
            if child.handle_event(event) {
                trace!("{:?} consumed by child {}", event.kind(), child.name());
                return true;
            }
        }

        for handler in &handlers {
            if handler.handle(event) {
                trace!("{:?} consumed by node handler", event.kind());
                return true;
            }
        }

        false
    }
}

impl Widget for Element {
    fn element(&self) -> &Element {
        self
    }

    fn name(&self) -> &str {
        "Element"
    }
}

impl std::fmt::Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("Element")
            .field("bounds", &state.bounds)
            .field("visible", &state.visible)
            .field("children", &state.children.len())
            .finish()
    }
}

/// Whether `target` is `root` or any node below it
fn subtree_contains(root: &dyn Widget, target: &Element) -> bool {
    if std::ptr::eq(root.element(), target) {
        return true;
    }
    root.element()
        .children()
        .iter()
        .any(|child| subtree_contains(child.as_ref(), target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::MouseButton;
    use crate::font::Font;
    use crate::theme::Color;
    use image::RgbaImage;
    use parking_lot::Mutex;

    fn recording_handler(
        log: &Arc<Mutex<Vec<&'static str>>>,
        tag: &'static str,
        consume: bool,
    ) -> impl EventHandler + 'static {
        let log = log.clone();
        move |_: &Event| {
            log.lock().push(tag);
            consume
        }
    }

    fn child_with_handler(
        bounds: Rect,
        log: &Arc<Mutex<Vec<&'static str>>>,
        tag: &'static str,
        consume: bool,
    ) -> Arc<Element> {
        let child = Arc::new(Element::with_bounds(bounds));
        child.add_event_handler(EventKind::Click, recording_handler(log, tag, consume));
        child
    }

    /// Canvas that counts rectangles and fails on demand
    struct CountingCanvas {
        rects: usize,
        fail_on: Option<usize>,
    }

    impl Canvas for CountingCanvas {
        fn draw_text(&mut self, _: &str, _: i32, _: i32, _: &Font, _: Color) -> Result<()> {
            Ok(())
        }
        fn draw_rect(&mut self, _: Rect, _: Color, _: bool) -> Result<()> {
            self.rects += 1;
            if self.fail_on == Some(self.rects) {
                anyhow::bail!("rect {} failed", self.rects);
            }
            Ok(())
        }
        fn draw_circle(&mut self, _: i32, _: i32, _: i32, _: Color, _: bool) -> Result<()> {
            Ok(())
        }
        fn draw_image(&mut self, _: &RgbaImage, _: Rect) -> Result<()> {
            Ok(())
        }
        fn set_clip(&mut self, _: Rect) -> Result<()> {
            Ok(())
        }
        fn clear_clip(&mut self) -> Result<()> {
            Ok(())
        }
        fn clear(&mut self, _: Color) -> Result<()> {
            Ok(())
        }
        fn present(&mut self) -> Result<()> {
            Ok(())
        }
    }

    /// Leaf that draws a single rectangle
    struct Block(Element);

    impl Widget for Block {
        fn element(&self) -> &Element {
            &self.0
        }
        fn render(&self, canvas: &mut dyn Canvas) -> Result<()> {
            canvas.draw_rect(self.0.bounds(), Color::black(), true)
        }
    }

    #[test]
    fn test_accessors() {
        let e = Element::new(1, 2, 3, 4);
        assert_eq!(e.bounds(), Rect::new(1, 2, 3, 4));
        e.set_position(10, 20);
        e.set_size(-5, 0);
        assert_eq!(e.bounds(), Rect::new(10, 20, -5, 0));
        assert!(e.is_visible());
        e.set_visible(false);
        assert!(!e.is_visible());
    }

    #[test]
    fn test_contains_point_edges() {
        let e = Element::new(0, 0, 100, 50);
        assert!(e.contains_point(0, 0));
        assert!(e.contains_point(99, 49));
        assert!(!e.contains_point(100, 10));
        assert!(!e.contains_point(10, 50));
    }

    #[test]
    fn test_reverse_order_dispatch_stops_at_first_consumer() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let parent = Element::new(0, 0, 100, 100);
        let a = child_with_handler(Rect::new(0, 0, 50, 50), &log, "a", true);
        let b = child_with_handler(Rect::new(60, 60, 10, 10), &log, "b", true);
        let c = child_with_handler(Rect::new(10, 10, 50, 50), &log, "c", true);
        parent.add_child(a).unwrap();
        parent.add_child(b).unwrap();
        parent.add_child(c).unwrap();

        assert!(parent.handle_event(&Event::click(20, 20, MouseButton::Left)));
        assert_eq!(*log.lock(), vec!["c"]);
    }

    #[test]
    fn test_unconsumed_child_falls_through_to_sibling() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let parent = Element::new(0, 0, 100, 100);
        parent
            .add_child(child_with_handler(Rect::new(0, 0, 50, 50), &log, "a", true))
            .unwrap();
        parent
            .add_child(child_with_handler(Rect::new(0, 0, 50, 50), &log, "c", false))
            .unwrap();

        assert!(parent.handle_event(&Event::click(5, 5, MouseButton::Left)));
        assert_eq!(*log.lock(), vec!["c", "a"]);
    }

    #[test]
    fn test_click_outside_skips_children_and_handlers() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let parent = Element::new(0, 0, 10, 10);
        parent.add_event_handler(EventKind::Click, recording_handler(&log, "parent", true));
        parent
            .add_child(child_with_handler(Rect::new(50, 50, 10, 10), &log, "child", true))
            .unwrap();

        assert!(!parent.handle_event(&Event::click(55, 55, MouseButton::Left)));
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_non_click_events_ignore_bounds() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let parent = Element::new(0, 0, 10, 10);
        let far_away = Arc::new(Element::new(500, 500, 10, 10));
        far_away.add_event_handler(EventKind::MouseMove, recording_handler(&log, "move", true));
        parent.add_child(far_away).unwrap();

        assert!(parent.handle_event(&Event::mouse_move(-100, -100)));
        assert_eq!(*log.lock(), vec!["move"]);
    }

    #[test]
    fn test_own_handlers_run_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let e = Element::new(0, 0, 10, 10);
        e.add_event_handler(EventKind::Focus, recording_handler(&log, "first", false));
        e.add_event_handler(EventKind::Focus, recording_handler(&log, "second", true));
        e.add_event_handler(EventKind::Focus, recording_handler(&log, "third", true));

        assert!(e.handle_event(&Event::focus()));
        assert_eq!(*log.lock(), vec!["first", "second"]);
        assert_eq!(e.handler_count(EventKind::Focus), 3);
        assert_eq!(e.handler_count(EventKind::Blur), 0);
    }

    #[test]
    fn test_children_checked_before_own_handlers() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let parent = Element::new(0, 0, 100, 100);
        parent.add_event_handler(EventKind::Click, recording_handler(&log, "parent", true));
        parent
            .add_child(child_with_handler(Rect::new(0, 0, 10, 10), &log, "child", false))
            .unwrap();

        assert!(parent.handle_event(&Event::click(1, 1, MouseButton::Left)));
        assert_eq!(*log.lock(), vec!["child", "parent"]);
    }

    #[test]
    fn test_no_handlers_means_unconsumed() {
        let e = Element::new(0, 0, 10, 10);
        assert!(!e.handle_event(&Event::click(1, 1, MouseButton::Left)));
        assert!(!e.handle_event(&Event::text_input("x")));
    }

    #[test]
    fn test_hidden_nodes_still_receive_events() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let parent = Element::new(0, 0, 100, 100);
        let child = child_with_handler(Rect::new(0, 0, 10, 10), &log, "hidden", true);
        child.set_visible(false);
        parent.add_child(child).unwrap();

        assert!(parent.handle_event(&Event::click(1, 1, MouseButton::Left)));
    }

    #[test]
    fn test_remove_child_by_identity() {
        let parent = Element::new(0, 0, 10, 10);
        let a = Arc::new(Element::new(0, 0, 1, 1));
        let stranger = Arc::new(Element::new(0, 0, 1, 1));
        parent.add_child(a.clone()).unwrap();

        assert!(!parent.remove_child(&stranger));
        assert_eq!(parent.child_count(), 1);
        assert!(parent.remove_child(&a));
        assert_eq!(parent.child_count(), 0);
        assert!(!parent.remove_child(&a));
    }

    #[test]
    fn test_cycles_rejected() {
        let root = Arc::new(Element::new(0, 0, 10, 10));
        let mid = Arc::new(Element::new(0, 0, 10, 10));
        root.add_child(mid.clone()).unwrap();

        assert_eq!(root.add_child(root.clone()), Err(GuiError::Cycle));
        assert_eq!(mid.add_child(root.clone()), Err(GuiError::Cycle));
        assert_eq!(mid.child_count(), 0);
    }

    #[test]
    fn test_child_added_twice_rejected() {
        let parent = Element::new(0, 0, 10, 10);
        let child = Arc::new(Element::new(0, 0, 1, 1));
        parent.add_child(child.clone()).unwrap();

        assert_eq!(parent.add_child(child.clone()), Err(GuiError::AlreadyParented));
        assert_eq!(parent.child_count(), 1);

        assert!(parent.remove_child(&child));
        assert_eq!(parent.child_count(), 0);
        assert!(!child.has_parent());
    }

    #[test]
    fn test_child_cannot_have_two_parents() {
        let first = Element::new(0, 0, 10, 10);
        let second = Element::new(0, 0, 10, 10);
        let child = Arc::new(Element::new(0, 0, 1, 1));
        first.add_child(child.clone()).unwrap();
        assert!(child.has_parent());

        assert_eq!(second.add_child(child.clone()), Err(GuiError::AlreadyParented));
        assert_eq!(second.child_count(), 0);

        first.remove_child(&child);
        second.add_child(child.clone()).unwrap();
        assert_eq!(second.child_count(), 1);
    }

    #[test]
    fn test_clear_children_detaches() {
        let parent = Element::new(0, 0, 10, 10);
        let a = Arc::new(Element::new(0, 0, 1, 1));
        let b = Arc::new(Element::new(0, 0, 1, 1));
        parent.add_child(a.clone()).unwrap();
        parent.add_child(b.clone()).unwrap();

        parent.clear_children();
        assert_eq!(parent.child_count(), 0);
        assert!(!a.has_parent());
        assert!(!b.has_parent());

        let other = Element::new(0, 0, 10, 10);
        other.add_child(a).unwrap();
        other.add_child(b).unwrap();
        assert_eq!(other.child_count(), 2);
    }

    #[test]
    fn test_render_in_order_and_skip_hidden() {
        let parent = Element::new(0, 0, 100, 100);
        parent.add_child(Arc::new(Block(Element::new(0, 0, 1, 1)))).unwrap();
        parent.add_child(Arc::new(Block(Element::new(0, 0, 1, 1)))).unwrap();

        let mut canvas = CountingCanvas {
            rects: 0,
            fail_on: None,
        };
        parent.render(&mut canvas).unwrap();
        assert_eq!(canvas.rects, 2);

        parent.set_visible(false);
        parent.render(&mut canvas).unwrap();
        assert_eq!(canvas.rects, 2);
    }

    #[test]
    fn test_render_aborts_on_first_error() {
        let parent = Element::new(0, 0, 100, 100);
        for _ in 0..3 {
            parent.add_child(Arc::new(Block(Element::new(0, 0, 1, 1)))).unwrap();
        }

        let mut canvas = CountingCanvas {
            rects: 0,
            fail_on: Some(2),
        };
        let err = parent.render(&mut canvas).unwrap_err();
        assert_eq!(err.to_string(), "rect 2 failed");
        assert_eq!(canvas.rects, 2);
    }

    #[test]
    fn test_handler_may_mutate_tree_during_dispatch() {
        let parent = Arc::new(Element::new(0, 0, 100, 100));
        let weak = Arc::downgrade(&parent);
        parent.add_event_handler(EventKind::Click, move |_: &Event| {
            if let Some(parent) = weak.upgrade() {
                parent.add_child(Arc::new(Element::new(0, 0, 1, 1))).unwrap();
            }
            true
        });

        assert!(parent.handle_event(&Event::click(1, 1, MouseButton::Left)));
        assert_eq!(parent.child_count(), 1);
    }
}
