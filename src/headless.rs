//! In-memory backend
//!
//! [`HeadlessRenderer`] stands in for a native window: it tracks the
//! show/close lifecycle and size, hands out [`HeadlessCanvas`]es and replays
//! events pushed through a [`HeadlessHandle`]. Canvases record every call as a
//! [`DrawOp`] and rasterize rectangles, circles and images into an
//! `image::RgbaImage`. Text is recorded but not rasterized since fonts here
//! carry metrics only.
//!
//! A handle stays usable after the renderer has been boxed into a
//! [`Window`](crate::window::Window), so hosts and tests can inject input and
//! inspect the last presented frame.

use crate::error::GuiError;
use crate::event::Event;
use crate::font::Font;
use crate::layout::Rect;
use crate::render::{Canvas, Renderer};
use crate::theme::Color;
use anyhow::Result;
use image::imageops::{self, FilterType};
use image::{Pixel, RgbaImage};
use log::debug;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One recorded canvas call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        text: String,
        x: i32,
        y: i32,
        color: Color,
    },
    Rect {
        rect: Rect,
        color: Color,
        filled: bool,
    },
    Circle {
        cx: i32,
        cy: i32,
        radius: i32,
        color: Color,
        filled: bool,
    },
    Image {
        width: u32,
        height: u32,
        target: Rect,
    },
    SetClip(Rect),
    ClearClip,
    Clear(Color),
    Present,
}

/// A presented frame: the calls that produced it and the resulting pixels
#[derive(Debug, Clone)]
pub struct Frame {
    pub ops: Vec<DrawOp>,
    pub image: RgbaImage,
}

#[derive(Default)]
struct Shared {
    events: VecDeque<Event>,
    last_frame: Option<Frame>,
    frames_presented: usize,
}

/// Cloneable handle onto a headless renderer's queue and frame log
#[derive(Clone, Default)]
pub struct HeadlessHandle {
    shared: Arc<Mutex<Shared>>,
}

impl HeadlessHandle {
    /// Queue an event for the next poll
    pub fn push_event(&self, event: Event) {
        self.shared.lock().events.push_back(event);
    }

    pub fn pending_events(&self) -> usize {
        self.shared.lock().events.len()
    }

    /// Number of frames presented by canvases of this renderer
    pub fn frames_presented(&self) -> usize {
        self.shared.lock().frames_presented
    }

    pub fn last_frame(&self) -> Option<Frame> {
        self.shared.lock().last_frame.clone()
    }

    fn drain_events(&self) -> Vec<Event> {
        self.shared.lock().events.drain(..).collect()
    }

    fn record_frame(&self, frame: Frame) -> usize {
        let mut shared = self.shared.lock();
        shared.frames_presented += 1;
        shared.last_frame = Some(frame);
        shared.frames_presented
    }
}

impl std::fmt::Debug for HeadlessHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shared = self.shared.lock();
        f.debug_struct("HeadlessHandle")
            .field("pending_events", &shared.events.len())
            .field("frames_presented", &shared.frames_presented)
            .finish()
    }
}

/// Where a canvas delivers presented frames
struct FrameSink {
    handle: HeadlessHandle,
    export_dir: Option<PathBuf>,
}

/// Recording, rasterizing canvas
pub struct HeadlessCanvas {
    frame: RgbaImage,
    clip: Option<Rect>,
    ops: Vec<DrawOp>,
    sink: Option<FrameSink>,
}

impl HeadlessCanvas {
    /// Standalone canvas; non-positive dimensions give an empty framebuffer
    pub fn new(width: i32, height: i32) -> Self {
        HeadlessCanvas {
            frame: RgbaImage::new(width.max(0) as u32, height.max(0) as u32),
            clip: None,
            ops: Vec::new(),
            sink: None,
        }
    }

    fn with_sink(width: i32, height: i32, sink: FrameSink) -> Self {
        HeadlessCanvas {
            sink: Some(sink),
            ..HeadlessCanvas::new(width, height)
        }
    }

    /// Calls recorded since the last present
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn frame(&self) -> &RgbaImage {
        &self.frame
    }

    pub fn clip(&self) -> Option<Rect> {
        self.clip
    }

    /// Write the framebuffer as a PNG
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        self.frame.save(path.as_ref())?;
        Ok(())
    }

    fn surface(&self) -> Rect {
        Rect::new(0, 0, self.frame.width() as i32, self.frame.height() as i32)
    }

    /// Part of `rect` that may be painted: inside the surface and the clip
    fn visible(&self, rect: Rect) -> Option<Rect> {
        let visible = rect.intersection(&self.surface())?;
        match self.clip {
            Some(clip) => visible.intersection(&clip),
            None => Some(visible),
        }
    }

    fn fill(&mut self, rect: Rect, color: Color) {
        let Some(area) = self.visible(rect) else {
            return;
        };
        let pixel = color.to_rgba();
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                self.frame.put_pixel(x as u32, y as u32, pixel);
            }
        }
    }

    fn outline(&mut self, rect: Rect, color: Color) {
        if rect.is_degenerate() {
            return;
        }
        self.fill(Rect::new(rect.x, rect.y, rect.width, 1), color);
        self.fill(Rect::new(rect.x, rect.bottom() - 1, rect.width, 1), color);
        self.fill(Rect::new(rect.x, rect.y, 1, rect.height), color);
        self.fill(Rect::new(rect.right() - 1, rect.y, 1, rect.height), color);
    }
}

impl Canvas for HeadlessCanvas {
    fn draw_text(&mut self, text: &str, x: i32, y: i32, _font: &Font, color: Color) -> Result<()> {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            color,
        });
        Ok(())
    }

    fn draw_rect(&mut self, rect: Rect, color: Color, filled: bool) -> Result<()> {
        self.ops.push(DrawOp::Rect {
            rect,
            color,
            filled,
        });
        if filled {
            self.fill(rect, color);
        } else {
            self.outline(rect, color);
        }
        Ok(())
    }

    fn draw_circle(
        &mut self,
        cx: i32,
        cy: i32,
        radius: i32,
        color: Color,
        filled: bool,
    ) -> Result<()> {
        self.ops.push(DrawOp::Circle {
            cx,
            cy,
            radius,
            color,
            filled,
        });
        if radius <= 0 {
            return Ok(());
        }

        let Some(area) = self.visible(self.surface()) else {
            return Ok(());
        };

        // only the part of the bounding box that can be painted is walked
        let (cx, cy, radius) = (i64::from(cx), i64::from(cy), i64::from(radius));
        let outer = radius * radius;
        let inner = (radius - 1) * (radius - 1);
        let pixel = color.to_rgba();
        let top = (cy - radius).max(i64::from(area.y));
        let bottom = (cy + radius).min(i64::from(area.bottom()) - 1);
        let left = (cx - radius).max(i64::from(area.x));
        let right = (cx + radius).min(i64::from(area.right()) - 1);
        for y in top..=bottom {
            for x in left..=right {
                let (dx, dy) = (x - cx, y - cy);
                let distance = dx * dx + dy * dy;
                if distance <= outer && (filled || distance > inner) {
                    self.frame.put_pixel(x as u32, y as u32, pixel);
                }
            }
        }
        Ok(())
    }

    fn draw_image(&mut self, image: &RgbaImage, target: Rect) -> Result<()> {
        self.ops.push(DrawOp::Image {
            width: image.width(),
            height: image.height(),
            target,
        });
        if target.is_degenerate() || image.width() == 0 || image.height() == 0 {
            return Ok(());
        }
        let Some(area) = self.visible(target) else {
            return Ok(());
        };

        let scaled = imageops::resize(
            image,
            target.width as u32,
            target.height as u32,
            FilterType::Nearest,
        );
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                let source = *scaled.get_pixel((x - target.x) as u32, (y - target.y) as u32);
                self.frame.get_pixel_mut(x as u32, y as u32).blend(&source);
            }
        }
        Ok(())
    }

    fn set_clip(&mut self, rect: Rect) -> Result<()> {
        self.ops.push(DrawOp::SetClip(rect));
        self.clip = Some(rect);
        Ok(())
    }

    fn clear_clip(&mut self) -> Result<()> {
        self.ops.push(DrawOp::ClearClip);
        self.clip = None;
        Ok(())
    }

    /// Fills the whole surface; the clip region does not apply
    fn clear(&mut self, color: Color) -> Result<()> {
        self.ops.push(DrawOp::Clear(color));
        let pixel = color.to_rgba();
        for p in self.frame.pixels_mut() {
            *p = pixel;
        }
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        self.ops.push(DrawOp::Present);
        let ops = std::mem::take(&mut self.ops);

        if let Some(sink) = &self.sink {
            let count = sink.handle.record_frame(Frame {
                ops,
                image: self.frame.clone(),
            });
            debug!(
                "Presented headless frame {count} ({}x{})",
                self.frame.width(),
                self.frame.height()
            );
            if let Some(dir) = &sink.export_dir {
                self.save_png(dir.join(format!("frame_{count:05}.png")))?;
            }
        }
        Ok(())
    }
}

/// Window backend without a display
pub struct HeadlessRenderer {
    width: i32,
    height: i32,
    running: bool,
    title: String,
    handle: HeadlessHandle,
    export_dir: Option<PathBuf>,
}

impl HeadlessRenderer {
    pub fn new(width: i32, height: i32) -> Result<Self> {
        check_dimensions(width, height)?;
        Ok(HeadlessRenderer {
            width,
            height,
            running: false,
            title: String::new(),
            handle: HeadlessHandle::default(),
            export_dir: None,
        })
    }

    /// Save every presented frame as a numbered PNG in `dir`
    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = Some(dir.into());
        self
    }

    pub fn handle(&self) -> HeadlessHandle {
        self.handle.clone()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Title passed to the most recent `show`
    pub fn title(&self) -> &str {
        &self.title
    }
}

fn check_dimensions(width: i32, height: i32) -> Result<()> {
    if width <= 0 || height <= 0 {
        return Err(GuiError::InvalidDimensions { width, height }.into());
    }
    Ok(())
}

impl Renderer for HeadlessRenderer {
    fn show(&mut self, title: &str) -> Result<()> {
        if self.running {
            return Err(GuiError::AlreadyShown.into());
        }
        self.running = true;
        self.title = title.to_string();
        debug!("Headless window {title:?} shown at {}x{}", self.width, self.height);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if !self.running {
            return Ok(());
        }
        self.running = false;
        debug!("Headless window {:?} closed", self.title);
        Ok(())
    }

    fn create_canvas(&mut self) -> Result<Box<dyn Canvas>> {
        let sink = FrameSink {
            handle: self.handle.clone(),
            export_dir: self.export_dir.clone(),
        };
        Ok(Box::new(HeadlessCanvas::with_sink(
            self.width,
            self.height,
            sink,
        )))
    }

    fn poll_events(&mut self) -> Vec<Event> {
        self.handle.drain_events()
    }

    fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn set_size(&mut self, width: i32, height: i32) -> Result<()> {
        check_dimensions(width, height)?;
        self.width = width;
        self.height = height;
        debug!("Headless window resized to {width}x{height}");
        Ok(())
    }
}
