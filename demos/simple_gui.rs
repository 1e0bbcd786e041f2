//! trellis demo - name field, click counter and status line
//!
//! Runs on the headless backend with a scripted session. Pass a directory as
//! the first argument to save every presented frame there as PNG.

use anyhow::Result;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use trellis::{
    Button, Color, Event, EventData, HeadlessHandle, HeadlessRenderer, Input, Key, Label,
    Modifiers, MouseButton, Renderer, TextAlign, Widget, Window,
};

fn main() -> Result<()> {
    let mut renderer = HeadlessRenderer::new(400, 300)?;
    if let Some(dir) = std::env::args().nth(1) {
        std::fs::create_dir_all(&dir)?;
        renderer = renderer.with_export_dir(dir);
    }
    let handle = renderer.handle();

    let window = Window::with_renderer("Simple GUI Demo", 400, 300, move |_, _| {
        let renderer: Box<dyn Renderer> = Box::new(renderer);
        Ok(renderer)
    })?;
    setup_components(&window)?;
    script_session(&handle);

    window.show()?;

    // ~60 FPS
    while window.is_running() {
        for event in window.poll_events() {
            if !window.handle_event(&event) {
                handle_global_event(&window, &event)?;
            }
        }

        if let Err(err) = window.update() {
            eprintln!("Render error: {err:#}");
        }
        thread::sleep(Duration::from_millis(16));
    }

    println!("Presented {} frames", handle.frames_presented());
    Ok(())
}

fn setup_components(window: &Window) -> Result<()> {
    let title = Label::new("GUI Library Demo");
    title
        .set_color(Color::from_unit(0.2, 0.2, 0.8))
        .set_alignment(TextAlign::Center)
        .set_auto_size(false);
    title.element().set_position(50, 20);
    title.element().set_size(300, 30);
    window.add_child(title)?;

    let prompt = Label::new("Enter your name:");
    prompt.element().set_position(50, 70);
    window.add_child(prompt)?;

    let name_input = Input::new();
    name_input
        .set_placeholder("Type here...")
        .set_max_length(Some(50));
    name_input.element().set_position(50, 95);
    name_input.element().set_size(200, 25);

    let greeting = Label::new("");
    greeting.element().set_position(50, 140);
    window.add_child(greeting.clone())?;

    let shown = greeting.clone();
    name_input.on_change(move |text| {
        if text.is_empty() {
            shown.set_text("");
        } else {
            shown.set_text(&format!("Hello, {text}!"));
        }
    });
    name_input.on_submit(|text| println!("Submitted: {text}"));
    window.add_child(name_input.clone())?;

    let click_label = Label::new("Button clicks: 0");
    click_label.element().set_position(50, 180);
    window.add_child(click_label.clone())?;

    let clicks = Arc::new(AtomicUsize::new(0));

    let click_button = Button::new("Click Me!");
    click_button
        .set_normal_color(Color::from_unit(0.8, 0.9, 0.8))
        .set_hover_color(Color::from_unit(0.7, 0.9, 0.7))
        .set_text_color(Color::from_unit(0.0, 0.4, 0.0));
    click_button.element().set_position(50, 210);
    click_button.element().set_size(100, 30);
    {
        let clicks = clicks.clone();
        let click_label = click_label.clone();
        click_button.on_click(move || {
            let count = clicks.fetch_add(1, Ordering::SeqCst) + 1;
            click_label.set_text(&format!("Button clicks: {count}"));
            println!("Button clicked! Count: {count}");
        });
    }
    window.add_child(click_button)?;

    let reset_button = Button::new("Reset");
    reset_button
        .set_normal_color(Color::from_unit(0.9, 0.8, 0.8))
        .set_hover_color(Color::from_unit(0.9, 0.7, 0.7))
        .set_text_color(Color::from_unit(0.4, 0.0, 0.0));
    reset_button.element().set_position(160, 210);
    reset_button.element().set_size(80, 30);
    {
        let name_input = name_input.clone();
        reset_button.on_click(move || {
            clicks.store(0, Ordering::SeqCst);
            click_label.set_text("Button clicks: 0");
            name_input.set_text("");
            greeting.set_text("");
            println!("Reset clicked!");
        });
    }
    window.add_child(reset_button)?;

    let status = Label::new("Ready");
    status.set_color(Color::from_unit(0.5, 0.5, 0.5));
    status.element().set_position(50, 260);
    window.add_child(status.clone())?;

    let focused = status.clone();
    name_input.on_focus(move || {
        focused.set_text("Typing in name field...");
    });
    name_input.on_blur(move || {
        status.set_text("Ready");
    });

    Ok(())
}

/// Queue the input a user would produce
fn script_session(handle: &HeadlessHandle) {
    let none = Modifiers::empty();
    let session = [
        Event::click(60, 105, MouseButton::Left),
        Event::text_input("Ada"),
        Event::key_press(Key::Enter, none),
        Event::mouse_move(70, 220),
        Event::click(70, 220, MouseButton::Left),
        Event::click(70, 220, MouseButton::Left),
        Event::mouse_move(300, 150),
        Event::click(180, 220, MouseButton::Left),
        Event::key_press(Key::Escape, none),
    ];
    for event in session {
        handle.push_event(event);
    }
}

fn handle_global_event(window: &Window, event: &Event) -> Result<()> {
    if let EventData::KeyPress {
        key: Key::Escape, ..
    } = event.data()
    {
        println!("Escape pressed, closing window...");
        window.close()?;
    }
    Ok(())
}
