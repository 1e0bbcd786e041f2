//! Built-in widgets

pub mod button;
pub mod input;
pub mod label;

pub use button::{Button, ButtonState};
pub use input::{Input, Validator};
pub use label::{Label, TextAlign};
