//! Error types surfaced by the toolkit and its backends
//!
//! Fallible APIs return `anyhow::Result`; the variants here travel inside
//! `anyhow::Error` and can be recovered with `downcast_ref::<GuiError>()`.

use thiserror::Error;

/// Typed failures reported by the tree, the window, and renderer backends
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GuiError {
    /// Width or height was zero or negative
    #[error("invalid dimensions: width={width}, height={height}")]
    InvalidDimensions { width: i32, height: i32 },

    /// `show` called on a renderer that is already showing a window
    #[error("window already shown")]
    AlreadyShown,

    /// A node was added somewhere inside its own subtree
    #[error("element cannot be added to its own subtree")]
    Cycle,

    /// The node is already a child of some node
    #[error("element already has a parent")]
    AlreadyParented,
}
