//! Driver library for the Solomon Systech SSD1331 96x64 RGB OLED display controller.
//!
//! Drawing goes through the controller's graphic acceleration commands (line, rectangle, copy
//! and clear) rather than a framebuffer, so the driver needs no display memory of its own. The
//! [`gfx`] module puts an embedded-graphics `DrawTarget` with a text cursor on top.

#![cfg_attr(not(any(test, feature = "std")), no_std)]


pub mod command;
pub mod config;
pub mod display;
pub mod error;
pub mod gfx;
pub mod interface;
pub mod timing;

// Re-exports for primary API.
pub use crate::command::{consts, ColorOrder, Rotation};
pub use crate::config::Config;
pub use crate::display::{DeviceState, Display, PixelCoord};
pub use crate::error::Error;
pub use crate::gfx::{BlockCopy, Canvas, PrimitiveBackend};
pub use crate::interface::spi::SpiInterface;
pub use crate::interface::DisplayInterface;
