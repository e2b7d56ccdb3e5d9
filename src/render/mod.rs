//! Software rendering surface for the road renderer.
//!
//! Everything draws into an in-memory RGBA framebuffer; the window layer
//! only uploads the finished frame as a texture once per frame.

mod framebuffer;
mod types;

pub use framebuffer::*;
pub use types::*;
