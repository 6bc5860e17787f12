mod pixel_buffer;
#[cfg(feature = "display")]
mod window;

pub use pixel_buffer::PixelBuffer;
#[cfg(feature = "display")]
pub use window::{Display, InputEvent, RenderTarget};

pub const DEFAULT_WIDTH: u32 = 640;
pub const DEFAULT_HEIGHT: u32 = 480;
