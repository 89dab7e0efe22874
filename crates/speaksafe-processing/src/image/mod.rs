pub mod processor;

pub use processor::{ImageProcessor, ReencodedImage, JPEG_QUALITY};
