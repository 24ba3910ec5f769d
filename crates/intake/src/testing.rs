//! Encoded sample images for tests in this and downstream crates.

use bytes::Bytes;
use image::{DynamicImage, ImageFormat, RgbImage};
use std::io::Cursor;

fn encode(width: u32, height: u32, format: ImageFormat) -> Bytes {
    let image = DynamicImage::ImageRgb8(RgbImage::new(width, height));
    let mut buf = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buf), format)
        .expect("encoding an in-memory image cannot fail");
    Bytes::from(buf)
}

pub fn sample_png(width: u32, height: u32) -> Bytes {
    encode(width, height, ImageFormat::Png)
}

pub fn sample_jpeg(width: u32, height: u32) -> Bytes {
    encode(width, height, ImageFormat::Jpeg)
}
