//! In-memory drawing surface backed by a tiny-skia pixmap.

use crate::error::{PageViewError, PageViewResult};
use crate::raster::{buffer_len, demultiply_into, premultiply_into, Raster};
use crate::sink::CanvasSink;
use tiny_skia::Pixmap;

/// A canvas-like pixel surface.
///
/// Pixels are stored premultiplied, as tiny-skia requires; everything that goes
/// in or out uses straight-alpha RGBA, the same as canvas `ImageData`.
#[derive(Debug, Clone)]
pub struct Surface {
    width: u32,
    height: u32,
    pixmap: Pixmap,
}

impl Surface {
    /// Create a transparent surface with the specified dimensions.
    pub fn new(width: u32, height: u32) -> PageViewResult<Self> {
        buffer_len(width, height)?;
        let pixmap =
            Pixmap::new(width, height).ok_or(PageViewError::InvalidDimensions { width, height })?;
        Ok(Self {
            width,
            height,
            pixmap,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Read the whole surface as straight-alpha RGBA.
    pub fn image_data(&self) -> Vec<u8> {
        let mut data = vec![0u8; self.pixmap.data().len()];
        demultiply_into(self.pixmap.data(), &mut data);
        data
    }

    /// Snapshot the surface as a [`Raster`].
    pub fn to_raster(&self) -> Raster {
        Raster::from_pixmap(&self.pixmap)
    }

    /// Export the surface as PNG data.
    ///
    /// # Arguments
    /// * `ppi` - Optional pixels per inch for PNG metadata. Defaults to 72 if not specified.
    pub fn to_png(&self, ppi: Option<f32>) -> PageViewResult<Vec<u8>> {
        let ppi = ppi.unwrap_or(72.0);

        let mut buf = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut buf, self.width, self.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);

            // Set pixel density metadata (pixels per meter)
            let ppm = (ppi.max(0.0) / 0.0254).round() as u32;
            encoder.set_pixel_dims(Some(png::PixelDimensions {
                xppu: ppm,
                yppu: ppm,
                unit: png::Unit::Meter,
            }));

            let mut writer = encoder.write_header()?;
            writer.write_image_data(&self.image_data())?;
        }
        Ok(buf)
    }
}

impl CanvasSink for Surface {
    /// Reallocate the surface. Like resizing a canvas element, this clears it.
    fn resize(&mut self, width: u32, height: u32) -> PageViewResult<()> {
        log::debug!(target: "pageview", "surface resize {}x{}", width, height);
        *self = Surface::new(width, height)?;
        Ok(())
    }

    /// Replace the surface contents, bypassing compositing.
    fn put_pixels(&mut self, pixels: &[u8], width: u32, height: u32) -> PageViewResult<()> {
        let expected = buffer_len(width, height)?;
        if pixels.len() != expected {
            return Err(PageViewError::InvalidPixelBuffer {
                expected,
                actual: pixels.len(),
            });
        }
        if width == self.width && height == self.height {
            premultiply_into(pixels, self.pixmap.data_mut());
            return Ok(());
        }

        // Mismatched buffers are anchored at the top-left; anything outside is dropped.
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
        let rows = height.min(self.height) as usize;
        let row_bytes = width.min(self.width) as usize * 4;
        let src_stride = width as usize * 4;
        let dst_stride = self.width as usize * 4;
        let data = self.pixmap.data_mut();
        for row in 0..rows {
            let src = &pixels[row * src_stride..row * src_stride + row_bytes];
            let dst = &mut data[row * dst_stride..row * dst_stride + row_bytes];
            premultiply_into(src, dst);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_surface_is_transparent() {
        let surface = Surface::new(20, 10).unwrap();
        assert_eq!(surface.width(), 20);
        assert_eq!(surface.height(), 10);
        assert!(surface.image_data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(matches!(
            Surface::new(0, 100),
            Err(PageViewError::InvalidDimensions { .. })
        ));
        let mut surface = Surface::new(4, 4).unwrap();
        assert!(surface.resize(100, 0).is_err());
        // Failed resize leaves the surface untouched
        assert_eq!((surface.width(), surface.height()), (4, 4));
    }

    #[test]
    fn test_put_pixels_replaces_contents() {
        let mut surface = Surface::new(2, 2).unwrap();
        let red = Raster::blank(2, 2, [255, 0, 0, 255]).unwrap();
        surface.put_pixels(red.data(), 2, 2).unwrap();
        assert_eq!(surface.image_data(), red.data());
        assert_eq!(surface.to_raster(), red);
    }

    #[test]
    fn test_put_pixels_rejects_short_buffer() {
        let mut surface = Surface::new(2, 2).unwrap();
        let err = surface.put_pixels(&[0u8; 12], 2, 2).unwrap_err();
        assert!(matches!(
            err,
            PageViewError::InvalidPixelBuffer {
                expected: 16,
                actual: 12
            }
        ));
    }

    #[test]
    fn test_put_pixels_larger_buffer_is_clipped() {
        let mut surface = Surface::new(2, 2).unwrap();
        let blue = Raster::blank(3, 3, [0, 0, 255, 255]).unwrap();
        surface.put_pixels(blue.data(), 3, 3).unwrap();
        assert!(surface
            .image_data()
            .chunks_exact(4)
            .all(|px| px == [0, 0, 255, 255]));
    }

    #[test]
    fn test_resize_clears() {
        let mut surface = Surface::new(2, 2).unwrap();
        surface.put_pixels(&[255u8; 16], 2, 2).unwrap();
        surface.resize(3, 1).unwrap();
        assert_eq!(surface.image_data(), vec![0u8; 12]);
    }

    #[test]
    fn test_to_png_signature() {
        let surface = Surface::new(3, 3).unwrap();
        let png = surface.to_png(None).unwrap();
        assert_eq!(&png[..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    }
}
