//! Straight-alpha RGBA rasters exchanged between pages, transformers and sinks.

use crate::error::{PageViewError, PageViewResult};
use std::fmt;
use std::path::Path;
use tiny_skia::Pixmap;

/// Maximum raster dimension (same as Chrome's canvas limit).
pub const MAX_DIMENSION: u32 = 32767;

/// An owned RGBA8 image.
///
/// Pixels are tightly packed, row-major, 4 bytes per pixel with non-premultiplied
/// alpha last. This is the only pixel format that crosses the crate boundary.
#[derive(Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl fmt::Debug for Raster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Raster")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl Raster {
    /// Wrap existing RGBA data.
    ///
    /// Fails if the dimensions are out of range or `data` is not exactly
    /// `width * height * 4` bytes long.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> PageViewResult<Self> {
        let expected = buffer_len(width, height)?;
        if data.len() != expected {
            return Err(PageViewError::InvalidPixelBuffer {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Create a raster filled with a single color.
    pub fn blank(width: u32, height: u32, color: [u8; 4]) -> PageViewResult<Self> {
        let len = buffer_len(width, height)?;
        let data = color.iter().copied().cycle().take(len).collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Decode a PNG or JPEG image.
    pub fn decode(bytes: &[u8]) -> PageViewResult<Self> {
        let rgba = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        log::debug!(target: "pageview", "decoded {}x{} source image", width, height);
        Self::new(width, height, rgba.into_raw())
    }

    /// Read and decode an image file.
    pub fn open(path: impl AsRef<Path>) -> PageViewResult<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::decode(&bytes)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Get the RGBA value at (x, y), or None if out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize * self.width as usize) + x as usize) * 4;
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.data[idx..idx + 4]);
        Some(px)
    }

    /// Copy into a premultiplied tiny-skia pixmap.
    pub(crate) fn to_pixmap(&self) -> PageViewResult<Pixmap> {
        let mut pixmap = Pixmap::new(self.width, self.height).ok_or(
            PageViewError::InvalidDimensions {
                width: self.width,
                height: self.height,
            },
        )?;
        premultiply_into(&self.data, pixmap.data_mut());
        Ok(pixmap)
    }

    /// Copy out of a premultiplied tiny-skia pixmap.
    pub(crate) fn from_pixmap(pixmap: &Pixmap) -> Self {
        let mut data = vec![0u8; pixmap.data().len()];
        demultiply_into(pixmap.data(), &mut data);
        Self {
            width: pixmap.width(),
            height: pixmap.height(),
            data,
        }
    }
}

/// Validate dimensions and return the RGBA byte length they require.
pub(crate) fn buffer_len(width: u32, height: u32) -> PageViewResult<usize> {
    check_dimensions(width, height)?;
    Ok(width as usize * height as usize * 4)
}

pub(crate) fn check_dimensions(width: u32, height: u32) -> PageViewResult<()> {
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(PageViewError::InvalidDimensions { width, height });
    }
    Ok(())
}

/// Convert straight RGBA to premultiplied RGBA.
pub(crate) fn premultiply_into(src: &[u8], dst: &mut [u8]) {
    for (s, d) in src.chunks_exact(4).zip(dst.chunks_exact_mut(4)) {
        let a = s[3];
        // Formula: (color * alpha + 127) / 255 for proper rounding
        let (r, g, b) = if a == 255 {
            (s[0], s[1], s[2])
        } else if a == 0 {
            (0, 0, 0)
        } else {
            let a16 = a as u16;
            (
                ((s[0] as u16 * a16 + 127) / 255) as u8,
                ((s[1] as u16 * a16 + 127) / 255) as u8,
                ((s[2] as u16 * a16 + 127) / 255) as u8,
            )
        };
        d.copy_from_slice(&[r, g, b, a]);
    }
}

/// Convert premultiplied RGBA to straight RGBA.
pub(crate) fn demultiply_into(src: &[u8], dst: &mut [u8]) {
    for (s, d) in src.chunks_exact(4).zip(dst.chunks_exact_mut(4)) {
        let a = s[3];
        if a == 0 {
            d.copy_from_slice(&[0, 0, 0, 0]);
        } else if a == 255 {
            d.copy_from_slice(s);
        } else {
            let alpha_f = a as f32;
            let unmultiply = |c: u8| (c as f32 * 255.0 / alpha_f).round().min(255.0) as u8;
            d[0] = unmultiply(s[0]);
            d[1] = unmultiply(s[1]);
            d[2] = unmultiply(s[2]);
            d[3] = a;
        }
    }
}

/// Parse a CSS color string into straight RGBA bytes.
pub fn parse_color(s: &str) -> PageViewResult<[u8; 4]> {
    let parsed = csscolorparser::parse(s)
        .map_err(|e| PageViewError::ColorParseError(format!("{}: {}", s, e)))?;
    let [r, g, b, a] = parsed.to_array();
    let to_u8 = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    Ok([to_u8(r), to_u8(g), to_u8(b), to_u8(a)])
}
