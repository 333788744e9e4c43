//! Destinations for rendered frames.

use crate::error::PageViewResult;
use crate::raster::check_dimensions;
use crate::surface::Surface;
use std::path::{Path, PathBuf};

/// A drawing surface supplied by the host.
///
/// The viewer always calls [`resize`](CanvasSink::resize) with the frame size
/// and then [`put_pixels`](CanvasSink::put_pixels) with the full frame.
pub trait CanvasSink {
    /// Prepare the surface for a `width` x `height` frame.
    fn resize(&mut self, width: u32, height: u32) -> PageViewResult<()>;

    /// Replace the visible surface with `pixels`: row-major straight-alpha RGBA8,
    /// exactly `width * height * 4` bytes.
    fn put_pixels(&mut self, pixels: &[u8], width: u32, height: u32) -> PageViewResult<()>;
}

impl<S: CanvasSink + ?Sized> CanvasSink for &mut S {
    fn resize(&mut self, width: u32, height: u32) -> PageViewResult<()> {
        (**self).resize(width, height)
    }

    fn put_pixels(&mut self, pixels: &[u8], width: u32, height: u32) -> PageViewResult<()> {
        (**self).put_pixels(pixels, width, height)
    }
}

/// Writes every presented frame as `frame-NNNN.png` into a directory.
#[derive(Debug)]
pub struct PngSink {
    dir: PathBuf,
    surface: Option<Surface>,
    written: Vec<PathBuf>,
}

impl PngSink {
    /// Create the sink, creating `dir` if needed.
    pub fn new(dir: impl AsRef<Path>) -> PageViewResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            surface: None,
            written: Vec::new(),
        })
    }

    /// Paths of all frames written so far, in order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// The surface holding the most recent frame.
    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }
}

impl CanvasSink for PngSink {
    fn resize(&mut self, width: u32, height: u32) -> PageViewResult<()> {
        // Frames are full repaints, so the surface is only swapped in
        // put_pixels once the file has been written.
        check_dimensions(width, height)
    }

    /// Write the frame to disk, then keep it as the current surface.
    ///
    /// On failure nothing changes: the previous surface stays and no path is
    /// recorded.
    fn put_pixels(&mut self, pixels: &[u8], width: u32, height: u32) -> PageViewResult<()> {
        let mut surface = Surface::new(width, height)?;
        surface.put_pixels(pixels, width, height)?;
        let png = surface.to_png(None)?;

        let path = self.dir.join(format!("frame-{:04}.png", self.written.len()));
        std::fs::write(&path, png)?;
        log::info!("wrote {}x{} frame to {}", width, height, path.display());
        self.surface = Some(surface);
        self.written.push(path);
        Ok(())
    }
}
