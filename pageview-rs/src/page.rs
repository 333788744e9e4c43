//! Page state and the render pipeline.

use crate::config::ViewerConfig;
use crate::error::{PageViewError, PageViewResult};
use crate::geometry::{Pivot, Rotation};
use crate::raster::{check_dimensions, Raster, MAX_DIMENSION};
use crate::transform::{ImageTransformer, Interpolation};
use crate::zoom::{validate_zoom_factor, ZoomCatalog};

/// Degrees added by each [`Page::rotate`].
pub const ROTATION_STEP: f64 = 90.0;

/// A rendered page, ready to hand to a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    revision: u64,
    raster: Raster,
}

impl Frame {
    pub fn new(revision: u64, raster: Raster) -> Self {
        Self { revision, raster }
    }

    /// The page revision this frame was rendered at.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    pub fn pixels(&self) -> &[u8] {
        self.raster.data()
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    pub fn into_raster(self) -> Raster {
        self.raster
    }
}

/// One image being viewed: the untouched source plus zoom and rotation.
#[derive(Debug, Clone)]
pub struct Page {
    source: Raster,
    catalog: ZoomCatalog,
    interpolation: Interpolation,
    zoom_factor: f64,
    rotation_angle: f64,
    revision: u64,
}

impl Page {
    /// Create a page at 100% with the default catalog.
    pub fn new(source: Raster) -> Self {
        Self {
            source,
            catalog: ZoomCatalog::default(),
            interpolation: Interpolation::default(),
            zoom_factor: 1.0,
            rotation_angle: 0.0,
            revision: 0,
        }
    }

    /// Create a page from a configuration.
    pub fn with_config(source: Raster, config: &ViewerConfig) -> PageViewResult<Self> {
        config.validate()?;
        Ok(Self {
            catalog: config.catalog.clone(),
            interpolation: config.interpolation,
            zoom_factor: config.initial_zoom,
            ..Self::new(source)
        })
    }

    pub fn base_width(&self) -> u32 {
        self.source.width()
    }

    pub fn base_height(&self) -> u32 {
        self.source.height()
    }

    pub fn source(&self) -> &Raster {
        &self.source
    }

    pub fn catalog(&self) -> &ZoomCatalog {
        &self.catalog
    }

    pub fn zoom_factor(&self) -> f64 {
        self.zoom_factor
    }

    /// Accumulated clockwise rotation in degrees. Never wrapped.
    pub fn rotation_angle(&self) -> f64 {
        self.rotation_angle
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    pub fn set_interpolation(&mut self, interpolation: Interpolation) {
        self.interpolation = interpolation;
        self.touch();
    }

    /// Bumped on every state change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Step to the next larger catalog level. Returns the new factor.
    pub fn zoom_in(&mut self) -> f64 {
        self.zoom_factor = self.catalog.step_in(self.zoom_factor);
        self.touch();
        self.zoom_factor
    }

    /// Step to the next smaller catalog level. Returns the new factor.
    pub fn zoom_out(&mut self) -> f64 {
        self.zoom_factor = self.catalog.step_out(self.zoom_factor);
        self.touch();
        self.zoom_factor
    }

    /// Set the zoom factor directly, bypassing the catalog.
    ///
    /// Non-positive or non-finite factors are rejected and the page is left as is.
    pub fn set_zoom(&mut self, factor: f64) -> PageViewResult<()> {
        self.zoom_factor = validate_zoom_factor(factor)?;
        self.touch();
        Ok(())
    }

    /// Add a quarter turn clockwise. Returns the new accumulated angle.
    pub fn rotate(&mut self) -> f64 {
        self.rotation_angle += ROTATION_STEP;
        self.touch();
        self.rotation_angle
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Size of the zoomed page before rotation.
    pub fn target_size(&self) -> PageViewResult<(u32, u32)> {
        let width = (f64::from(self.base_width()) * self.zoom_factor).round();
        let height = (f64::from(self.base_height()) * self.zoom_factor).round();
        let limit = f64::from(MAX_DIMENSION);
        if width > limit || height > limit {
            return Err(PageViewError::InvalidDimensions {
                width: width as u32,
                height: height as u32,
            });
        }
        let (width, height) = (width as u32, height as u32);
        check_dimensions(width, height)?;
        Ok((width, height))
    }

    /// Produce the displayed pixels for the current state.
    ///
    /// Scales the source to [`target_size`](Self::target_size), then rotates
    /// it about the origin into a canvas that fits the whole rotated page.
    pub fn render<T: ImageTransformer + ?Sized>(&self, transformer: &T) -> PageViewResult<Frame> {
        let (width, height) = self.target_size()?;
        log::debug!(
            target: "pageview",
            "render revision {} zoom {} rotation {} ({}x{})",
            self.revision,
            self.zoom_factor,
            self.rotation_angle,
            width,
            height
        );
        let resized = transformer.resize(&self.source, width, height, self.interpolation)?;
        let rotated = transformer.rotate(&resized, self.rotation_angle, Pivot::Origin, true)?;
        Ok(Frame::new(self.revision, rotated))
    }

    /// Map a point on the rendered surface back to source image coordinates.
    ///
    /// Inverts the render transform: undo the bounding-box offset, rotate back,
    /// then divide out the zoom. Returns None if the point falls outside the
    /// image or the page cannot currently be rendered.
    pub fn surface_to_image(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let (width, height) = self.target_size().ok()?;
        let rotation = Rotation::from_degrees(self.rotation_angle)?;
        let bounds = rotation.bounds(f64::from(width), f64::from(height), (0.0, 0.0));
        let (rx, ry) = rotation
            .inverse()
            .apply((x + bounds.min_x, y + bounds.min_y), (0.0, 0.0));

        let scale_x = f64::from(width) / f64::from(self.base_width());
        let scale_y = f64::from(height) / f64::from(self.base_height());
        let (ix, iy) = (rx / scale_x, ry / scale_y);
        let inside = (0.0..f64::from(self.base_width())).contains(&ix)
            && (0.0..f64::from(self.base_height())).contains(&iy);
        inside.then_some((ix, iy))
    }
}
