//! Image resize and rotate collaborators.

use crate::error::{PageViewError, PageViewResult};
use crate::geometry::{Pivot, Rotation};
use crate::raster::{check_dimensions, Raster};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tiny_skia::{FilterQuality, Pixmap, PixmapPaint, Transform};

/// Resampling mode used when resizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Interpolation {
    /// Bilinear filtering.
    #[default]
    Linear,
    /// Nearest-neighbor sampling (sharp pixels).
    #[serde(alias = "nearest")]
    NearestNeighbor,
}

impl From<Interpolation> for FilterQuality {
    fn from(interpolation: Interpolation) -> Self {
        match interpolation {
            Interpolation::Linear => FilterQuality::Bilinear,
            Interpolation::NearestNeighbor => FilterQuality::Nearest,
        }
    }
}

impl FromStr for Interpolation {
    type Err = PageViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(Interpolation::Linear),
            "nearest" | "nearestNeighbor" | "nearest-neighbor" => {
                Ok(Interpolation::NearestNeighbor)
            }
            other => Err(PageViewError::Config(format!(
                "unknown interpolation '{}' (expected linear or nearest)",
                other
            ))),
        }
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interpolation::Linear => write!(f, "linear"),
            Interpolation::NearestNeighbor => write!(f, "nearest"),
        }
    }
}

/// Produces transformed copies of a raster. Inputs are never modified.
pub trait ImageTransformer {
    /// Scale `image` to exactly `width` x `height`.
    fn resize(
        &self,
        image: &Raster,
        width: u32,
        height: u32,
        interpolation: Interpolation,
    ) -> PageViewResult<Raster>;

    /// Rotate `image` clockwise by `degrees` about `pivot`.
    ///
    /// With `resize_bounds` the output is sized to the rotated bounding box and
    /// nothing is cropped; otherwise the output keeps the input size.
    fn rotate(
        &self,
        image: &Raster,
        degrees: f64,
        pivot: Pivot,
        resize_bounds: bool,
    ) -> PageViewResult<Raster>;
}

/// [`ImageTransformer`] backed by tiny-skia pixmap drawing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SkiaTransformer;

impl SkiaTransformer {
    pub fn new() -> Self {
        Self
    }

    fn draw(
        source: &Raster,
        width: u32,
        height: u32,
        quality: FilterQuality,
        transform: Transform,
    ) -> PageViewResult<Raster> {
        check_dimensions(width, height)?;
        let pixmap = source.to_pixmap()?;
        let mut target = Pixmap::new(width, height).ok_or_else(|| {
            PageViewError::Transform(format!("cannot allocate {}x{} pixmap", width, height))
        })?;
        let paint = PixmapPaint {
            quality,
            ..PixmapPaint::default()
        };
        target.draw_pixmap(0, 0, pixmap.as_ref(), &paint, transform, None);
        Ok(Raster::from_pixmap(&target))
    }
}

impl ImageTransformer for SkiaTransformer {
    fn resize(
        &self,
        image: &Raster,
        width: u32,
        height: u32,
        interpolation: Interpolation,
    ) -> PageViewResult<Raster> {
        log::debug!(
            target: "pageview",
            "resize {}x{} -> {}x{} ({})",
            image.width(),
            image.height(),
            width,
            height,
            interpolation
        );
        check_dimensions(width, height)?;
        if width == image.width() && height == image.height() {
            return Ok(image.clone());
        }
        let scale_x = width as f32 / image.width() as f32;
        let scale_y = height as f32 / image.height() as f32;
        Self::draw(
            image,
            width,
            height,
            interpolation.into(),
            Transform::from_scale(scale_x, scale_y),
        )
    }

    fn rotate(
        &self,
        image: &Raster,
        degrees: f64,
        pivot: Pivot,
        resize_bounds: bool,
    ) -> PageViewResult<Raster> {
        log::debug!(
            target: "pageview",
            "rotate {}x{} by {} about {:?}",
            image.width(),
            image.height(),
            degrees,
            pivot
        );
        let rotation = Rotation::from_degrees(degrees).ok_or_else(|| {
            PageViewError::Transform(format!("cannot rotate by {} degrees", degrees))
        })?;
        if rotation.cos == 1.0 {
            return Ok(image.clone());
        }

        let (w, h) = (f64::from(image.width()), f64::from(image.height()));
        let (px, py) = pivot.point(w, h);
        let (width, height, tx, ty) = if resize_bounds {
            let bounds = rotation.bounds(w, h, (px, py));
            let (bw, bh) = bounds.pixel_size();
            (bw, bh, px - bounds.min_x, py - bounds.min_y)
        } else {
            (w, h, px, py)
        };
        if width > f64::from(u32::MAX) || height > f64::from(u32::MAX) {
            return Err(PageViewError::Transform(format!(
                "rotated bounds {}x{} are too large",
                width, height
            )));
        }

        // Quarter turns land exactly on pixel centers, so sample without filtering.
        let quality = if rotation.is_axis_aligned() {
            FilterQuality::Nearest
        } else {
            FilterQuality::Bilinear
        };
        let (cos, sin) = (rotation.cos as f32, rotation.sin as f32);
        let transform = Transform::from_translate(tx as f32, ty as f32)
            .pre_concat(Transform::from_row(cos, sin, -sin, cos, 0.0, 0.0))
            .pre_translate(-px as f32, -py as f32);
        Self::draw(image, width as u32, height as u32, quality, transform)
    }
}
