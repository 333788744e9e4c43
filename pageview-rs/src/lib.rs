//! Zoom and rotation core for a host-driven image page viewer.
//!
//! A [`Page`] holds an immutable source image plus a zoom factor and an
//! accumulated rotation. The host dispatches [`Action`]s to a [`Viewer`], which
//! updates the page, renders it through an [`ImageTransformer`] and pushes the
//! finished RGBA frame to a [`CanvasSink`]. It uses:
//! - `tiny-skia` for resizing, rotating and the in-memory [`Surface`]
//! - `image` for decoding source pages and `png` for writing frames
//!
//! # Example
//!
//! ```rust,ignore
//! use pageview_rs::{Action, Page, Raster, Surface, Viewer};
//!
//! let page = Page::new(Raster::blank(700, 900, [255, 255, 255, 255])?);
//! let mut viewer = Viewer::new(page, Surface::new(700, 900)?);
//! viewer.render()?;
//! viewer.handle(Action::ZoomIn)?;
//! viewer.handle(Action::RotateClockwise)?;
//! let png_data = viewer.sink().to_png(None)?;
//! ```

mod config;
mod error;
mod geometry;
mod page;
mod raster;
mod sink;
mod surface;
mod transform;
mod viewer;
mod zoom;

// Re-export public API
pub use config::ViewerConfig;
pub use error::{PageViewError, PageViewResult};
pub use geometry::Pivot;
pub use page::{Frame, Page, ROTATION_STEP};
pub use raster::{parse_color, Raster, MAX_DIMENSION};
pub use sink::{CanvasSink, PngSink};
pub use surface::Surface;
pub use transform::{ImageTransformer, Interpolation, SkiaTransformer};
pub use viewer::{Action, PointerHit, Viewer};
pub use zoom::{validate_zoom_factor, ZoomCatalog, DEFAULT_ZOOM_LEVELS};
