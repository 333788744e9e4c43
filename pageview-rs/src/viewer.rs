//! Host action dispatch.

use crate::error::{PageViewError, PageViewResult};
use crate::page::{Frame, Page};
use crate::sink::CanvasSink;
use crate::transform::{ImageTransformer, SkiaTransformer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named action triggered by the host page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    ZoomIn,
    ZoomOut,
    RotateClockwise,
    /// Viewport resize notification. Logged only; the surface is not touched.
    Resize,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::ZoomIn => "zoomIn",
            Action::ZoomOut => "zoomOut",
            Action::RotateClockwise => "rotateClockwise",
            Action::Resize => "resize",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = PageViewError;

    /// Accepts the host names (`zoomIn`) and their kebab-case forms (`zoom-in`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zoomIn" | "zoom-in" => Ok(Action::ZoomIn),
            "zoomOut" | "zoom-out" => Ok(Action::ZoomOut),
            "rotateClockwise" | "rotate-clockwise" | "rotate" => Ok(Action::RotateClockwise),
            "resize" => Ok(Action::Resize),
            other => Err(PageViewError::UnknownAction(other.to_string())),
        }
    }
}

/// Result of mapping a pointer press back onto the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerHit {
    /// Surface-local coordinates as delivered by the host.
    pub surface: (i32, i32),
    /// Source image pixel under the pointer, if any.
    pub image: Option<(u32, u32)>,
}

/// Owns a page and presents it to a sink after every action.
///
/// Each call runs to completion: update the page, render, present.
pub struct Viewer<S, T = SkiaTransformer> {
    page: Page,
    transformer: T,
    sink: S,
    presented: Option<u64>,
}

impl<S: CanvasSink> Viewer<S> {
    /// Create a viewer that renders with [`SkiaTransformer`].
    pub fn new(page: Page, sink: S) -> Self {
        Self::with_transformer(page, SkiaTransformer, sink)
    }
}

impl<S: CanvasSink, T: ImageTransformer> Viewer<S, T> {
    pub fn with_transformer(page: Page, transformer: T, sink: S) -> Self {
        Self {
            page,
            transformer,
            sink,
            presented: None,
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Revision of the frame currently on the sink.
    pub fn presented_revision(&self) -> Option<u64> {
        self.presented
    }

    /// Apply a host action and repaint.
    ///
    /// If rendering fails the page keeps its new state, the sink keeps the
    /// previous frame and the error is returned.
    pub fn handle(&mut self, action: Action) -> PageViewResult<()> {
        log::debug!(target: "pageview", "action {}", action);
        match action {
            Action::ZoomIn => {
                self.page.zoom_in();
            }
            Action::ZoomOut => {
                self.page.zoom_out();
            }
            Action::RotateClockwise => {
                self.page.rotate();
            }
            Action::Resize => {
                log::info!("viewport resized");
                return Ok(());
            }
        }
        self.render()
    }

    /// Free-form zoom, bypassing the catalog, then repaint.
    pub fn set_zoom(&mut self, factor: f64) -> PageViewResult<()> {
        self.page.set_zoom(factor)?;
        self.render()
    }

    /// Render the current page state and present it.
    pub fn render(&mut self) -> PageViewResult<()> {
        let frame = self.page.render(&self.transformer)?;
        self.present(frame)?;
        Ok(())
    }

    /// Push a frame to the sink unless a newer one is already showing.
    ///
    /// Returns whether the frame was presented. The presented revision only
    /// advances once both sink calls succeed, so sinks should leave their
    /// previous frame in place when either call fails, as [`PngSink`](crate::PngSink) does.
    pub fn present(&mut self, frame: Frame) -> PageViewResult<bool> {
        if let Some(current) = self.presented {
            if frame.revision() < current {
                log::debug!(
                    target: "pageview",
                    "dropping stale frame (revision {} < {})",
                    frame.revision(),
                    current
                );
                return Ok(false);
            }
        }
        self.sink.resize(frame.width(), frame.height())?;
        self.sink
            .put_pixels(frame.pixels(), frame.width(), frame.height())?;
        self.presented = Some(frame.revision());
        Ok(true)
    }

    /// Map a surface-local press onto the source image.
    pub fn pointer_down(&self, x: i32, y: i32) -> PointerHit {
        // Sample at the pixel center.
        let image = self
            .page
            .surface_to_image(f64::from(x) + 0.5, f64::from(y) + 0.5)
            .map(|(ix, iy)| (ix.floor() as u32, iy.floor() as u32));
        log::debug!(target: "pageview", "pointer down at {} {} -> {:?}", x, y, image);
        PointerHit {
            surface: (x, y),
            image,
        }
    }
}

impl<S, T> fmt::Debug for Viewer<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Viewer")
            .field("page", &self.page)
            .field("presented", &self.presented)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::Raster;
    use crate::sink::PngSink;
    use crate::surface::Surface;

    fn viewer() -> Viewer<Surface> {
        let page = Page::new(Raster::blank(70, 90, [255, 255, 255, 255]).unwrap());
        Viewer::new(page, Surface::new(1, 1).unwrap())
    }

    #[test]
    fn test_action_names() {
        for action in [
            Action::ZoomIn,
            Action::ZoomOut,
            Action::RotateClockwise,
            Action::Resize,
        ] {
            assert_eq!(action.name().parse::<Action>().unwrap(), action);
        }
        assert_eq!("zoom-in".parse::<Action>().unwrap(), Action::ZoomIn);
        assert!(matches!(
            "spin".parse::<Action>(),
            Err(PageViewError::UnknownAction(_))
        ));
        let parsed: Vec<Action> = serde_json::from_str(r#"["zoomOut", "rotateClockwise"]"#).unwrap();
        assert_eq!(parsed, vec![Action::ZoomOut, Action::RotateClockwise]);
    }

    #[test]
    fn test_handle_repaints_sink() {
        let mut viewer = viewer();
        viewer.render().unwrap();
        assert_eq!((viewer.sink().width(), viewer.sink().height()), (70, 90));

        viewer.handle(Action::ZoomIn).unwrap();
        assert_eq!(viewer.page().zoom_factor(), 1.25);
        assert_eq!((viewer.sink().width(), viewer.sink().height()), (88, 113));

        viewer.handle(Action::RotateClockwise).unwrap();
        assert_eq!((viewer.sink().width(), viewer.sink().height()), (113, 88));

        viewer.handle(Action::ZoomOut).unwrap();
        viewer.handle(Action::ZoomOut).unwrap();
        assert_eq!(viewer.page().zoom_factor(), 0.75);
        assert_eq!(viewer.presented_revision(), Some(viewer.page().revision()));
    }

    #[test]
    fn test_resize_action_is_a_no_op() {
        let mut viewer = viewer();
        viewer.render().unwrap();
        let revision = viewer.page().revision();
        viewer.handle(Action::Resize).unwrap();
        assert_eq!(viewer.page().revision(), revision);
        assert_eq!((viewer.sink().width(), viewer.sink().height()), (70, 90));
    }

    #[test]
    fn test_failed_render_keeps_previous_frame() {
        let mut viewer = viewer();
        viewer.render().unwrap();
        let before = viewer.sink().image_data();

        assert!(viewer.set_zoom(1.0e9).is_err());
        assert_eq!(viewer.page().zoom_factor(), 1.0e9);
        assert_eq!(viewer.sink().image_data(), before);
        assert_eq!(viewer.presented_revision(), Some(0));

        assert!(matches!(
            viewer.set_zoom(-1.0),
            Err(PageViewError::InvalidZoomFactor(_))
        ));
        assert_eq!(viewer.page().zoom_factor(), 1.0e9);
    }

    #[test]
    fn test_failed_png_write_keeps_presented_revision() {
        let dir = tempfile::tempdir().unwrap();
        let frames = dir.path().join("frames");
        let page = Page::new(Raster::blank(7, 9, [255, 255, 255, 255]).unwrap());
        let mut viewer = Viewer::new(page, PngSink::new(&frames).unwrap());
        viewer.render().unwrap();

        std::fs::remove_dir_all(&frames).unwrap();
        assert!(matches!(
            viewer.handle(Action::RotateClockwise),
            Err(PageViewError::Io(_))
        ));
        assert_eq!(viewer.presented_revision(), Some(0));
        let surface = viewer.sink().surface().unwrap();
        assert_eq!((surface.width(), surface.height()), (7, 9));
        assert_eq!(viewer.sink().written().len(), 1);
    }

    #[test]
    fn test_stale_frame_is_discarded() {
        let mut viewer = viewer();
        let stale = viewer.page().render(&SkiaTransformer).unwrap();
        viewer.handle(Action::RotateClockwise).unwrap();
        assert!(!viewer.present(stale).unwrap());
        // Still showing the rotated frame
        assert_eq!((viewer.sink().width(), viewer.sink().height()), (90, 70));
    }

    #[test]
    fn test_pointer_down_maps_to_source_pixels() {
        let mut viewer = viewer();
        viewer.render().unwrap();
        assert_eq!(viewer.pointer_down(5, 7).image, Some((5, 7)));
        assert_eq!(viewer.pointer_down(70, 0).image, None);

        viewer.handle(Action::RotateClockwise).unwrap();
        let hit = viewer.pointer_down(0, 0);
        assert_eq!(hit.surface, (0, 0));
        assert_eq!(hit.image, Some((0, 89)));
    }

    #[test]
    fn test_viewer_with_borrowed_sink() {
        let mut surface = Surface::new(1, 1).unwrap();
        {
            let page = Page::new(Raster::blank(4, 2, [0, 0, 0, 255]).unwrap());
            let mut viewer = Viewer::new(page, &mut surface);
            viewer.handle(Action::RotateClockwise).unwrap();
        }
        assert_eq!((surface.width(), surface.height()), (2, 4));
    }
}
