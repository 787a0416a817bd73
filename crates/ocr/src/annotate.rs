use std::path::{Path, PathBuf};

use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use thiserror::Error;

use crate::types::ContourRegion;

const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const BOX_THICKNESS: u32 = 2;

#[derive(Debug, Error)]
pub enum AnnotateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to write overlay: {0}")]
    Encode(#[from] image::ImageError),
}

/// Optional sink for region overlays. The scanner never depends on its outcome.
pub trait Annotator: Send + Sync {
    fn annotate(
        &self,
        file_name: &str,
        image: &DynamicImage,
        regions: &[ContourRegion],
    ) -> Result<(), AnnotateError>;
}

impl<T: Annotator + ?Sized> Annotator for Box<T> {
    fn annotate(
        &self,
        file_name: &str,
        image: &DynamicImage,
        regions: &[ContourRegion],
    ) -> Result<(), AnnotateError> {
        (**self).annotate(file_name, image, regions)
    }
}

/// Headless default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAnnotation;

impl Annotator for NoAnnotation {
    fn annotate(&self, _: &str, _: &DynamicImage, _: &[ContourRegion]) -> Result<(), AnnotateError> {
        Ok(())
    }
}

/// Writes `<stem>.regions.png` into `out_dir` for every scanned image.
#[derive(Debug, Clone)]
pub struct OverlayWriter {
    out_dir: PathBuf,
}

impl OverlayWriter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self { out_dir: out_dir.into() }
    }

    pub fn overlay_path(&self, file_name: &str) -> PathBuf {
        let stem = Path::new(file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(file_name);
        self.out_dir.join(format!("{stem}.regions.png"))
    }
}

impl Annotator for OverlayWriter {
    fn annotate(
        &self,
        file_name: &str,
        image: &DynamicImage,
        regions: &[ContourRegion],
    ) -> Result<(), AnnotateError> {
        std::fs::create_dir_all(&self.out_dir)?;
        draw_regions(image, regions).save(self.overlay_path(file_name))?;
        Ok(())
    }
}

/// Copy of `image` with a green box around every region.
pub fn draw_regions(image: &DynamicImage, regions: &[ContourRegion]) -> RgbImage {
    let mut canvas = image.to_rgb8();
    for r in regions.iter().filter(|r| r.width > 0 && r.height > 0) {
        // Grow outward one pixel per pass.
        for inset in 0..BOX_THICKNESS {
            let rect = Rect::at(r.x as i32 - inset as i32, r.y as i32 - inset as i32)
                .of_size(r.width + 2 * inset, r.height + 2 * inset);
            draw_hollow_rect_mut(&mut canvas, rect, BOX_COLOR);
        }
    }
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([255, 255, 255])))
    }

    #[test]
    fn draw_regions_outlines_box() {
        let region = ContourRegion { x: 10, y: 10, width: 20, height: 30 };
        let out = draw_regions(&white(50, 50), &[region]);
        assert_eq!(*out.get_pixel(10, 10), BOX_COLOR);
        assert_eq!(*out.get_pixel(29, 39), BOX_COLOR);
        assert_eq!(*out.get_pixel(9, 9), BOX_COLOR);
        assert_eq!(*out.get_pixel(20, 20), Rgb([255, 255, 255]));
        assert_eq!(*out.get_pixel(0, 0), Rgb([255, 255, 255]));
    }

    #[test]
    fn draw_regions_at_image_edge_does_not_panic() {
        let region = ContourRegion { x: 0, y: 0, width: 50, height: 50 };
        let out = draw_regions(&white(50, 50), &[region]);
        assert_eq!(*out.get_pixel(0, 0), BOX_COLOR);
    }

    #[test]
    fn degenerate_regions_are_skipped() {
        let regions = [
            ContourRegion { x: 1, y: 1, width: 0, height: 5 },
            ContourRegion { x: 1, y: 1, width: 5, height: 0 },
        ];
        let out = draw_regions(&white(10, 10), &regions);
        assert!(out.pixels().all(|p| *p == Rgb([255, 255, 255])));
    }

    #[test]
    fn overlay_path_uses_file_stem() {
        let w = OverlayWriter::new("/tmp/out");
        assert_eq!(w.overlay_path("receipt.jpg"), PathBuf::from("/tmp/out/receipt.regions.png"));
    }

    #[test]
    fn overlay_writer_saves_png() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("overlays");
        let w = OverlayWriter::new(&out_dir);
        let region = ContourRegion { x: 2, y: 2, width: 12, height: 22 };
        w.annotate("scan.png", &white(30, 30), &[region]).unwrap();
        let written = image::open(out_dir.join("scan.regions.png")).unwrap().to_rgb8();
        assert_eq!(*written.get_pixel(2, 2), BOX_COLOR);
    }

    #[test]
    fn no_annotation_is_a_noop() {
        assert!(NoAnnotation.annotate("x.png", &white(1, 1), &[]).is_ok());
    }
}
