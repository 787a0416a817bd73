use image::{DynamicImage, GrayImage};
use imageproc::contours::{find_contours, BorderType, Contour};
use imageproc::edges::canny;
use imageproc::filter::separable_filter_equal;
use thiserror::Error;
use tracing::debug;

use crate::types::ContourRegion;

/// Side length of the smoothing kernel.
const BLUR_KERNEL_SIZE: usize = 9;
const CANNY_LOW: f32 = 50.0;
const CANNY_HIGH: f32 = 300.0;
/// Regions must be strictly larger than this to be kept.
const MIN_REGION_WIDTH: u32 = 10;
const MIN_REGION_HEIGHT: u32 = 20;

#[derive(Debug, Error)]
#[error("Failed to decode image: {0}")]
pub struct DecodeError(#[from] pub image::ImageError);

/// Output of [`normalize`]: the binary edge map and the boxes that survived filtering.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    pub edges: GrayImage,
    pub regions: Vec<ContourRegion>,
}

/// Decode raw JPEG / PNG bytes.
pub fn decode(data: &[u8]) -> Result<DynamicImage, DecodeError> {
    Ok(image::load_from_memory(data)?)
}

/// Grayscale → 9×9 Gaussian blur → Canny(50, 300) → external contours → bounding boxes.
pub fn normalize(img: &DynamicImage) -> NormalizedImage {
    let gray = img.to_luma8();
    let blurred = separable_filter_equal(&gray, &gaussian_kernel(BLUR_KERNEL_SIZE));
    let edges = canny(&blurred, CANNY_LOW, CANNY_HIGH);

    let regions = regions_from_edges(&edges);

    debug!(
        width = gray.width(),
        height = gray.height(),
        regions = regions.len(),
        "Normalized image"
    );

    NormalizedImage { edges, regions }
}

/// Bounding boxes of the external contours of a binary edge map, size-filtered.
pub fn regions_from_edges(edges: &GrayImage) -> Vec<ContourRegion> {
    let contours: Vec<Contour<u32>> = find_contours(edges);
    contours
        .iter()
        // Outer borders with no enclosing hole are the external contours.
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .filter_map(bounding_box)
        .filter(|r| r.width > MIN_REGION_WIDTH && r.height > MIN_REGION_HEIGHT)
        .collect()
}

/// 1-D Gaussian weights for an odd `size`, with sigma derived from the size
/// (`0.3 * ((size - 1) / 2 - 1) + 0.8`), normalized to sum to 1.
fn gaussian_kernel(size: usize) -> Vec<f32> {
    let sigma = 0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8;
    let center = (size as f32 - 1.0) / 2.0;
    let weights: Vec<f32> = (0..size)
        .map(|i| {
            let d = i as f32 - center;
            (-(d * d) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f32 = weights.iter().sum();
    weights.into_iter().map(|w| w / sum).collect()
}

/// Inclusive axis-aligned bounds of a contour's points.
fn bounding_box(contour: &Contour<u32>) -> Option<ContourRegion> {
    let first = contour.points.first()?;
    let (min_x, min_y, max_x, max_y) = contour.points.iter().fold(
        (first.x, first.y, first.x, first.y),
        |(x0, y0, x1, y1), p| (x0.min(p.x), y0.min(p.y), x1.max(p.x), y1.max(p.y)),
    );
    Some(ContourRegion {
        x: min_x,
        y: min_y,
        width: max_x - min_x + 1,
        height: max_y - min_y + 1,
    })
}
