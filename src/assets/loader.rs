use std::path::Path;

use image::RgbImage;
use image::imageops::FilterType;

use crate::foundation::core::Canvas;
use crate::foundation::error::{ReelError, ReelResult};

/// A decoded input image bound to its place in the narrative.
#[derive(Clone, Debug)]
pub struct SceneImage {
    /// 1-based scene index, contiguous, in input order.
    pub index: usize,
    /// RGB8 pixels.
    pub pixels: RgbImage,
}

impl SceneImage {
    /// Dimensions of this image.
    pub fn canvas(&self) -> Canvas {
        Canvas::of(&self.pixels)
    }
}

/// Decode an in-memory encoded image (any format the `image` crate recognizes) into RGB8.
///
/// Alpha, if present, is dropped.
pub fn decode_image(bytes: &[u8]) -> ReelResult<RgbImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| ReelError::Other(anyhow::Error::new(e).context("decode image from memory")))?;
    Ok(dyn_img.to_rgb8())
}

/// Read and decode one image file.
pub fn load_image(path: &Path) -> ReelResult<RgbImage> {
    let bytes = std::fs::read(path).map_err(|e| ReelError::load(path, e.to_string()))?;
    let dyn_img =
        image::load_from_memory(&bytes).map_err(|e| ReelError::load(path, e.to_string()))?;
    let rgb = dyn_img.to_rgb8();
    if rgb.width() == 0 || rgb.height() == 0 {
        return Err(ReelError::load(path, "image has zero width or height"));
    }
    Ok(rgb)
}

/// Decode every path in order. The first failure aborts with a [`ReelError::Load`] naming it.
#[tracing::instrument(skip_all, fields(count = paths.len()))]
pub fn load_scene_images<P: AsRef<Path>>(paths: &[P]) -> ReelResult<Vec<SceneImage>> {
    if paths.is_empty() {
        return Err(ReelError::configuration("nothing to render: no input images"));
    }

    let mut out = Vec::with_capacity(paths.len());
    for (i, path) in paths.iter().enumerate() {
        let path = path.as_ref();
        let pixels = load_image(path)?;
        tracing::debug!(
            scene = i + 1,
            path = %path.display(),
            width = pixels.width(),
            height = pixels.height(),
            "decoded scene image"
        );
        out.push(SceneImage {
            index: i + 1,
            pixels,
        });
    }
    Ok(out)
}

/// Resize every image to one common resolution.
///
/// The target is `target` when given, otherwise the first image's size. Images already at the
/// target size pass through untouched; all others are resampled with Lanczos3.
pub fn normalize_scene_images(
    images: Vec<SceneImage>,
    target: Option<Canvas>,
) -> ReelResult<(Vec<SceneImage>, Canvas)> {
    let Some(first) = images.first() else {
        return Err(ReelError::configuration("nothing to render: no input images"));
    };
    let target = target.unwrap_or_else(|| first.canvas());
    if target.width == 0 || target.height == 0 {
        return Err(ReelError::configuration(format!(
            "target resolution must be non-zero, got {target}"
        )));
    }

    let images = images
        .into_iter()
        .map(|img| {
            if img.canvas() == target {
                return img;
            }
            tracing::debug!(
                scene = img.index,
                from = %img.canvas(),
                to = %target,
                "resizing scene image"
            );
            SceneImage {
                index: img.index,
                pixels: resize_lanczos(&img.pixels, target.width, target.height),
            }
        })
        .collect();

    Ok((images, target))
}

/// High-quality resample to exactly `width` x `height`.
pub(crate) fn resize_lanczos(img: &RgbImage, width: u32, height: u32) -> RgbImage {
    if img.width() == width && img.height() == height {
        return img.clone();
    }
    image::imageops::resize(img, width, height, FilterType::Lanczos3)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
