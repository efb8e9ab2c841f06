use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{AssetError, AssetResult};

const MAX_DIM: u32 = 16_384;

/// SVG rasterizer holding the parse options (and font database) shared by every producer.
pub struct Rasterizer {
    opts: usvg::Options<'static>,
}

impl Rasterizer {
    /// Rasterizer backed by the fonts installed on this machine.
    pub fn with_system_fonts() -> Self {
        let mut opts = usvg::Options::default();
        opts.fontdb_mut().load_system_fonts();
        tracing::debug!(faces = opts.fontdb.len(), "loaded system fonts");
        Self { opts }
    }

    /// Rasterizer with an empty font database; text nodes render as nothing.
    pub fn without_fonts() -> Self {
        Self {
            opts: usvg::Options::default(),
        }
    }

    pub fn font_face_count(&self) -> usize {
        self.opts.fontdb.len()
    }

    pub fn parse(&self, svg: &str) -> AssetResult<usvg::Tree> {
        usvg::Tree::from_str(svg, &self.opts)
            .map_err(|e| AssetError::render(format!("parse svg tree: {e}")))
    }

    /// Render `svg` at `scale` device pixels per user unit into straight-alpha RGBA8.
    pub fn rasterize(&self, svg: &str, scale: f32) -> AssetResult<image::RgbaImage> {
        let tree = self.parse(svg)?;
        rasterize_tree(&tree, scale)
    }

    pub fn write_png(&self, svg: &str, scale: f32, path: &Path) -> AssetResult<(u32, u32)> {
        let img = self.rasterize(svg, scale)?;
        save_png(&img, path)?;
        Ok(img.dimensions())
    }
}

pub fn rasterize_tree(tree: &usvg::Tree, scale: f32) -> AssetResult<image::RgbaImage> {
    fn to_px(v: f32) -> AssetResult<u32> {
        if !v.is_finite() || v <= 0.0 {
            return Err(AssetError::render("svg has invalid width/height"));
        }
        // Absorb f32 noise from non-dyadic scales (e.g. 600 * 0.8).
        Ok(((v - 1e-3).ceil() as u32).max(1))
    }

    if !scale.is_finite() || scale <= 0.0 {
        return Err(AssetError::validation("raster scale must be positive"));
    }

    let size = tree.size();
    let width = to_px(size.width() * scale)?;
    let height = to_px(size.height() * scale)?;
    if width > MAX_DIM || height > MAX_DIM {
        return Err(AssetError::render(format!(
            "svg raster size too large: {width}x{height} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| AssetError::render("failed to allocate svg pixmap"))?;
    let xform = resvg::tiny_skia::Transform::from_scale(scale, scale);
    resvg::render(tree, xform, &mut pixmap.as_mut());

    // tiny-skia stores premultiplied pixels; PNG/GIF want straight alpha.
    let mut rgba = Vec::with_capacity((width * height * 4) as usize);
    for px in pixmap.pixels() {
        let c = px.demultiply();
        rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }

    image::RgbaImage::from_raw(width, height, rgba)
        .ok_or_else(|| AssetError::render("pixmap size does not match rgba buffer"))
}

pub fn save_png(img: &image::RgbaImage, path: &Path) -> AssetResult<()> {
    image::save_buffer_with_format(
        path,
        img.as_raw(),
        img.width(),
        img.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

/// Crop `img` to the bounding box of pixels that differ from `background`, keeping `pad`
/// pixels of margin. A blank image is returned unchanged.
pub fn crop_to_content(img: &image::RgbaImage, background: [u8; 4], pad: u32) -> image::RgbaImage {
    let (w, h) = img.dimensions();
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, px) in img.enumerate_pixels() {
        if px.0 == background {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }

    let Some((x0, y0, x1, y1)) = bounds else {
        return img.clone();
    };
    let x0 = x0.saturating_sub(pad);
    let y0 = y0.saturating_sub(pad);
    let x1 = (x1 + pad).min(w - 1);
    let y1 = (y1 + pad).min(h - 1);
    image::imageops::crop_imm(img, x0, y0, x1 - x0 + 1, y1 - y0 + 1).to_image()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="8" viewBox="0 0 10 8">
<rect x="0" y="0" width="10" height="8" fill="#ff0000"/>
</svg>"##;

    #[test]
    fn rasterize_scales_dimensions() {
        let r = Rasterizer::without_fonts();
        let img = r.rasterize(SQUARE, 1.5).unwrap();
        assert_eq!(img.dimensions(), (15, 12));
        assert_eq!(img.get_pixel(7, 6).0, [255, 0, 0, 255]);
    }

    #[test]
    fn parse_rejects_malformed_svg() {
        let r = Rasterizer::without_fonts();
        assert!(matches!(r.parse("<svg"), Err(AssetError::Render(_))));
    }

    #[test]
    fn rasterize_rejects_bad_scale() {
        let r = Rasterizer::without_fonts();
        assert!(r.rasterize(SQUARE, 0.0).is_err());
        assert!(r.rasterize(SQUARE, f32::NAN).is_err());
    }

    #[test]
    fn write_png_into_missing_dir_fails_with_path() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("missing").join("x.png");
        let err = Rasterizer::without_fonts()
            .write_png(SQUARE, 1.0, &out)
            .unwrap_err();
        assert!(format!("{err:#}").contains("x.png"));
    }

    #[test]
    fn crop_keeps_content_and_padding() {
        let mut img = image::RgbaImage::from_pixel(20, 10, image::Rgba([255, 255, 255, 255]));
        img.put_pixel(5, 4, image::Rgba([0, 0, 0, 255]));
        img.put_pixel(8, 6, image::Rgba([0, 0, 0, 255]));
        let cropped = crop_to_content(&img, [255, 255, 255, 255], 2);
        assert_eq!(cropped.dimensions(), (8, 7));
        assert_eq!(cropped.get_pixel(2, 2).0, [0, 0, 0, 255]);
    }

    #[test]
    fn crop_of_blank_image_is_identity() {
        let img = image::RgbaImage::from_pixel(4, 3, image::Rgba([255, 255, 255, 255]));
        let cropped = crop_to_content(&img, [255, 255, 255, 255], 2);
        assert_eq!(cropped.dimensions(), (4, 3));
    }
}
