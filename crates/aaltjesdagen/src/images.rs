//! Storyblok image URL transforms.
//!
//! Storyblok serves every uploaded asset through its image service: appending
//! `/m/{width}x{height}/filters:...` to the asset URL requests a resized,
//! re-encoded variant. Building those URLs is pure string templating, the
//! actual processing happens on Storyblok's CDN.
use log::debug;

/// Widths used when a renderer does not ask for specific srcset variants.
pub const DEFAULT_SRCSET_WIDTHS: [u32; 4] = [400, 800, 1200, 1600];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    WebP,
    Jpeg,
    Png,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::WebP => "webp",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
        }
    }
}

/// Parameters for a single transformed variant of an asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageTransform {
    pub width: u32,
    pub height: u32,
    /// 0-100, Storyblok clamps out-of-range values on its end.
    pub quality: u8,
    pub format: ImageFormat,
}

impl Default for ImageTransform {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            quality: 80,
            format: ImageFormat::WebP,
        }
    }
}

/// Builds the URL of a transformed Storyblok asset.
///
/// Returns the empty string when `filename` is empty, so renderers can pass
/// optional CMS fields straight through. The filename itself is not
/// validated.
///
/// ## Example
/// ```rs
/// let url = storyblok_image(image.filename, &ImageTransform { width: 1200, height: 800, ..Default::default() });
/// // "https://a.storyblok.com/f/.../photo.jpg/m/1200x800/filters:quality(80):format(webp)"
/// ```
pub fn storyblok_image(filename: &str, transform: &ImageTransform) -> String {
    if filename.is_empty() {
        return String::new();
    }

    let image_name = filename.rsplit('/').next().unwrap_or(filename);
    debug!(
        target: "images",
        "Optimizing: {} (format: {}, quality: {})",
        image_name,
        transform.format.extension(),
        transform.quality
    );

    format!(
        "{}/m/{}x{}/filters:quality({}):format({})",
        filename,
        transform.width,
        transform.height,
        transform.quality,
        transform.format.extension()
    )
}

/// Builds a responsive srcset string with one 4:3 variant per requested width.
///
/// Entries keep the order of `widths`. Returns the empty string when
/// `filename` is empty.
pub fn responsive_image_srcset(filename: &str, widths: &[u32], quality: u8) -> String {
    if filename.is_empty() {
        return String::new();
    }

    widths
        .iter()
        .map(|&width| {
            let height = (width as f64 * 0.75).round() as u32;
            let url = storyblok_image(
                filename,
                &ImageTransform {
                    width,
                    height,
                    quality,
                    ..Default::default()
                },
            );
            format!("{} {}w", url, width)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILENAME: &str = "https://a.storyblok.com/f/12345/photo.jpg";

    #[test]
    fn builds_transform_urls() {
        let url = storyblok_image(FILENAME, &ImageTransform::default());
        assert_eq!(
            url,
            "https://a.storyblok.com/f/12345/photo.jpg/m/800x600/filters:quality(80):format(webp)"
        );
    }

    #[test]
    fn transform_url_contains_every_parameter_once() {
        let url = storyblok_image(
            FILENAME,
            &ImageTransform {
                width: 1234,
                height: 567,
                quality: 42,
                format: ImageFormat::Jpeg,
            },
        );

        assert_eq!(url.matches("1234x567").count(), 1);
        assert_eq!(url.matches("quality(42)").count(), 1);
        assert_eq!(url.matches("format(jpg)").count(), 1);
    }

    #[test]
    fn empty_filename_yields_empty_url() {
        assert_eq!(storyblok_image("", &ImageTransform::default()), "");
        assert_eq!(responsive_image_srcset("", &DEFAULT_SRCSET_WIDTHS, 80), "");
    }

    #[test]
    fn srcset_keeps_requested_width_order() {
        let srcset = responsive_image_srcset(FILENAME, &[400, 800], 80);
        let entries: Vec<&str> = srcset.split(", ").collect();

        assert_eq!(entries.len(), 2);
        assert!(entries[0].ends_with("400w"));
        assert!(entries[1].ends_with("800w"));
    }

    #[test]
    fn srcset_variants_keep_a_4_3_ratio() {
        let srcset = responsive_image_srcset(FILENAME, &[400], 80);
        assert!(srcset.contains("/m/400x300/"));
    }
}
