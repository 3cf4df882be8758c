//! Shopify CDN image URL sizing.
//!
//! Shopify serves resized variants of any uploaded image when a size suffix
//! is inserted before the file extension:
//! `.../products/shirt.jpg?v=1` -> `.../products/shirt_400x400_crop_center.jpg?v=1`.

/// Crop anchor for a resized image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageCrop {
    Center,
    Top,
    Bottom,
    Left,
    Right,
}

impl ImageCrop {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Returns true for URLs served by the Shopify CDN.
fn is_shopify_cdn(url: &str) -> bool {
    url.contains("cdn.shopify.com") || url.contains("/cdn/shop/")
}

/// Insert a Shopify size (and optional crop) suffix into an image URL.
///
/// URLs that are not on the Shopify CDN, have no file extension, or are
/// requested with neither width nor height are returned unchanged.
///
/// ```
/// use storefront_sdk_core::{ImageCrop, sized_image_url};
///
/// let url = "https://cdn.shopify.com/s/files/1/products/shirt.jpg?v=12";
/// assert_eq!(
///     sized_image_url(url, Some(400), Some(400), Some(ImageCrop::Center)),
///     "https://cdn.shopify.com/s/files/1/products/shirt_400x400_crop_center.jpg?v=12"
/// );
/// ```
#[must_use]
pub fn sized_image_url(
    url: &str,
    width: Option<u32>,
    height: Option<u32>,
    crop: Option<ImageCrop>,
) -> String {
    let size = match (width, height) {
        (None, None) => return url.to_string(),
        (Some(w), Some(h)) => format!("_{w}x{h}"),
        (Some(w), None) => format!("_{w}x"),
        (None, Some(h)) => format!("_x{h}"),
    };
    if !is_shopify_cdn(url) {
        return url.to_string();
    }

    let (path, query) = url
        .split_once('?')
        .map_or((url, None), |(path, query)| (path, Some(query)));
    let file_start = path.rfind('/').map_or(0, |i| i + 1);
    let Some(dot) = path.get(file_start..).and_then(|file| file.rfind('.')) else {
        return url.to_string();
    };
    let dot = file_start + dot;

    let (stem, extension) = path.split_at(dot);
    let crop = crop.map_or_else(String::new, |c| format!("_crop_{}", c.as_str()));

    match query {
        Some(query) => format!("{stem}{size}{crop}{extension}?{query}"),
        None => format!("{stem}{size}{crop}{extension}"),
    }
}

/// Build a `srcset` attribute value with one width-constrained URL per width.
#[must_use]
pub fn image_srcset(url: &str, widths: &[u32]) -> String {
    widths
        .iter()
        .map(|w| format!("{} {w}w", sized_image_url(url, Some(*w), None, None)))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const CDN: &str = "https://cdn.shopify.com/s/files/1/0001/products/mug.png";

    #[test]
    fn test_width_and_height() {
        assert_eq!(
            sized_image_url(CDN, Some(200), Some(300), None),
            "https://cdn.shopify.com/s/files/1/0001/products/mug_200x300.png"
        );
    }

    #[test]
    fn test_single_dimension() {
        assert!(sized_image_url(CDN, Some(200), None, None).ends_with("mug_200x.png"));
        assert!(sized_image_url(CDN, None, Some(90), None).ends_with("mug_x90.png"));
    }

    #[test]
    fn test_query_string_preserved() {
        let url = format!("{CDN}?v=1699");
        assert_eq!(
            sized_image_url(&url, Some(100), Some(100), Some(ImageCrop::Top)),
            "https://cdn.shopify.com/s/files/1/0001/products/mug_100x100_crop_top.png?v=1699"
        );
    }

    #[test]
    fn test_unchanged_cases() {
        assert_eq!(sized_image_url(CDN, None, None, None), CDN);
        let other = "https://images.example.com/mug.png";
        assert_eq!(sized_image_url(other, Some(10), Some(10), None), other);
        let no_ext = "https://cdn.shopify.com/s/files/1/products/mug";
        assert_eq!(sized_image_url(no_ext, Some(10), None, None), no_ext);
    }

    #[test]
    fn test_dot_in_directory_is_not_an_extension() {
        let url = "https://cdn.shopify.com/s/files/v1.2/products/mug";
        assert_eq!(sized_image_url(url, Some(10), None, None), url);
    }

    #[test]
    fn test_srcset() {
        let srcset = image_srcset(CDN, &[200, 400]);
        assert_eq!(
            srcset,
            "https://cdn.shopify.com/s/files/1/0001/products/mug_200x.png 200w, \
             https://cdn.shopify.com/s/files/1/0001/products/mug_400x.png 400w"
        );
    }
}
