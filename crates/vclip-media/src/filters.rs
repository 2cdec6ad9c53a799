//! FFmpeg video filter definitions for orientation-based cropping.

use vclip_models::Orientation;

/// Portrait crop: scale up to fill a 1080x1920 frame, then center-crop the
/// overflow on whichever axis is larger. Equivalent to
/// `force_original_aspect_ratio=increase` followed by a centered crop.
pub const FILTER_PORTRAIT: &str = concat!(
    "scale=1080:1920:force_original_aspect_ratio=increase,",
    "crop=1080:1920"
);

/// Landscape crop: scale up to fill a 1920x1080 frame, then center-crop.
pub const FILTER_LANDSCAPE: &str = concat!(
    "scale=1920:1080:force_original_aspect_ratio=increase,",
    "crop=1920:1080"
);

/// Build the video filter chain for the requested output orientation.
pub fn build_orientation_filter(orientation: Orientation) -> &'static str {
    match orientation {
        Orientation::Portrait => FILTER_PORTRAIT,
        Orientation::Landscape => FILTER_LANDSCAPE,
    }
}

/// Filter for thumbnail generation at a fixed width, preserving aspect ratio.
pub fn filter_thumbnail(width: u32) -> String {
    format!("scale={width}:-2")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn portrait_filter_crops_to_1080x1920() {
        let filter = build_orientation_filter(Orientation::Portrait);
        assert!(filter.contains("crop=1080:1920"));
    }

    #[test]
    fn landscape_filter_crops_to_1920x1080() {
        let filter = build_orientation_filter(Orientation::Landscape);
        assert!(filter.contains("crop=1920:1080"));
    }
}
