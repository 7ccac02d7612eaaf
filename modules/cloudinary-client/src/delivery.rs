// Delivery URL construction for transformed image renditions.
//
// Pure string assembly: no I/O, no validation. Unrecognized option values
// pass through as literal URL segments and the CDN rejects them, not us.

const DELIVERY_BASE: &str = "https://res.cloudinary.com";

/// Overlay segment appended when a watermark is requested. A single fixed
/// segment, always placed after the primary transformation, so URLs for
/// identical inputs stay byte-identical and safe to deduplicate by string.
const WATERMARK_SEGMENT: &str = "l_site_watermark,o_35,fl_relative,w_0.9";

/// Transformation options for a delivery URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOptions {
    pub width: u32,
    pub height: u32,
    /// Crop mode, e.g. `fill`, `fit`, `scale`.
    pub crop: String,
    /// Quality directive, e.g. `auto`, `80`.
    pub quality: String,
    /// Output format directive, e.g. `auto`, `webp`.
    pub format: String,
    pub watermark: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            crop: "fill".to_string(),
            quality: "auto".to_string(),
            format: "auto".to_string(),
            watermark: false,
        }
    }
}

/// Build the fully qualified delivery URL for one asset rendition.
pub fn format_delivery_url(cloud_name: &str, public_id: &str, opts: &TransformOptions) -> String {
    let mut url = format!(
        "{DELIVERY_BASE}/{cloud_name}/image/upload/w_{},h_{},c_{},q_{},f_{}",
        opts.width, opts.height, opts.crop, opts.quality, opts.format
    );
    if opts.watermark {
        url.push('/');
        url.push_str(WATERMARK_SEGMENT);
    }
    url.push('/');
    url.push_str(public_id);
    url
}
