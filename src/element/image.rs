use serde::{Deserialize, Serialize};

/// Where an image element gets its pixels from
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ImageSource {
    /// Empty frame waiting for content
    #[default]
    Placeholder,
    Url(String),
    /// Encoded image bytes (PNG, JPEG, ...)
    Bitmap(Vec<u8>),
}

// Bitmaps can be large, so Debug prints their length only
impl std::fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageSource::Placeholder => f.write_str("Placeholder"),
            ImageSource::Url(url) => f.debug_tuple("Url").field(url).finish(),
            ImageSource::Bitmap(data) => f
                .debug_struct("Bitmap")
                .field("data_len", &data.len())
                .finish(),
        }
    }
}

impl ImageSource {
    pub fn is_placeholder(&self) -> bool {
        match self {
            ImageSource::Placeholder => true,
            ImageSource::Url(url) => url.trim().is_empty(),
            ImageSource::Bitmap(data) => data.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sources_count_as_placeholder() {
        assert!(ImageSource::Placeholder.is_placeholder());
        assert!(ImageSource::Url("  ".into()).is_placeholder());
        assert!(ImageSource::Bitmap(Vec::new()).is_placeholder());
        assert!(!ImageSource::Url("https://example.com/a.png".into()).is_placeholder());
    }

    #[test]
    fn debug_hides_bitmap_bytes() {
        let s = format!("{:?}", ImageSource::Bitmap(vec![0; 1024]));
        assert_eq!(s, "Bitmap { data_len: 1024 }");
    }
}
