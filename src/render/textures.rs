use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use egui::{ColorImage, Context, TextureHandle, TextureOptions};
use log::{info, warn};

use crate::error::TextureError;
use crate::id_generator::ElementId;

/// Largest edge accepted for a decoded bitmap
const MAX_TEXTURE_SIDE: u32 = 8192;

/// Decodes encoded image bytes (PNG, JPEG, ...) into an egui image.
pub fn decode_image(bytes: &[u8]) -> Result<ColorImage, TextureError> {
    let image = image::load_from_memory(bytes)?;
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 || width > MAX_TEXTURE_SIDE || height > MAX_TEXTURE_SIDE {
        return Err(TextureError::InvalidDimensions { width, height });
    }
    let rgba = image.to_rgba8();
    let pixels = rgba.as_flat_samples();
    Ok(ColorImage::from_rgba_unmultiplied(
        [width as usize, height as usize],
        pixels.as_slice(),
    ))
}

fn content_hash(bytes: &[u8]) -> u64 {
    let mut hasher = DefaultHasher::new();
    bytes.hash(&mut hasher);
    hasher.finish()
}

enum Cached {
    Ready(TextureHandle),
    /// Decoding failed; remembered so the bytes are not decoded every frame
    Failed,
}

struct Entry {
    texture: Cached,
    last_used: u64,
}

/// Decoded image textures keyed by element and content.
///
/// Entries not used for `max_idle_frames` frames are evicted in
/// [`TextureCache::begin_frame`].
pub struct TextureCache {
    entries: HashMap<(ElementId, u64), Entry>,
    current_frame: u64,
    max_idle_frames: u64,
}

impl TextureCache {
    pub fn new(max_idle_frames: u64) -> Self {
        Self {
            entries: HashMap::new(),
            current_frame: 0,
            max_idle_frames,
        }
    }

    /// Advances the frame counter and drops idle textures. Call once per frame.
    pub fn begin_frame(&mut self) {
        self.current_frame += 1;
        let frame = self.current_frame;
        let max_idle = self.max_idle_frames;
        self.entries
            .retain(|_, entry| frame.saturating_sub(entry.last_used) <= max_idle);
    }

    /// Texture for an element's bitmap, decoding and uploading it on first use.
    /// Returns `None` if the bytes cannot be decoded.
    pub fn texture_for(&mut self, ctx: &Context, id: ElementId, bytes: &[u8]) -> Option<TextureHandle> {
        let key = (id, content_hash(bytes));
        let frame = self.current_frame;
        let entry = self.entries.entry(key).or_insert_with(|| {
            let texture = match decode_image(bytes) {
                Ok(image) => {
                    info!("Decoded image for {}: {}x{}", id, image.size[0], image.size[1]);
                    Cached::Ready(ctx.load_texture(format!("image_{}_{:x}", id, key.1), image, TextureOptions::LINEAR))
                }
                Err(err) => {
                    warn!("Could not decode image for {}: {}", id, err);
                    Cached::Failed
                }
            };
            Entry { texture, last_used: frame }
        });
        entry.last_used = frame;
        match &entry.texture {
            Cached::Ready(handle) => Some(handle.clone()),
            Cached::Failed => None,
        }
    }

    /// Drops every texture belonging to an element
    pub fn invalidate_element(&mut self, id: ElementId) {
        self.entries.retain(|(element, _), _| *element != id);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
