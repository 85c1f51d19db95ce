use log::{info, warn};

/// Encoded image bytes from a file dropped onto the window
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedImage {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Collects image files dropped onto the window.
#[derive(Default)]
pub struct FileHandler {
    processed_files: Vec<String>,
}

fn display_name(file: &egui::DroppedFile) -> String {
    if let Some(path) = &file.path {
        path.display().to_string()
    } else if !file.name.is_empty() {
        file.name.clone()
    } else {
        "unknown".to_owned()
    }
}

/// Check if a file is an image based on MIME type or extension
pub fn is_image_file(file: &egui::DroppedFile) -> bool {
    if !file.mime.is_empty() {
        return file.mime.starts_with("image/");
    }
    let name = file
        .path
        .as_ref()
        .and_then(|p| p.extension())
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .or_else(|| file.name.rsplit_once('.').map(|(_, ext)| ext.to_lowercase()));
    matches!(name.as_deref(), Some("png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp"))
}

fn read_bytes(file: &egui::DroppedFile, name: &str) -> Option<Vec<u8>> {
    if let Some(bytes) = &file.bytes {
        return Some(bytes.to_vec());
    }
    #[cfg(not(target_arch = "wasm32"))]
    if let Some(path) = &file.path {
        return match std::fs::read(path) {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                warn!("Failed to read image file {}: {}", name, err);
                None
            }
        };
    }
    warn!("Dropped file has no accessible data: {}", name);
    None
}

impl FileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Images dropped this frame. The same file dropped twice in a row is
    /// only reported once.
    pub fn take_dropped_images(&mut self, ctx: &egui::Context) -> Vec<DroppedImage> {
        let files = ctx.input(|i| i.raw.dropped_files.clone());
        if files.is_empty() {
            self.processed_files.clear();
            return Vec::new();
        }
        self.images_from(&files)
    }

    fn images_from(&mut self, files: &[egui::DroppedFile]) -> Vec<DroppedImage> {
        let mut images = Vec::new();
        for file in files {
            let name = display_name(file);
            if self.processed_files.contains(&name) {
                continue;
            }
            self.processed_files.push(name.clone());
            if !is_image_file(file) {
                warn!("Dropped file is not a supported type: {}", name);
                continue;
            }
            if let Some(bytes) = read_bytes(file, &name) {
                info!("Dropped image {} ({} bytes)", name, bytes.len());
                images.push(DroppedImage { name, bytes });
            }
        }
        images
    }
}
