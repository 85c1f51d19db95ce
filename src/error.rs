use thiserror::Error;

/// Errors from the undo/redo history
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("Nothing to undo")]
    NothingToUndo,
    #[error("Nothing to redo")]
    NothingToRedo,
}

/// Errors produced while parsing a serialized path descriptor
#[derive(Debug, Error, PartialEq)]
pub enum PathError {
    #[error("Unexpected path command '{0}'")]
    UnexpectedCommand(char),
    #[error("Path command '{command}' expects {expected} numbers")]
    MissingNumber { command: char, expected: usize },
    #[error("Invalid number in path data: {0}")]
    InvalidNumber(String),
    #[error("Path data must start with a move command")]
    MissingMoveTo,
}

/// Errors from copying elements to and pasting them from the clipboard
#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("Failed to serialize elements: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("Clipboard text is not a list of elements: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("Nothing to copy")]
    Empty,
}

/// Errors that can occur while turning image bytes into a texture
#[derive(Debug, Error)]
pub enum TextureError {
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Invalid texture dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Errors from slide-level document operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("No slide at index {0}")]
    SlideNotFound(usize),
    #[error("A document must keep at least one slide")]
    LastSlide,
}
