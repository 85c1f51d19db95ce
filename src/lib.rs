#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod canvas;
pub mod clipboard;
pub mod config;
pub mod document;
pub mod element;
pub mod error;
pub mod file_handler;
pub mod gesture;
pub mod history;
pub mod id_generator;
pub mod input;
pub mod inspector;
pub mod presentation;
pub mod render;
pub mod selection;
pub mod slide;
pub mod snap;
pub mod surface;

pub use app::SlideEditorApp;
pub use canvas::{CanvasController, CanvasHost, ContextTarget};
pub use config::CanvasConfig;
pub use document::Document;
pub use element::{EditTarget, Element, ElementKind, ElementUpdate, Geometry};
pub use error::{ClipboardError, DocumentError, HistoryError, PathError, TextureError};
pub use gesture::GestureState;
pub use history::SnapshotHistory;
pub use id_generator::ElementId;
pub use input::{InputEvent, InputLocation};
pub use selection::{SelectRequest, Selection};
pub use slide::Slide;
pub use surface::{PointerSource, ViewportTransform};
