//! Copy and paste of elements as JSON text.

use egui::Vec2;
use log::info;

use crate::element::Element;
use crate::error::ClipboardError;

/// Serializes elements for the system clipboard.
pub fn copy(elements: &[Element]) -> Result<String, ClipboardError> {
    if elements.is_empty() {
        return Err(ClipboardError::Empty);
    }
    let text = serde_json::to_string(elements).map_err(ClipboardError::Serialize)?;
    info!("Copied {} element(s) to the clipboard", elements.len());
    Ok(text)
}

/// Parses clipboard text back into elements. Every pasted element gets a
/// fresh ID and is shifted by `offset`, so pasting twice never collides.
pub fn paste(text: &str, offset: Vec2) -> Result<Vec<Element>, ClipboardError> {
    let elements: Vec<Element> = serde_json::from_str(text).map_err(ClipboardError::Parse)?;
    if elements.is_empty() {
        return Err(ClipboardError::Empty);
    }
    Ok(elements.iter().map(|e| e.duplicate(offset)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ShapeKind;
    use egui::Pos2;

    #[test]
    fn paste_assigns_new_ids_and_offsets() {
        let a = Element::shape(ShapeKind::Star, Pos2::new(10.0, 10.0));
        let b = Element::text("hi", Pos2::new(50.0, 0.0));
        let text = copy(&[a.clone(), b.clone()]).unwrap();

        let pasted = paste(&text, Vec2::new(20.0, 20.0)).unwrap();
        assert_eq!(pasted.len(), 2);
        assert_ne!(pasted[0].id, a.id);
        assert_ne!(pasted[1].id, b.id);
        assert_eq!(pasted[0].rect().min, Pos2::new(30.0, 30.0));
        assert_eq!(pasted[1].kind, b.kind);
    }

    #[test]
    fn empty_and_foreign_text_are_rejected() {
        assert!(matches!(copy(&[]), Err(ClipboardError::Empty)));
        assert!(matches!(paste("[]", Vec2::ZERO), Err(ClipboardError::Empty)));
        assert!(matches!(paste("hello world", Vec2::ZERO), Err(ClipboardError::Parse(_))));
    }
}
