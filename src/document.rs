use egui::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::DocumentError;
use crate::slide::Slide;

/// A deck of slides sharing one logical slide size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub width: f32,
    pub height: f32,
    slides: Vec<Slide>,
    current: usize,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(960.0, 540.0)
    }
}

impl Document {
    /// Creates a document with one empty slide.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            slides: vec![Slide::new()],
            current: 0,
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_slide(&self) -> &Slide {
        &self.slides[self.current]
    }

    pub fn current_slide_mut(&mut self) -> &mut Slide {
        &mut self.slides[self.current]
    }

    pub fn select_slide(&mut self, index: usize) -> Result<(), DocumentError> {
        if index >= self.slides.len() {
            return Err(DocumentError::SlideNotFound(index));
        }
        self.current = index;
        Ok(())
    }

    /// Inserts an empty slide after the current one and makes it current.
    pub fn add_slide(&mut self) -> usize {
        let index = self.current + 1;
        self.slides.insert(index, Slide::new());
        self.current = index;
        index
    }

    /// Deletes a slide. The last remaining slide cannot be deleted.
    pub fn delete_slide(&mut self, index: usize) -> Result<Slide, DocumentError> {
        if index >= self.slides.len() {
            return Err(DocumentError::SlideNotFound(index));
        }
        if self.slides.len() == 1 {
            return Err(DocumentError::LastSlide);
        }
        let removed = self.slides.remove(index);
        if self.current >= self.slides.len() || self.current > index {
            self.current = self.current.saturating_sub(1);
        }
        Ok(removed)
    }

    /// Replaces every slide at once, as when restoring an undo snapshot.
    /// An empty list is replaced by a single empty slide.
    pub fn replace_slides(&mut self, slides: Vec<Slide>) {
        self.slides = if slides.is_empty() { vec![Slide::new()] } else { slides };
        self.current = self.current.min(self.slides.len() - 1);
    }
}
