use crate::slide::Slide;

/// Step counter for playing back a slide's entrance animations.
///
/// Step 0 shows every element without an entrance step; each
/// [`Presentation::advance`] reveals the elements of the next step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Presentation {
    pub current_step: u32,
    pub max_step: u32,
}

impl Presentation {
    pub fn for_slide(slide: &Slide) -> Self {
        Self {
            current_step: 0,
            max_step: slide.max_step(),
        }
    }

    /// Moves to the next step. Returns `false` once every step is shown,
    /// which the shell takes as "go to the next slide".
    pub fn advance(&mut self) -> bool {
        if self.current_step < self.max_step {
            self.current_step += 1;
            true
        } else {
            false
        }
    }

    /// Moves one step back. Returns `false` at the first step.
    pub fn retreat(&mut self) -> bool {
        if self.current_step > 0 {
            self.current_step -= 1;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.current_step = 0;
    }

    pub fn is_complete(&self) -> bool {
        self.current_step >= self.max_step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Animation, AnimationKind, Element};
    use egui::Pos2;

    #[test]
    fn steps_through_reveals() {
        let mut slide = Slide::default();
        slide.add_element(Element::text("a", Pos2::ZERO).with_animation(Some(Animation::on_step(AnimationKind::FadeIn, 1))));
        slide.add_element(Element::text("b", Pos2::ZERO).with_animation(Some(Animation::on_step(AnimationKind::SlideLeft, 3))));

        let mut presentation = Presentation::for_slide(&slide);
        assert_eq!(presentation.max_step, 3);
        assert!(!presentation.retreat());
        assert!(presentation.advance());
        assert!(presentation.advance());
        assert!(presentation.advance());
        assert!(presentation.is_complete());
        assert!(!presentation.advance());
        assert_eq!(presentation.current_step, 3);

        presentation.reset();
        assert_eq!(presentation.current_step, 0);
    }
}
