use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AnimationKind {
    None,
    #[default]
    FadeIn,
    SlideUp,
    SlideDown,
    SlideLeft,
    SlideRight,
    ZoomIn,
    ZoomOut,
    Pop,
    RotateIn,
    BounceIn,
    FlipInX,
    FlipInY,
    RubberBand,
    Swing,
    Wobble,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    Linear,
    EaseIn,
    #[default]
    EaseOut,
    EaseInOut,
    /// Overshooting back-out curve
    Spring,
}

/// Entrance animation of an element during presentation playback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Animation {
    pub kind: AnimationKind,
    /// Seconds
    pub duration: f32,
    /// Seconds
    pub delay: f32,
    /// Click step at which the element appears. `None` means with the slide.
    pub step: Option<u32>,
    pub easing: Easing,
    pub looped: bool,
}

impl Default for Animation {
    fn default() -> Self {
        Self {
            kind: AnimationKind::FadeIn,
            duration: 0.5,
            delay: 0.0,
            step: None,
            easing: Easing::EaseOut,
            looped: false,
        }
    }
}

impl Animation {
    pub fn on_step(kind: AnimationKind, step: u32) -> Self {
        Self {
            kind,
            step: Some(step),
            ..Self::default()
        }
    }

    /// Step that gates visibility, if any
    pub fn reveal_step(&self) -> Option<u32> {
        if self.kind == AnimationKind::None {
            None
        } else {
            self.step
        }
    }
}
