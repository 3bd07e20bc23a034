//! Measurement negotiation between a widget and its host.

/// A host's requirement on one dimension of a widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeasureSpec {
    /// The widget gets exactly this size.
    Exactly(f32),
    /// The widget may be as large as it wants up to this size.
    AtMost(f32),
    /// No constraint.
    Unspecified,
}

impl MeasureSpec {
    /// Reconcile a desired size with this constraint.
    pub fn resolve(self, desired: f32) -> f32 {
        match self {
            MeasureSpec::Exactly(size) => size,
            MeasureSpec::AtMost(limit) => desired.min(limit),
            MeasureSpec::Unspecified => desired,
        }
    }
}

/// Width and height constraints for a measure pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraints {
    pub width: MeasureSpec,
    pub height: MeasureSpec,
}

impl Constraints {
    pub fn new(width: MeasureSpec, height: MeasureSpec) -> Self {
        Self { width, height }
    }

    pub fn exactly(width: f32, height: f32) -> Self {
        Self::new(MeasureSpec::Exactly(width), MeasureSpec::Exactly(height))
    }

    pub fn unspecified() -> Self {
        Self::new(MeasureSpec::Unspecified, MeasureSpec::Unspecified)
    }
}

/// A resolved widget size in device pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Space reserved inside a widget's bounds, in device pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Padding {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Padding {
    pub fn uniform(amount: f32) -> Self {
        Self {
            left: amount,
            top: amount,
            right: amount,
            bottom: amount,
        }
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

/// Resolve a widget's size from its suggested minimum (already in px) plus
/// padding.
pub fn resolve(constraints: Constraints, minimum: Size, padding: Padding) -> Size {
    Size {
        width: constraints.width.resolve(minimum.width.round() + padding.horizontal()),
        height: constraints.height.resolve(minimum.height.round() + padding.vertical()),
    }
}
