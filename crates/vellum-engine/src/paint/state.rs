use crate::coords::Transform;

use super::UpdateFlag;

/// Node-local state shared by every built-in paint.
///
/// Setters record what changed in a pending flag; [`PaintState::compose`]
/// hands those bits to the next update and resets them.
#[derive(Debug, Clone)]
pub struct PaintState {
    transform: Option<Transform>,
    opacity: u8,
    pending: UpdateFlag,
}

/// Effective values for one update pass, after merging a node with its parent.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Composed {
    pub transform: Transform,
    pub opacity: u8,
    pub flag: UpdateFlag,
}

impl PaintState {
    /// Fresh state: identity transform, fully opaque, everything pending.
    pub fn new() -> Self {
        Self {
            transform: None,
            opacity: 255,
            pending: UpdateFlag::all(),
        }
    }

    #[inline]
    pub fn transform(&self) -> Transform {
        self.transform.unwrap_or_default()
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = Some(transform);
        self.pending |= UpdateFlag::TRANSFORM;
    }

    #[inline]
    pub fn opacity(&self) -> u8 {
        self.opacity
    }

    pub fn set_opacity(&mut self, opacity: u8) {
        if opacity != self.opacity {
            self.opacity = opacity;
            self.pending |= UpdateFlag::COLOR;
        }
    }

    #[inline]
    pub fn mark(&mut self, flag: UpdateFlag) {
        self.pending |= flag;
    }

    #[inline]
    pub fn pending(&self) -> UpdateFlag {
        self.pending
    }

    /// Merges the parent context into this node and consumes the pending bits.
    ///
    /// The local transform is applied before the parent's.
    pub fn compose(
        &mut self,
        parent: Option<&Transform>,
        opacity: u8,
        flag: UpdateFlag,
    ) -> Composed {
        let transform = match (self.transform, parent) {
            (Some(local), Some(parent)) => local.then(*parent),
            (Some(local), None) => local,
            (None, Some(parent)) => *parent,
            (None, None) => Transform::IDENTITY,
        };

        Composed {
            transform,
            opacity: multiply_opacity(self.opacity, opacity),
            flag: flag | std::mem::replace(&mut self.pending, UpdateFlag::empty()),
        }
    }
}

impl Default for PaintState {
    fn default() -> Self {
        Self::new()
    }
}

/// 8-bit opacity product, exact at 0 and 255.
#[inline]
pub(crate) fn multiply_opacity(a: u8, b: u8) -> u8 {
    ((a as u16 * b as u16 + 0xff) >> 8) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;

    #[test]
    fn new_state_is_fully_pending() {
        assert_eq!(PaintState::new().pending(), UpdateFlag::all());
    }

    #[test]
    fn compose_consumes_pending_bits() {
        let mut state = PaintState::new();
        let first = state.compose(None, 255, UpdateFlag::empty());
        assert_eq!(first.flag, UpdateFlag::all());

        let second = state.compose(None, 255, UpdateFlag::empty());
        assert!(second.flag.is_empty());

        state.set_opacity(10);
        let third = state.compose(None, 255, UpdateFlag::empty());
        assert_eq!(third.flag, UpdateFlag::COLOR);
    }

    #[test]
    fn same_opacity_is_not_a_change() {
        let mut state = PaintState::new();
        state.compose(None, 255, UpdateFlag::empty());
        state.set_opacity(255);
        assert!(state.pending().is_empty());
    }

    #[test]
    fn compose_applies_local_then_parent() {
        let mut state = PaintState::new();
        state.set_transform(Transform::scale(2.0, 2.0));
        let parent = Transform::translate(5.0, 0.0);

        let c = state.compose(Some(&parent), 255, UpdateFlag::empty());
        assert_eq!(c.transform.apply(Vec2::new(1.0, 1.0)), Vec2::new(7.0, 2.0));
        assert!(c.flag.contains(UpdateFlag::TRANSFORM));
    }

    #[test]
    fn opacity_product() {
        assert_eq!(multiply_opacity(255, 255), 255);
        assert_eq!(multiply_opacity(0, 255), 0);
        assert_eq!(multiply_opacity(128, 255), 128);
        assert_eq!(multiply_opacity(128, 128), 64);
    }
}
