//! Pointer (cursor/touch) state.
//!
//! The simulation only ever reads this. Pointer-move and pointer-leave events
//! write it. When the pointer is absent the position is parked far outside
//! any surface so that distance checks never fire by accident.

use glam::Vec2;

/// Most recent known pointer location in surface-local pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    position: Vec2,
}

impl PointerState {
    /// Sentinel position used while no pointer is over the surface.
    pub const FAR_AWAY: Vec2 = Vec2::new(-1.0e6, -1.0e6);

    /// A pointer that has never been seen.
    pub const fn absent() -> Self {
        Self {
            position: Self::FAR_AWAY,
        }
    }

    /// Record a pointer move. Non-finite coordinates count as leaving.
    pub fn move_to(&mut self, position: Vec2) {
        self.position = if position.is_finite() {
            position
        } else {
            Self::FAR_AWAY
        };
    }

    /// Record the pointer leaving the surface.
    pub fn leave(&mut self) {
        self.position = Self::FAR_AWAY;
    }

    /// The pointer position, or `None` while parked at the sentinel.
    pub fn position(&self) -> Option<Vec2> {
        (self.position != Self::FAR_AWAY).then_some(self.position)
    }

    /// Raw position including the sentinel.
    #[inline]
    pub fn raw(&self) -> Vec2 {
        self.position
    }
}

impl Default for PointerState {
    fn default() -> Self {
        Self::absent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_absent() {
        let pointer = PointerState::default();
        assert_eq!(pointer.position(), None);
        assert_eq!(pointer.raw(), PointerState::FAR_AWAY);
    }

    #[test]
    fn test_move_and_leave() {
        let mut pointer = PointerState::absent();
        pointer.move_to(Vec2::new(12.0, 34.0));
        assert_eq!(pointer.position(), Some(Vec2::new(12.0, 34.0)));

        pointer.leave();
        assert_eq!(pointer.position(), None);
    }

    #[test]
    fn test_nan_move_is_a_leave() {
        let mut pointer = PointerState::absent();
        pointer.move_to(Vec2::new(5.0, 5.0));
        pointer.move_to(Vec2::new(f32::NAN, 1.0));
        assert_eq!(pointer.position(), None);
    }
}
