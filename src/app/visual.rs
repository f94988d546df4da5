use bevy::prelude::*;

/// Rendered position of one bubble, interpolated toward the latest logic result.
///
/// The per-step delta is fixed when a logic tick retargets the track and is not
/// recomputed on UI ticks, so a UI tick never samples a half-finished logic pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualTrack {
    position: Vec2,
    target: Vec2,
    step: Vec2,
    remaining: u32,
}

impl VisualTrack {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            target: position,
            step: Vec2::ZERO,
            remaining: 0,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn is_settled(&self) -> bool {
        self.remaining == 0 && self.position == self.target
    }

    /// Cover the distance to `target` in `steps` UI ticks.
    pub fn retarget(&mut self, target: Vec2, steps: u32) {
        let steps = steps.max(1);
        self.target = target;
        if target == self.position {
            self.step = Vec2::ZERO;
            self.remaining = 0;
        } else {
            self.step = (target - self.position) / steps as f32;
            self.remaining = steps;
        }
    }

    /// Jump straight to `position`, dropping any interpolation in flight.
    pub fn snap(&mut self, position: Vec2) {
        *self = Self::at(position);
    }

    /// One UI tick. The last step lands exactly on the target.
    pub fn advance(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        if self.remaining == 0 {
            self.position = self.target;
        } else {
            self.position += self.step;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reaches_target_in_fixed_steps() {
        let mut v = VisualTrack::at(Vec2::ZERO);
        v.retarget(Vec2::new(30.0, -9.0), 3);
        assert!(v.advance());
        assert_eq!(v.position(), Vec2::new(10.0, -3.0));
        assert!(v.advance());
        assert!(v.advance());
        assert_eq!(v.position(), Vec2::new(30.0, -9.0));
        assert!(v.is_settled());
        assert!(!v.advance());
    }

    #[test]
    fn retarget_midway_restarts_from_current_visual() {
        let mut v = VisualTrack::at(Vec2::ZERO);
        v.retarget(Vec2::new(30.0, 0.0), 3);
        v.advance();
        v.retarget(Vec2::new(40.0, 0.0), 3);
        v.advance();
        assert_eq!(v.position(), Vec2::new(20.0, 0.0));
    }

    #[test]
    fn zero_steps_behaves_like_one() {
        let mut v = VisualTrack::at(Vec2::ZERO);
        v.retarget(Vec2::ONE, 0);
        v.advance();
        assert_eq!(v.position(), Vec2::ONE);
    }
}
