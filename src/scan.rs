//! Scan-reveal sweep state.
//!
//! While scanning, a threshold coordinate climbs the mesh's vertical axis a
//! fixed amount per rendered frame; the shader hides points above it and
//! tints points inside a narrow band around it. The transition to `Complete`
//! happens exactly once and never reverts.

use crate::mesh::BoundingBox;

/// Vertical units the sweep climbs per rendered frame.
pub const SWEEP_SPEED: f32 = 0.035;

/// Extra sweep distance past the bounds so the glow band clears the mesh.
pub const SWEEP_MARGIN: f32 = 0.25;

/// Half-height of the glow band around the sweep coordinate.
pub const GLOW_BAND: f32 = 0.12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    Scanning,
    Complete,
}

/// Per-frame sweep record. Mutated only by the render loop.
#[derive(Debug, Clone, Copy)]
pub struct ScanState {
    pub phase: ScanPhase,
    pub current: f32,
    pub speed: f32,
    pub target: f32,
}

impl ScanState {
    /// Start a sweep from below the bounds to above them.
    pub fn for_bounds(bounds: &BoundingBox) -> Self {
        Self {
            phase: ScanPhase::Scanning,
            current: bounds.min[1] - SWEEP_MARGIN,
            speed: SWEEP_SPEED,
            target: bounds.max[1] + SWEEP_MARGIN,
        }
    }

    /// Advance one frame. Returns true on the frame the sweep completes.
    pub fn advance(&mut self) -> bool {
        if self.phase == ScanPhase::Complete {
            return false;
        }

        self.current += self.speed;
        if self.current > self.target {
            self.current = self.target;
            self.phase = ScanPhase::Complete;
            return true;
        }

        false
    }

    pub fn is_complete(&self) -> bool {
        self.phase == ScanPhase::Complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_bounds() -> BoundingBox {
        BoundingBox {
            min: [-1.0, -1.0, -1.0],
            max: [1.0, 1.0, 1.0],
        }
    }

    #[test]
    fn test_sweep_starts_below_bounds() {
        let scan = ScanState::for_bounds(&unit_bounds());
        assert_eq!(scan.phase, ScanPhase::Scanning);
        assert!(scan.current < -1.0);
        assert!(scan.target > 1.0);
    }

    #[test]
    fn test_completes_exactly_once() {
        let mut scan = ScanState::for_bounds(&unit_bounds());

        let mut completions = 0;
        for _ in 0..10_000 {
            if scan.advance() {
                completions += 1;
            }
        }

        assert_eq!(completions, 1);
        assert!(scan.is_complete());
        assert_eq!(scan.current, scan.target);
    }

    #[test]
    fn test_never_reverts_after_complete() {
        let mut scan = ScanState::for_bounds(&unit_bounds());
        while !scan.advance() {}

        let settled = scan.current;
        for _ in 0..100 {
            assert!(!scan.advance());
            assert_eq!(scan.phase, ScanPhase::Complete);
            assert_eq!(scan.current, settled);
        }
    }

    #[test]
    fn test_transition_requires_passing_target() {
        let mut scan = ScanState::for_bounds(&unit_bounds());

        while scan.current + scan.speed <= scan.target {
            assert!(!scan.advance());
            assert_eq!(scan.phase, ScanPhase::Scanning);
        }
        assert!(scan.advance());
    }
}
