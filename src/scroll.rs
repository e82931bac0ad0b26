//! Scroll-linked effect math.
//!
//! Intensity is how close a reference element's vertical center sits to the
//! viewport's vertical center: 1.0 when exactly centered, falling linearly
//! to 0.0 at half a viewport height of offset. The DOM binder applies the
//! derived scale/opacity and toggles a pulse class above a threshold.

/// Intensity above which the target element gets the pulse class.
pub const PULSE_THRESHOLD: f32 = 0.85;

/// CSS class toggled on the target element at high intensity.
pub const PULSE_CLASS: &str = "pulse";

/// Normalized closeness of `element_center_y` to the viewport center.
pub fn intensity(element_center_y: f32, viewport_height: f32) -> f32 {
    if viewport_height <= 0.0 {
        return 0.0;
    }

    let half = viewport_height / 2.0;
    let offset = (element_center_y - half).abs();
    (1.0 - offset / half).clamp(0.0, 1.0)
}

/// Style values derived from a scroll intensity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollEffect {
    pub scale: f32,
    pub opacity: f32,
    pub pulse: bool,
}

impl ScrollEffect {
    pub fn from_intensity(intensity: f32) -> Self {
        let intensity = intensity.clamp(0.0, 1.0);
        Self {
            scale: 0.92 + 0.08 * intensity,
            opacity: 0.4 + 0.6 * intensity,
            pulse: intensity >= PULSE_THRESHOLD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_element_is_full_intensity() {
        assert_eq!(intensity(400.0, 800.0), 1.0);
    }

    #[test]
    fn test_half_viewport_offset_clamps_to_zero() {
        // Element center a full half-viewport away from the viewport center.
        assert_eq!(intensity(0.0, 800.0), 0.0);
        assert_eq!(intensity(800.0, 800.0), 0.0);
        // And beyond.
        assert_eq!(intensity(-200.0, 800.0), 0.0);
        assert_eq!(intensity(1100.0, 800.0), 0.0);
    }

    #[test]
    fn test_intensity_is_linear_in_between() {
        // Quarter viewport off center -> 0.5.
        let v = intensity(600.0, 800.0);
        assert!((v - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_viewport_yields_zero() {
        assert_eq!(intensity(100.0, 0.0), 0.0);
    }

    #[test]
    fn test_pulse_only_above_threshold() {
        assert!(!ScrollEffect::from_intensity(PULSE_THRESHOLD - 0.01).pulse);
        assert!(ScrollEffect::from_intensity(PULSE_THRESHOLD).pulse);
        assert!(ScrollEffect::from_intensity(1.0).pulse);
    }

    #[test]
    fn test_effect_ranges() {
        let low = ScrollEffect::from_intensity(0.0);
        let high = ScrollEffect::from_intensity(1.0);

        assert!(low.scale < high.scale);
        assert!(low.opacity < high.opacity);
        assert_eq!(high.scale, 1.0);
        assert_eq!(high.opacity, 1.0);
    }
}
