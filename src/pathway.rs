//! Decorative connector pathways between fixed anchor points.
//!
//! Anchors are named coordinates on the mesh surface. Each pathway is a
//! read-only descriptor (two anchors, a playback delay, a duration); its
//! on-screen opacity is derived every frame from a repeating cycle clock, so
//! the lines fade in and out on a stagger once the scan completes. Anchor
//! markers pulse on their own phase-offset clock.

use glam::Vec3;

/// Length of the repeating pathway cycle, in seconds.
pub const CYCLE_SECS: f32 = 6.0;

/// Marker pulse period, in seconds.
pub const PULSE_SECS: f32 = 2.4;

/// Peak line opacity during the hold portion of the window.
pub const PEAK_OPACITY: f32 = 0.85;

/// Fraction of a pathway's window spent fading in (and again fading out).
const FADE_FRACTION: f32 = 0.25;

/// Segments per connector polyline.
pub const CURVE_SEGMENTS: usize = 24;

/// How far the curve midpoint is pushed away from the mesh center.
const CURVE_LIFT: f32 = 0.45;

/// A named anchor coordinate used as a pathway endpoint.
#[derive(Debug, Clone, Copy)]
pub struct Anchor {
    pub name: &'static str,
    pub position: [f32; 3],
}

/// Fixed anchor table, roughly placed on major cortical regions of a
/// unit-scaled brain mesh.
pub const ANCHORS: &[Anchor] = &[
    Anchor {
        name: "prefrontal",
        position: [0.0, 0.55, 0.95],
    },
    Anchor {
        name: "motor",
        position: [0.0, 0.95, 0.1],
    },
    Anchor {
        name: "parietal",
        position: [0.0, 0.8, -0.6],
    },
    Anchor {
        name: "occipital",
        position: [0.0, 0.3, -1.0],
    },
    Anchor {
        name: "temporal_left",
        position: [-0.85, 0.05, 0.15],
    },
    Anchor {
        name: "temporal_right",
        position: [0.85, 0.05, 0.15],
    },
];

/// A read-only connector descriptor between two anchors.
#[derive(Debug, Clone, Copy)]
pub struct Pathway {
    pub from: &'static str,
    pub to: &'static str,
    /// Offset into the cycle before this pathway starts fading in.
    pub delay: f32,
    /// How long the pathway stays visible within the cycle.
    pub duration: f32,
}

/// Fixed pathway set. Delays are staggered across the cycle.
pub const PATHWAYS: &[Pathway] = &[
    Pathway {
        from: "prefrontal",
        to: "motor",
        delay: 0.0,
        duration: 2.2,
    },
    Pathway {
        from: "motor",
        to: "parietal",
        delay: 0.8,
        duration: 2.2,
    },
    Pathway {
        from: "parietal",
        to: "occipital",
        delay: 1.6,
        duration: 2.2,
    },
    Pathway {
        from: "temporal_left",
        to: "prefrontal",
        delay: 2.6,
        duration: 2.4,
    },
    Pathway {
        from: "temporal_right",
        to: "prefrontal",
        delay: 3.4,
        duration: 2.4,
    },
    Pathway {
        from: "temporal_left",
        to: "temporal_right",
        delay: 4.2,
        duration: 1.8,
    },
];

/// Look up an anchor by name.
pub fn anchor(name: &str) -> Option<&'static Anchor> {
    ANCHORS.iter().find(|a| a.name == name)
}

impl Pathway {
    /// Opacity for a cycle-relative time in `[0, CYCLE_SECS)`.
    ///
    /// Zero outside the pathway's window; ramps to `PEAK_OPACITY` over the
    /// first quarter of the window and back down over the last quarter.
    pub fn opacity_at(&self, cycle_time: f32) -> f32 {
        let local = cycle_time - self.delay;
        if local < 0.0 || local > self.duration {
            return 0.0;
        }

        let fade = self.duration * FADE_FRACTION;
        let ramp = if local < fade {
            local / fade
        } else if local > self.duration - fade {
            (self.duration - local) / fade
        } else {
            1.0
        };

        ramp.clamp(0.0, 1.0) * PEAK_OPACITY
    }

    /// Sample the connector curve as a polyline of `segments + 1` points.
    ///
    /// The curve is a quadratic bend: the midpoint between the anchors is
    /// pushed outward so lines arc over the mesh surface instead of cutting
    /// through it.
    pub fn polyline(&self, segments: usize) -> Vec<[f32; 3]> {
        let from = anchor(self.from).map(|a| Vec3::from(a.position));
        let to = anchor(self.to).map(|a| Vec3::from(a.position));
        let (Some(p0), Some(p2)) = (from, to) else {
            return Vec::new();
        };

        let mid = (p0 + p2) * 0.5;
        let control = mid + mid.normalize_or_zero() * CURVE_LIFT;

        let mut points = Vec::with_capacity(segments + 1);
        for i in 0..=segments {
            let t = i as f32 / segments as f32;
            let inv = 1.0 - t;
            let p = p0 * (inv * inv) + control * (2.0 * inv * t) + p2 * (t * t);
            points.push(p.to_array());
        }

        points
    }
}

/// Pulse value in `[0, 1]` for the marker at `anchor_index`.
///
/// Markers share a period but are phase-offset so they do not blink in
/// unison.
pub fn marker_pulse(time: f32, anchor_index: usize) -> f32 {
    let phase = anchor_index as f32 * 0.9;
    let omega = 2.0 * std::f32::consts::PI / PULSE_SECS;
    0.5 + 0.5 * (time * omega + phase).sin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_pathway_anchors_resolve() {
        for p in PATHWAYS {
            assert!(anchor(p.from).is_some(), "missing anchor {}", p.from);
            assert!(anchor(p.to).is_some(), "missing anchor {}", p.to);
        }
    }

    #[test]
    fn test_pathway_windows_fit_cycle() {
        for p in PATHWAYS {
            assert!(p.delay + p.duration <= CYCLE_SECS);
        }
    }

    #[test]
    fn test_opacity_zero_outside_window() {
        let p = &PATHWAYS[1]; // delay 0.8, duration 2.2
        assert_eq!(p.opacity_at(0.0), 0.0);
        assert_eq!(p.opacity_at(0.79), 0.0);
        assert_eq!(p.opacity_at(p.delay + p.duration + 0.01), 0.0);
    }

    #[test]
    fn test_opacity_peaks_mid_window() {
        let p = &PATHWAYS[0];
        let mid = p.delay + p.duration * 0.5;
        assert!((p.opacity_at(mid) - PEAK_OPACITY).abs() < 1e-6);
    }

    #[test]
    fn test_opacity_ramps_in_and_out() {
        let p = &PATHWAYS[0];
        let fade = p.duration * 0.25;

        let early = p.opacity_at(p.delay + fade * 0.5);
        assert!(early > 0.0 && early < PEAK_OPACITY);

        let late = p.opacity_at(p.delay + p.duration - fade * 0.5);
        assert!(late > 0.0 && late < PEAK_OPACITY);
    }

    #[test]
    fn test_polyline_spans_anchors() {
        let p = &PATHWAYS[0];
        let points = p.polyline(CURVE_SEGMENTS);
        assert_eq!(points.len(), CURVE_SEGMENTS + 1);

        let from = anchor(p.from).unwrap().position;
        let to = anchor(p.to).unwrap().position;
        assert_eq!(points[0], from);
        let last = points[points.len() - 1];
        for i in 0..3 {
            assert!((last[i] - to[i]).abs() < 1e-5);
        }
    }

    #[test]
    fn test_marker_pulse_in_unit_range() {
        for i in 0..ANCHORS.len() {
            for step in 0..100 {
                let v = marker_pulse(step as f32 * 0.1, i);
                assert!((0.0..=1.0).contains(&v));
            }
        }
    }
}
