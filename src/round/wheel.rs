//! Letter wheel geometry
//!
//! Angles are in degrees, measured clockwise from the pointer at the top of
//! the wheel. The wheel's rotation accumulates across spins; only the
//! normalized value matters for which letter sits under the pointer.

use crate::consts::*;
use crate::{center_angle_for_index, normalize_angle};

/// Radius of the letter ring for a wheel of the given diameter
#[inline]
pub fn compute_letter_radius(wheel_diameter_px: f64) -> u32 {
    compute_letter_radius_with_min(wheel_diameter_px, MIN_LETTER_RADIUS)
}

/// Radius of the letter ring, never below `min_radius`
pub fn compute_letter_radius_with_min(wheel_diameter_px: f64, min_radius: u32) -> u32 {
    let scaled = (wheel_diameter_px * LETTER_RING_FACTOR).round();
    scaled.max(min_radius as f64) as u32
}

/// Inputs for a spin target computation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinRequest {
    /// Absolute rotation the wheel starts from
    pub current_rotation: f64,
    /// Sector that must end up under the pointer
    pub target_index: usize,
    /// Full revolutions before settling
    pub extra_spins: u32,
}

/// Absolute rotation that lands `target_index` under the pointer after
/// `extra_spins` full turns plus the shortest forward delta
pub fn compute_spin_target_rotation(request: SpinRequest) -> f64 {
    let target_center = center_angle_for_index(request.target_index);
    let desired = normalize_angle(360.0 - target_center);
    let mut delta = normalize_angle(desired - request.current_rotation);
    // Float noise just below a full turn means the sector is already aligned
    if 360.0 - delta < 1e-9 {
        delta = 0.0;
    }
    request.current_rotation + request.extra_spins as f64 * 360.0 + delta
}

/// Pick an index in [0, max) from a uniform source in [0, 1)
pub fn random_index(max: usize, mut rng: impl FnMut() -> f64) -> usize {
    let index = (rng() * max as f64).floor() as usize;
    // A source returning 1.0 - ε can round to max for large max
    index.min(max.saturating_sub(1))
}

/// Letter bound to a sector
#[inline]
pub fn letter_at(index: usize) -> char {
    LETTERS[index % SECTOR_COUNT]
}

/// Cubic bezier timing curve (CSS `cubic-bezier()` semantics)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Spin deceleration: fast start, long settle
pub const SPIN_EASING: CubicBezier = CubicBezier::new(0.16, 0.86, 0.14, 1.0);

impl CubicBezier {
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    fn sample(t: f64, p1: f64, p2: f64) -> f64 {
        // B(t) with P0 = 0, P3 = 1
        let u = 1.0 - t;
        3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t
    }

    fn sample_derivative(t: f64, p1: f64, p2: f64) -> f64 {
        let u = 1.0 - t;
        3.0 * u * u * p1 + 6.0 * u * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
    }

    /// Curve parameter t whose x equals `x`
    fn solve_t(&self, x: f64) -> f64 {
        let mut t = x;
        for _ in 0..8 {
            let err = Self::sample(t, self.x1, self.x2) - x;
            if err.abs() < 1e-7 {
                return t;
            }
            let d = Self::sample_derivative(t, self.x1, self.x2);
            if d.abs() < 1e-6 {
                break;
            }
            t -= err / d;
        }

        // Newton stalled, fall back to bisection
        let (mut lo, mut hi) = (0.0, 1.0);
        t = x;
        for _ in 0..64 {
            let value = Self::sample(t, self.x1, self.x2);
            if (value - x).abs() < 1e-7 {
                break;
            }
            if value < x {
                lo = t;
            } else {
                hi = t;
            }
            t = (lo + hi) / 2.0;
        }
        t
    }

    /// Eased progress for linear progress `x` in [0, 1]
    pub fn ease(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        Self::sample(self.solve_t(x), self.y1, self.y2)
    }

    /// CSS timing function string
    pub fn css(&self) -> String {
        format!(
            "cubic-bezier({}, {}, {}, {})",
            self.x1, self.y1, self.x2, self.y2
        )
    }
}

/// Rotation (degrees, normalized) encoded in a computed CSS `transform` value.
///
/// `none` or an empty value means no rotation. Returns `None` for anything
/// that isn't a `matrix()`/`matrix3d()` value.
pub fn parse_css_rotation(transform: &str) -> Option<f64> {
    let transform = transform.trim();
    if transform.is_empty() || transform == "none" {
        return Some(0.0);
    }

    let (name, rest) = transform.split_once('(')?;
    let body = rest.strip_suffix(')')?;
    let values = body
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .ok()?;

    // 2D matrix(a, b, c, d, e, f); matrix3d is column-major with m11, m12 first
    let expected = match name.trim() {
        "matrix" => 6,
        "matrix3d" => 16,
        _ => return None,
    };
    if values.len() != expected {
        return None;
    }

    let (a, b) = (values[0], values[1]);
    Some(normalize_angle(b.atan2(a).to_degrees()))
}

/// Where one letter sits on the wheel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LetterPlacement {
    pub letter: char,
    pub angle: f64,
    pub radius_px: u32,
}

impl LetterPlacement {
    /// CSS transform positioning the label from the wheel center
    pub fn css_transform(&self) -> String {
        format!(
            "translate(-50%, -50%) rotate({}deg) translateY(-{}px)",
            self.angle, self.radius_px
        )
    }
}

/// Placements for every letter on a wheel of the given diameter
pub fn letter_layout(wheel_diameter_px: f64) -> Vec<LetterPlacement> {
    let radius_px = compute_letter_radius(wheel_diameter_px);
    LETTERS
        .iter()
        .enumerate()
        .map(|(index, &letter)| LetterPlacement {
            letter,
            angle: center_angle_for_index(index),
            radius_px,
        })
        .collect()
}
