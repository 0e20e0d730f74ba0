//! Planar geometry helpers layered on top of `glam`.

use glam::DVec2;

/// Centre distances below this are treated as coincident.
pub const COINCIDENT_EPSILON: f64 = 1e-6;

/// Point at `radius` from `center` in direction `angle` (radians).
pub fn polar(center: DVec2, radius: f64, angle: f64) -> DVec2 {
    center + DVec2::from_angle(angle) * radius
}

/// Angle of `point` as seen from `center`, in `(-π, π]`.
pub fn angle_from(center: DVec2, point: DVec2) -> f64 {
    let offset = point - center;
    offset.y.atan2(offset.x)
}

/// Linear interpolation with `t` clamped to `[0, 1]`.
pub fn lerp_clamped(a: DVec2, b: DVec2, t: f64) -> DVec2 {
    a.lerp(b, t.clamp(0.0, 1.0))
}

/// Moves `from` toward `to` so that it ends up `length` away from `to`.
///
/// Returns `None` when the two points coincide and no direction exists.
pub fn place_at_distance(to: DVec2, from: DVec2, length: f64) -> Option<DVec2> {
    let r = from.distance(to);
    if r == 0.0 {
        return None;
    }
    let lambda = length / r;
    Some(to.lerp(from, lambda))
}

/// Intersection of the circle `(c1, r1)` with the circle `(c2, r2)`.
///
/// Always yields the root on the left of the `c1 → c2` axis (positive
/// perpendicular offset). When the circles miss each other only the offset
/// is clamped to zero, so the point lands on the axis at the midline
/// projection.
/// Coincident centres use the +X axis.
pub fn circle_intersection(c1: DVec2, r1: f64, c2: DVec2, r2: f64) -> DVec2 {
    let delta = c2 - c1;
    let mut distance = delta.length();
    let axis = if distance < COINCIDENT_EPSILON {
        distance = COINCIDENT_EPSILON;
        DVec2::X
    } else {
        delta / distance
    };

    let along = (r1 * r1 - r2 * r2 + distance * distance) / (2.0 * distance);
    let across = (r1 * r1 - along * along).max(0.0).sqrt();

    c1 + axis * along + axis.perp() * across
}
