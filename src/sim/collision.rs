//! Collision queries: point-to-segment web tests and radius checks
//!
//! Webs are line segments; a prey is "on the web" when its position projects
//! onto the segment and the perpendicular distance is under the collision
//! radius. Catches and pickups are plain euclidean radius checks.

use glam::Vec2;

use crate::consts::*;
use crate::sim::state::Web;

/// Closest point on segment `a..b` to `p`, or `None` when the projection of
/// `p` falls outside the segment (endpoints do not count as "on the web";
/// prey brushing past an anchor point is not trapped).
pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Option<Vec2> {
    let seg = b - a;
    let len = seg.length();
    if len < WEB_MIN_SEGMENT {
        // Degenerate segment; skip rather than divide by ~zero
        return None;
    }
    let dir = seg / len;
    let t = (p - a).dot(dir);
    if !(0.0..=len).contains(&t) {
        return None;
    }
    Some(a + dir * t)
}

/// Whether `p` is within `radius` of the segment `a..b`
pub fn point_near_segment(p: Vec2, a: Vec2, b: Vec2, radius: f32) -> bool {
    closest_point_on_segment(p, a, b)
        .is_some_and(|closest| (p - closest).length_squared() < radius * radius)
}

/// Whether any active web holds the given position
pub fn caught_in_webs(pos: Vec2, webs: &[Web]) -> bool {
    webs.iter()
        .any(|w| point_near_segment(pos, w.start, w.end, WEB_COLLISION_RADIUS))
}

/// Radius-based catch/pickup test
#[inline]
pub fn within_radius(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance_squared(b) < radius * radius
}

/// Per-tick magnet steering: a small velocity nudge pulling `prey_pos`
/// toward `spider_pos`. Returns `None` outside the magnet band (or inside
/// the catch radius, where the catch check takes over anyway).
pub fn magnet_nudge(spider_pos: Vec2, prey_pos: Vec2) -> Option<Vec2> {
    let dist_sq = spider_pos.distance_squared(prey_pos);
    if dist_sq >= MAGNET_RADIUS * MAGNET_RADIUS || dist_sq < CATCH_RADIUS * CATCH_RADIUS {
        return None;
    }
    let toward = (spider_pos - prey_pos).normalize_or_zero();
    Some(toward * MAGNET_PULL)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn web(start: Vec2, end: Vec2) -> Web {
        Web {
            id: 1,
            start,
            end,
            created_at_ms: 0.0,
            lifetime_ms: 5000.0,
        }
    }

    #[test]
    fn test_point_on_segment_midpoint() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(200.0, 0.0);
        assert!(point_near_segment(Vec2::new(100.0, 5.0), a, b, 25.0));
        assert!(!point_near_segment(Vec2::new(100.0, 30.0), a, b, 25.0));
    }

    #[test]
    fn test_projection_outside_segment_misses() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(200.0, 0.0);
        // Close to the line's extension but past the end point
        assert!(!point_near_segment(Vec2::new(220.0, 0.0), a, b, 25.0));
        assert!(!point_near_segment(Vec2::new(-15.0, 0.0), a, b, 25.0));
    }

    #[test]
    fn test_degenerate_segment_never_traps() {
        let a = Vec2::new(50.0, 50.0);
        let b = Vec2::new(52.0, 50.0); // under WEB_MIN_SEGMENT
        assert!(closest_point_on_segment(Vec2::new(51.0, 50.0), a, b).is_none());
    }

    #[test]
    fn test_diagonal_segment() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(100.0, 100.0);
        let closest = closest_point_on_segment(Vec2::new(60.0, 40.0), a, b).unwrap();
        assert!((closest - Vec2::new(50.0, 50.0)).length() < 0.001);
    }

    #[test]
    fn test_caught_in_any_of_several_webs() {
        let webs = vec![
            web(Vec2::new(0.0, 100.0), Vec2::new(200.0, 100.0)),
            web(Vec2::new(300.0, 0.0), Vec2::new(300.0, 200.0)),
        ];
        assert!(caught_in_webs(Vec2::new(300.0, 150.0), &webs));
        assert!(caught_in_webs(Vec2::new(50.0, 90.0), &webs));
        assert!(!caught_in_webs(Vec2::new(500.0, 500.0), &webs));
    }

    #[test]
    fn test_magnet_nudge_band() {
        let spider = Vec2::new(0.0, 0.0);

        // Inside the catch radius: no nudge, the catch wins
        assert!(magnet_nudge(spider, Vec2::new(10.0, 0.0)).is_none());
        // Outside the magnet radius: no nudge
        assert!(magnet_nudge(spider, Vec2::new(250.0, 0.0)).is_none());

        // In the band: pulled toward the spider
        let nudge = magnet_nudge(spider, Vec2::new(100.0, 0.0)).unwrap();
        assert!(nudge.x < 0.0);
        assert!((nudge.length() - MAGNET_PULL).abs() < 0.001);
    }
}
