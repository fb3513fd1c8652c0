use std::collections::HashMap;

use crate::types::BoundingBox;

/// Format a normalized time as its canonical 7-character timeline key.
///
/// Keys carry 5 fractional digits and are right-padded with zeros. The
/// literal zero time maps to the sentinel `"0000000"` instead of
/// `"0.00000"`, matching a known quirk in existing annotation files.
pub fn time_key(t: f64) -> String {
    let mut key = format!("{:.5}", t);
    while key.len() < 7 {
        key.push('0');
    }
    if key == "0.00000" {
        key = "0000000".to_string();
    }
    key
}

/// Look up the keyframe box annotated at time `t`, if any.
pub fn keyframe_at(timeline: &HashMap<String, BoundingBox>, t: f64) -> Option<BoundingBox> {
    timeline.get(&time_key(t)).copied()
}

/// Interpolate the bounding box for a query time `frame_time` in [0,1].
///
/// Returns `None` when the object is not present: at or outside the
/// timeline's annotated span there is no extrapolation. Inside the span the
/// bracketing keyframe pair is blended linearly; a query landing exactly on
/// an annotated time degenerates to that keyframe's box.
pub fn interpolate(
    timeline: &HashMap<String, BoundingBox>,
    frame_time: f64,
) -> Option<BoundingBox> {
    let mut times: Vec<f64> = timeline
        .keys()
        .filter_map(|key| key.parse::<f64>().ok())
        .collect();
    if times.len() < 2 {
        return None;
    }
    times.sort_by(|a, b| a.total_cmp(b));

    if frame_time <= times[0] || frame_time >= times[times.len() - 1] {
        return None;
    }

    for pair in times.windows(2) {
        let (t1, t2) = (pair[0], pair[1]);
        if t1 <= frame_time && frame_time <= t2 {
            let box1 = keyframe_at(timeline, t1)?;
            let box2 = keyframe_at(timeline, t2)?;
            let alpha = (frame_time - t1) / (t2 - t1);
            return Some(box1.lerp(&box2, alpha));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timeline_of(entries: &[(&str, BoundingBox)]) -> HashMap<String, BoundingBox> {
        entries
            .iter()
            .map(|(key, bbox)| (key.to_string(), *bbox))
            .collect()
    }

    fn bbox(sx: f64, sy: f64, w: f64, h: f64) -> BoundingBox {
        BoundingBox { sx, sy, w, h }
    }

    #[test]
    fn test_time_key_formatting() {
        assert_eq!(time_key(0.123), "0.12300");
        assert_eq!(time_key(0.5), "0.50000");
        assert_eq!(time_key(0.98765), "0.98765");
    }

    #[test]
    fn test_time_key_zero_sentinel() {
        assert_eq!(time_key(0.0), "0000000");
    }

    #[test]
    fn test_keyframe_at_zero_sentinel() {
        let timeline = timeline_of(&[("0000000", bbox(0.1, 0.2, 0.3, 0.4))]);
        assert_eq!(keyframe_at(&timeline, 0.0), Some(bbox(0.1, 0.2, 0.3, 0.4)));
    }

    #[test]
    fn test_interpolate_midpoint() {
        let timeline = timeline_of(&[
            ("0.10000", bbox(0.0, 0.0, 0.2, 0.2)),
            ("0.30000", bbox(0.2, 0.2, 0.2, 0.2)),
        ]);
        let result = interpolate(&timeline, 0.2).unwrap();
        assert!((result.sx - 0.1).abs() < 1e-9);
        assert!((result.sy - 0.1).abs() < 1e-9);
        assert!((result.w - 0.2).abs() < 1e-9);
        assert!((result.h - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_interpolate_exact_interior_keyframe() {
        let timeline = timeline_of(&[
            ("0.10000", bbox(0.0, 0.0, 0.2, 0.2)),
            ("0.50000", bbox(0.4, 0.4, 0.3, 0.3)),
            ("0.90000", bbox(0.8, 0.8, 0.1, 0.1)),
        ]);
        assert_eq!(interpolate(&timeline, 0.5), Some(bbox(0.4, 0.4, 0.3, 0.3)));
    }

    #[test]
    fn test_interpolate_outside_span_is_absent() {
        let timeline = timeline_of(&[
            ("0.10000", bbox(0.0, 0.0, 0.2, 0.2)),
            ("0.30000", bbox(0.2, 0.2, 0.2, 0.2)),
        ]);
        assert_eq!(interpolate(&timeline, 0.05), None);
        assert_eq!(interpolate(&timeline, 0.1), None);
        assert_eq!(interpolate(&timeline, 0.3), None);
        assert_eq!(interpolate(&timeline, 0.95), None);
    }

    #[test]
    fn test_interpolate_monotonic_between_keyframes() {
        let timeline = timeline_of(&[
            ("0.20000", bbox(0.1, 0.3, 0.2, 0.1)),
            ("0.60000", bbox(0.5, 0.1, 0.4, 0.3)),
        ]);
        for t in [0.25, 0.3, 0.4, 0.55] {
            let result = interpolate(&timeline, t).unwrap();
            assert!(result.sx >= 0.1 && result.sx <= 0.5);
            assert!(result.sy >= 0.1 && result.sy <= 0.3);
            assert!(result.w >= 0.2 && result.w <= 0.4);
            assert!(result.h >= 0.1 && result.h <= 0.3);
        }
    }

    #[test]
    fn test_interpolate_single_keyframe_is_absent() {
        let timeline = timeline_of(&[("0.50000", bbox(0.1, 0.1, 0.1, 0.1))]);
        assert_eq!(interpolate(&timeline, 0.5), None);
        assert_eq!(interpolate(&timeline, 0.6), None);
    }

    #[test]
    fn test_interpolate_spans_zero_sentinel() {
        let timeline = timeline_of(&[
            ("0000000", bbox(0.0, 0.0, 0.2, 0.2)),
            ("0.40000", bbox(0.4, 0.4, 0.2, 0.2)),
        ]);
        let result = interpolate(&timeline, 0.2).unwrap();
        assert!((result.sx - 0.2).abs() < 1e-9);
        assert!((result.sy - 0.2).abs() < 1e-9);
    }
}
