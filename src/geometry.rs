// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/geometry.rs - Points, arc tessellation, and translation helpers.
 *  Copyright (C) 2026  The xzzpcb developers
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

use std::ops::{Sub, SubAssign};

/// A 2D point in display units (on-disk integer coordinates divided by
/// the global scale).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, rhs: Point) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

/// One edge of the board outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutlineSegment {
    pub start: Point,
    pub end: Point,
}

/// Number of sample points per tessellated arc. Nine segments per arc is
/// a visual-fidelity/performance tradeoff, not a property of the format.
const ARC_POINTS: i32 = 10;

/// Tessellates an arc into [`ARC_POINTS`]` - 1` line segments.
///
/// Angles are in degrees. If `start_angle > end_angle` the two are
/// swapped; if the resulting span exceeds 180 degrees, 360 is added to the
/// start angle so the same arc of a circle is always selected regardless
/// of which endpoint the file listed first.
pub fn arc_to_segments(
    mut start_angle: i32,
    mut end_angle: i32,
    radius: i32,
    center: Point,
) -> Vec<OutlineSegment> {
    let mut segments = Vec::with_capacity((ARC_POINTS - 1) as usize);

    if start_angle > end_angle {
        std::mem::swap(&mut start_angle, &mut end_angle);
    }

    if end_angle - start_angle > 180 {
        start_angle += 360;
    }

    let deg_to_rad = std::f64::consts::PI / 180.0;
    let start = f64::from(start_angle) * deg_to_rad;
    let end = f64::from(end_angle) * deg_to_rad;
    let r = f64::from(radius);
    let cx = f64::from(center.x);
    let cy = f64::from(center.y);

    let angle_step = (end - start) / f64::from(ARC_POINTS - 1);

    let mut previous = Point::new((cx + r * start.cos()) as i32, (cy + r * start.sin()) as i32);
    for i in 1..ARC_POINTS {
        let angle = start + f64::from(i) * angle_step;
        let point = Point::new((cx + r * angle.cos()) as i32, (cy + r * angle.sin()) as i32);
        segments.push(OutlineSegment { start: previous, end: point });
        previous = point;
    }

    segments
}

/// Finds the minimum x and y across every outline endpoint, assuming the
/// outline segments encompass all parts. Returns the origin if the
/// outline is empty.
pub fn find_translation(segments: &[OutlineSegment]) -> Point {
    let Some(first) = segments.first() else {
        return Point::default();
    };

    let mut translation = first.start;
    for segment in segments {
        translation.x = translation.x.min(segment.start.x).min(segment.end.x);
        translation.y = translation.y.min(segment.start.y).min(segment.end.y);
    }
    translation
}

/// Shifts every outline endpoint by `-translation`.
pub fn translate_segments(segments: &mut [OutlineSegment], translation: Point) {
    for segment in segments {
        segment.start -= translation;
        segment.end -= translation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arc_half_circle() {
        let segments = arc_to_segments(0, 180, 100, Point::default());
        assert_eq!(segments.len(), 9);

        let first = segments.first().unwrap().start;
        let last = segments.last().unwrap().end;
        assert!((first.x - 100).abs() <= 1 && first.y.abs() <= 1);
        assert!((last.x + 100).abs() <= 1 && last.y.abs() <= 1);
    }

    #[test]
    fn test_arc_wraparound_selects_minor_arc() {
        // 350..10 must cover the 20-degree arc through 0, not the
        // 340-degree path: after the swap the span exceeds 180, so the
        // start angle becomes 370 and the sweep runs 370 -> 350.
        let segments = arc_to_segments(350, 10, 1000, Point::default());
        assert_eq!(segments.len(), 9);
        for segment in &segments {
            // Every sample stays near angle 0 (x close to +r).
            assert!(segment.start.x > 900, "point strayed off the minor arc: {segment:?}");
        }
        let first = segments.first().unwrap().start;
        let last = segments.last().unwrap().end;
        assert!(first.y > 0 && last.y < 0);
    }

    #[test]
    fn test_arc_segments_are_contiguous() {
        let segments = arc_to_segments(30, 120, 500, Point::new(40, -7));
        for pair in segments.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn test_find_translation_is_min_corner() {
        let segments = vec![
            OutlineSegment { start: Point::new(-50, 100), end: Point::new(30, 20) },
            OutlineSegment { start: Point::new(10, 60), end: Point::new(70, 90) },
        ];
        assert_eq!(find_translation(&segments), Point::new(-50, 20));
    }

    #[test]
    fn test_translate_segments_shifts_every_endpoint() {
        let mut segments = vec![
            OutlineSegment { start: Point::new(-50, 100), end: Point::new(30, 20) },
            OutlineSegment { start: Point::new(10, 60), end: Point::new(70, 90) },
        ];
        let translation = find_translation(&segments);
        translate_segments(&mut segments, translation);

        assert_eq!(segments[0].start, Point::new(0, 80));
        assert_eq!(segments[0].end, Point::new(80, 0));
        assert_eq!(segments[1].start, Point::new(60, 40));
        assert_eq!(segments[1].end, Point::new(120, 70));
        assert_eq!(find_translation(&segments), Point::default());
    }

    #[test]
    fn test_find_translation_empty_outline() {
        assert_eq!(find_translation(&[]), Point::default());
    }
}
