//! Presentation helpers: a bounded listing of grid points, and the step
//! polyline a chart draws for a set of truth segments.

use crate::domain::{Domain, TruthSegment};

pub const DEFAULT_PREVIEW_LIMIT: usize = 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct DomainPreview {
    pub points: Vec<f64>,
    /// True when the tolerant grid has more points than `points` holds.
    pub truncated: bool,
}

/// First `limit` points of the tolerant grid.
pub fn preview_domain(domain: &Domain, limit: usize) -> DomainPreview {
    let mut grid = domain.tolerant_grid();
    let points: Vec<f64> = grid.by_ref().take(limit).collect();
    let truncated = grid.next().is_some();
    DomainPreview { points, truncated }
}

/// One vertex of a truth series; `level` is 1 inside a segment, 0 outside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub x: f64,
    pub level: u8,
}

/// Ordered vertices of the truth polyline.
pub type TruthSeries = Vec<SeriesPoint>;

impl SeriesPoint {
    fn new(x: f64, level: u8) -> Self {
        Self { x, level }
    }
}

/// Area polyline for `segments` over `[min, max]`.
///
/// Gaps are drawn at level 0 and segments at level 1, left to right. With
/// no segments the series is a flat line at 0 from `min` to `max`.
pub fn truth_series(segments: &[TruthSegment], min: f64, max: f64) -> TruthSeries {
    if segments.is_empty() {
        return vec![SeriesPoint::new(min, 0), SeriesPoint::new(max, 0)];
    }

    let mut points = Vec::with_capacity(segments.len() * 4 + 2);
    let mut last_end = min;
    for seg in segments {
        if seg.start > last_end {
            points.push(SeriesPoint::new(last_end, 0));
            points.push(SeriesPoint::new(seg.start, 0));
        }
        points.push(SeriesPoint::new(seg.start, 1));
        points.push(SeriesPoint::new(seg.end, 1));
        last_end = seg.end;
    }
    if last_end < max {
        points.push(SeriesPoint::new(last_end, 0));
        points.push(SeriesPoint::new(max, 0));
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(series: &[SeriesPoint]) -> Vec<(f64, u8)> {
        series.iter().map(|p| (p.x, p.level)).collect()
    }

    #[test]
    fn test_preview_truncates() {
        let p = preview_domain(&Domain::new(0.0, 10.0, 1.0), 4);
        assert_eq!(p.points, vec![0.0, 1.0, 2.0, 3.0]);
        assert!(p.truncated);

        let p = preview_domain(&Domain::new(0.0, 3.0, 1.0), 4);
        assert_eq!(p.points, vec![0.0, 1.0, 2.0, 3.0]);
        assert!(!p.truncated);
    }

    #[test]
    fn test_preview_of_empty_grid() {
        let p = preview_domain(&Domain::new(0.0, 3.0, 0.0), 10);
        assert!(p.points.is_empty());
        assert!(!p.truncated);
    }

    #[test]
    fn test_series_without_segments_is_flat() {
        assert_eq!(pairs(&truth_series(&[], -2.0, 2.0)), vec![(-2.0, 0), (2.0, 0)]);
    }

    #[test]
    fn test_series_with_gaps() {
        let segs = [
            TruthSegment { start: -3.0, end: -1.0 },
            TruthSegment { start: 1.0, end: 2.0 },
        ];
        assert_eq!(
            pairs(&truth_series(&segs, -3.0, 3.0)),
            vec![
                (-3.0, 1),
                (-1.0, 1),
                (-1.0, 0),
                (1.0, 0),
                (1.0, 1),
                (2.0, 1),
                (2.0, 0),
                (3.0, 0),
            ]
        );
    }
}
