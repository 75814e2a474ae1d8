use crate::foundation::core::{GeoPoint, Lerp};
use crate::geometry::geo::{cumulative_lengths_km, initial_bearing_deg};

/// How a scalar progress in `[0, 1]` maps onto a polyline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameterization {
    /// Every segment receives an equal share of progress, regardless of its length.
    SegmentUniform,
    /// Progress is a fraction of great-circle length, so distance traveled is
    /// `progress * total_length`.
    #[default]
    ArcLength,
}

/// Interpolated pose along a path.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct PathSample {
    /// Position on the path.
    pub position: GeoPoint,
    /// Initial great-circle bearing of the current segment, degrees in `[0, 360)`.
    pub bearing: f64,
    /// Index of the segment the position lies on.
    pub segment: usize,
    /// Fraction within that segment.
    pub t: f64,
    /// Great-circle distance traveled along the path to reach `position`.
    pub distance_km: f64,
}

/// Evaluates position and heading along polylines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PathInterpolator {
    mode: Parameterization,
}

// Relative tolerance for treating a target distance as landing on a vertex.
const VERTEX_SNAP_REL: f64 = 1e-9;

impl PathInterpolator {
    /// Interpolator with the given parameterization.
    pub const fn new(mode: Parameterization) -> Self {
        Self { mode }
    }

    /// Equal progress share per segment.
    pub const fn segment_uniform() -> Self {
        Self::new(Parameterization::SegmentUniform)
    }

    /// Progress proportional to traveled length.
    pub const fn arc_length() -> Self {
        Self::new(Parameterization::ArcLength)
    }

    /// The active parameterization.
    pub fn mode(&self) -> Parameterization {
        self.mode
    }

    /// Interpolate along `path`. Returns `None` for fewer than two points, which is the normal
    /// "no route" state rather than an error.
    pub fn interpolate(&self, path: &[GeoPoint], progress: f64) -> Option<PathSample> {
        if path.len() < 2 {
            return None;
        }
        let cum = cumulative_lengths_km(path);
        self.interpolate_with_lengths(path, &cum, progress)
    }

    /// Same as [`PathInterpolator::interpolate`] with precomputed running lengths
    /// (`cum.len() == path.len()`).
    pub fn interpolate_with_lengths(
        &self,
        path: &[GeoPoint],
        cum: &[f64],
        progress: f64,
    ) -> Option<PathSample> {
        if path.len() < 2 || cum.len() != path.len() {
            return None;
        }
        let progress = clamp_progress(progress);
        let (segment, t) = match self.mode {
            Parameterization::SegmentUniform => locate_uniform(path.len(), progress),
            Parameterization::ArcLength => locate_arc_length(cum, progress),
        };

        let a = path[segment];
        let b = path[segment + 1];
        let position = if t >= 1.0 {
            b
        } else if t <= 0.0 {
            a
        } else {
            GeoPoint::lerp(&a, &b, t)
        };
        let seg_len = cum[segment + 1] - cum[segment];

        Some(PathSample {
            position,
            bearing: segment_bearing(path, segment),
            segment,
            t,
            distance_km: cum[segment] + seg_len * t,
        })
    }

    /// The traveled part of `path`: every vertex up to the current segment start, plus the
    /// interpolated point. Empty when there is no route.
    pub fn trail(&self, path: &[GeoPoint], progress: f64) -> Vec<GeoPoint> {
        if path.len() < 2 {
            return Vec::new();
        }
        let cum = cumulative_lengths_km(path);
        self.trail_with_lengths(path, &cum, progress)
    }

    /// [`PathInterpolator::trail`] with precomputed running lengths.
    pub fn trail_with_lengths(
        &self,
        path: &[GeoPoint],
        cum: &[f64],
        progress: f64,
    ) -> Vec<GeoPoint> {
        let Some(sample) = self.interpolate_with_lengths(path, cum, progress) else {
            return Vec::new();
        };
        let mut out = Vec::with_capacity(sample.segment + 2);
        out.extend_from_slice(&path[..=sample.segment]);
        out.push(sample.position);
        out
    }
}

/// Index of the last waypoint reached when stepping uniformly through `steps`.
pub fn waypoint_index(steps: &[GeoPoint], progress: f64) -> Option<usize> {
    let last = steps.len().checked_sub(1)?;
    let scaled = clamp_progress(progress) * last as f64;
    Some((scaled.floor() as usize).min(last))
}

fn clamp_progress(progress: f64) -> f64 {
    if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    }
}

fn locate_uniform(points: usize, progress: f64) -> (usize, f64) {
    let segments = points - 1;
    let scaled = progress * segments as f64;
    let segment = (scaled.floor().max(0.0) as usize).min(segments - 1);
    (segment, (scaled - segment as f64).clamp(0.0, 1.0))
}

fn locate_arc_length(cum: &[f64], progress: f64) -> (usize, f64) {
    let last_segment = cum.len() - 2;
    let total = cum[cum.len() - 1];
    if total.is_nan() || total <= 0.0 {
        // Every segment is degenerate; fall back to equal shares so progress still moves.
        return locate_uniform(cum.len(), progress);
    }
    if progress >= 1.0 {
        return (last_segment, 1.0);
    }

    let target = progress * total;
    let mut segment = cum[1..].partition_point(|&c| c <= target).min(last_segment);
    let snap = VERTEX_SNAP_REL * total;
    // A target within rounding distance of the segment end belongs to the next segment.
    while segment < last_segment && cum[segment + 1] - target <= snap {
        segment += 1;
    }

    let seg_len = cum[segment + 1] - cum[segment];
    let t = if seg_len > 0.0 {
        ((target - cum[segment]) / seg_len).clamp(0.0, 1.0)
    } else {
        0.0
    };
    (segment, t)
}

/// Bearing of `segment`, borrowing from the nearest non-degenerate segment when its endpoints
/// coincide.
fn segment_bearing(path: &[GeoPoint], segment: usize) -> f64 {
    let segments = path.len() - 1;
    let distinct = |i: usize| path[i] != path[i + 1];
    let pick = (segment..segments)
        .find(|&i| distinct(i))
        .or_else(|| (0..segment).rev().find(|&i| distinct(i)));
    match pick {
        Some(i) => initial_bearing_deg(path[i], path[i + 1]),
        None => 0.0,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/interpolate.rs"]
mod tests;
