use crate::foundation::core::GeoPoint;
use crate::geometry::geo::haversine_km;
use crate::solution::fleet::{Fleet, ProjectedRoute};
use crate::solution::payload::NodeId;

/// One delivery of the active route and whether playback has passed it.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct StopStatus {
    /// Delivered node.
    pub node_id: NodeId,
    /// 1-based visiting order.
    pub order: usize,
    /// Node position, if the node is known.
    pub position: Option<GeoPoint>,
    /// Progress value at which the vehicle reaches the stop.
    pub path_fraction: Option<f64>,
    /// Whether current progress has reached the stop.
    pub reached: bool,
}

/// Stop fractions for one route, computed once per active-vehicle change.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StopTrack {
    stops: Vec<(NodeId, Option<GeoPoint>, Option<f64>)>,
}

impl StopTrack {
    /// Anchor each delivery to its closest path vertex, scanning forward from the previous stop
    /// so that revisited areas resolve in visiting order.
    pub fn build(route: &ProjectedRoute, fleet: &Fleet) -> Self {
        let path = &route.path;
        let total = route.total_km();
        let mut cursor = 0usize;
        let mut stops = Vec::with_capacity(route.route.deliveries.len());

        for &id in &route.route.deliveries {
            let position = fleet.node(id).map(|n| n.position);
            let fraction = match position {
                Some(p) if path.len() >= 2 => {
                    let j = closest_vertex_from(path, cursor, p);
                    cursor = j;
                    Some(if total > 0.0 {
                        route.path_km[j] / total
                    } else {
                        j as f64 / (path.len() - 1) as f64
                    })
                }
                _ => None,
            };
            stops.push((id, position, fraction));
        }
        Self { stops }
    }

    /// Number of tracked stops.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Whether the route delivers nothing.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Statuses at `progress`.
    pub fn statuses(&self, progress: f64) -> Vec<StopStatus> {
        self.stops
            .iter()
            .enumerate()
            .map(|(i, &(node_id, position, path_fraction))| StopStatus {
                node_id,
                order: i + 1,
                position,
                path_fraction,
                reached: path_fraction.is_some_and(|f| f <= progress),
            })
            .collect()
    }

    /// First stop not yet reached at `progress`.
    pub fn next_stop(&self, progress: f64) -> Option<StopStatus> {
        self.statuses(progress).into_iter().find(|s| !s.reached)
    }
}

fn closest_vertex_from(path: &[GeoPoint], start: usize, p: GeoPoint) -> usize {
    let mut best = start;
    let mut best_d = f64::INFINITY;
    for (j, v) in path.iter().enumerate().skip(start) {
        let d = haversine_km(*v, p);
        if d < best_d {
            best = j;
            best_d = d;
        }
    }
    best
}

#[cfg(test)]
#[path = "../../tests/unit/animation/stops.rs"]
mod tests;
