use crate::foundation::config::MetricsConfig;
use crate::foundation::core::Rgba8;
use crate::geometry::geo::path_length_km;
use crate::solution::fleet::ProjectedRoute;

/// Per-route derived metrics.
///
/// Invariants: `distance_km >= 0` and `stops == deliveries.len()`.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RouteMetrics {
    /// Route id.
    pub route_id: String,
    /// Vehicle number.
    pub vehicle_number: u32,
    /// Display color.
    pub color: Rgba8,
    /// Solver cost.
    pub cost: f64,
    /// Great-circle length of the authoritative path.
    pub distance_km: f64,
    /// Number of deliveries.
    pub stops: usize,
}

/// Fleet-level aggregates.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct FleetMetrics {
    /// Per-route metrics in fleet order.
    pub routes: Vec<RouteMetrics>,
    /// Sum of route costs.
    pub total_cost: f64,
    /// Mean route cost (0 for an empty fleet).
    pub avg_cost: f64,
    /// Mean number of stops (0 for an empty fleet).
    pub avg_stops: f64,
    /// Sum of route lengths.
    pub total_distance_km: f64,
    /// Cheapest route; first wins ties.
    pub best: Option<RouteMetrics>,
    /// Most expensive route; first wins ties.
    pub worst: Option<RouteMetrics>,
    /// Longest route; first wins ties.
    pub longest: Option<RouteMetrics>,
}

/// Coarse cost tier relative to the fleet average.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum Quality {
    /// `cost / avg < efficient_below`.
    Efficient,
    /// Between the two thresholds.
    Balanced,
    /// `cost / avg >= heavy_from`.
    Heavy,
    /// No usable average.
    Neutral,
}

impl Quality {
    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Efficient => "Efficient",
            Self::Balanced => "Balanced",
            Self::Heavy => "Heavy",
            Self::Neutral => "—",
        }
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Remaining distance and time at a progress value.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Eta {
    /// Distance left to travel.
    pub remaining_km: f64,
    /// Minutes left, `None` once nothing remains.
    pub eta_minutes: Option<f64>,
}

impl Eta {
    /// `remaining = total * (1 - progress)`, `eta = remaining * minutes_per_km` when positive.
    pub fn at(total_km: f64, progress: f64, minutes_per_km: f64) -> Self {
        let progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        let remaining_km = (total_km * (1.0 - progress)).max(0.0);
        let eta_minutes = (remaining_km > 0.0).then(|| remaining_km * minutes_per_km);
        Self {
            remaining_km,
            eta_minutes,
        }
    }
}

/// Metrics for one route.
pub fn compute_route_metrics(route: &ProjectedRoute) -> RouteMetrics {
    RouteMetrics {
        route_id: route.route.id.clone(),
        vehicle_number: route.route.vehicle_number,
        color: route.color,
        cost: route.route.cost,
        distance_km: path_length_km(&route.path).max(0.0),
        stops: route.route.deliveries.len(),
    }
}

/// Metrics for every route plus fleet aggregates.
pub fn compute_fleet_metrics(routes: &[ProjectedRoute]) -> FleetMetrics {
    FleetMetrics::from_route_metrics(routes.iter().map(compute_route_metrics).collect())
}

impl FleetMetrics {
    /// Aggregate precomputed route metrics.
    pub fn from_route_metrics(routes: Vec<RouteMetrics>) -> Self {
        if routes.is_empty() {
            return Self::default();
        }

        let n = routes.len() as f64;
        let total_cost: f64 = routes.iter().map(|r| r.cost).sum();
        let total_stops: usize = routes.iter().map(|r| r.stops).sum();
        let total_distance_km: f64 = routes.iter().map(|r| r.distance_km).sum();

        // Strict comparisons keep the first route on ties.
        let pick = |better: fn(&RouteMetrics, &RouteMetrics) -> bool| -> Option<RouteMetrics> {
            let mut it = routes.iter();
            let mut cur = it.next()?;
            for r in it {
                if better(r, cur) {
                    cur = r;
                }
            }
            Some(cur.clone())
        };

        let best = pick(|a, b| a.cost < b.cost);
        let worst = pick(|a, b| a.cost > b.cost);
        let longest = pick(|a, b| a.distance_km > b.distance_km);

        Self {
            total_cost,
            avg_cost: total_cost / n,
            avg_stops: total_stops as f64 / n,
            total_distance_km,
            best,
            worst,
            longest,
            routes,
        }
    }

    /// Quality tier of `route` against this fleet's average cost.
    pub fn quality_of(&self, route: &RouteMetrics, cfg: &MetricsConfig) -> Quality {
        classify_quality_with(route.cost, Some(self.avg_cost), cfg)
    }
}

/// Quality tier with the default 0.8 / 1.2 thresholds.
pub fn classify_quality(cost: f64, avg_cost: Option<f64>) -> Quality {
    classify_quality_with(cost, avg_cost, &MetricsConfig::default())
}

/// Quality tier with configured thresholds. Boundary values belong to the higher tier.
pub fn classify_quality_with(cost: f64, avg_cost: Option<f64>, cfg: &MetricsConfig) -> Quality {
    let Some(avg) = avg_cost.filter(|a| a.is_finite() && *a != 0.0) else {
        return Quality::Neutral;
    };
    let ratio = cost / avg;
    if !ratio.is_finite() {
        return Quality::Neutral;
    }
    if ratio < cfg.efficient_below {
        Quality::Efficient
    } else if ratio < cfg.heavy_from {
        Quality::Balanced
    } else {
        Quality::Heavy
    }
}

#[cfg(test)]
#[path = "../../tests/unit/metrics/calculator.rs"]
mod tests;
