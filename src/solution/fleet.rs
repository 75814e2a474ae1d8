use crate::foundation::config::EngineConfig;
use crate::foundation::core::{GeoBounds, GeoPoint, GridPoint, Rgba8};
use crate::foundation::error::{RouteplayError, RouteplayResult};
use crate::geometry::geo::cumulative_lengths_km;
use crate::geometry::projector::CoordinateProjector;
use crate::solution::payload::{NodeDef, NodeId, RouteDef, RouteIdDef, SolutionDef};
use std::collections::{HashMap, HashSet};

/// A delivery stop, immutable once loaded.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeliveryNode {
    /// Node id.
    pub id: NodeId,
    /// Solver grid position.
    pub grid: GridPoint,
    /// Projected position.
    pub position: GeoPoint,
}

/// A validated, strongly typed solver route (grid space steps, geographic full path).
#[derive(Clone, Debug, PartialEq)]
pub struct VehicleRoute {
    /// Route id.
    pub id: String,
    /// Vehicle number shown to users.
    pub vehicle_number: u32,
    /// Node ids in visiting order.
    pub deliveries: Vec<NodeId>,
    /// Coarse waypoints in grid space.
    pub steps: Vec<GridPoint>,
    /// Fine geometry (geographic).
    pub full_path: Vec<GeoPoint>,
    /// Solver cost.
    pub cost: f64,
}

/// A route ready for playback: projected geometry plus its display color.
///
/// Derived from a [`VehicleRoute`]; rebuilt whenever the route list changes.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectedRoute {
    /// Source route.
    pub route: VehicleRoute,
    /// Position in the fleet; drives the palette slot.
    pub index: usize,
    /// Steps projected to geographic space.
    pub steps: Vec<GeoPoint>,
    /// Authoritative playback geometry: `full_path`, or projected steps when the solver omitted it.
    pub path: Vec<GeoPoint>,
    /// Running great-circle length at each `path` vertex.
    pub path_km: Vec<f64>,
    /// Display color.
    pub color: Rgba8,
}

impl ProjectedRoute {
    /// Project `route` for fleet slot `index`.
    pub fn project(
        route: VehicleRoute,
        index: usize,
        projector: &CoordinateProjector,
        palette: &[Rgba8],
    ) -> Self {
        let steps = projector.project_path(&route.steps);
        let path = if route.full_path.len() >= 2 {
            route.full_path.clone()
        } else {
            steps.clone()
        };
        let path_km = cumulative_lengths_km(&path);
        let color = palette_color(palette, index);
        Self {
            route,
            index,
            steps,
            path,
            path_km,
            color,
        }
    }

    /// Whether the route has enough geometry to animate.
    pub fn has_route(&self) -> bool {
        self.path.len() >= 2
    }

    /// Total length of the authoritative path.
    pub fn total_km(&self) -> f64 {
        self.path_km.last().copied().unwrap_or(0.0)
    }

    /// Vehicle number shorthand.
    pub fn vehicle_number(&self) -> u32 {
        self.route.vehicle_number
    }

    /// Bounds of the authoritative path (falls back to steps).
    pub fn bounds(&self) -> Option<GeoBounds> {
        GeoBounds::from_points(&self.path).or_else(|| GeoBounds::from_points(&self.steps))
    }

    /// 1-based visiting order of `node`, if this route delivers it.
    pub fn visit_order(&self, node: NodeId) -> Option<usize> {
        self.route
            .deliveries
            .iter()
            .position(|&id| id == node)
            .map(|i| i + 1)
    }
}

/// Palette slot for vehicle `index`; stable per index.
pub fn palette_color(palette: &[Rgba8], index: usize) -> Rgba8 {
    if palette.is_empty() {
        return Rgba8::rgb(255, 255, 255);
    }
    palette[index % palette.len()]
}

/// The full routing instance: nodes plus projected routes.
#[derive(Clone, Debug, Default)]
pub struct Fleet {
    nodes: Vec<DeliveryNode>,
    node_index: HashMap<NodeId, usize>,
    routes: Vec<ProjectedRoute>,
}

impl Fleet {
    /// Validate a solver payload and project it.
    #[tracing::instrument(skip_all, fields(routes = def.routes.len(), nodes = def.nodes.len()))]
    pub fn from_solution(def: &SolutionDef, cfg: &EngineConfig) -> RouteplayResult<Self> {
        let projector = CoordinateProjector::from_config(&cfg.projection);
        let nodes = convert_nodes(&def.nodes, &projector)?;
        let node_index = index_nodes(&nodes);

        let mut routes = Vec::with_capacity(def.routes.len());
        for (index, r) in def.routes.iter().enumerate() {
            let route = convert_route(r, index)?;
            for id in &route.deliveries {
                if !node_index.contains_key(id) {
                    tracing::warn!(
                        route = %route.id,
                        node = %id,
                        "delivery references unknown node"
                    );
                }
            }
            if route.full_path.len() < 2 && route.steps.len() < 2 {
                tracing::warn!(route = %route.id, "route has no playable geometry");
            }
            routes.push(ProjectedRoute::project(
                route,
                index,
                &projector,
                &cfg.scene.palette,
            ));
        }

        Ok(Self {
            nodes,
            node_index,
            routes,
        })
    }

    /// Replace the node list, keeping routes.
    pub fn replace_nodes(
        &mut self,
        defs: &[NodeDef],
        projector: &CoordinateProjector,
    ) -> RouteplayResult<()> {
        let nodes = convert_nodes(defs, projector)?;
        self.node_index = index_nodes(&nodes);
        self.nodes = nodes;
        Ok(())
    }

    /// All delivery nodes in payload order.
    pub fn nodes(&self) -> &[DeliveryNode] {
        &self.nodes
    }

    /// All routes in payload order.
    pub fn routes(&self) -> &[ProjectedRoute] {
        &self.routes
    }

    /// Route at `index`.
    pub fn route(&self, index: usize) -> Option<&ProjectedRoute> {
        self.routes.get(index)
    }

    /// Node with `id`.
    pub fn node(&self, id: NodeId) -> Option<&DeliveryNode> {
        self.node_index.get(&id).map(|&i| &self.nodes[i])
    }

    /// Number of routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether there are no routes.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// 1-based visit order of `node` within route `route_index`.
    pub fn visit_order(&self, route_index: usize, node: NodeId) -> Option<usize> {
        self.route(route_index)?.visit_order(node)
    }

    /// First route that delivers `node`.
    pub fn node_route_index(&self, node: NodeId) -> Option<usize> {
        self.routes
            .iter()
            .position(|r| r.route.deliveries.contains(&node))
    }
}

fn index_nodes(nodes: &[DeliveryNode]) -> HashMap<NodeId, usize> {
    nodes.iter().enumerate().map(|(i, n)| (n.id, i)).collect()
}

fn convert_nodes(
    defs: &[NodeDef],
    projector: &CoordinateProjector,
) -> RouteplayResult<Vec<DeliveryNode>> {
    let mut seen = HashSet::with_capacity(defs.len());
    let mut out = Vec::with_capacity(defs.len());
    for (i, n) in defs.iter().enumerate() {
        let grid = GridPoint::new(n.x, n.y);
        if !grid.is_finite() {
            return Err(RouteplayError::payload(format!(
                "nodes[{i}] (id {}) has non-finite coordinates",
                n.id
            )));
        }
        if !seen.insert(n.id) {
            return Err(RouteplayError::payload(format!(
                "nodes[{i}] duplicates node id {}",
                n.id
            )));
        }
        out.push(DeliveryNode {
            id: n.id,
            grid,
            position: projector.project_point(grid),
        });
    }
    Ok(out)
}

fn convert_route(r: &RouteDef, index: usize) -> RouteplayResult<VehicleRoute> {
    let id = r
        .id
        .clone()
        .map(RouteIdDef::into_string)
        .unwrap_or_else(|| format!("route-{index}"));

    if let Some(i) = r.steps.iter().position(|p| !p.is_finite()) {
        return Err(RouteplayError::payload(format!(
            "routes[{index}].steps[{i}] is not finite"
        )));
    }
    if let Some(i) = r.full_path.iter().position(|p| !p.is_finite()) {
        return Err(RouteplayError::payload(format!(
            "routes[{index}].full_path[{i}] is not finite"
        )));
    }
    if !r.cost.is_finite() {
        return Err(RouteplayError::payload(format!(
            "routes[{index}].cost is not finite"
        )));
    }

    Ok(VehicleRoute {
        id,
        vehicle_number: r.vehicle_number,
        deliveries: r.deliveries.clone(),
        steps: r.steps.clone(),
        full_path: r.full_path.clone(),
        cost: r.cost,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/solution/fleet.rs"]
mod tests;
