use crate::foundation::core::{GeoBounds, GeoPoint, Point};
use crate::scene::renderer::{
    CameraPose, CameraTarget, Feature, FeatureCollection, LayerFilter, LayerId, LayerPaint,
    LayerSpec, MapRenderer, SourceId,
};
use std::collections::BTreeMap;

/// One recorded renderer call.
#[derive(Clone, Debug, PartialEq)]
pub enum SceneCall {
    /// `add_source`.
    AddSource(SourceId),
    /// `set_source_data` with the feature count.
    SetSourceData(SourceId, usize),
    /// `remove_source`.
    RemoveSource(SourceId),
    /// `add_layer`.
    AddLayer(LayerId),
    /// `set_layer_paint`.
    SetLayerPaint(LayerId, LayerPaint),
    /// `set_layer_filter`.
    SetLayerFilter(LayerId, LayerFilter),
    /// `remove_layer`.
    RemoveLayer(LayerId),
    /// `ease_camera`.
    EaseCamera(CameraTarget, f64),
    /// `fit_bounds`.
    FitBounds(GeoBounds, f64, f64),
    /// `pan_to`.
    PanTo(GeoPoint, f64),
}

/// In-memory renderer for tests and headless runs.
///
/// Keeps the latest source data, layer specs and camera, and logs every call. Camera moves land
/// immediately.
#[derive(Clone, Debug, Default)]
pub struct RecordingRenderer {
    /// Calls in order.
    pub calls: Vec<SceneCall>,
    sources: BTreeMap<SourceId, FeatureCollection>,
    layers: BTreeMap<LayerId, LayerSpec>,
    camera: CameraPose,
    picks: Vec<(LayerId, Feature)>,
}

impl RecordingRenderer {
    /// Empty renderer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Features `query_rendered_features` reports, topmost first, regardless of the point.
    pub fn with_rendered_features(mut self, picks: Vec<(LayerId, Feature)>) -> Self {
        self.picks = picks;
        self
    }

    /// Latest data of `id`.
    pub fn source(&self, id: SourceId) -> Option<&FeatureCollection> {
        self.sources.get(&id)
    }

    /// Current spec of `id`.
    pub fn layer(&self, id: LayerId) -> Option<&LayerSpec> {
        self.layers.get(&id)
    }

    /// Number of registered layers.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Number of registered sources.
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Count of calls matching `pred`.
    pub fn count(&self, pred: impl Fn(&SceneCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    /// Forget recorded calls, keeping scene state.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl MapRenderer for RecordingRenderer {
    fn add_source(&mut self, id: SourceId, data: FeatureCollection) {
        self.calls.push(SceneCall::AddSource(id));
        self.sources.insert(id, data);
    }

    fn set_source_data(&mut self, id: SourceId, data: FeatureCollection) {
        self.calls.push(SceneCall::SetSourceData(id, data.len()));
        if let Some(slot) = self.sources.get_mut(&id) {
            *slot = data;
        }
    }

    fn remove_source(&mut self, id: SourceId) {
        self.calls.push(SceneCall::RemoveSource(id));
        self.sources.remove(&id);
    }

    fn add_layer(&mut self, spec: LayerSpec) {
        self.calls.push(SceneCall::AddLayer(spec.id));
        self.layers.insert(spec.id, spec);
    }

    fn set_layer_paint(&mut self, id: LayerId, paint: LayerPaint) {
        self.calls.push(SceneCall::SetLayerPaint(id, paint));
        if let Some(l) = self.layers.get_mut(&id) {
            l.paint = paint;
        }
    }

    fn set_layer_filter(&mut self, id: LayerId, filter: LayerFilter) {
        self.calls.push(SceneCall::SetLayerFilter(id, filter.clone()));
        if let Some(l) = self.layers.get_mut(&id) {
            l.filter = filter;
        }
    }

    fn remove_layer(&mut self, id: LayerId) {
        self.calls.push(SceneCall::RemoveLayer(id));
        self.layers.remove(&id);
    }

    fn ease_camera(&mut self, target: CameraTarget, duration_ms: f64) {
        self.calls.push(SceneCall::EaseCamera(target, duration_ms));
        self.camera = target.resolve(&self.camera);
    }

    fn fit_bounds(&mut self, bounds: GeoBounds, padding_px: f64, duration_ms: f64) {
        self.calls
            .push(SceneCall::FitBounds(bounds, padding_px, duration_ms));
        self.camera.center = bounds.center();
    }

    fn pan_to(&mut self, center: GeoPoint, duration_ms: f64) {
        self.calls.push(SceneCall::PanTo(center, duration_ms));
        self.camera.center = center;
    }

    fn query_rendered_features(&self, _point: Point, layers: &[LayerId]) -> Vec<Feature> {
        self.picks
            .iter()
            .filter(|(layer, _)| layers.contains(layer) && self.layers.contains_key(layer))
            .map(|(_, f)| f.clone())
            .collect()
    }

    fn camera(&self) -> CameraPose {
        self.camera
    }
}
