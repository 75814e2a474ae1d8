use crate::animation::ease::Ease;
use crate::foundation::core::{GeoBounds, GeoPoint, Lerp, Point, Rgba8, Vec2};
use crate::foundation::error::{RouteplayError, RouteplayResult};
use crate::scene::renderer::{
    CameraPose, CameraTarget, Feature, FeatureCollection, Geometry, LayerFilter, LayerId,
    LayerKind, LayerPaint, LayerSpec, MapRenderer, PaintColor, SourceId,
};
use std::collections::BTreeMap;
use vello_cpu::kurbo::Shape as _;

const TILE_SIZE: f64 = 256.0;
const MAX_MERCATOR_LAT: f64 = 85.051_128_78;
const MAX_ZOOM: f64 = 20.0;
const PICK_SLOP_PX: f64 = 2.0;

/// A rendered frame as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixels as straight (non-premultiplied) RGBA8, for PNG and other image encoders.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if !self.premultiplied {
            return out;
        }
        for px in out.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            match a {
                0 => px.copy_from_slice(&[0, 0, 0, 0]),
                255 => {}
                _ => {
                    for c in &mut px[..3] {
                        let v = (u16::from(*c) * 255 + a / 2) / a;
                        *c = v.min(255) as u8;
                    }
                }
            }
        }
        out
    }
}

/// Options for [`CpuMapRenderer`].
#[derive(Clone, Copy, Debug)]
pub struct CpuRenderOpts {
    /// Surface width.
    pub width: u32,
    /// Surface height.
    pub height: u32,
    /// Background color.
    pub clear_rgba: [u8; 4],
    /// Curve used for camera transitions.
    pub camera_ease: Ease,
}

impl Default for CpuRenderOpts {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            clear_rgba: [18, 20, 28, 255],
            camera_ease: Ease::OutCubic,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct CameraTransition {
    from: CameraPose,
    to: CameraPose,
    start_ms: f64,
    duration_ms: f64,
}

/// Software map renderer backed by `vello_cpu`.
///
/// Projects with Web-Mercator around the camera center, rotates by bearing and foreshortens by
/// pitch. Camera moves are eased over wall-clock time supplied through [`MapRenderer::advance`].
#[derive(Clone, Debug)]
pub struct CpuMapRenderer {
    opts: CpuRenderOpts,
    sources: BTreeMap<SourceId, FeatureCollection>,
    layers: BTreeMap<LayerId, LayerSpec>,
    camera: CameraPose,
    transition: Option<CameraTransition>,
    now_ms: f64,
}

impl CpuMapRenderer {
    /// Empty renderer with the given surface options.
    pub fn new(opts: CpuRenderOpts) -> Self {
        Self {
            opts,
            sources: BTreeMap::new(),
            layers: BTreeMap::new(),
            camera: CameraPose::default(),
            transition: None,
            now_ms: 0.0,
        }
    }

    /// Surface options.
    pub fn opts(&self) -> CpuRenderOpts {
        self.opts
    }

    /// Whether a camera transition is in flight.
    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Screen position of `p` under the current camera.
    pub fn project(&self, p: GeoPoint) -> Point {
        self.view().project(p)
    }

    /// Rasterize every registered layer in draw order.
    pub fn render(&self) -> RouteplayResult<FrameRGBA> {
        let (w, h) = (self.opts.width, self.opts.height);
        if w == 0 || h == 0 {
            return Err(RouteplayError::render("surface size must be non-zero"));
        }
        let w16: u16 = w
            .try_into()
            .map_err(|_| RouteplayError::render("surface width exceeds u16"))?;
        let h16: u16 = h
            .try_into()
            .map_err(|_| RouteplayError::render("surface height exceeds u16"))?;

        let mut ctx = vello_cpu::RenderContext::new(w16, h16);
        let [r, g, b, a] = self.opts.clear_rgba;
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, f64::from(w), f64::from(h)));

        let view = self.view();
        for id in LayerId::ALL {
            let Some(spec) = self.layers.get(&id) else {
                continue;
            };
            let Some(data) = self.sources.get(&spec.source) else {
                continue;
            };
            draw_layer(&mut ctx, &view, spec, data);
        }

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
        ctx.render_to_pixmap(&mut pixmap);
        Ok(FrameRGBA {
            width: w,
            height: h,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn view(&self) -> View {
        View::new(
            &self.camera,
            f64::from(self.opts.width),
            f64::from(self.opts.height),
        )
    }

    fn start_transition(&mut self, to: CameraPose, duration_ms: f64) {
        if duration_ms.is_nan() || duration_ms <= 0.0 {
            self.camera = to;
            self.transition = None;
            return;
        }
        self.transition = Some(CameraTransition {
            from: self.camera,
            to,
            start_ms: self.now_ms,
            duration_ms,
        });
    }
}

impl MapRenderer for CpuMapRenderer {
    fn add_source(&mut self, id: SourceId, data: FeatureCollection) {
        self.sources.insert(id, data);
    }

    fn set_source_data(&mut self, id: SourceId, data: FeatureCollection) {
        if let Some(slot) = self.sources.get_mut(&id) {
            *slot = data;
        }
    }

    fn remove_source(&mut self, id: SourceId) {
        self.sources.remove(&id);
    }

    fn add_layer(&mut self, spec: LayerSpec) {
        self.layers.insert(spec.id, spec);
    }

    fn set_layer_paint(&mut self, id: LayerId, paint: LayerPaint) {
        if let Some(l) = self.layers.get_mut(&id) {
            l.paint = paint;
        }
    }

    fn set_layer_filter(&mut self, id: LayerId, filter: LayerFilter) {
        if let Some(l) = self.layers.get_mut(&id) {
            l.filter = filter;
        }
    }

    fn remove_layer(&mut self, id: LayerId) {
        self.layers.remove(&id);
    }

    fn ease_camera(&mut self, target: CameraTarget, duration_ms: f64) {
        let base = self.transition.map(|t| t.to).unwrap_or(self.camera);
        self.start_transition(target.resolve(&base), duration_ms);
    }

    fn fit_bounds(&mut self, bounds: GeoBounds, padding_px: f64, duration_ms: f64) {
        let zoom = fit_zoom(
            bounds,
            f64::from(self.opts.width),
            f64::from(self.opts.height),
            padding_px,
        );
        let to = CameraPose {
            center: bounds.center(),
            zoom,
            bearing: 0.0,
            pitch: 0.0,
        };
        self.start_transition(to, duration_ms);
    }

    fn pan_to(&mut self, center: GeoPoint, duration_ms: f64) {
        self.ease_camera(
            CameraTarget {
                center: Some(center),
                ..CameraTarget::default()
            },
            duration_ms,
        );
    }

    fn query_rendered_features(&self, point: Point, layers: &[LayerId]) -> Vec<Feature> {
        let view = self.view();
        let mut out = Vec::new();
        for id in LayerId::ALL.into_iter().rev() {
            if !layers.contains(&id) {
                continue;
            }
            let Some(spec) = self.layers.get(&id) else {
                continue;
            };
            let Some(data) = self.sources.get(&spec.source) else {
                continue;
            };
            for f in data.iter().rev() {
                if spec.filter.matches(f) && hits(&view, spec, f, point) {
                    out.push(f.clone());
                }
            }
        }
        out
    }

    fn camera(&self) -> CameraPose {
        self.camera
    }

    fn advance(&mut self, now_ms: f64) {
        if !now_ms.is_finite() {
            return;
        }
        self.now_ms = now_ms;
        let Some(tr) = self.transition else {
            return;
        };
        let t = (now_ms - tr.start_ms) / tr.duration_ms;
        if t >= 1.0 {
            self.camera = tr.to;
            self.transition = None;
        } else {
            self.camera = self.opts.camera_ease.sample(&tr.from, &tr.to, t);
        }
    }
}

/// Camera-space projection for one frame.
struct View {
    center_world: Vec2,
    scale: f64,
    cos_b: f64,
    sin_b: f64,
    tilt: f64,
    half: Vec2,
}

impl View {
    fn new(camera: &CameraPose, width: f64, height: f64) -> Self {
        let scale = TILE_SIZE * camera.zoom.clamp(0.0, MAX_ZOOM).exp2();
        let theta = (-camera.bearing).to_radians();
        Self {
            center_world: mercator(camera.center) * scale,
            scale,
            cos_b: theta.cos(),
            sin_b: theta.sin(),
            tilt: camera.pitch.clamp(0.0, 85.0).to_radians().cos(),
            half: Vec2::new(width * 0.5, height * 0.5),
        }
    }

    fn project(&self, p: GeoPoint) -> Point {
        let d = mercator(p) * self.scale - self.center_world;
        let x = d.x * self.cos_b - d.y * self.sin_b;
        let y = (d.x * self.sin_b + d.y * self.cos_b) * self.tilt;
        Point::new(x + self.half.x, y + self.half.y)
    }
}

/// Web-Mercator position in `[0, 1]^2` (y grows southwards).
fn mercator(p: GeoPoint) -> Vec2 {
    let lat = p.lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
    let x = (p.lng + 180.0) / 360.0;
    let s = lat.sin();
    let y = 0.5 - ((1.0 + s) / (1.0 - s)).ln() / (4.0 * std::f64::consts::PI);
    Vec2::new(x, y)
}

fn fit_zoom(bounds: GeoBounds, width: f64, height: f64, padding_px: f64) -> f64 {
    let a = mercator(bounds.min) * TILE_SIZE;
    let b = mercator(bounds.max) * TILE_SIZE;
    let dx = (b.x - a.x).abs();
    let dy = (b.y - a.y).abs();
    let avail_w = (width - 2.0 * padding_px).max(1.0);
    let avail_h = (height - 2.0 * padding_px).max(1.0);

    let fit = match (dx > 0.0, dy > 0.0) {
        (false, false) => return 16.0,
        (true, false) => avail_w / dx,
        (false, true) => avail_h / dy,
        (true, true) => (avail_w / dx).min(avail_h / dy),
    };
    fit.log2().clamp(0.0, MAX_ZOOM)
}

fn to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn feature_color(paint: &PaintColor, f: &Feature) -> Rgba8 {
    match *paint {
        PaintColor::Solid(c) => c,
        PaintColor::FeatureOr(c) => f.color.unwrap_or(c),
        PaintColor::Gradient { from, .. } => from,
    }
}

fn draw_layer(
    ctx: &mut vello_cpu::RenderContext,
    view: &View,
    spec: &LayerSpec,
    data: &FeatureCollection,
) {
    let opacity = spec.paint.opacity.clamp(0.0, 1.0) as f32;
    if opacity <= 0.0 {
        return;
    }
    if opacity < 1.0 {
        ctx.push_opacity_layer(opacity);
    }

    for f in data.iter().filter(|f| spec.filter.matches(f)) {
        match (&spec.kind, &f.geometry) {
            (LayerKind::Line, Geometry::LineString(points)) if points.len() >= 2 => {
                draw_line(ctx, view, &spec.paint, f, points);
            }
            (LayerKind::Circle, Geometry::Point(p)) => {
                let center = to_cpu(view.project(*p));
                let circle = vello_cpu::kurbo::Circle::new(center, spec.paint.size.max(0.0));
                ctx.set_paint(color_to_cpu(feature_color(&spec.paint.color, f)));
                ctx.fill_path(&circle.to_path(0.1));
            }
            _ => {}
        }
    }

    if opacity < 1.0 {
        ctx.pop_layer();
    }
}

fn draw_line(
    ctx: &mut vello_cpu::RenderContext,
    view: &View,
    paint: &LayerPaint,
    f: &Feature,
    points: &[GeoPoint],
) {
    let screen: Vec<Point> = points.iter().map(|p| view.project(*p)).collect();
    ctx.set_stroke(
        vello_cpu::kurbo::Stroke::new(paint.size.max(0.0))
            .with_join(vello_cpu::kurbo::Join::Round)
            .with_caps(vello_cpu::kurbo::Cap::Round),
    );

    if let PaintColor::Gradient { from, to } = paint.color {
        // Per-segment color by screen-length fraction.
        let total: f64 = screen.windows(2).map(|w| w[0].distance(w[1])).sum();
        let mut walked = 0.0;
        for w in screen.windows(2) {
            let len = w[0].distance(w[1]);
            let t = if total > 0.0 {
                (walked + len * 0.5) / total
            } else {
                0.0
            };
            walked += len;
            ctx.set_paint(color_to_cpu(Rgba8::lerp(&from, &to, t)));
            let mut seg = vello_cpu::kurbo::BezPath::new();
            seg.move_to(to_cpu(w[0]));
            seg.line_to(to_cpu(w[1]));
            ctx.stroke_path(&seg);
        }
        return;
    }

    let mut path = vello_cpu::kurbo::BezPath::new();
    path.move_to(to_cpu(screen[0]));
    for p in &screen[1..] {
        path.line_to(to_cpu(*p));
    }
    ctx.set_paint(color_to_cpu(feature_color(&paint.color, f)));
    ctx.stroke_path(&path);
}

fn hits(view: &View, spec: &LayerSpec, f: &Feature, at: Point) -> bool {
    let reach = spec.paint.size.max(0.0) + PICK_SLOP_PX;
    match (&spec.kind, &f.geometry) {
        (LayerKind::Circle, Geometry::Point(p)) => view.project(*p).distance(at) <= reach,
        (LayerKind::Line, Geometry::LineString(points)) => {
            let half = spec.paint.size.max(0.0) * 0.5 + PICK_SLOP_PX;
            points.windows(2).any(|w| {
                segment_distance(view.project(w[0]), view.project(w[1]), at) <= half
            })
        }
        _ => false,
    }
}

fn segment_distance(a: Point, b: Point, p: Point) -> f64 {
    let ab = b - a;
    let len2 = ab.hypot2();
    if len2 == 0.0 {
        return a.distance(p);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    (a + ab * t).distance(p)
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
