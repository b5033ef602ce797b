//! Floor-plan viewer.
//!
//! A [`FloorPlanViewer`] draws one floor of a shared [`FloorPlanData`] onto
//! the surface of its host and turns pointer and keyboard input into camera
//! moves and category assignments. It keeps its camera, gesture state and a
//! snapshot of the selected synoptique behind its own lock, and redraws
//! whenever the data model announces a change.

use std::sync::Arc;
use std::time::Duration;

use synoptiq_core::data::{AttributeValue, Synoptique};
use synoptiq_core::event_bus::{DataEvent, EventCategory, EventFilter, Subscription};
use synoptiq_core::types::{thread_safe, ThreadSafe};
use synoptiq_core::Palette;
use synoptiq_data::FloorPlanData;
use synoptiq_settings::ViewerSettings;

use crate::hit_test::point_in_feature;
use crate::input::{
    ClickProbe, Cursor, EventResponse, Gesture, GestureConfig, InteractionState, KeyEvent,
    MoveAction, PointerButton, PointerEvent, Selection, StrokeMode, WheelEvent,
};
use crate::renderer::{self, classify, CategoryCache, ResolvedStyle, Scene, Visibility};
use crate::surface::{Surface, SurfaceHost};
use crate::viewport::Camera;

/// Per-viewer configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewerOptions {
    /// Floor to show; `None` shows every floor.
    pub floor_id: Option<AttributeValue>,
    pub selected_synoptique: Option<String>,
    pub selected_category: Option<String>,
    pub settings: ViewerSettings,
}

impl ViewerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_floor(mut self, floor_id: impl Into<AttributeValue>) -> Self {
        self.floor_id = Some(floor_id.into());
        self
    }

    pub fn with_synoptique(mut self, synoptique_id: impl Into<String>) -> Self {
        self.selected_synoptique = Some(synoptique_id.into());
        self
    }

    pub fn with_category(mut self, category_id: impl Into<String>) -> Self {
        self.selected_category = Some(category_id.into());
        self
    }

    pub fn with_settings(mut self, settings: ViewerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Switches to the default settings of another palette.
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.settings = ViewerSettings::for_palette(palette);
        self
    }
}

/// Mapping change requested by a gesture.
#[derive(Debug)]
struct Mutation {
    synoptique_id: String,
    category_id: Option<String>,
    feature_id: String,
}

struct ViewState {
    surface: Option<Box<dyn Surface>>,
    camera: Camera,
    gesture: Gesture,
    cursor: Cursor,
    floor_id: Option<AttributeValue>,
    selected_synoptique: Option<String>,
    selected_category: Option<String>,
    settings: ViewerSettings,
    style: ResolvedStyle,
    cache: CategoryCache,
    centered: bool,
}

impl ViewState {
    fn selection(&self) -> Selection {
        Selection {
            synoptique: self.selected_synoptique.is_some(),
            category: self.selected_category.is_some(),
        }
    }

    fn rebuild_cache(&mut self, synoptiques: &[Synoptique]) {
        self.cache = CategoryCache::build(
            synoptiques,
            self.selected_synoptique.as_deref(),
            self.style.fallback_category_color,
        );
    }

    fn refresh_cursor(&mut self) {
        self.cursor = self.gesture.cursor(self.selection());
        if let Some(surface) = self.surface.as_mut() {
            surface.set_cursor(self.cursor);
        }
    }

    /// Fits the plan into the surface. Returns `false` when there is nothing
    /// to fit.
    fn center(&mut self, data: &FloorPlanData) -> bool {
        let Some((min_x, min_y, max_x, max_y)) = data.features().and_then(|f| f.bounds()) else {
            return false;
        };
        let fitted = self
            .camera
            .fit_to_bounds(min_x, min_y, max_x, max_y, self.settings.view_padding);
        if fitted {
            self.centered = true;
        }
        fitted
    }

    fn redraw(&mut self, data: &FloorPlanData) {
        let Some(surface) = self.surface.as_deref_mut() else {
            return;
        };
        let Some(features) = data.features() else {
            surface.clear();
            return;
        };
        let metadata = data.metadata();
        let filters = data.active_filters();

        let scene = Scene {
            features: &features,
            metadata: metadata.as_deref(),
            filters: &filters,
            floor_id: self.floor_id.as_ref(),
            synoptique_selected: self.selected_synoptique.is_some(),
            cache: &self.cache,
            style: &self.style,
        };
        let drawn = renderer::render(surface, &self.camera, &scene);
        tracing::trace!("Drew {} of {} features", drawn, features.len());
    }

    /// Last pickable feature containing the world point.
    fn feature_at(&self, data: &FloorPlanData, world_x: f64, world_y: f64) -> Option<String> {
        let features = data.features()?;
        let metadata = data.metadata();
        let filters = data.active_filters();

        features
            .features
            .iter()
            .filter(|feature| {
                classify(
                    &feature.id,
                    metadata.as_deref(),
                    self.floor_id.as_ref(),
                    &filters,
                ) == Visibility::Active
            })
            .filter(|feature| point_in_feature(world_x, world_y, feature, &features.vertices))
            .last()
            .map(|feature| feature.id.clone())
    }

    fn feature_at_screen(&self, data: &FloorPlanData, x: f64, y: f64) -> Option<String> {
        let (world_x, world_y) = self.camera.screen_to_world(x, y);
        self.feature_at(data, world_x, world_y)
    }

    /// The change a stroke makes to `feature_id`, if it makes one.
    fn mutation(&self, mode: StrokeMode, feature_id: String) -> Option<Mutation> {
        let synoptique_id = self.selected_synoptique.clone()?;
        let current = self.cache.category_of(&feature_id);
        match mode {
            StrokeMode::Assign => {
                let category_id = self.selected_category.clone()?;
                (current != Some(category_id.as_str())).then_some(Mutation {
                    synoptique_id,
                    category_id: Some(category_id),
                    feature_id,
                })
            }
            StrokeMode::Unassign => current.is_some().then_some(Mutation {
                synoptique_id,
                category_id: None,
                feature_id,
            }),
        }
    }
}

fn on_filters_changed(state: &mut ViewState, data: &FloorPlanData, _event: &DataEvent) {
    state.redraw(data);
}

fn on_synoptiques_changed(state: &mut ViewState, data: &FloorPlanData, event: &DataEvent) {
    if let Some(synoptiques) = event.synoptiques() {
        state.rebuild_cache(synoptiques);
    }
    state.redraw(data);
}

fn on_contents_changed(state: &mut ViewState, data: &FloorPlanData, event: &DataEvent) {
    match event {
        DataEvent::ContentsLoaded => {
            state.rebuild_cache(&data.get_synoptiques());
            if !state.centered {
                state.center(data);
            }
        }
        _ => {
            state.cache = CategoryCache::default();
            state.centered = false;
        }
    }
    state.redraw(data);
}

type Handler = fn(&mut ViewState, &FloorPlanData, &DataEvent);

fn subscribe(data: &Arc<FloorPlanData>, state: &ThreadSafe<ViewState>) -> Vec<Subscription> {
    let bus = data.events();
    [
        (EventCategory::Filters, on_filters_changed as Handler),
        (EventCategory::Mapping, on_synoptiques_changed),
        (EventCategory::Synoptiques, on_synoptiques_changed),
        (EventCategory::Contents, on_contents_changed),
    ]
    .into_iter()
    .map(|(category, handler)| {
        let data = Arc::downgrade(data);
        let state = Arc::downgrade(state);
        bus.subscribe_scoped(EventFilter::Categories(vec![category]), move |event| {
            let (Some(data), Some(state)) = (data.upgrade(), state.upgrade()) else {
                return;
            };
            let mut state = state.lock();
            handler(&mut state, &data, event);
        })
    })
    .collect()
}

/// Interactive view of one floor of a [`FloorPlanData`].
pub struct FloorPlanViewer {
    data: Arc<FloorPlanData>,
    host: Arc<dyn SurfaceHost>,
    state: ThreadSafe<ViewState>,
    subscriptions: Vec<Subscription>,
    disposed: bool,
}

impl FloorPlanViewer {
    /// Attaches a surface to `host`, subscribes to data changes and draws
    /// the plan, centred if it is already loaded.
    pub fn new(
        data: Arc<FloorPlanData>,
        host: Arc<dyn SurfaceHost>,
        options: ViewerOptions,
    ) -> Self {
        let ViewerOptions {
            floor_id,
            selected_synoptique,
            selected_category,
            mut settings,
        } = options;
        if let Err(e) = settings.validate() {
            tracing::warn!("Invalid viewer settings, using defaults: {}", e);
            settings = ViewerSettings::for_palette(settings.palette);
        }

        let (width, height) = host.client_size();
        let surface = host.attach_surface();
        let style = ResolvedStyle::from_styling(&settings.styling);
        let gesture = Gesture::new(GestureConfig {
            drag_threshold_px: settings.drag_threshold_px,
            click_max_duration: Duration::from_millis(settings.click_max_duration_ms),
        });

        let mut state = ViewState {
            surface: Some(surface),
            camera: Camera::new(width as f64, height as f64),
            gesture,
            cursor: Cursor::Default,
            floor_id,
            selected_synoptique,
            selected_category,
            settings,
            style,
            cache: CategoryCache::default(),
            centered: false,
        };
        state.rebuild_cache(&data.get_synoptiques());
        state.center(&data);
        state.redraw(&data);
        state.refresh_cursor();

        let state = thread_safe(state);
        let subscriptions = subscribe(&data, &state);
        tracing::debug!(
            "Viewer attached ({}x{}, {} subscriptions)",
            width,
            height,
            subscriptions.len()
        );

        Self {
            data,
            host,
            state,
            subscriptions,
            disposed: false,
        }
    }

    pub fn data(&self) -> &Arc<FloorPlanData> {
        &self.data
    }

    pub fn camera(&self) -> Camera {
        self.state.lock().camera
    }

    pub fn cursor(&self) -> Cursor {
        self.state.lock().cursor
    }

    pub fn interaction_state(&self) -> InteractionState {
        self.state.lock().gesture.state()
    }

    pub fn is_dragging(&self) -> bool {
        self.state.lock().gesture.is_dragging()
    }

    pub fn spacebar_down(&self) -> bool {
        self.state.lock().gesture.spacebar_down()
    }

    pub fn floor_id(&self) -> Option<AttributeValue> {
        self.state.lock().floor_id.clone()
    }

    pub fn selected_synoptique(&self) -> Option<String> {
        self.state.lock().selected_synoptique.clone()
    }

    pub fn selected_category(&self) -> Option<String> {
        self.state.lock().selected_category.clone()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Selects the synoptique whose categories are drawn and edited.
    ///
    /// Switching to another synoptique clears the selected category;
    /// re-selecting the current one changes nothing.
    pub fn set_selected_synoptique(&self, synoptique_id: Option<&str>) {
        if self.state.lock().selected_synoptique.as_deref() == synoptique_id {
            return;
        }

        let synoptiques = self.data.get_synoptiques();
        if let Some(id) = synoptique_id {
            if !synoptiques.iter().any(|s| s.id == id) {
                tracing::warn!("Selecting unknown synoptique {}", id);
            }
        }

        let mut state = self.state.lock();
        state.selected_synoptique = synoptique_id.map(str::to_string);
        state.selected_category = None;
        state.rebuild_cache(&synoptiques);
        state.redraw(&self.data);
        state.refresh_cursor();
    }

    /// Selects the category assigned by primary-button strokes.
    pub fn set_selected_category(&self, category_id: Option<&str>) {
        let mut state = self.state.lock();
        state.selected_category = category_id.map(str::to_string);
        state.refresh_cursor();
    }

    /// Fits the plan into the surface and redraws. Returns `false` when no
    /// data is loaded or the plan has no extent.
    pub fn center_view(&self) -> bool {
        let mut state = self.state.lock();
        let centered = state.center(&self.data);
        if centered {
            state.redraw(&self.data);
        }
        centered
    }

    /// Redraws the whole plan.
    pub fn draw(&self) {
        self.state.lock().redraw(&self.data);
    }

    /// Picks up the host's new client size, keeping the view centred on the
    /// same plan point.
    pub fn handle_resize(&self) {
        let (width, height) = self.host.client_size();
        let mut state = self.state.lock();
        state.camera.resize(width as f64, height as f64);
        if let Some(surface) = state.surface.as_mut() {
            surface.resize(width, height);
        }
        state.redraw(&self.data);
    }

    /// Feature under a point in plan coordinates.
    ///
    /// Features on other floors or excluded by the active filters are
    /// skipped. When several features contain the point, the last one in
    /// document order is returned.
    pub fn get_feature_at_point(&self, world_x: f64, world_y: f64) -> Option<String> {
        self.state.lock().feature_at(&self.data, world_x, world_y)
    }

    pub fn on_pointer_down(&self, event: &PointerEvent) -> EventResponse {
        let mut state = self.state.lock();
        let selection = state.selection();
        let response = state.gesture.pointer_down(event, selection);
        state.refresh_cursor();
        response
    }

    pub fn on_pointer_move(&self, event: &PointerEvent) -> EventResponse {
        let pending = {
            let mut state = self.state.lock();
            match state.gesture.pointer_move(event) {
                MoveAction::None => None,
                MoveAction::Pan { dx, dy } => {
                    state.camera.pan_by(dx, dy);
                    state.redraw(&self.data);
                    None
                }
                MoveAction::Probe { mode, x, y } => {
                    let hit = state.feature_at_screen(&self.data, x, y);
                    if state.gesture.visit(hit.as_deref()) {
                        hit.and_then(|feature_id| state.mutation(mode, feature_id))
                    } else {
                        None
                    }
                }
            }
        };

        if let Some(mutation) = pending {
            self.apply(mutation);
        }
        EventResponse::ignored()
    }

    pub fn on_pointer_up(&self, event: &PointerEvent) -> EventResponse {
        let pending = {
            let mut state = self.state.lock();
            let click = state.gesture.pointer_up(event);
            state.refresh_cursor();
            click.and_then(|ClickProbe { mode, x, y }| {
                state
                    .feature_at_screen(&self.data, x, y)
                    .and_then(|feature_id| state.mutation(mode, feature_id))
            })
        };

        if let Some(mutation) = pending {
            self.apply(mutation);
        }
        EventResponse::ignored()
    }

    pub fn on_pointer_leave(&self) {
        let mut state = self.state.lock();
        state.gesture.pointer_leave();
        state.refresh_cursor();
    }

    /// Zooms around the pointer. Positive `delta_y` zooms out.
    pub fn on_wheel(&self, event: &WheelEvent) -> EventResponse {
        if event.delta_y == 0.0 {
            return EventResponse::ignored();
        }

        let mut state = self.state.lock();
        let intensity = state.settings.zoom_intensity;
        let factor = if event.delta_y > 0.0 {
            1.0 - intensity
        } else {
            1.0 + intensity
        };
        let (min_scale, max_scale) = (state.settings.min_scale, state.settings.max_scale);
        state
            .camera
            .zoom_at(event.x, event.y, factor, min_scale, max_scale);
        state.redraw(&self.data);
        EventResponse::handled()
    }

    pub fn on_key_down(&self, event: &KeyEvent) -> EventResponse {
        let mut state = self.state.lock();
        let response = state.gesture.key_down(event);
        state.refresh_cursor();
        response
    }

    pub fn on_key_up(&self, event: &KeyEvent) -> EventResponse {
        let mut state = self.state.lock();
        let response = state.gesture.key_up(event);
        state.refresh_cursor();
        response
    }

    pub fn on_context_menu(&self, button: PointerButton) -> EventResponse {
        let state = self.state.lock();
        state.gesture.context_menu(button, state.selection())
    }

    /// Unsubscribes from the data model and hands the surface back to the
    /// host. Safe to call more than once.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.subscriptions.clear();
        self.state.lock().surface = None;
        self.host.detach_surface();
        self.disposed = true;
        tracing::debug!("Viewer disposed");
    }

    fn apply(&self, mutation: Mutation) {
        let changed = self.data.assign_category_to_feature(
            &mutation.synoptique_id,
            mutation.category_id.as_deref(),
            &mutation.feature_id,
        );
        tracing::debug!(
            "Gesture set {} to {:?} (changed: {})",
            mutation.feature_id,
            mutation.category_id,
            changed
        );
    }
}

impl Drop for FloorPlanViewer {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for FloorPlanViewer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FloorPlanViewer")
            .field("camera", &self.camera())
            .field("subscriptions", &self.subscriptions.len())
            .field("disposed", &self.disposed)
            .finish()
    }
}
