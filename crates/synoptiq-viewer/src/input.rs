//! Pointer and keyboard gesture tracking.
//!
//! [`Gesture`] is a pure state machine. It never touches the camera, the
//! surface or the data model; it tells the viewer what the input means and
//! the viewer carries it out.

use std::time::{Duration, Instant};

/// Mouse button that produced a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

/// Pointer position in surface pixels plus the button involved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
    pub button: PointerButton,
    pub at: Instant,
}

impl PointerEvent {
    pub fn new(x: f64, y: f64, button: PointerButton) -> Self {
        Self {
            x,
            y,
            button,
            at: Instant::now(),
        }
    }

    pub fn primary(x: f64, y: f64) -> Self {
        Self::new(x, y, PointerButton::Primary)
    }

    pub fn secondary(x: f64, y: f64) -> Self {
        Self::new(x, y, PointerButton::Secondary)
    }

    /// Same event stamped `elapsed` after `earlier`.
    pub fn after(mut self, earlier: &PointerEvent, elapsed: Duration) -> Self {
        self.at = earlier.at + elapsed;
        self
    }
}

/// Wheel movement at a surface position. Positive `delta_y` scrolls down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelEvent {
    pub x: f64,
    pub y: f64,
    pub delta_y: f64,
}

/// Key identity as far as the viewer cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyCode {
    Space,
    Other(String),
}

/// Key press or release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    /// Auto-repeat of a held key.
    pub repeat: bool,
    /// Focus is on a text field or similar editable control.
    pub editable_focus: bool,
}

impl KeyEvent {
    pub fn space() -> Self {
        Self {
            code: KeyCode::Space,
            repeat: false,
            editable_focus: false,
        }
    }
}

/// What the host should do with the native event after the viewer saw it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventResponse {
    /// Suppress the host's default action (context menu, page scroll).
    pub prevent_default: bool,
}

impl EventResponse {
    pub fn handled() -> Self {
        Self {
            prevent_default: true,
        }
    }

    pub fn ignored() -> Self {
        Self::default()
    }
}

/// Pointer cursor shown over the surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Cursor {
    #[default]
    Default,
    Grab,
    Grabbing,
    Crosshair,
    Cell,
}

impl Cursor {
    /// CSS cursor keyword.
    pub fn as_css(&self) -> &'static str {
        match self {
            Cursor::Default => "default",
            Cursor::Grab => "grab",
            Cursor::Grabbing => "grabbing",
            Cursor::Crosshair => "crosshair",
            Cursor::Cell => "cell",
        }
    }
}

/// What a pressed button is currently doing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InteractionState {
    #[default]
    Idle,
    Panning,
    Assigning,
    Unassigning,
}

/// Which selections are active on the viewer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub synoptique: bool,
    pub category: bool,
}

impl Selection {
    fn can_assign(&self) -> bool {
        self.synoptique && self.category
    }
}

/// Mutation a stroke applies to the features it crosses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeMode {
    Assign,
    Unassign,
}

/// Outcome of a pointer move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveAction {
    None,
    /// Translate the camera by a screen delta.
    Pan { dx: f64, dy: f64 },
    /// Hit-test at a screen point and apply the mode to what is found.
    Probe { mode: StrokeMode, x: f64, y: f64 },
}

/// Hit-test request issued by a click release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickProbe {
    pub mode: StrokeMode,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy)]
struct Press {
    x: f64,
    y: f64,
    at: Instant,
}

/// Thresholds separating clicks from drags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    pub drag_threshold_px: f64,
    pub click_max_duration: Duration,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            drag_threshold_px: synoptiq_core::constants::DRAG_THRESHOLD_PX,
            click_max_duration: Duration::from_millis(
                synoptiq_core::constants::CLICK_MAX_DURATION_MS,
            ),
        }
    }
}

/// Interaction state machine for one viewer.
#[derive(Debug, Clone, Default)]
pub struct Gesture {
    config: GestureConfig,
    state: InteractionState,
    is_dragging: bool,
    spacebar_down: bool,
    press: Option<Press>,
    pan_anchor: (f64, f64),
    last_feature: Option<String>,
}

impl Gesture {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    pub fn spacebar_down(&self) -> bool {
        self.spacebar_down
    }

    /// Feature most recently processed by the current stroke.
    pub fn last_feature(&self) -> Option<&str> {
        self.last_feature.as_deref()
    }

    pub fn pointer_down(&mut self, event: &PointerEvent, selection: Selection) -> EventResponse {
        self.last_feature = None;
        self.is_dragging = false;
        self.press = Some(Press {
            x: event.x,
            y: event.y,
            at: event.at,
        });

        match event.button {
            PointerButton::Primary => {
                if self.spacebar_down {
                    self.state = InteractionState::Panning;
                    self.pan_anchor = (event.x, event.y);
                } else if selection.can_assign() {
                    self.state = InteractionState::Assigning;
                } else {
                    self.state = InteractionState::Idle;
                }
                EventResponse::ignored()
            }
            PointerButton::Secondary if selection.synoptique => {
                self.state = InteractionState::Unassigning;
                EventResponse::handled()
            }
            PointerButton::Secondary | PointerButton::Middle => EventResponse::ignored(),
        }
    }

    pub fn pointer_move(&mut self, event: &PointerEvent) -> MoveAction {
        if self.state == InteractionState::Panning {
            let dx = event.x - self.pan_anchor.0;
            let dy = event.y - self.pan_anchor.1;
            self.pan_anchor = (event.x, event.y);
            return MoveAction::Pan { dx, dy };
        }

        if !self.is_dragging {
            if let Some(press) = self.press {
                let threshold = self.config.drag_threshold_px;
                self.is_dragging =
                    (event.x - press.x).abs() > threshold || (event.y - press.y).abs() > threshold;
            }
        }
        if !self.is_dragging {
            return MoveAction::None;
        }

        match self.stroke_mode() {
            Some(mode) => MoveAction::Probe {
                mode,
                x: event.x,
                y: event.y,
            },
            None => MoveAction::None,
        }
    }

    /// Records the feature a probe landed on.
    ///
    /// Returns `true` when the feature differs from the one processed last
    /// and should therefore be considered for mutation.
    pub fn visit(&mut self, feature_id: Option<&str>) -> bool {
        match feature_id {
            Some(id) if self.last_feature.as_deref() != Some(id) => {
                self.last_feature = Some(id.to_string());
                true
            }
            Some(_) => false,
            None => {
                self.last_feature = None;
                false
            }
        }
    }

    /// Ends the press. Returns the click to perform, if the release counts
    /// as one for the active state.
    pub fn pointer_up(&mut self, event: &PointerEvent) -> Option<ClickProbe> {
        let is_click = !self.is_dragging
            && self.press.is_some_and(|press| {
                event.at.saturating_duration_since(press.at) < self.config.click_max_duration
            });

        let mode = match (event.button, self.state) {
            (PointerButton::Primary, InteractionState::Assigning) => Some(StrokeMode::Assign),
            (PointerButton::Secondary, InteractionState::Unassigning) => {
                Some(StrokeMode::Unassign)
            }
            _ => None,
        };

        self.reset();
        mode.filter(|_| is_click).map(|mode| ClickProbe {
            mode,
            x: event.x,
            y: event.y,
        })
    }

    /// Pointer left the surface: any active gesture is abandoned.
    pub fn pointer_leave(&mut self) {
        if self.state != InteractionState::Idle {
            self.reset();
        }
    }

    pub fn key_down(&mut self, event: &KeyEvent) -> EventResponse {
        if event.repeat || event.editable_focus {
            return EventResponse::ignored();
        }
        match event.code {
            KeyCode::Space => {
                self.spacebar_down = true;
                EventResponse::handled()
            }
            KeyCode::Other(_) => EventResponse::ignored(),
        }
    }

    pub fn key_up(&mut self, event: &KeyEvent) -> EventResponse {
        match event.code {
            KeyCode::Space => {
                self.spacebar_down = false;
                EventResponse::ignored()
            }
            KeyCode::Other(_) => EventResponse::ignored(),
        }
    }

    /// Whether the host's context menu should be suppressed.
    pub fn context_menu(&self, button: PointerButton, selection: Selection) -> EventResponse {
        if self.state == InteractionState::Unassigning
            || (button == PointerButton::Secondary && selection.synoptique)
        {
            EventResponse::handled()
        } else {
            EventResponse::ignored()
        }
    }

    /// Cursor for the current state, first match wins.
    pub fn cursor(&self, selection: Selection) -> Cursor {
        if self.state == InteractionState::Panning {
            Cursor::Grabbing
        } else if self.spacebar_down {
            Cursor::Grab
        } else if self.state == InteractionState::Assigning && selection.category {
            Cursor::Crosshair
        } else if self.state == InteractionState::Unassigning {
            Cursor::Cell
        } else if selection.can_assign() {
            Cursor::Crosshair
        } else {
            Cursor::Default
        }
    }

    fn stroke_mode(&self) -> Option<StrokeMode> {
        match self.state {
            InteractionState::Assigning => Some(StrokeMode::Assign),
            InteractionState::Unassigning => Some(StrokeMode::Unassign),
            InteractionState::Idle | InteractionState::Panning => None,
        }
    }

    fn reset(&mut self) {
        self.state = InteractionState::Idle;
        self.is_dragging = false;
        self.last_feature = None;
        self.press = None;
    }
}
