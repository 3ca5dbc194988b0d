//! Expand / collapse state machine
//!
//! Owns the single progress scalar that morphs the mini player (0) into the
//! full player (1). Drags assign progress directly; settles run a spring.
//! Starting either one cancels the other, so progress has one writer at a time.
//!
//! - `spring`: Spring driver used for settles
//! - `binding`: Pure progress to visual parameter mapping

mod binding;
mod spring;

use std::time::Duration;

use crate::config::{LayoutMetrics, SpringConfig};

pub use binding::{derive, VisualParams};
pub use spring::{Spring, SpringStep};

/// Velocity (px/ms) past which a release overrides the position rule
const RELEASE_VELOCITY_THRESHOLD: f64 = 0.5;
const RELEASE_POSITION_THRESHOLD: f64 = 0.5;

/// Expansion progress, clamped to [0, 1] on construction
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Progress(f64);

impl Progress {
    pub const COLLAPSED: Self = Self(0.0);
    pub const EXPANDED: Self = Self(1.0);

    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            Self::COLLAPSED
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

/// Terminal layouts
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rest {
    Collapsed,
    Expanded,
}

impl Rest {
    pub fn progress(self) -> Progress {
        match self {
            Rest::Collapsed => Progress::COLLAPSED,
            Rest::Expanded => Progress::EXPANDED,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpansionState {
    Collapsed,
    Dragging,
    Animating(Rest),
    Expanded,
}

impl From<Rest> for ExpansionState {
    fn from(rest: Rest) -> Self {
        match rest {
            Rest::Collapsed => ExpansionState::Collapsed,
            Rest::Expanded => ExpansionState::Expanded,
        }
    }
}

/// Events from the host's vertical pan recognizer. `dy` is the total
/// displacement since the gesture started, positive downward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureEvent {
    Start,
    Move { dy: f64 },
    Release { dy: f64, velocity: f64 },
}

/// Scoped to one drag
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureState {
    pub origin: Rest,
    pub start_value: Progress,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExpansionSnapshot {
    pub state: ExpansionState,
    pub progress: Progress,
    /// Full-player controls accept input
    pub allow_interaction: bool,
}

/// Decide where a released drag settles.
pub fn release_target(origin: Rest, progress: Progress, velocity: f64) -> Rest {
    let p = progress.value();
    match origin {
        Rest::Expanded => {
            if p < RELEASE_POSITION_THRESHOLD || velocity > RELEASE_VELOCITY_THRESHOLD {
                Rest::Collapsed
            } else {
                Rest::Expanded
            }
        }
        Rest::Collapsed => {
            if p > RELEASE_POSITION_THRESHOLD || velocity < -RELEASE_VELOCITY_THRESHOLD {
                Rest::Expanded
            } else {
                Rest::Collapsed
            }
        }
    }
}

pub struct ExpansionStateMachine {
    state: ExpansionState,
    progress: Progress,
    /// Last terminal state reached; origin of the next drag
    settled: Rest,
    gesture: Option<GestureState>,
    spring: Option<Spring>,
    allow_interaction: bool,
    travel_distance: f64,
    spring_config: SpringConfig,
}

impl ExpansionStateMachine {
    pub fn new(layout: &LayoutMetrics, spring_config: SpringConfig) -> Self {
        Self {
            state: ExpansionState::Collapsed,
            progress: Progress::COLLAPSED,
            settled: Rest::Collapsed,
            gesture: None,
            spring: None,
            allow_interaction: false,
            travel_distance: layout.travel_distance(),
            spring_config,
        }
    }

    pub fn state(&self) -> ExpansionState {
        self.state
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn allow_interaction(&self) -> bool {
        self.allow_interaction
    }

    pub fn gesture(&self) -> Option<GestureState> {
        self.gesture
    }

    pub fn snapshot(&self) -> ExpansionSnapshot {
        ExpansionSnapshot {
            state: self.state,
            progress: self.progress,
            allow_interaction: self.allow_interaction,
        }
    }

    pub fn visual_params(&self, layout: &LayoutMetrics) -> VisualParams {
        derive(self.progress, layout)
    }

    pub fn expand(&mut self) {
        self.animate_to(Rest::Expanded);
    }

    pub fn collapse(&mut self) {
        self.animate_to(Rest::Collapsed);
    }

    fn animate_to(&mut self, target: Rest) {
        if self.state == target.into() || self.state == ExpansionState::Animating(target) {
            tracing::trace!(?target, "Already at or heading to target");
            return;
        }
        self.gesture = None;
        self.allow_interaction = false;
        self.spring = Some(Spring::new(
            self.progress.value(),
            0.0,
            target.progress().value(),
            &self.spring_config,
        ));
        self.state = ExpansionState::Animating(target);
        tracing::debug!(?target, progress = self.progress.value(), "Expansion animating");
    }

    pub fn handle_gesture(&mut self, event: GestureEvent) {
        match event {
            GestureEvent::Start => self.begin_drag(),
            GestureEvent::Move { dy } => self.drag_to(dy),
            GestureEvent::Release { dy, velocity } => self.release(dy, velocity),
        }
    }

    fn begin_drag(&mut self) {
        let origin = match self.state {
            ExpansionState::Dragging => {
                tracing::trace!("Gesture start ignored, already dragging");
                return;
            }
            ExpansionState::Collapsed => Rest::Collapsed,
            ExpansionState::Expanded => Rest::Expanded,
            ExpansionState::Animating(_) => {
                self.spring = None;
                self.settled
            }
        };

        self.allow_interaction = false;
        self.gesture = Some(GestureState {
            origin,
            start_value: self.progress,
        });
        self.state = ExpansionState::Dragging;
        tracing::trace!(?origin, start = self.progress.value(), "Drag started");
    }

    fn drag_to(&mut self, dy: f64) {
        let Some(gesture) = self.gesture else {
            return;
        };
        let travelled = dy / self.travel_distance;
        let raw = match gesture.origin {
            Rest::Expanded => 1.0 - travelled,
            Rest::Collapsed => -travelled,
        };
        self.progress = Progress::new(raw);
    }

    fn release(&mut self, dy: f64, velocity: f64) {
        let Some(gesture) = self.gesture else {
            return;
        };
        self.drag_to(dy);
        let target = release_target(gesture.origin, self.progress, velocity);
        tracing::debug!(
            origin = ?gesture.origin,
            progress = self.progress.value(),
            velocity,
            ?target,
            "Drag released"
        );
        self.animate_to(target);
    }

    /// Advance a running settle by `dt`. Returns the terminal state when the
    /// animation lands this tick.
    pub fn tick(&mut self, dt: Duration) -> Option<Rest> {
        let ExpansionState::Animating(target) = self.state else {
            return None;
        };
        let spring = self.spring.as_mut()?;
        let step = spring.step(dt);
        self.progress = Progress::new(step.value);

        if !step.settled {
            return None;
        }

        self.spring = None;
        self.progress = target.progress();
        self.settled = target;
        self.state = target.into();
        self.allow_interaction = target == Rest::Expanded;
        tracing::debug!(?target, "Expansion settled");
        Some(target)
    }
}
