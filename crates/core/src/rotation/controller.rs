//! Rotation state machine

use std::sync::Arc;
use std::time::Duration;

use recarga_domain::constants::ROTATION_INTERVAL;
use recarga_domain::{DashboardError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::countdown::Countdown;
use crate::reports::{ReportCatalog, ReportDescriptor};

/// Which report is active and whether the timer drives navigation.
///
/// Transitions take `self` by value and return the next state. Manual
/// navigation always turns auto-rotation off; [`RotationState::tick`] never
/// changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationState {
    pub current_index: usize,
    pub auto_rotate: bool,
}

impl Default for RotationState {
    fn default() -> Self {
        Self { current_index: 0, auto_rotate: true }
    }
}

impl RotationState {
    #[must_use]
    pub fn select_index(self, index: usize) -> Self {
        Self { current_index: index, auto_rotate: false }
    }

    #[must_use]
    pub fn next(self, len: usize) -> Self {
        if len == 0 {
            return self;
        }
        self.select_index((self.current_index + 1) % len)
    }

    #[must_use]
    pub fn previous(self, len: usize) -> Self {
        if len == 0 {
            return self;
        }
        self.select_index((self.current_index + len - 1) % len)
    }

    #[must_use]
    pub fn with_auto_rotate(self, enabled: bool) -> Self {
        Self { auto_rotate: enabled, ..self }
    }

    /// Timer expiry: advance only while auto-rotating, keeping the flag.
    #[must_use]
    pub fn tick(self, len: usize) -> Self {
        if !self.auto_rotate || len == 0 {
            return self;
        }
        Self { current_index: (self.current_index + 1) % len, ..self }
    }
}

/// Rotation state bound to a report catalog.
///
/// Keeps `0 <= current_index < catalog.len()` at all times.
#[derive(Debug, Clone)]
pub struct RotationController {
    catalog: Arc<ReportCatalog>,
    state: RotationState,
}

impl RotationController {
    /// Start at the first report with auto-rotation on.
    pub fn new(catalog: Arc<ReportCatalog>) -> Self {
        Self { catalog, state: RotationState::default() }
    }

    /// Resume from a saved state.
    ///
    /// # Errors
    /// `DashboardError::UnknownReport` when the saved index is outside the
    /// catalog.
    pub fn with_state(catalog: Arc<ReportCatalog>, state: RotationState) -> Result<Self> {
        let mut controller = Self::new(catalog);
        controller.check_index(state.current_index)?;
        controller.state = state;
        Ok(controller)
    }

    /// Fixed wait between auto-rotated renders.
    pub const fn interval() -> Duration {
        ROTATION_INTERVAL
    }

    pub fn state(&self) -> RotationState {
        self.state
    }

    pub fn catalog(&self) -> &Arc<ReportCatalog> {
        &self.catalog
    }

    pub fn current_index(&self) -> usize {
        self.state.current_index
    }

    pub fn auto_rotate(&self) -> bool {
        self.state.auto_rotate
    }

    /// The active report.
    pub fn current(&self) -> &ReportDescriptor {
        &self.catalog.as_slice()[self.state.current_index]
    }

    /// Jump to `index`, turning auto-rotation off.
    ///
    /// # Errors
    /// `DashboardError::UnknownReport` when `index` is outside the catalog;
    /// the state is left untouched.
    pub fn select_index(&mut self, index: usize) -> Result<RotationState> {
        self.check_index(index)?;
        self.apply(self.state.select_index(index), "select_index")
    }

    pub fn next(&mut self) -> RotationState {
        let len = self.catalog.len();
        self.set(self.state.next(len), "next")
    }

    pub fn previous(&mut self) -> RotationState {
        let len = self.catalog.len();
        self.set(self.state.previous(len), "previous")
    }

    /// Jump to the report called `name`, turning auto-rotation off.
    ///
    /// # Errors
    /// `DashboardError::UnknownReport` when no report has that name; the state
    /// is left untouched.
    pub fn select_by_name(&mut self, name: &str) -> Result<RotationState> {
        match self.catalog.index_of(name) {
            Some(index) => self.apply(self.state.select_index(index), "select_by_name"),
            None => {
                warn!(report = name, "navigation to unknown report rejected");
                Err(DashboardError::UnknownReport(name.to_string()))
            }
        }
    }

    /// Point back at `index` without touching the auto-rotate flag.
    ///
    /// For callers that keep showing a report after [`after_render`] already
    /// advanced past it.
    ///
    /// [`after_render`]: RotationController::after_render
    ///
    /// # Errors
    /// `DashboardError::UnknownReport` when `index` is outside the catalog.
    pub fn rewind_to(&mut self, index: usize) -> Result<RotationState> {
        self.check_index(index)?;
        self.apply(RotationState { current_index: index, ..self.state }, "rewind")
    }

    pub fn toggle_auto_rotate(&mut self, enabled: bool) -> RotationState {
        self.set(self.state.with_auto_rotate(enabled), "toggle_auto_rotate")
    }

    /// Timer expiry transition.
    pub fn tick(&mut self) -> RotationState {
        let len = self.catalog.len();
        self.set(self.state.tick(len), "tick")
    }

    /// Call once the report at the current index has been rendered.
    ///
    /// While auto-rotating, the index advances immediately so the next render
    /// shows the next report, and the countdown to that render is returned.
    /// Returns `None` when auto-rotation is off.
    pub fn after_render(&mut self) -> Option<Countdown> {
        if !self.state.auto_rotate {
            return None;
        }
        self.tick();
        Some(Countdown::new(Self::interval()))
    }

    /// Call when rendering the current report failed.
    ///
    /// The index stays put. While auto-rotating, the same report is retried
    /// after the usual interval.
    pub fn after_failure(&self) -> Option<Countdown> {
        self.state.auto_rotate.then(|| Countdown::new(Self::interval()))
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.catalog.len() {
            Ok(())
        } else {
            Err(DashboardError::UnknownReport(format!(
                "report index {index} is outside the catalog ({} reports)",
                self.catalog.len()
            )))
        }
    }

    fn apply(&mut self, next: RotationState, transition: &'static str) -> Result<RotationState> {
        Ok(self.set(next, transition))
    }

    fn set(&mut self, next: RotationState, transition: &'static str) -> RotationState {
        debug!(
            transition,
            from = self.state.current_index,
            to = next.current_index,
            auto_rotate = next.auto_rotate,
            "rotation state changed"
        );
        self.state = next;
        next
    }
}
