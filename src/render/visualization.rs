//! Store-driven visualization
//!
//! Subscribes to the store, recomputes [`DerivedMetrics`] on every
//! notification or resize and forwards the results to its collaborators.
//! When the surface has no size yet, the draw is parked until the host
//! reports the next frame via [`Visualization::on_frame`].

use std::sync::{Arc, Mutex, PoisonError};

use super::{CaptionCycle, ChartSurface, Clock, DonutLayout, TextPanel};
use crate::metrics::DerivedMetrics;
use crate::store::{AppState, AppStore, Subscription};

/// What a render pass did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Inputs missing; nothing touched
    Skipped,
    /// Text updated, chart waiting for a non-zero surface
    Deferred(DerivedMetrics),
    /// Text and chart updated
    Drawn(DerivedMetrics),
}

impl RenderOutcome {
    pub fn metrics(&self) -> Option<DerivedMetrics> {
        match self {
            RenderOutcome::Skipped => None,
            RenderOutcome::Deferred(metrics) | RenderOutcome::Drawn(metrics) => Some(*metrics),
        }
    }
}

pub struct Visualization<C, T> {
    store: AppStore,
    surface: C,
    panel: T,
    clock: Arc<dyn Clock>,
    layout: DonutLayout,
    cycle: Option<CaptionCycle>,
    pending_frame: Option<AppState>,
    subscription: Option<Subscription>,
}

impl<C, T> Visualization<C, T>
where
    C: ChartSurface,
    T: TextPanel,
{
    pub fn new(
        store: AppStore,
        surface: C,
        panel: T,
        clock: Arc<dyn Clock>,
        layout: DonutLayout,
    ) -> Self {
        Self {
            store,
            surface,
            panel,
            clock,
            layout,
            cycle: None,
            pending_frame: None,
            subscription: None,
        }
    }

    /// Render one state
    pub fn update(&mut self, state: &AppState) -> RenderOutcome {
        let Some(metrics) = DerivedMetrics::from_state(state, self.clock.now()) else {
            tracing::trace!("Render skipped, inputs incomplete");
            return RenderOutcome::Skipped;
        };

        self.panel
            .show_weeks(metrics.weeks_lived, metrics.weeks_remaining);

        let outcome = if self.surface.measured_size().is_empty() {
            tracing::debug!("Chart surface has no size yet, deferring draw");
            self.pending_frame = Some(state.clone());
            RenderOutcome::Deferred(metrics)
        } else {
            self.pending_frame = None;
            self.cycle = Some(CaptionCycle::new(
                metrics.used_percentage,
                metrics.remaining_percentage,
            ));
            self.paint();
            RenderOutcome::Drawn(metrics)
        };

        self.panel.show_journey(metrics.remaining_percentage);

        outcome
    }

    /// Viewport changed; redraw from the store's current state
    pub fn on_resize(&mut self) -> RenderOutcome {
        let state = self.store.get_state();
        self.update(&state)
    }

    /// Display refresh; retries a deferred draw if there is one
    pub fn on_frame(&mut self) -> Option<RenderOutcome> {
        let state = self.pending_frame.take()?;
        Some(self.update(&state))
    }

    pub fn has_pending_frame(&self) -> bool {
        self.pending_frame.is_some()
    }

    /// Advance the centre caption and repaint
    ///
    /// Returns `false` when nothing has been drawn yet.
    pub fn tick_caption(&mut self) -> bool {
        match self.cycle.as_mut() {
            Some(cycle) => {
                cycle.advance();
            }
            None => return false,
        }
        if self.surface.measured_size().is_empty() {
            return false;
        }
        self.paint();
        true
    }

    pub fn caption_cycle(&self) -> Option<&CaptionCycle> {
        self.cycle.as_ref()
    }

    pub fn surface(&self) -> &C {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut C {
        &mut self.surface
    }

    pub fn panel(&self) -> &T {
        &self.panel
    }

    /// Stop listening and drop the caption cycle
    pub fn detach(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        self.cycle = None;
        self.pending_frame = None;
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    fn paint(&mut self) {
        let Some(cycle) = self.cycle.as_ref() else {
            return;
        };

        let size = self.surface.measured_size();
        let caption = cycle.caption();
        let arcs = self
            .layout
            .arcs(size, cycle.used(), cycle.remaining(), caption.highlighted);
        let labels = self
            .layout
            .labels(size, &caption.percentage, caption.description);

        self.surface.clear();
        for arc in &arcs {
            self.surface.draw_arc(arc);
        }
        for label in &labels {
            self.surface.draw_label(label);
        }
    }
}

impl<C, T> Visualization<C, T>
where
    C: ChartSurface + Send + 'static,
    T: TextPanel + Send + 'static,
{
    /// Subscribe a shared visualization to its store and render once
    pub fn attach(this: &Arc<Mutex<Self>>) {
        let store = lock(this).store.clone();

        let weak = Arc::downgrade(this);
        let subscription = store.subscribe(move |state: &AppState| {
            if let Some(vis) = weak.upgrade() {
                lock(&vis).update(state);
            }
        });

        let mut vis = lock(this);
        if let Some(previous) = vis.subscription.replace(subscription) {
            previous.unsubscribe();
        }
        let state = store.get_state();
        vis.update(&state);
    }
}

fn lock<V>(shared: &Mutex<V>) -> std::sync::MutexGuard<'_, V> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}
