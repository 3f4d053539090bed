//! Viewport zoom / heatmap reconciliation.
//!
//! The map widget owns the actual camera; this controller mirrors the zoom
//! level and decides how the current result set should be rendered. Two
//! thresholds drive it: above [`HEAT_MAX_ZOOM`], enabling the heatmap steps
//! the map out once so the density surface stays meaningful; above
//! [`DETAIL_ZOOM`], aggregation gives way to discrete markers even with the
//! heatmap toggled on.

/// Zoom above which enabling the heatmap applies the corrective zoom-out.
pub const HEAT_MAX_ZOOM: f64 = 14.0;

/// Size of the one-time corrective zoom-out step.
pub const HEAT_ZOOM_STEP: f64 = 2.0;

/// Zoom above which the heatmap degrades to per-record markers.
pub const DETAIL_ZOOM: f64 = 16.0;

/// How the current result set is drawn on the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderMode {
    /// One colored circle per record.
    Markers,
    /// Aggregated density surface.
    HeatSurface,
}

#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    zoom: f64,
    heatmap_enabled: bool,
    heat_max_zoom: f64,
    detail_zoom: f64,
}

impl Viewport {
    pub fn new(initial_zoom: f64) -> Self {
        Self::with_thresholds(initial_zoom, HEAT_MAX_ZOOM, DETAIL_ZOOM)
    }

    /// Builds a viewport with custom thresholds (persisted settings).
    pub fn with_thresholds(initial_zoom: f64, heat_max_zoom: f64, detail_zoom: f64) -> Self {
        Self {
            zoom: initial_zoom,
            heatmap_enabled: false,
            heat_max_zoom,
            detail_zoom,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn heatmap_enabled(&self) -> bool {
        self.heatmap_enabled
    }

    /// Records the zoom after every map zoom change.
    ///
    /// Must be fed also while the heatmap is off: enabling it later applies
    /// the corrective step against the current level.
    pub fn on_zoom_end(&mut self, zoom: f64) {
        self.zoom = zoom;
    }

    /// Toggles the heatmap, returning a corrective zoom target when one
    /// must be applied to the map.
    ///
    /// Enabling the heatmap while zoomed in past the heat threshold steps
    /// the zoom out once. It is a one-time action on the enabling
    /// transition, not a continuous clamp: the user may freely zoom back in
    /// afterwards. Disabling never corrects.
    pub fn set_heatmap(&mut self, enabled: bool) -> Option<f64> {
        self.heatmap_enabled = enabled;
        if enabled && self.zoom > self.heat_max_zoom {
            let target = self.zoom - HEAT_ZOOM_STEP;
            self.zoom = target;
            return Some(target);
        }
        None
    }

    pub fn toggle_heatmap(&mut self) -> Option<f64> {
        self.set_heatmap(!self.heatmap_enabled)
    }

    /// Render mode for the current zoom and heatmap toggle.
    ///
    /// Markers when the heatmap is off, and also when zoomed in past the
    /// detail threshold, where aggregation stops being meaningful.
    pub fn render_mode(&self) -> RenderMode {
        if self.heatmap_enabled && self.zoom <= self.detail_zoom {
            RenderMode::HeatSurface
        } else {
            RenderMode::Markers
        }
    }

    /// True when the heatmap is on but the zoom forces discrete markers;
    /// the UI shows a "detailed view" notice in that window.
    pub fn showing_detail_notice(&self) -> bool {
        self.heatmap_enabled && self.zoom > self.detail_zoom
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(13.0)
    }
}
