//! The `LayoutStore` struct with observable state.
//!
//! Uses `eyeball` for observable values that can be subscribed to. The store
//! is owned by the layout actor; nothing else mutates it.

use std::collections::HashMap;
use std::sync::Arc;

use eyeball::Observable;

use super::messages::{DragId, LayoutPreview, LayoutSubscription};
use crate::grid::{
    GridOccupancy, LayoutSnapshot, OccupancyCache, WidgetId, WidgetPosition, WidgetRegistry,
    find_position,
};

/// The single source of truth for widget positions.
pub struct LayoutStore {
    /// Committed layout, replaced wholesale on every mutation.
    pub layout: Observable<LayoutSnapshot>,

    /// Live preview of the active drag, if any.
    pub preview: Observable<Option<LayoutPreview>>,

    /// Whether widgets are in their draggable presentation.
    pub edit_mode: Observable<bool>,

    /// Static widget catalog.
    registry: WidgetRegistry,

    /// Occupancy of the committed layout, keyed by its structural hash.
    occupancy: OccupancyCache,

    /// Active drag per widget. A widget is never the target of two drags.
    active_drags: HashMap<WidgetId, DragId>,
}

impl LayoutStore {
    /// Create a store with the given catalog and initial layout.
    #[must_use]
    pub fn new(registry: WidgetRegistry, positions: Vec<WidgetPosition>) -> Self {
        Self {
            layout: Observable::new(positions.into()),
            preview: Observable::new(None),
            edit_mode: Observable::new(false),
            registry,
            occupancy: OccupancyCache::new(),
            active_drags: HashMap::new(),
        }
    }

    // ========================================================================
    // Layout
    // ========================================================================

    /// Immutable snapshot of the committed layout.
    #[must_use]
    pub fn snapshot(&self) -> LayoutSnapshot { Arc::clone(Observable::get(&self.layout)) }

    /// Get a widget position by id.
    #[must_use]
    pub fn get_widget(&self, id: &str) -> Option<WidgetPosition> {
        find_position(&**Observable::get(&self.layout), id).cloned()
    }

    /// Replace the committed layout and notify subscribers.
    pub fn commit(&mut self, positions: Vec<WidgetPosition>) {
        Observable::set(&mut self.layout, positions.into());
    }

    /// Occupancy of the committed layout, rebuilt only when the layout changed.
    pub fn occupancy(&mut self) -> Arc<GridOccupancy> {
        let layout = Observable::get(&self.layout);
        self.occupancy.get_or_compute(layout)
    }

    /// Number of occupancy rebuilds so far.
    #[must_use]
    pub const fn occupancy_rebuilds(&self) -> u64 { self.occupancy.rebuilds() }

    #[must_use]
    pub const fn registry(&self) -> &WidgetRegistry { &self.registry }

    // ========================================================================
    // Edit Mode
    // ========================================================================

    #[must_use]
    pub fn is_edit_mode(&self) -> bool { *Observable::get(&self.edit_mode) }

    pub fn set_edit_mode(&mut self, enabled: bool) {
        Observable::set_if_not_eq(&mut self.edit_mode, enabled);
    }

    // ========================================================================
    // Drag Sessions
    // ========================================================================

    /// Register a drag. Returns `false` if the widget is already being dragged.
    pub fn begin_drag(&mut self, widget_id: &str, drag_id: DragId) -> bool {
        if self.active_drags.contains_key(widget_id) {
            return false;
        }
        self.active_drags.insert(widget_id.to_string(), drag_id);
        true
    }

    /// Returns the widget a drag is active on.
    #[must_use]
    pub fn drag_widget(&self, drag_id: DragId) -> Option<&str> {
        self.active_drags
            .iter()
            .find(|(_, active)| **active == drag_id)
            .map(|(widget_id, _)| widget_id.as_str())
    }

    /// Returns the active drag on a widget.
    #[must_use]
    pub fn active_drag(&self, widget_id: &str) -> Option<DragId> {
        self.active_drags.get(widget_id).copied()
    }

    /// Ends a drag, returning the widget it was on.
    pub fn end_drag(&mut self, drag_id: DragId) -> Option<WidgetId> {
        let widget_id = self.drag_widget(drag_id)?.to_string();
        self.active_drags.remove(&widget_id);
        if self.preview_drag() == Some(drag_id) {
            self.clear_preview();
        }
        Some(widget_id)
    }

    /// Ends every drag and clears the preview.
    pub fn clear_drags(&mut self) {
        self.active_drags.clear();
        self.clear_preview();
    }

    /// Active drags, sorted by widget id.
    #[must_use]
    pub fn active_drags(&self) -> Vec<(WidgetId, DragId)> {
        let mut drags: Vec<_> = self.active_drags.iter().map(|(w, d)| (w.clone(), *d)).collect();
        drags.sort();
        drags
    }

    // ========================================================================
    // Preview
    // ========================================================================

    pub fn set_preview(&mut self, preview: LayoutPreview) {
        Observable::set(&mut self.preview, Some(preview));
    }

    pub fn clear_preview(&mut self) {
        if Observable::get(&self.preview).is_some() {
            Observable::set(&mut self.preview, None);
        }
    }

    fn preview_drag(&self) -> Option<DragId> {
        Observable::get(&self.preview).as_ref().map(|preview| preview.drag_id)
    }

    // ========================================================================
    // Subscriptions
    // ========================================================================

    /// Subscribe to every observable part of the store.
    #[must_use]
    pub fn subscribe(&self) -> LayoutSubscription {
        LayoutSubscription {
            layout: Observable::subscribe(&self.layout),
            preview: Observable::subscribe(&self.preview),
            edit_mode: Observable::subscribe(&self.edit_mode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{GridCell, default_catalog, default_layout};

    fn store() -> LayoutStore {
        LayoutStore::new(WidgetRegistry::new(default_catalog()), default_layout())
    }

    #[test]
    fn test_single_drag_per_widget() {
        let mut store = store();
        let first = DragId::now_v7();
        let second = DragId::now_v7();

        assert!(store.begin_drag("steps", first));
        assert!(!store.begin_drag("steps", second));
        assert!(store.begin_drag("water", second));
        assert_eq!(store.drag_widget(second), Some("water"));

        assert_eq!(store.end_drag(first).as_deref(), Some("steps"));
        assert_eq!(store.end_drag(first), None);
        assert_eq!(store.active_drag("steps"), None);
    }

    #[test]
    fn test_end_drag_clears_its_preview_only() {
        let mut store = store();
        let dragging = DragId::now_v7();
        let other = DragId::now_v7();
        store.begin_drag("steps", dragging);
        store.begin_drag("water", other);
        store.set_preview(LayoutPreview {
            drag_id: dragging,
            widget_id: "steps".into(),
            target: GridCell::new(1, 1),
            positions: store.snapshot(),
        });

        store.end_drag(other);
        assert!(Observable::get(&store.preview).is_some());
        store.end_drag(dragging);
        assert!(Observable::get(&store.preview).is_none());
    }

    #[test]
    fn test_occupancy_cached_until_commit() {
        let mut store = store();
        let _ = store.occupancy();
        let _ = store.occupancy();
        assert_eq!(store.occupancy_rebuilds(), 1);

        let mut positions = store.snapshot().to_vec();
        positions.swap(1, 2);
        store.commit(positions);
        let _ = store.occupancy();
        assert_eq!(store.occupancy_rebuilds(), 2);
    }
}
