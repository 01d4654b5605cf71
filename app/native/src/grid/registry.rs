//! Widget catalog: the static definitions known to the dashboard.

use std::collections::HashMap;

use super::types::{WidgetDefinition, WidgetId, WidgetPosition, WidgetSize};

/// Lookup table from widget id to its definition.
#[derive(Debug, Clone, Default)]
pub struct WidgetRegistry {
    definitions: HashMap<WidgetId, WidgetDefinition>,
    /// Catalog order, preserved for listing.
    order: Vec<WidgetId>,
}

impl WidgetRegistry {
    /// Builds a registry from definitions. Later duplicates replace earlier ones.
    #[must_use]
    pub fn new(definitions: impl IntoIterator<Item = WidgetDefinition>) -> Self {
        let mut registry = Self::default();
        for definition in definitions {
            registry.insert(definition);
        }
        registry
    }

    /// Adds or replaces a definition.
    pub fn insert(&mut self, definition: WidgetDefinition) {
        if !self.definitions.contains_key(&definition.id) {
            self.order.push(definition.id.clone());
        }
        self.definitions.insert(definition.id.clone(), definition);
    }

    /// Returns the definition for `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&WidgetDefinition> { self.definitions.get(id) }

    /// Returns whether `id` may be resized to `size`.
    ///
    /// Widgets missing from the registry accept any size, so layouts loaded
    /// without a catalog stay resizable.
    #[must_use]
    pub fn allows(&self, id: &str, size: WidgetSize) -> bool {
        self.get(id).is_none_or(|definition| definition.allows(size))
    }

    /// Iterates definitions in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &WidgetDefinition> {
        self.order.iter().filter_map(|id| self.definitions.get(id))
    }

    #[must_use]
    pub fn len(&self) -> usize { self.definitions.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.definitions.is_empty() }
}

/// The built-in catalog: one medium widget and six small ones.
#[must_use]
pub fn default_catalog() -> Vec<WidgetDefinition> {
    use WidgetSize::{Large, Medium, Small};

    vec![
        WidgetDefinition::new("weather", Medium, &[Medium, Large]),
        WidgetDefinition::new("steps", Small, &[Small, Medium]),
        WidgetDefinition::new("water", Small, &[Small, Medium]),
        WidgetDefinition::new("sleep", Small, &[Small, Medium, Large]),
        WidgetDefinition::new("mood", Small, &[Small]),
        WidgetDefinition::new("focus", Small, &[Small, Medium]),
        WidgetDefinition::new("tasks", Small, &[Small, Medium, Large]),
    ]
}

/// The initial layout for the built-in catalog.
///
/// Weather spans row 0; the six small widgets fill rows 1 to 3 in pairs.
#[must_use]
pub fn default_layout() -> Vec<WidgetPosition> {
    vec![
        WidgetPosition::new("weather", 0, 0, WidgetSize::Medium),
        WidgetPosition::new("steps", 0, 1, WidgetSize::Small),
        WidgetPosition::new("water", 1, 1, WidgetSize::Small),
        WidgetPosition::new("sleep", 0, 2, WidgetSize::Small),
        WidgetPosition::new("mood", 1, 2, WidgetSize::Small),
        WidgetPosition::new("focus", 0, 3, WidgetSize::Small),
        WidgetPosition::new("tasks", 1, 3, WidgetSize::Small),
    ]
}

/// Lays out a catalog at native sizes, filling free space top to bottom.
#[must_use]
pub fn layout_for_catalog(definitions: &[WidgetDefinition]) -> Vec<WidgetPosition> {
    let mut positions: Vec<WidgetPosition> = Vec::with_capacity(definitions.len());
    for definition in definitions {
        let span = definition.native_size.span();
        let cell = super::placement::find_free_position(span.width, span.height, &positions, None);
        positions.push(WidgetPosition::new(
            &definition.id,
            cell.x,
            cell.y,
            definition.native_size,
        ));
    }
    positions
}
