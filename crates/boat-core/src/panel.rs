//! Info panel text for the current selection

use crate::parts::PartRegistry;

pub const OVERVIEW_TITLE: &str = "Boat overview";
pub const OVERVIEW_DESCRIPTION: &str =
    "Click on different areas of the boat to focus and learn more about them.";

/// Title and description shown in the info panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelText {
    pub title: String,
    pub description: String,
}

impl Default for PanelText {
    fn default() -> Self {
        Self::overview()
    }
}

impl PanelText {
    /// Fallback text when nothing (or nothing known) is selected
    pub fn overview() -> Self {
        Self {
            title: OVERVIEW_TITLE.to_string(),
            description: OVERVIEW_DESCRIPTION.to_string(),
        }
    }

    /// Text for a part identifier, falling back to the overview for
    /// `None` and for identifiers the registry doesn't know
    pub fn for_part(registry: &PartRegistry, id: Option<&str>) -> Self {
        match id.and_then(|id| registry.get(id)) {
            Some(part) => Self {
                title: part.title.clone(),
                description: part.description.clone(),
            },
            None => Self::overview(),
        }
    }
}
