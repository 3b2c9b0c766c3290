//! Info panel - mirrors the selected part's text into the host page

use bevy::prelude::*;
use boat_core::PanelText;

use crate::dom;
use crate::session::{ClickSet, PartSelected, PartTable, ViewerSession, ViewerSettings};

pub struct InfoPanelPlugin;

impl Plugin for InfoPanelPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, show_overview)
            .add_systems(Update, update_info_panel.in_set(ClickSet::InfoPanel));
    }
}

fn show_overview(settings: Res<ViewerSettings>, session: Res<ViewerSession>) {
    write_panel(&settings, &session.panel);
}

fn update_info_panel(
    mut selections: MessageReader<PartSelected>,
    parts: Res<PartTable>,
    settings: Res<ViewerSettings>,
    mut session: ResMut<ViewerSession>,
) {
    let Some(selection) = selections.read().last() else {
        return;
    };

    let text = PanelText::for_part(&parts.0, Some(&selection.part_id));
    if text == session.panel {
        return;
    }
    write_panel(&settings, &text);
    session.panel = text;
}

fn write_panel(settings: &ViewerSettings, text: &PanelText) {
    let host = &settings.0.host;
    // Missing panel elements only lose the text; the viewer keeps running
    if let Err(e) = dom::set_text(&host.title_id, &text.title) {
        tracing::warn!("Info panel title: {}", e);
    }
    if let Err(e) = dom::set_text(&host.description_id, &text.description) {
        tracing::warn!("Info panel description: {}", e);
    }
}
