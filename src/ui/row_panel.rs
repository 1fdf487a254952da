use egui::{Align2, Pos2, Sense, Stroke, Ui, Vec2};

use crate::model::{Dataset, TaskId};
use crate::timeline::{ScrollSync, ROW_HEIGHT};
use crate::ui::theme;
use crate::ui::timeline_chart::ROW_LABELS;

/// Render the row label column. Its vertical offset follows the timeline body.
pub fn show_row_panel(ui: &mut Ui, dataset: &Dataset, selected: Option<TaskId>, sync: &mut ScrollSync) {
    let (header, painter) = ui.allocate_painter(Vec2::new(ui.available_width(), theme::HEADER_HEIGHT), Sense::hover());
    painter.rect_filled(header.rect, 0.0, theme::BG_HEADER);
    painter.hline(header.rect.x_range(), header.rect.bottom(), Stroke::new(1.0, theme::BORDER_SUBTLE));
    painter.text(
        Pos2::new(header.rect.left() + 12.0, header.rect.center().y),
        Align2::LEFT_CENTER,
        "Resource/Team",
        theme::font_header(),
        theme::TEXT_PRIMARY,
    );

    let mut area = egui::ScrollArea::vertical()
        .id_salt("row-labels")
        .enable_scrolling(false)
        .scroll_bar_visibility(egui::scroll_area::ScrollBarVisibility::AlwaysHidden)
        .auto_shrink([false, false]);
    if let Some(offset) = sync.pending(ROW_LABELS) {
        area = area.vertical_scroll_offset(offset);
        sync.mark_applied(ROW_LABELS, offset);
    }

    area.show(ui, |ui| {
        ui.spacing_mut().item_spacing.y = 0.0;
        let selected_row = selected.and_then(|id| dataset.task(id)).map(|task| task.row_id);

        for (index, row) in dataset.rows.iter().enumerate() {
            let (rect, response) = ui.allocate_exact_size(Vec2::new(ui.available_width(), ROW_HEIGHT), Sense::hover());
            let painter = ui.painter();

            if selected_row == Some(row.id) {
                painter.rect_filled(rect, 0.0, theme::BG_SELECTED);
            } else if index % 2 == 1 || response.hovered() {
                painter.rect_filled(rect, 0.0, theme::BG_ROW_ALT);
            }
            painter.hline(rect.x_range(), rect.bottom(), Stroke::new(0.5, theme::BORDER_SUBTLE));

            // Avatar images are not loaded; a set avatar shows as an owner glyph.
            let label = match row.avatar {
                Some(_) => format!("{} {}", egui_phosphor::regular::USER_CIRCLE, row.label),
                None => row.label.clone(),
            };
            painter.with_clip_rect(rect.shrink(4.0)).text(
                Pos2::new(rect.left() + 12.0, rect.center().y),
                Align2::LEFT_CENTER,
                label,
                egui::FontId::proportional(13.0),
                theme::TEXT_PRIMARY,
            );
            let count = row.tasks.iter().filter(|id| dataset.tasks.contains_key(id)).count();
            response.on_hover_text(format!("{count} task(s)"));
        }
    });
}
