use std::collections::HashSet;
use std::time::Instant;

use egui::{Align2, Color32, CursorIcon, Pos2, Rect, Rounding, Sense, Shape, Stroke, Ui, Vec2};

use crate::model::{Dataset, Task, TaskId};
use crate::timeline::{
    ElbowPath, GestureKind, InteractionEngine, MoveOutcome, PanelId, PointerCapture, PointerId, ScrollSync,
    TaskRect, TimelineLayout, ViewState,
};
use crate::ui::format::{
    format_progress, format_span, format_standard_date, task_bar_label, RESIZE_END_LABEL, RESIZE_START_LABEL,
};
use crate::ui::theme;

pub const BODY: PanelId = PanelId("timeline-body");
pub const AXIS_HEADER: PanelId = PanelId("timeline-axis");
pub const ROW_LABELS: PanelId = PanelId("row-labels");

/// egui already routes a drag to the widget it started on, so capturing a
/// pointer only has to keep the grab cursor up while it is held.
#[derive(Debug, Default)]
pub struct CursorCapture {
    captured: HashSet<PointerId>,
}

impl CursorCapture {
    pub fn is_captured(&self) -> bool {
        !self.captured.is_empty()
    }
}

impl PointerCapture for CursorCapture {
    fn acquire(&mut self, pointer: PointerId) {
        self.captured.insert(pointer);
    }

    fn release(&mut self, pointer: PointerId) {
        self.captured.remove(&pointer);
    }
}

/// Scroll links between the body and the panels that follow it.
#[derive(Debug, Clone)]
pub struct ChartScroll {
    pub horizontal: ScrollSync,
    pub vertical: ScrollSync,
}

impl Default for ChartScroll {
    fn default() -> Self {
        Self {
            horizontal: ScrollSync::new(BODY).with_follower(AXIS_HEADER),
            vertical: ScrollSync::new(BODY).with_follower(ROW_LABELS),
        }
    }
}

/// Result details from interactions in the chart.
#[derive(Debug, Clone, Default)]
pub struct ChartInteraction {
    /// A drag applied at least one date change this frame.
    pub changed: bool,
    /// A drag gesture finished this frame.
    pub drag_finished: Option<TaskId>,
}

struct PendingGesture {
    task: TaskId,
    kind: GestureKind,
    anchor_x: f32,
}

/// Render the timeline (axis header and body) into the central panel.
pub fn show_timeline_chart(
    ui: &mut Ui,
    dataset: &mut Dataset,
    view: &mut ViewState,
    engine: &mut InteractionEngine<CursorCapture>,
    scroll: &mut ChartScroll,
    selected: &mut Option<TaskId>,
) -> ChartInteraction {
    let mut interaction = ChartInteraction::default();

    if ui.rect_contains_pointer(ui.max_rect()) {
        apply_zoom(view, ui.input(|i| i.zoom_delta()), engine.is_dragging());
    }

    let layout = TimelineLayout::compute(dataset, view);
    let axis = view.axis();
    let axis_width: f32 = axis.iter().map(|column| column.width).sum();
    let available = ui.available_size();
    let content_width = layout.total_width.max(axis_width).max(available.x);

    show_axis_header(ui, view, &mut scroll.horizontal, content_width);

    let body = egui::ScrollArea::both()
        .id_salt("timeline-body")
        .auto_shrink([false, false]);

    let mut pending: Option<PendingGesture> = None;
    let output = body.show(ui, |ui| {
        let body_height = layout.total_height.max(ui.available_height());
        let (response, painter) = ui.allocate_painter(Vec2::new(content_width, body_height), Sense::click());
        let origin = response.rect.min;
        let mut consumed_click = false;

        painter.rect_filled(response.rect, 0.0, theme::BG_CANVAS);

        for band in &layout.rows {
            let band_rect = Rect::from_min_size(
                Pos2::new(origin.x, origin.y + band.top),
                Vec2::new(content_width, band.height),
            );
            if band.index % 2 == 1 {
                painter.rect_filled(band_rect, 0.0, theme::BG_ROW_ALT);
            }
            painter.hline(band_rect.x_range(), band_rect.bottom(), Stroke::new(0.5, theme::BORDER_SUBTLE));
        }

        let mut x = origin.x;
        for column in &axis {
            painter.vline(x, response.rect.y_range(), Stroke::new(0.5, theme::GRID_LINE));
            x += column.width;
        }

        draw_today_line(&painter, origin, view, body_height);

        for segment in &layout.segments {
            draw_connector(&painter, origin, &ElbowPath::route(segment));
        }

        for id in &layout.order {
            let (Some(task), Some(rect)) = (dataset.task(*id), layout.rect(*id)) else {
                continue;
            };
            let is_selected = *selected == Some(task.id);
            let is_dragging = engine.is_dragging_task(task.id);
            let clicked;

            let gesture = if task.is_milestone {
                let hit = draw_milestone(&painter, origin, task, rect, is_selected);
                let response = ui.interact(hit, ui.make_persistent_id(("milestone", task.id)), Sense::click_and_drag());
                announce(&response, task_bar_label(task));
                if response.hovered() && !engine.is_dragging() {
                    show_task_tooltip(ui, task);
                }
                clicked = response.clicked();
                started_gesture(&response, GestureKind::Move)
            } else {
                let bar = draw_task_bar(&painter, origin, task, rect, is_selected, is_dragging);
                let left = Rect::from_min_max(bar.min, Pos2::new(bar.left() + theme::HANDLE_WIDTH, bar.bottom()));
                let right = Rect::from_min_max(Pos2::new(bar.right() - theme::HANDLE_WIDTH, bar.top()), bar.max);

                // Handles are registered after the bar so they win the hit test.
                let bar_response = ui.interact(bar, ui.make_persistent_id(("task-bar", task.id)), Sense::click_and_drag());
                let left_response = ui.interact(left, ui.make_persistent_id(("task-resize-left", task.id)), Sense::drag());
                let right_response =
                    ui.interact(right, ui.make_persistent_id(("task-resize-right", task.id)), Sense::drag());
                announce(&bar_response, task_bar_label(task));
                announce(&left_response, RESIZE_START_LABEL.to_owned());
                announce(&right_response, RESIZE_END_LABEL.to_owned());

                if left_response.hovered() || right_response.hovered() {
                    ui.ctx().set_cursor_icon(CursorIcon::ResizeHorizontal);
                    painter.rect_filled(left, Rounding::same(2.0), theme::HANDLE_COLOR);
                    painter.rect_filled(right, Rounding::same(2.0), theme::HANDLE_COLOR);
                } else if bar_response.hovered() && !engine.is_dragging() {
                    ui.ctx().set_cursor_icon(CursorIcon::Grab);
                }
                if (bar_response.hovered() || left_response.hovered() || right_response.hovered())
                    && !engine.is_dragging()
                {
                    show_task_tooltip(ui, task);
                }
                clicked = bar_response.clicked();

                started_gesture(&left_response, GestureKind::ResizeStart)
                    .or_else(|| started_gesture(&right_response, GestureKind::ResizeEnd))
                    .or_else(|| started_gesture(&bar_response, GestureKind::Move))
            };

            if let Some((kind, pointer)) = gesture {
                pending = Some(PendingGesture {
                    task: task.id,
                    kind,
                    anchor_x: pointer.x - origin.x,
                });
            }
            if clicked {
                *selected = Some(task.id);
                consumed_click = true;
            }
        }

        if response.clicked() && !consumed_click {
            *selected = None;
        }
        origin
    });

    let origin = output.inner;
    if let Some(gesture) = pending {
        if let Some(task) = dataset.task(gesture.task) {
            engine.start(PointerId::PRIMARY, task, gesture.kind, gesture.anchor_x);
            *selected = Some(gesture.task);
        }
    }

    if engine.is_dragging() {
        let ctx = ui.ctx().clone();
        if let Some(pointer) = ctx.input(|i| i.pointer.interact_pos()) {
            let outcome = engine.pointer_move(
                PointerId::PRIMARY,
                pointer.x - origin.x,
                Instant::now(),
                &view.projection(),
                dataset,
            );
            if matches!(outcome, MoveOutcome::Applied(_)) {
                interaction.changed = true;
            }
        }
        if ctx.input(|i| i.pointer.any_released()) {
            interaction.drag_finished = engine.end(PointerId::PRIMARY).map(|session| session.task);
        }
        if engine.capture().is_captured() {
            ctx.set_cursor_icon(CursorIcon::Grabbing);
        }
        // Throttled samples are re-evaluated on the next frame.
        ctx.request_repaint();
    }

    let scrolled_x = scroll.horizontal.on_scroll(BODY, output.state.offset.x);
    let scrolled_y = scroll.vertical.on_scroll(BODY, output.state.offset.y);
    if scrolled_x || scrolled_y {
        ui.ctx().request_repaint();
    }

    interaction
}

/// Step the zoom level for a Ctrl+scroll delta. Ignored while a gesture is
/// live, since its anchor was taken at the current density.
fn apply_zoom(view: &mut ViewState, zoom_delta: f32, dragging: bool) {
    if dragging {
        return;
    }
    if zoom_delta > 1.0 {
        view.zoom_in();
    } else if zoom_delta < 1.0 {
        view.zoom_out();
    }
}

/// Expose a painted hit zone to assistive tech as a labelled button.
fn announce(response: &egui::Response, label: String) {
    response.widget_info(|| egui::WidgetInfo::labeled(egui::WidgetType::Button, true, &label));
}

fn started_gesture(response: &egui::Response, kind: GestureKind) -> Option<(GestureKind, Pos2)> {
    if response.drag_started() {
        response.interact_pointer_pos().map(|pos| (kind, pos))
    } else {
        None
    }
}

fn show_axis_header(ui: &mut Ui, view: &ViewState, sync: &mut ScrollSync, content_width: f32) {
    let mut header = egui::ScrollArea::horizontal()
        .id_salt("timeline-axis")
        .enable_scrolling(false)
        .scroll_bar_visibility(egui::scroll_area::ScrollBarVisibility::AlwaysHidden)
        .auto_shrink([false, true]);
    if let Some(offset) = sync.pending(AXIS_HEADER) {
        header = header.horizontal_scroll_offset(offset);
        sync.mark_applied(AXIS_HEADER, offset);
    }

    header.show(ui, |ui| {
        let (response, painter) =
            ui.allocate_painter(Vec2::new(content_width, theme::HEADER_HEIGHT), Sense::hover());
        let rect = response.rect;
        painter.rect_filled(rect, 0.0, theme::BG_HEADER);
        painter.hline(rect.x_range(), rect.bottom(), Stroke::new(1.0, theme::BORDER_SUBTLE));

        let mut x = rect.left();
        for column in &view.axis() {
            painter.vline(x, rect.y_range(), Stroke::new(0.5, theme::GRID_LINE));
            painter.text(
                Pos2::new(x + 4.0, rect.center().y),
                Align2::LEFT_CENTER,
                &column.label,
                theme::font_header(),
                theme::TEXT_SECONDARY,
            );
            x += column.width;
        }
    });
}

fn to_screen(origin: Pos2, rect: &TaskRect) -> Rect {
    Rect::from_min_size(
        Pos2::new(origin.x + rect.left, origin.y + rect.top),
        Vec2::new(rect.width, rect.height),
    )
}

fn draw_today_line(painter: &egui::Painter, origin: Pos2, view: &ViewState, height: f32) {
    let today = chrono::Local::now().date_naive().and_time(chrono::NaiveTime::MIN);
    if today < view.start || today > view.end {
        return;
    }
    let x = origin.x + view.projection().x(today);
    painter.vline(x, origin.y..=origin.y + height, Stroke::new(1.5, theme::TODAY_LINE));

    let badge = Rect::from_min_size(Pos2::new(x - 21.0, origin.y), Vec2::new(42.0, 14.0));
    painter.rect_filled(badge, Rounding::same(3.0), theme::TODAY_LINE);
    painter.text(badge.center(), Align2::CENTER_CENTER, "Today", theme::font_small(), Color32::WHITE);
}

fn draw_connector(painter: &egui::Painter, origin: Pos2, path: &ElbowPath) {
    let stroke = Stroke::new(1.2, theme::CONNECTOR);
    let points: Vec<Pos2> = path
        .points
        .iter()
        .map(|(x, y)| Pos2::new(origin.x + x, origin.y + y))
        .collect();
    painter.add(Shape::line(points, stroke));

    let (x, y) = path.end();
    let tip = Pos2::new(origin.x + x, origin.y + y);
    let back = -path.arrow_direction() * theme::ARROW_SIZE;
    painter.add(Shape::convex_polygon(
        vec![
            tip,
            Pos2::new(tip.x + back, tip.y - theme::ARROW_SIZE),
            Pos2::new(tip.x + back, tip.y + theme::ARROW_SIZE),
        ],
        theme::CONNECTOR,
        Stroke::NONE,
    ));
}

fn draw_task_bar(
    painter: &egui::Painter,
    origin: Pos2,
    task: &Task,
    rect: &TaskRect,
    is_selected: bool,
    is_dragging: bool,
) -> Rect {
    let bar = to_screen(origin, rect);
    let rounding = Rounding::same(theme::BAR_ROUNDING);
    let color = task.color.unwrap_or(theme::DEFAULT_TASK_COLOR);

    painter.rect_filled(bar.translate(Vec2::new(1.0, 2.0)), rounding, Color32::from_black_alpha(35));
    painter.rect_filled(bar, rounding, if is_dragging { color.gamma_multiply(0.8) } else { color });

    let progress = task.progress.clamp(0.0, 100.0) / 100.0;
    if progress > 0.0 {
        let filled = Rect::from_min_size(bar.min, Vec2::new(bar.width() * progress, bar.height()));
        painter.rect_filled(filled, rounding, theme::PROGRESS_FILL);
    }

    if is_selected {
        painter.rect_stroke(
            bar.expand(1.5),
            Rounding::same(theme::BAR_ROUNDING + 1.5),
            Stroke::new(2.0, theme::BORDER_ACCENT),
        );
    }

    if bar.width() > 30.0 {
        let galley = painter.layout_no_wrap(task.title.clone(), theme::font_bar(), theme::TEXT_ON_BAR);
        let text_pos = Pos2::new(bar.left() + theme::HANDLE_WIDTH, bar.center().y - galley.size().y / 2.0);
        painter.with_clip_rect(bar).galley(text_pos, galley, Color32::TRANSPARENT);
    }

    bar
}

fn draw_milestone(painter: &egui::Painter, origin: Pos2, task: &Task, rect: &TaskRect, is_selected: bool) -> Rect {
    let center = Pos2::new(origin.x + rect.left, origin.y + rect.center_y());
    let size = (rect.height / 2.0 - 2.0).max(6.0);
    let points = vec![
        Pos2::new(center.x, center.y - size),
        Pos2::new(center.x + size, center.y),
        Pos2::new(center.x, center.y + size),
        Pos2::new(center.x - size, center.y),
    ];
    let color = task.color.unwrap_or(theme::ACCENT);
    let outline = if is_selected {
        Stroke::new(2.0, theme::BORDER_ACCENT)
    } else {
        Stroke::NONE
    };
    painter.add(Shape::convex_polygon(points, color, outline));

    painter.text(
        Pos2::new(center.x + size + 6.0, center.y),
        Align2::LEFT_CENTER,
        &task.title,
        theme::font_bar(),
        theme::TEXT_SECONDARY,
    );

    Rect::from_center_size(center, Vec2::splat(size * 2.0 + 2.0))
}

fn show_task_tooltip(ui: &Ui, task: &Task) {
    egui::show_tooltip_at_pointer(ui.ctx(), ui.layer_id(), egui::Id::new(("task-tip", task.id)), |ui| {
        ui.strong(&task.title);
        if task.is_milestone {
            ui.label(format_standard_date(task.start));
        } else {
            ui.label(format!(
                "{} {} {}  ({})",
                format_standard_date(task.start),
                egui_phosphor::regular::ARROW_RIGHT,
                format_standard_date(task.end),
                format_span(task.start, task.end),
            ));
        }
        ui.label(format!("Progress: {}", format_progress(task.progress)));
        if let Some(assignee) = &task.assignee {
            ui.label(format!("{} {assignee}", egui_phosphor::regular::USER));
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::timeline::ViewMode;

    fn week_view() -> ViewState {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        ViewState::new(ViewMode::Week, start, end)
    }

    #[test]
    fn zoom_steps_between_modes() {
        let mut view = week_view();
        apply_zoom(&mut view, 1.1, false);
        assert_eq!(view.view_mode, ViewMode::Day);

        let mut view = week_view();
        apply_zoom(&mut view, 0.9, false);
        assert_eq!(view.view_mode, ViewMode::Month);

        let mut view = week_view();
        apply_zoom(&mut view, 1.0, false);
        assert_eq!(view.view_mode, ViewMode::Week);
    }

    #[test]
    fn zoom_is_held_while_a_gesture_is_live() {
        let mut view = week_view();
        apply_zoom(&mut view, 1.5, true);
        assert_eq!(view.view_mode, ViewMode::Week);
        apply_zoom(&mut view, 0.5, true);
        assert_eq!(view.view_mode, ViewMode::Week);
    }
}
