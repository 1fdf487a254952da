use chrono::NaiveDate;
use egui::{Color32, Id, RichText, Ui};

use crate::model::{Dataset, Task, TaskId, TaskPatch};
use crate::timeline::validation::dependency_violations;
use crate::timeline::validate_task_update;
use crate::ui::format::{format_progress, format_standard_date};
use crate::ui::theme;

/// Actions the sidebar can request.
pub enum SidebarAction {
    None,
    Commit(TaskPatch),
    Select(TaskId),
}

/// Uncommitted edits for one task, kept in egui's temp memory between frames.
#[derive(Clone)]
struct Draft {
    base: Task,
    title: String,
    start: NaiveDate,
    end: NaiveDate,
    progress: f32,
}

impl Draft {
    fn from_task(task: &Task) -> Self {
        Self {
            base: task.clone(),
            title: task.title.clone(),
            start: task.start.date(),
            end: task.end.date(),
            progress: task.progress,
        }
    }

    /// Only the fields that differ from the task end up in the patch.
    fn patch(&self) -> TaskPatch {
        let task = &self.base;
        let end = if task.is_milestone { self.start } else { self.end };
        TaskPatch {
            title: (self.title != task.title).then(|| self.title.clone()),
            start: (self.start != task.start.date()).then(|| self.start.and_time(task.start.time())),
            end: (end != task.end.date()).then(|| end.and_time(task.end.time())),
            progress: (self.progress != task.progress).then_some(self.progress),
        }
    }
}

fn field_label(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).size(10.0).color(theme::TEXT_DIM).strong());
}

/// Render the details of the selected task. Edits are staged in a draft and
/// only committed when they pass validation.
pub fn show_task_sidebar(task: &Task, dataset: &Dataset, ui: &mut Ui) -> SidebarAction {
    let mut action = SidebarAction::None;
    let draft_id = Id::new(("task-draft", task.id));
    let mut draft: Draft = ui
        .ctx()
        .data_mut(|d| d.get_temp::<Draft>(draft_id))
        .filter(|draft| draft.base == *task)
        .unwrap_or_else(|| Draft::from_task(task));

    ui.add_space(6.0);
    ui.label(
        RichText::new(if task.is_milestone { "Milestone" } else { "Task" })
            .strong()
            .size(13.0)
            .color(theme::TEXT_PRIMARY),
    );
    ui.add_space(4.0);

    ui.spacing_mut().item_spacing.y = 6.0;

    field_label(ui, "Title");
    ui.add_sized(
        [ui.available_width(), 24.0],
        egui::TextEdit::singleline(&mut draft.title).font(egui::FontId::proportional(12.0)),
    );

    if task.is_milestone {
        field_label(ui, "Date");
        ui.add(egui_extras::DatePickerButton::new(&mut draft.start).id_salt("sidebar-milestone"));
    } else {
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                field_label(ui, "Start");
                ui.add(egui_extras::DatePickerButton::new(&mut draft.start).id_salt("sidebar-start"));
            });
            ui.add_space(8.0);
            ui.vertical(|ui| {
                field_label(ui, "End");
                ui.add(egui_extras::DatePickerButton::new(&mut draft.end).id_salt("sidebar-end"));
            });
        });
    }

    field_label(ui, "Progress");
    ui.add(
        egui::Slider::new(&mut draft.progress, 0.0..=100.0)
            .step_by(1.0)
            .custom_formatter(|v, _| format_progress(v as f32)),
    );

    let patch = draft.patch();
    let violations = validate_task_update(task, &patch);
    for violation in &violations {
        ui.label(
            RichText::new(format!("{} {violation}", egui_phosphor::regular::WARNING_CIRCLE))
                .size(11.0)
                .color(theme::TEXT_ERROR),
        );
    }
    for warning in dependency_violations(task, &patch, |id| dataset.task(id)) {
        ui.label(
            RichText::new(format!("{} {warning}", egui_phosphor::regular::WARNING))
                .size(11.0)
                .color(theme::TEXT_WARNING),
        );
    }

    ui.horizontal(|ui| {
        let can_apply = violations.is_empty() && !patch.is_empty();
        let apply = egui::Button::new(RichText::new("Apply").color(Color32::WHITE))
            .fill(if can_apply { theme::ACCENT } else { theme::BG_HEADER });
        if ui.add_enabled(can_apply, apply).clicked() {
            action = SidebarAction::Commit(patch.clone());
        }
        if ui.add_enabled(!patch.is_empty(), egui::Button::new("Revert")).clicked() {
            draft = Draft::from_task(task);
        }
    });

    ui.add_space(4.0);
    ui.separator();
    field_label(ui, "Depends on");
    let prerequisites: Vec<&Task> = task.dependencies.iter().filter_map(|id| dataset.task(*id)).collect();
    if prerequisites.is_empty() {
        ui.label(RichText::new("Nothing").size(9.5).color(theme::TEXT_DIM));
    }
    for prerequisite in prerequisites {
        let text = format!(
            "{} {}  (ends {})",
            egui_phosphor::regular::ARROW_LEFT,
            prerequisite.title,
            format_standard_date(prerequisite.end)
        );
        if ui.link(RichText::new(text).size(11.0).color(theme::TEXT_SECONDARY)).clicked() {
            action = SidebarAction::Select(prerequisite.id);
        }
    }

    field_label(ui, "Required by");
    let dependents: Vec<&Task> = dataset
        .ordered_tasks()
        .filter(|other| other.dependencies.contains(&task.id))
        .collect();
    if dependents.is_empty() {
        ui.label(RichText::new("Nothing").size(9.5).color(theme::TEXT_DIM));
    }
    for dependent in dependents {
        let text = format!(
            "{} {}  (starts {})",
            egui_phosphor::regular::ARROW_RIGHT,
            dependent.title,
            format_standard_date(dependent.start)
        );
        if ui.link(RichText::new(text).size(11.0).color(theme::TEXT_SECONDARY)).clicked() {
            action = SidebarAction::Select(dependent.id);
        }
    }

    if matches!(action, SidebarAction::Commit(_)) {
        ui.ctx().data_mut(|d| d.remove::<Draft>(draft_id));
    } else {
        ui.ctx().data_mut(|d| d.insert_temp(draft_id, draft));
    }
    action
}
