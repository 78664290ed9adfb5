use egui::{Align2, Color32, FontId, RichText, Sense, Stroke, Vec2};
use log2::*;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use tokio::runtime::Handle;

use super::layout::{layout, LayoutConfig};
use crate::summary::{ArticleSummary, SummaryClient, SummarySlot};
use crate::tracker::{NodeId, TrackerState};
use crate::wiki;

pub const INVALID_URL_MESSAGE: &str = "Please enter a valid Wikipedia article URL";

const NODE_RADIUS: f32 = 8.0;

/// Inline message for the URL fields, `None` while the text is empty or valid
pub fn validation_message(input: &str) -> Option<String> {
    if !input.is_empty() && !wiki::is_valid_url(input) {
        Some(INVALID_URL_MESSAGE.to_string())
    } else {
        None
    }
}

/// Everything the user can ask for in one frame
#[derive(Debug, Clone, PartialEq)]
enum Action {
    AddRoot(String),
    AddChild(NodeId, String),
    Back,
    Jump(NodeId),
    Select(NodeId),
    Clear,
}

#[derive(Debug)]
struct SummaryReply {
    ticket: u64,
    node: NodeId,
    summary: ArticleSummary,
}

pub struct TrackerApp {
    state: TrackerState,
    url_input: String,
    url_error: Option<String>,
    child_input: String,
    child_error: Option<String>,
    slot: SummarySlot,
    client: Arc<SummaryClient>,
    runtime: Handle,
    replies_tx: Sender<SummaryReply>,
    replies_rx: Receiver<SummaryReply>,
    layout_config: LayoutConfig,
    output_file: Option<PathBuf>,
}

impl TrackerApp {
    pub fn new(
        state: TrackerState,
        client: Arc<SummaryClient>,
        runtime: Handle,
        output_file: Option<PathBuf>,
    ) -> Self {
        let (replies_tx, replies_rx) = channel();
        Self {
            state,
            url_input: String::new(),
            url_error: None,
            child_input: String::new(),
            child_error: None,
            slot: SummarySlot::new(),
            client,
            runtime,
            replies_tx,
            replies_rx,
            layout_config: LayoutConfig::default(),
            output_file,
        }
    }

    fn apply(&mut self, action: Action) {
        debug!("Applying {:?}", action);
        let changed = match action {
            Action::AddRoot(url) => match self.state.add_node(&url, None) {
                Ok(_) => {
                    self.url_input.clear();
                    self.url_error = None;
                    true
                }
                Err(e) => {
                    self.url_error = Some(e.to_string());
                    false
                }
            },
            Action::AddChild(parent, url) => match self.state.add_node(&url, Some(parent)) {
                Ok(_) => {
                    self.child_input.clear();
                    self.child_error = None;
                    true
                }
                Err(e) => {
                    self.child_error = Some(e.to_string());
                    false
                }
            },
            Action::Back => self.state.go_back().is_some(),
            Action::Jump(id) => self.state.jump_to_breadcrumb(id).is_some(),
            Action::Select(id) => {
                self.state.select(id);
                false
            }
            Action::Clear => {
                self.state.clear();
                true
            }
        };

        if changed {
            self.after_mutation();
        }
    }

    fn after_mutation(&self) {
        for tree in self.state.forest() {
            for line in tree.render_lines() {
                debug!("{}", line);
            }
        }

        if let Some(path) = &self.output_file {
            match std::fs::write(path, self.state.to_dot()) {
                Ok(()) => debug!("Graph written to {:?}", path),
                Err(e) => error!("Failed to write graph to {:?}: {}", path, e),
            }
        }
    }

    fn drain_replies(&mut self) {
        while let Ok(reply) = self.replies_rx.try_recv() {
            if !self.slot.finish(reply.ticket, reply.node, reply.summary) {
                debug!("Dropped stale summary for {}", reply.node);
            }
        }
    }

    /// Kick off a lookup whenever the selected node differs from the one the
    /// side panel holds a summary for.
    fn refresh_summary(&mut self, ctx: &egui::Context) {
        let selected = self
            .state
            .selected()
            .map(|n| (n.id(), n.title().to_string(), n.language().to_string()));

        match selected {
            None if self.slot.requested_for().is_some() => self.slot.reset(),
            Some((id, title, language)) if self.slot.requested_for() != Some(id) => {
                let ticket = self.slot.begin(id);
                let client = Arc::clone(&self.client);
                let tx = self.replies_tx.clone();
                let ctx = ctx.clone();

                self.runtime.spawn(async move {
                    let summary = client.fetch_summary(&title, &language).await;
                    // receiver only goes away when the window closes
                    let _ = tx.send(SummaryReply { ticket, node: id, summary });
                    ctx.request_repaint();
                });
            }
            _ => {}
        }
    }

    fn input_panel(&mut self, ui: &mut egui::Ui, actions: &mut Vec<Action>) {
        ui.horizontal(|ui| {
            ui.heading("WikiTracker");
            if !self.state.is_empty() && ui.button("Clear history").clicked() {
                actions.push(Action::Clear);
            }
        });

        ui.horizontal(|ui| {
            let edit = ui.add(
                egui::TextEdit::singleline(&mut self.url_input)
                    .hint_text("https://ja.wikipedia.org/wiki/...")
                    .desired_width(480.0),
            );
            if edit.changed() {
                self.url_error = validation_message(&self.url_input);
            }

            let can_submit = !self.url_input.trim().is_empty() && self.url_error.is_none();
            let entered = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            let clicked = ui.add_enabled(can_submit, egui::Button::new("Add")).clicked();
            if can_submit && (clicked || entered) {
                actions.push(Action::AddRoot(self.url_input.clone()));
            }
        });

        if let Some(err) = &self.url_error {
            ui.colored_label(Color32::RED, err.as_str());
        }
    }

    fn breadcrumb_panel(&self, ui: &mut egui::Ui, actions: &mut Vec<Action>) {
        let path = self.state.current_path_nodes();

        ui.horizontal(|ui| {
            ui.strong("Path");
            if path.len() > 1 && ui.button("← Back").clicked() {
                actions.push(Action::Back);
            }
        });

        ui.horizontal_wrapped(|ui| {
            for (i, node) in path.iter().enumerate() {
                let current = i + 1 == path.len();
                if i > 0 {
                    ui.label("›");
                }

                let mut text = RichText::new(format!("{}. {}", i + 1, node.title()));
                if current {
                    text = text.strong();
                }
                let hover = format!("{} • {}", node.language(), node.timestamp().format("%H:%M:%S"));
                if ui.selectable_label(current, text).on_hover_text(hover).clicked() {
                    actions.push(Action::Jump(node.id()));
                }

                if node.visit_count() > 1 {
                    ui.label(
                        RichText::new(format!("{}×", node.visit_count()))
                            .small()
                            .color(Color32::from_rgb(234, 88, 12)),
                    );
                }
                if current {
                    ui.label(RichText::new("current").small().color(Color32::from_rgb(22, 163, 74)));
                }
            }
        });
    }

    fn tree_panel(&self, ui: &mut egui::Ui, actions: &mut Vec<Action>) {
        if self.state.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label("Add the URL of the first Wikipedia article you want to read.");
            });
            return;
        }

        ui.label(format!(
            "History tree ({} articles), current path {} deep",
            self.state.len(),
            self.state.current_path().len()
        ));

        let forest = self.state.forest();
        let layout = layout(&forest, &self.layout_config);

        egui::ScrollArea::both().show(ui, |ui| {
            let size = layout.size.max(ui.available_size());
            let (response, painter) = ui.allocate_painter(size, Sense::click());
            let origin = response.rect.min.to_vec2();

            let edge_stroke = Stroke::new(2.0, Color32::from_gray(85));
            for &(parent, child) in &layout.edges {
                painter.line_segment(
                    [layout.nodes[parent].pos + origin, layout.nodes[child].pos + origin],
                    edge_stroke,
                );
            }

            for node in &layout.nodes {
                let center = node.pos + origin;
                let fill = if self.state.is_currently_viewing(node.id) {
                    Color32::from_rgb(22, 163, 74)
                } else if node.has_children {
                    Color32::from_gray(85)
                } else {
                    Color32::from_gray(153)
                };
                painter.circle(center, NODE_RADIUS, fill, Stroke::new(2.0, Color32::WHITE));
                if self.state.selected_id() == Some(node.id) {
                    painter.circle_stroke(
                        center,
                        NODE_RADIUS + 3.0,
                        Stroke::new(2.0, Color32::from_rgb(59, 130, 246)),
                    );
                }

                let (anchor, offset) = if node.has_children {
                    (Align2::RIGHT_CENTER, -13.0)
                } else {
                    (Align2::LEFT_CENTER, 13.0)
                };
                painter.text(
                    center + Vec2::new(offset, 0.0),
                    anchor,
                    &node.label,
                    FontId::proportional(12.0),
                    Color32::from_gray(51),
                );
            }

            let hit = |pos: egui::Pos2| layout.node_at(pos - origin, NODE_RADIUS + 2.0);
            if response.clicked() {
                if let Some(id) = response.interact_pointer_pos().and_then(hit) {
                    actions.push(Action::Select(id));
                }
            }
            let hovered = response
                .hover_pos()
                .and_then(hit)
                .and_then(|id| layout.nodes.iter().find(|n| n.id == id));
            if let Some(node) = hovered {
                response.on_hover_text(node.tooltip.as_str());
            }
        });
    }

    fn details_panel(&mut self, ui: &mut egui::Ui, actions: &mut Vec<Action>) {
        let Some(node) = self.state.selected() else {
            ui.label("Select a node");
            return;
        };
        let parent = node.id();

        ui.heading(node.title());
        ui.label(format!("Language: {}", node.language()));
        ui.label(format!("Depth: {}", node.depth()));
        ui.label(format!("Visits: {}", node.visit_count()));
        ui.label(format!("Added: {}", node.timestamp().format("%Y-%m-%d %H:%M:%S")));

        ui.separator();
        ui.strong("Summary");
        if self.slot.is_loading() {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading summary...");
            });
        } else if let Some(summary) = self.slot.value() {
            if summary.is_degraded() {
                ui.weak(summary.summary.as_str());
            } else {
                ui.label(summary.summary.as_str());
                ui.small(format!("via {}", summary.source.label()));
            }
        }
        ui.hyperlink_to("Open on Wikipedia", node.url());

        ui.separator();
        ui.strong("Add child article");
        let edit = ui.add(
            egui::TextEdit::singleline(&mut self.child_input).hint_text("Wikipedia URL"),
        );
        if edit.changed() {
            self.child_error = validation_message(&self.child_input);
        }
        let can_submit = !self.child_input.trim().is_empty() && self.child_error.is_none();
        if ui.add_enabled(can_submit, egui::Button::new("Add")).clicked() {
            actions.push(Action::AddChild(parent, self.child_input.clone()));
        }
        if let Some(err) = &self.child_error {
            ui.colored_label(Color32::RED, err.as_str());
        }
    }
}

impl eframe::App for TrackerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_replies();

        let mut actions = Vec::new();
        egui::TopBottomPanel::top("input").show(ctx, |ui| self.input_panel(ui, &mut actions));
        if !self.state.is_empty() {
            egui::TopBottomPanel::top("breadcrumb")
                .show(ctx, |ui| self.breadcrumb_panel(ui, &mut actions));
            egui::SidePanel::right("details")
                .min_width(300.0)
                .show(ctx, |ui| self.details_panel(ui, &mut actions));
        }
        egui::CentralPanel::default().show(ctx, |ui| self.tree_panel(ui, &mut actions));

        for action in actions {
            self.apply(action);
        }
        self.refresh_summary(ctx);
    }
}
