use eframe::egui::{self, Align2, Color32, FontId, Pos2, Sense, Stroke, Ui};
use treemap_core::human::human_value;
use treemap_core::loader::LoadMsg;
use treemap_core::{ChartBody, Point, DATASETS};

use crate::state::AppState;

const HIGHLIGHT: Color32 = Color32::from_rgb(0xff, 0xd7, 0x00);

fn color32(c: treemap_core::color::Color) -> Color32 {
    Color32::from_rgb(c.r, c.g, c.b)
}

pub fn draw(app: &mut AppState, ctx: &egui::Context) {
    poll_load(app, ctx);

    if app.is_loading() {
        ctx.request_repaint();
    }

    egui::TopBottomPanel::top("top").show(ctx, |ui| {
        top_bar(ui, app);
    });

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.heading(&app.page.title);
            ui.label(&app.page.description);
        });
        if let Some(status) = &app.status {
            ui.weak(status);
        }
        ui.separator();

        let failure = match &app.page.body {
            ChartBody::Pending => {
                ui.centered_and_justified(|ui| ui.spinner());
                return;
            }
            ChartBody::Failed { message } => Some(message.clone()),
            ChartBody::Ready(_) => None,
        };
        match failure {
            Some(message) => {
                ui.centered_and_justified(|ui| ui.label(message));
            }
            None => {
                egui::ScrollArea::both().show(ui, |ui| {
                    chart_view(ui, app);
                    legend_view(ui, app);
                });
            }
        }
    });

    tooltip(app, ctx);
}

fn top_bar(ui: &mut Ui, app: &mut AppState) {
    ui.horizontal(|ui| {
        let current = app.dataset();
        let mut picked = None;
        egui::ComboBox::from_label("Dataset")
            .selected_text(current.title)
            .show_ui(ui, |ui| {
                for d in &DATASETS {
                    if ui.selectable_label(d.key == current.key, d.title).clicked() {
                        picked = Some(d.key);
                    }
                }
            });
        if let Some(key) = picked {
            app.select_dataset(key);
        }
        if ui.button("Reload").clicked() {
            app.start_load();
        }
        if ui.button("Open JSON…").clicked() {
            if let Some(path) = rfd::FileDialog::new().add_filter("JSON", &["json"]).pick_file() {
                app.open_file(path);
            }
        }
        ui.separator();
        let ready = app.page.chart().is_some();
        if ui.add_enabled(ready, egui::Button::new("Export HTML…")).clicked() {
            let name = format!("treemap-{}.html", app.dataset().key);
            if let Some(path) = rfd::FileDialog::new().set_file_name(name).add_filter("HTML", &["html"]).save_file() {
                if let Err(e) = app.export_html(&path) {
                    app.status = Some(format!("Export failed: {e:#}"));
                }
            }
        }
        if ui.add_enabled(ready, egui::Button::new("Open in browser")).clicked() {
            if let Err(e) = app.open_in_browser() {
                app.status = Some(format!("Could not open browser: {e:#}"));
            }
        }
        ui.separator();
        ui.label("Search:");
        if ui.text_edit_singleline(&mut app.search).changed() {
            app.refresh_matches();
        }
        if !app.search.trim().is_empty() {
            ui.label(format!("{} found", app.matches.len()));
        }
    });
}

fn chart_view(ui: &mut Ui, app: &mut AppState) {
    let Some(chart) = app.page.chart() else { return };
    let size = egui::vec2(chart.width as f32, chart.height as f32);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let origin = response.rect.min;
    let font = FontId::proportional(chart.label_font_size as f32);
    let label_color = color32(chart.label_fill);

    for (i, tile) in chart.tiles.iter().enumerate() {
        let r = egui::Rect::from_min_max(
            origin + egui::vec2(tile.rect.x0 as f32, tile.rect.y0 as f32),
            origin + egui::vec2(tile.rect.x1 as f32, tile.rect.y1 as f32),
        );
        let stroke = if app.matches.contains(&i) {
            Stroke::new(2.5, HIGHLIGHT)
        } else {
            Stroke::new(tile.stroke_width as f32, color32(tile.stroke))
        };
        painter.rect(r, 0.0, color32(tile.fill), stroke);
        for line in &tile.label {
            // Labels sit on their baseline like SVG text.
            let pos = r.min + egui::vec2(line.x as f32, line.y as f32);
            painter.text(pos, Align2::LEFT_BOTTOM, &line.text, font.clone(), label_color);
        }
    }

    let hover = response.hover_pos();
    let at = hover.map(|p| Point::new((p.x - origin.x) as f64, (p.y - origin.y) as f64));
    let screen = hover.map_or(Point::default(), |p| Point::new(p.x as f64, p.y as f64));
    app.renderer.pointer_moved(at, screen);
}

fn legend_view(ui: &mut Ui, app: &AppState) {
    let Some(chart) = app.page.chart() else { return };
    let legend = &chart.legend;
    let (response, painter) = ui.allocate_painter(egui::vec2(legend.width as f32, legend.height as f32), Sense::hover());
    let origin = response.rect.min + egui::vec2(legend.offset_x as f32, 0.0);
    let text_color = ui.visuals().text_color();
    let sw = legend.swatch as f32;
    for item in &legend.items {
        let min = origin + egui::vec2(item.x as f32, item.y as f32);
        painter.rect_filled(egui::Rect::from_min_size(min, egui::vec2(sw, sw)), 0.0, color32(item.color));
        painter.text(
            min + egui::vec2(sw + legend.text_gap as f32, sw / 2.0),
            Align2::LEFT_CENTER,
            &item.category,
            FontId::proportional(legend.font_size as f32),
            text_color,
        );
    }
}

fn tooltip(app: &AppState, ctx: &egui::Context) {
    let tip = app.renderer.tooltip();
    if !tip.visible {
        return;
    }
    let pos = Pos2::new(tip.position.x as f32 + 12.0, tip.position.y as f32 + 12.0);
    egui::Area::new(egui::Id::new("tile-tooltip"))
        .order(egui::Order::Tooltip)
        .fixed_pos(pos)
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.label(format!("Name: {}", tip.content.name));
                ui.label(format!("Category: {}", tip.content.category));
                ui.label(format!("Value: {}", human_value(tip.content.value)));
            });
        });
}

fn poll_load(app: &mut AppState, ctx: &egui::Context) {
    // Take ownership of the receiver so finishing can reassign state freely.
    let Some(rx) = app.load_rx.take() else { return };
    match rx.try_recv() {
        Ok(msg) => {
            if let LoadMsg::Loaded { dataset, .. } | LoadMsg::Failed { dataset, .. } = &msg {
                tracing::debug!(dataset = dataset.key, "load finished");
            }
            app.finish_load(msg);
            ctx.request_repaint();
        }
        Err(crossbeam_channel::TryRecvError::Empty) => app.load_rx = Some(rx),
        Err(crossbeam_channel::TryRecvError::Disconnected) => {
            app.finish_load(LoadMsg::Failed {
                dataset: app.dataset(),
                error: treemap_core::DataLoadError::Io {
                    path: Default::default(),
                    source: std::io::Error::other("loader thread exited"),
                },
            });
        }
    }
}
