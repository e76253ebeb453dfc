//! Painéis do dashboard renderizados com egui.

use crate::theme_egui::EguiTheme;
use bancada_core::events::EventLog;
use bancada_core::store::TelemetryStore;
use bancada_core::types::{SensorKind, WifiStatus};
use egui::{Color32, RichText, Ui};

// ──────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────

fn value_cell(ui: &mut Ui, value: Option<f64>, color: Color32, dim: Color32) {
    // Leitura ausente aparece como "-", igual ao firmware convenciona.
    match value {
        Some(v) => {
            ui.label(RichText::new(format!("{v:.2}")).color(color).monospace().strong());
        }
        None => {
            ui.label(RichText::new("-").color(dim).monospace());
        }
    }
}

pub fn panel_frame(
    ui: &mut Ui,
    title: &str,
    accent: Color32,
    theme: &EguiTheme,
    add_body: impl FnOnce(&mut Ui),
) {
    egui::Frame::new()
        .fill(theme.panel)
        .stroke(egui::Stroke::new(2.0, accent))
        .corner_radius(4.0)
        .inner_margin(8.0)
        .show(ui, |ui: &mut Ui| {
            ui.vertical_centered(|ui: &mut Ui| {
                ui.label(
                    RichText::new(format!("── {title} ──"))
                        .color(accent)
                        .strong()
                        .monospace()
                        .size(13.0),
                );
            });
            ui.add_space(4.0);
            add_body(ui);
        });
}

// ──────────────────────────────────────────
// Leituras atuais
// ──────────────────────────────────────────

/// Tabela com a amostra mais recente de cada slot (grandeza × eixo).
pub fn render_readings(ui: &mut Ui, store: &TelemetryStore, theme: &EguiTheme) {
    panel_frame(ui, "LEITURAS", theme.title, theme, |ui: &mut Ui| {
        egui::Grid::new("readings_grid")
            .num_columns(4)
            .spacing([16.0, 4.0])
            .show(ui, |ui: &mut Ui| {
                ui.label(RichText::new("").monospace());
                for axis_name in ["X", "Y", "Z"] {
                    ui.label(RichText::new(axis_name).color(theme.dim).monospace());
                }
                ui.end_row();

                for kind in SensorKind::all() {
                    let color = theme.kind_color(kind);
                    ui.label(RichText::new(kind.label()).color(color).monospace());
                    for axis in kind.axes() {
                        value_cell(ui, store.latest(kind, *axis), color, theme.dim);
                    }
                    ui.end_row();
                }
            });
    });
}

// ──────────────────────────────────────────
// WiFi
// ──────────────────────────────────────────

/// Estado atual do WiFi do rig (somente leitura; os comandos ficam no
/// painel de controles).
pub fn render_wifi_status(ui: &mut Ui, wifi: &WifiStatus, theme: &EguiTheme) {
    let (dot, label, color) = if wifi.connected {
        ("●", format!("Conectado a {}", wifi.ssid), theme.ok)
    } else {
        ("○", "Desconectado".to_string(), theme.critical)
    };

    ui.horizontal(|ui: &mut Ui| {
        ui.label(RichText::new(dot).color(color).monospace());
        ui.label(RichText::new(label).color(color).monospace());
        if wifi.connected && !wifi.ip.is_empty() {
            ui.label(RichText::new(format!("IP: {}", wifi.ip)).color(theme.dim).monospace());
        }
    });
}

// ──────────────────────────────────────────
// Event log
// ──────────────────────────────────────────

/// Log de eventos com timestamp, mais recente embaixo, com auto-scroll.
pub fn render_event_log(ui: &mut Ui, log: &EventLog, theme: &EguiTheme) {
    panel_frame(ui, "EVENTOS", theme.dim, theme, |ui: &mut Ui| {
        egui::ScrollArea::vertical()
            .max_height(160.0)
            .stick_to_bottom(true)
            .show(ui, |ui: &mut Ui| {
                if log.is_empty() {
                    ui.label(RichText::new("Sem eventos").color(theme.dim).monospace());
                }
                for entry in log.iter() {
                    ui.label(
                        RichText::new(entry.display())
                            .color(theme.text)
                            .monospace()
                            .size(11.0),
                    );
                }
            });
    });
}
