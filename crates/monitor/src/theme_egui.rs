//! Conversão de temas para `egui::Color32`.

use bancada_core::theme::{self, Theme};
use bancada_core::types::SensorKind;
use egui::Color32;

/// Tema convertido para tipos egui.
#[derive(Clone)]
pub struct EguiTheme {
    pub name: String,
    pub bg: Color32,
    pub panel: Color32,
    pub border: Color32,
    pub text: Color32,
    pub dim: Color32,
    pub title: Color32,
    pub accel: Color32,
    pub vel: Color32,
    pub dist: Color32,
    pub height: Color32,
    pub temp: Color32,
    pub ok: Color32,
    pub critical: Color32,
}

impl EguiTheme {
    /// Converte um [`Theme`] do core para [`EguiTheme`].
    pub fn from_core(t: &Theme) -> Self {
        Self {
            name: t.name.clone(),
            bg: hex_color(&t.bg),
            panel: hex_color(&t.panel),
            border: hex_color(&t.border),
            text: hex_color(&t.text),
            dim: hex_color(&t.dim),
            title: hex_color(&t.title),
            accel: hex_color(&t.accel),
            vel: hex_color(&t.vel),
            dist: hex_color(&t.dist),
            height: hex_color(&t.height),
            temp: hex_color(&t.temp),
            ok: hex_color(&t.ok),
            critical: hex_color(&t.critical),
        }
    }

    /// Cor de destaque de uma grandeza.
    pub fn kind_color(&self, kind: SensorKind) -> Color32 {
        match kind {
            SensorKind::Acceleration => self.accel,
            SensorKind::Velocity => self.vel,
            SensorKind::Distance => self.dist,
            SensorKind::Height => self.height,
            SensorKind::Temperature => self.temp,
        }
    }
}

fn hex_color(hex: &str) -> Color32 {
    let (r, g, b) = theme::hex_to_rgb(hex);
    Color32::from_rgb(r, g, b)
}

/// Carrega todos os temas disponíveis.
pub fn all_themes() -> Vec<EguiTheme> {
    theme::theme_names()
        .iter()
        .map(|name| EguiTheme::from_core(&theme::get_theme(name)))
        .collect()
}
