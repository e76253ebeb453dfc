//! # Bancada Monitor
//!
//! Dashboard em tempo real para um rig de sensores ligado por serial.
//! Lê o fluxo de linhas do firmware (JSON de telemetria, status de WiFi,
//! respostas de controle), alimenta as janelas de histórico e envia os
//! comandos de controle pelo mesmo link.
//!
//! ## Atalhos
//! - `F` / `F11`: Fullscreen
//! - `G`: Toggle gráficos
//! - `T`: Alternar tema
//! - `Q` / `Esc`: Sair

mod dashboard;
mod panels;
mod serial_thread;
mod theme_egui;

use bancada_core::config::AppConfig;
use dashboard::MonitorApp;

fn main() -> eframe::Result<()> {
    // ── Logging ──
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // ── Config ──
    let config_path = AppConfig::default_path();
    let config = AppConfig::load(&config_path);

    if !config_path.exists() {
        let _ = config.save(&config_path);
    }

    // ── Janela eframe ──
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("⚙ Bancada Monitor ⚙")
            .with_inner_size([1100.0, 800.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Bancada Monitor",
        options,
        Box::new(move |cc| Ok(Box::new(MonitorApp::new(cc, config)))),
    )
}
