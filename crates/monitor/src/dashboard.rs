//! Dashboard principal – App eframe/egui.
//!
//! A ingestão roda entrelaçada com o refresh da UI: a cada frame o app
//! drena a fila de linhas (sem nunca bloquear), passa as linhas pelo
//! assembler e despacha os frames para os sinks. A thread de leitura é o
//! único produtor; este contexto é o único consumidor.

use crate::panels;
use crate::serial_thread::{self, SerialEvent, StopFlag};
use crate::theme_egui::{self, EguiTheme};
use bancada_core::command::{Command, CommandLink, TransportError};
use bancada_core::config::AppConfig;
use bancada_core::dispatch::EventRouter;
use bancada_core::events::EventLog;
use bancada_core::protocol::FrameAssembler;
use bancada_core::store::TelemetryStore;
use bancada_core::types::SensorKind;
use chrono::{DateTime, Local};
use crossbeam_channel::Receiver;
use egui::{RichText, Ui};
use egui_plot::{Line, Plot, PlotPoints};
use serialport::SerialPort;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Uma conexão serial aberta: fila de entrada, sinal de parada da thread
/// de leitura e o handle de escrita do canal de comandos.
struct Connection {
    rx: Receiver<SerialEvent>,
    stop: StopFlag,
    link: CommandLink<Box<dyn SerialPort>>,
    port_name: String,
}

/// Estado do dashboard.
pub struct MonitorApp {
    config: AppConfig,
    theme: EguiTheme,
    theme_index: usize,
    all_themes: Vec<EguiTheme>,

    // Conexão
    port_input: String,
    baud_input: String,
    connection: Option<Connection>,

    // Ingestão (consumidor único)
    assembler: FrameAssembler,
    router: EventRouter,
    last_line_at: Option<DateTime<Local>>,

    // UI state
    ssid_input: String,
    password_input: String,
    reading_active: bool,
    show_graphs: bool,
    is_fullscreen: bool,
}

impl MonitorApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let store = Arc::new(TelemetryStore::new(config.monitor.history_capacity));
        let router = EventRouter::new(store, EventLog::new(config.monitor.event_log_capacity));

        let all_themes = theme_egui::all_themes();
        let theme_index = all_themes
            .iter()
            .position(|t| t.name == config.monitor.theme)
            .unwrap_or(0);
        let theme = all_themes[theme_index].clone();

        let port_input = config.monitor.port.clone();
        let baud_input = config.monitor.baud_rate.to_string();

        Self {
            config,
            theme,
            theme_index,
            all_themes,
            port_input,
            baud_input,
            connection: None,
            assembler: FrameAssembler::default(),
            router,
            last_line_at: None,
            ssid_input: String::new(),
            password_input: String::new(),
            reading_active: false,
            show_graphs: false,
            is_fullscreen: false,
        }
    }

    fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    // ──────────────────────────────────────────
    // Ciclo de vida da conexão
    // ──────────────────────────────────────────

    fn connect(&mut self) {
        let Ok(baud) = self.baud_input.trim().parse::<u32>() else {
            self.router
                .log
                .push(format!("Baud rate inválido: {}", self.baud_input));
            return;
        };
        let port_name = self.port_input.trim().to_string();
        let timeout = Duration::from_millis(self.config.monitor.read_timeout_ms);

        match serialport::new(port_name.clone(), baud).timeout(timeout).open() {
            Ok(port) => match port.try_clone() {
                Ok(reader_port) => {
                    let (rx, stop) = serial_thread::spawn_reader_thread(
                        reader_port,
                        self.config.monitor.line_queue_capacity,
                    );
                    // Buffer novo por conexão: frame parcial de uma sessão
                    // anterior não pode vazar para esta.
                    self.assembler = FrameAssembler::default();
                    self.connection = Some(Connection {
                        rx,
                        stop,
                        link: CommandLink::open(port),
                        port_name: port_name.clone(),
                    });
                    info!("Conectado a {port_name} @ {baud}");
                    self.router
                        .log
                        .push(format!("Conectado à porta {port_name} @ {baud}"));
                }
                Err(e) => {
                    self.router
                        .log
                        .push(format!("Erro ao duplicar handle da porta: {e}"));
                }
            },
            Err(e) => {
                self.router
                    .log
                    .push(format!("Erro ao conectar em {port_name}: {e}"));
            }
        }
    }

    fn disconnect(&mut self) {
        if let Some(conn) = self.connection.take() {
            conn.stop.stop();
            // Os handles da porta morrem aqui; a thread percebe pelo flag
            // (limitado pelo timeout de leitura) e encerra sozinha.
            self.router
                .log
                .push(format!("Desconectado da porta {}", conn.port_name));
        }
        self.reading_active = false;
        // O histórico fica visível depois de desconectar, como no painel
        // físico da bancada.
    }

    /// Drena as mensagens pendentes da thread de leitura.
    fn poll_serial(&mut self) {
        let mut lost: Option<String> = None;
        if let Some(conn) = self.connection.as_ref() {
            while let Ok(event) = conn.rx.try_recv() {
                match event {
                    SerialEvent::Line(line) => {
                        self.last_line_at = Some(line.at);
                        for frame in self.assembler.push_line(&line.text) {
                            self.router.dispatch(frame);
                        }
                    }
                    SerialEvent::Disconnected(reason) => {
                        lost = Some(reason);
                        break;
                    }
                }
            }
        }
        if let Some(reason) = lost {
            self.router
                .log
                .push(format!("Conexão serial perdida: {reason}"));
            self.connection = None;
            self.reading_active = false;
        }
    }

    // ──────────────────────────────────────────
    // Comandos
    // ──────────────────────────────────────────

    /// Envia um comando ao rig; falha vira linha no event log, nunca pânico.
    fn send_command(&mut self, command: Command) {
        let result = match self.connection.as_mut() {
            Some(conn) => conn.link.send(&command),
            None => Err(TransportError::Closed),
        };
        match result {
            Ok(()) => {
                match command {
                    Command::StartReading => self.reading_active = true,
                    Command::StopReading => self.reading_active = false,
                    _ => {}
                }
                self.router
                    .log
                    .push(format!("Comando {} enviado", command.label()));
            }
            Err(e) => {
                self.router
                    .log
                    .push(format!("Erro ao enviar {}: {e}", command.label()));
            }
        }
    }

    // ──────────────────────────────────────────
    // Render
    // ──────────────────────────────────────────

    fn render_connection_bar(&mut self, ui: &mut Ui) {
        let connected = self.is_connected();
        ui.horizontal(|ui: &mut Ui| {
            ui.label(RichText::new("Porta:").color(self.theme.dim).monospace());
            ui.add(
                egui::TextEdit::singleline(&mut self.port_input)
                    .desired_width(140.0)
                    .interactive(!connected),
            );
            ui.label(RichText::new("Baud:").color(self.theme.dim).monospace());
            ui.add(
                egui::TextEdit::singleline(&mut self.baud_input)
                    .desired_width(80.0)
                    .interactive(!connected),
            );

            if connected {
                if ui.button("Desconectar").clicked() {
                    self.disconnect();
                }
                ui.label(RichText::new("● Conectado").color(self.theme.ok).monospace());
                if let Some(at) = self.last_line_at {
                    ui.label(
                        RichText::new(format!("última linha {}", at.format("%H:%M:%S")))
                            .color(self.theme.dim)
                            .monospace(),
                    );
                }
            } else {
                if ui.button("Conectar").clicked() {
                    self.connect();
                }
                ui.label(
                    RichText::new("○ Desconectado")
                        .color(self.theme.critical)
                        .monospace(),
                );
            }
        });
    }

    fn render_controls(&mut self, ui: &mut Ui) {
        let accent = self.theme.title;
        let theme = self.theme.clone();
        panels::panel_frame(ui, "CONTROLES", accent, &theme, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                let can_start = self.is_connected() && !self.reading_active;
                let can_stop = self.is_connected() && self.reading_active;
                if ui.add_enabled(can_start, egui::Button::new("Iniciar leitura")).clicked() {
                    self.send_command(Command::StartReading);
                }
                if ui.add_enabled(can_stop, egui::Button::new("Parar leitura")).clicked() {
                    self.send_command(Command::StopReading);
                }
                if ui
                    .add_enabled(self.is_connected(), egui::Button::new("Reset"))
                    .clicked()
                {
                    self.send_command(Command::Reset);
                }
            });

            ui.add_space(6.0);
            ui.separator();

            // WiFi do rig: estado reportado + credenciais para SET_WIFI.
            panels::render_wifi_status(ui, &self.router.wifi, &theme);
            ui.horizontal(|ui: &mut Ui| {
                ui.label(RichText::new("SSID:").color(theme.dim).monospace());
                ui.add(egui::TextEdit::singleline(&mut self.ssid_input).desired_width(120.0));
                ui.label(RichText::new("Senha:").color(theme.dim).monospace());
                ui.add(
                    egui::TextEdit::singleline(&mut self.password_input)
                        .desired_width(120.0)
                        .password(true),
                );
            });
            ui.horizontal(|ui: &mut Ui| {
                let can_set = self.is_connected() && !self.ssid_input.trim().is_empty();
                if ui.add_enabled(can_set, egui::Button::new("Conectar WiFi")).clicked() {
                    self.send_command(Command::SetWifi {
                        ssid: self.ssid_input.trim().to_string(),
                        password: self.password_input.clone(),
                    });
                }
                if ui
                    .add_enabled(self.is_connected(), egui::Button::new("Desconectar WiFi"))
                    .clicked()
                {
                    self.send_command(Command::DisconnectWifi);
                }
            });
        });
    }

    /// Renderiza os gráficos de histórico, um por slot (grandeza, eixo).
    fn render_graphs(&self, ui: &mut Ui) {
        let available_width = ui.available_width();
        let plot_height = 100.0;

        for kind in SensorKind::all() {
            let color = self.theme.kind_color(kind);
            ui.horizontal(|ui: &mut Ui| {
                let w = (available_width / 3.0) - 8.0;
                for axis in kind.axes() {
                    let data = self.router.store.snapshot(kind, *axis);
                    ui.vertical(|ui: &mut Ui| {
                        self.mini_plot(
                            ui,
                            &format!("{} {}", kind.label(), axis.label()),
                            &data,
                            color,
                            w,
                            plot_height,
                        );
                    });
                }
            });
        }
    }

    fn mini_plot(
        &self,
        ui: &mut Ui,
        label: &str,
        data: &[f64],
        color: egui::Color32,
        width: f32,
        height: f32,
    ) {
        ui.label(RichText::new(label).color(color).monospace().size(11.0));

        let points: PlotPoints = data
            .iter()
            .enumerate()
            .map(|(i, &v)| [i as f64, v])
            .collect();

        let line = Line::new(points).color(color).width(1.5);

        Plot::new(format!("plot_{label}"))
            .height(height)
            .width(width)
            .show_axes(false)
            .show_grid(false)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .show(ui, |plot_ui| {
                plot_ui.line(line);
            });
    }
}

impl eframe::App for MonitorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ── Consumir a fila de linhas ──
        self.poll_serial();

        // ── Repaint contínuo (60 FPS) ──
        ctx.request_repaint_after(std::time::Duration::from_millis(16));

        // ── Estilo visual baseado no tema ──
        let mut visuals = if self.theme.name == "light" {
            egui::Visuals::light()
        } else {
            egui::Visuals::dark()
        };
        visuals.panel_fill = self.theme.bg;
        visuals.window_fill = self.theme.panel;
        visuals.override_text_color = Some(self.theme.text);
        ctx.set_visuals(visuals);

        // ── Atalhos de teclado ──
        ctx.input(|i: &egui::InputState| {
            if i.key_pressed(egui::Key::G) {
                self.show_graphs = !self.show_graphs;
            }
            if i.key_pressed(egui::Key::T) {
                self.theme_index = (self.theme_index + 1) % self.all_themes.len();
                self.theme = self.all_themes[self.theme_index].clone();
                info!("Tema: {}", self.theme.name);
            }
            if i.key_pressed(egui::Key::Q) || i.key_pressed(egui::Key::Escape) {
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
            if i.key_pressed(egui::Key::F) || i.key_pressed(egui::Key::F11) {
                self.is_fullscreen = !self.is_fullscreen;
                ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(self.is_fullscreen));
            }
        });

        // ── Painel central ──
        egui::CentralPanel::default().show(ctx, |ui: &mut Ui| {
            // ── Título ──
            ui.vertical_centered(|ui: &mut Ui| {
                ui.label(
                    RichText::new("⚙ BANCADA MONITOR ⚙")
                        .color(self.theme.title)
                        .size(22.0)
                        .strong()
                        .monospace(),
                );
            });

            self.render_connection_bar(ui);
            ui.add_space(8.0);

            // ── Row 1: Leituras | Controles ──
            ui.columns(2, |cols| {
                let theme = self.theme.clone();
                panels::render_readings(&mut cols[0], &self.router.store, &theme);
                self.render_controls(&mut cols[1]);
            });

            ui.add_space(6.0);

            // ── Event log ──
            panels::render_event_log(ui, &self.router.log, &self.theme);

            // ── Gráficos ──
            if self.show_graphs {
                ui.add_space(8.0);
                ui.separator();
                egui::ScrollArea::vertical().show(ui, |ui: &mut Ui| {
                    self.render_graphs(ui);
                });
            }

            // ── Help bar (fundo) ──
            ui.with_layout(egui::Layout::bottom_up(egui::Align::Center), |ui: &mut Ui| {
                ui.label(
                    RichText::new("[F] Fullscreen | [G] Gráficos | [T] Tema | [Q/Esc] Sair")
                        .color(self.theme.dim)
                        .monospace()
                        .size(10.0),
                );
            });
        });
    }
}
