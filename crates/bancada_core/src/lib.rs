//! # Bancada Core
//!
//! Crate compartilhada que define o protocolo de linha do rig de sensores,
//! o esquema de telemetria, a janela deslizante para plotagem, o event
//! log, os comandos de controle, a configuração TOML e os temas do
//! dashboard.
//!
//! ## Módulos
//! - [`types`] – Grandezas, eixos e o esquema fixo de 13 campos
//! - [`protocol`] – LineSplitter e FrameAssembler (bytes → frames)
//! - [`dispatch`] – Roteamento de frames para os sinks
//! - [`store`] – Janela deslizante por (grandeza, eixo)
//! - [`events`] – Event log limitado com timestamp
//! - [`command`] – Comandos de controle e canal de saída
//! - [`config`] – Configuração unificada via TOML
//! - [`theme`] – Temas do dashboard

pub mod command;
pub mod config;
pub mod dispatch;
pub mod events;
pub mod protocol;
pub mod store;
pub mod theme;
pub mod types;

// Re-exports convenientes
pub use command::{Command, CommandLink, TransportError};
pub use config::AppConfig;
pub use dispatch::EventRouter;
pub use protocol::{Frame, FrameAssembler, LineSplitter};
pub use store::TelemetryStore;
pub use types::{Axis, SensorKind, WifiStatus};
