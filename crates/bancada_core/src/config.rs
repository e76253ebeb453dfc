//! Configuração unificada via TOML.
//!
//! Um único `config.toml` ao lado do executável cobre o monitor e o
//! simulador; seções ausentes caem nos padrões.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Configuração do Monitor (dashboard serial).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Porta serial (ex.: "/dev/ttyUSB0", "COM3")
    pub port: String,
    /// Baud rate da serial
    pub baud_rate: u32,
    /// Timeout de leitura da serial (ms); limita quanto a thread de
    /// leitura demora para perceber uma desconexão
    pub read_timeout_ms: u64,
    /// Amostras retidas por slot (grandeza, eixo) para os gráficos
    pub history_capacity: usize,
    /// Linhas retidas no event log
    pub event_log_capacity: usize,
    /// Capacidade da fila de linhas entre a thread de leitura e a UI
    pub line_queue_capacity: usize,
    /// Tema: "dark", "light", "high_contrast", "cyberpunk"
    pub theme: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            port: "/dev/ttyUSB0".into(),
            baud_rate: 115_200,
            read_timeout_ms: 200,
            history_capacity: 100,
            event_log_capacity: 500,
            line_queue_capacity: 256,
            theme: "dark".into(),
        }
    }
}

/// Configuração do Simulador (firmware de bancada simulado).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Porta serial do lado "dispositivo" (ex.: a outra ponta de um par
    /// de pty criado com socat)
    pub port: String,
    /// Baud rate da serial
    pub baud_rate: u32,
    /// Intervalo entre frames de telemetria (segundos)
    pub interval_secs: f64,
    /// IP reportado quando o WiFi simulado conecta
    pub wifi_ip: String,
    /// Quebra cada objeto JSON em duas escritas, para exercitar a
    /// remontagem do lado do monitor
    pub fragment_output: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            port: "/dev/ttyUSB1".into(),
            baud_rate: 115_200,
            interval_secs: 0.5,
            wifi_ip: "192.168.4.23".into(),
            fragment_output: false,
        }
    }
}

/// Configuração raiz do aplicativo (unifica monitor e simulador).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub monitor: MonitorConfig,
    pub simulator: SimulatorConfig,
}

impl AppConfig {
    /// Carrega configuração de um arquivo TOML.
    pub fn load(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match toml::from_str::<AppConfig>(&content) {
                    Ok(config) => {
                        info!("Configuração carregada de {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        warn!("Erro ao parsear {}: {}", path.display(), e);
                    }
                },
                Err(e) => {
                    warn!("Erro ao ler {}: {}", path.display(), e);
                }
            }
        }

        info!("Usando configuração padrão");
        AppConfig::default()
    }

    /// Salva configuração em arquivo TOML.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content = toml::to_string_pretty(self).map_err(|e| e.to_string())?;
        std::fs::write(path, content).map_err(|e| e.to_string())?;
        info!("Configuração salva em {}", path.display());
        Ok(())
    }

    /// Retorna o caminho padrão do config.toml.
    pub fn default_path() -> PathBuf {
        let exe_dir = std::env::current_exe()
            .map(|p| p.parent().unwrap_or(Path::new(".")).to_path_buf())
            .unwrap_or_else(|_| PathBuf::from("."));
        exe_dir.join("config.toml")
    }

    /// Valida a configuração e retorna lista de erros.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.monitor.port.is_empty() {
            errors.push("Porta do monitor não pode ser vazia".into());
        }
        if self.monitor.baud_rate == 0 {
            errors.push("Baud rate do monitor não pode ser 0".into());
        }
        if self.monitor.history_capacity == 0 {
            errors.push("Histórico precisa reter pelo menos 1 amostra".into());
        }
        if self.monitor.line_queue_capacity == 0 {
            errors.push("Fila de linhas precisa de capacidade mínima 1".into());
        }
        if self.simulator.interval_secs < 0.05 || self.simulator.interval_secs > 60.0 {
            errors.push(format!(
                "Intervalo do simulador inválido: {} (0.05–60.0)",
                self.simulator.interval_secs
            ));
        }

        errors
    }
}
