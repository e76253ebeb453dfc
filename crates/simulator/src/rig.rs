//! Firmware simulado: estado, comandos e leituras sintéticas.
//!
//! Reproduz o contrato observável do firmware real da bancada: o mesmo
//! conjunto de comandos, as mesmas respostas `ACK:`/`ERR:`/`WIFI_STATUS:`
//! e objetos JSON com o esquema fixo de 13 chaves.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ──────────────────────────────────────────────
// Comandos
// ──────────────────────────────────────────────

/// Comando reconhecido pelo firmware simulado.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RigCommand {
    StartReading,
    StopReading,
    SetWifi { ssid: String, password: String },
    DisconnectWifi,
    Reset,
    Unknown(String),
}

/// Interpreta uma linha de comando vinda do monitor.
pub fn parse_command(line: &str) -> RigCommand {
    match line {
        "START_READING" => RigCommand::StartReading,
        "STOP_READING" => RigCommand::StopReading,
        "DISCONNECT_WIFI" => RigCommand::DisconnectWifi,
        "RESET" => RigCommand::Reset,
        _ => {
            if let Some(rest) = line.strip_prefix("SET_WIFI:") {
                match rest.split_once(',') {
                    Some((ssid, password)) if !ssid.is_empty() => RigCommand::SetWifi {
                        ssid: ssid.to_string(),
                        password: password.to_string(),
                    },
                    _ => RigCommand::Unknown(line.to_string()),
                }
            } else {
                RigCommand::Unknown(line.to_string())
            }
        }
    }
}

// ──────────────────────────────────────────────
// Estado e respostas
// ──────────────────────────────────────────────

/// Estado do firmware simulado.
#[derive(Debug, Default)]
pub struct RigState {
    pub reading_active: bool,
    pub wifi_ssid: Option<String>,
}

/// Processa um comando e devolve as linhas de resposta, na ordem de envio.
///
/// Sem correlação comando/resposta no fio, igual ao firmware real: as
/// respostas são linhas soltas que o monitor loga conforme chegam.
pub fn respond(state: &mut RigState, command: RigCommand, wifi_ip: &str) -> Vec<String> {
    match command {
        RigCommand::StartReading => {
            state.reading_active = true;
            vec!["ACK:READING_STARTED".into()]
        }
        RigCommand::StopReading => {
            state.reading_active = false;
            vec!["ACK:READING_STOPPED".into()]
        }
        RigCommand::SetWifi { ssid, password: _ } => {
            state.wifi_ssid = Some(ssid.clone());
            vec![
                "ACK:WIFI_SAVED".into(),
                format!("WIFI_STATUS:CONNECTED:{ssid}:{wifi_ip}"),
            ]
        }
        RigCommand::DisconnectWifi => {
            state.wifi_ssid = None;
            vec!["WIFI_STATUS:DISCONNECTED::".into()]
        }
        RigCommand::Reset => {
            *state = RigState::default();
            vec!["STATUS:RESET".into()]
        }
        RigCommand::Unknown(line) => vec![format!("ERR:UNKNOWN_COMMAND:{line}")],
    }
}

// ──────────────────────────────────────────────
// Leituras sintéticas
// ──────────────────────────────────────────────

/// Gerador de leituras: caminhada aleatória suave por canal, com a
/// velocidade integrando a aceleração e a distância acumulando o módulo
/// da velocidade; bom o bastante para gráficos plausíveis.
#[derive(Debug)]
pub struct RigSimulator {
    rng: StdRng,
    accel: [f64; 3],
    vel: [f64; 3],
    dist: [f64; 3],
    height: [f64; 3],
    temp: f64,
}

impl RigSimulator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            accel: [0.0; 3],
            vel: [0.0; 3],
            dist: [0.0; 3],
            height: [1.2; 3],
            temp: 24.0,
        }
    }

    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Avança um passo da simulação e devolve o objeto JSON do frame.
    pub fn next_frame(&mut self) -> String {
        for i in 0..3 {
            self.accel[i] = walk(&mut self.rng, self.accel[i], 0.4, -2.0, 2.0);
            self.vel[i] = (self.vel[i] + self.accel[i] * 0.1).clamp(-5.0, 5.0);
            self.dist[i] = (self.dist[i] + self.vel[i].abs() * 0.1).clamp(0.0, 500.0);
            self.height[i] = walk(&mut self.rng, self.height[i], 0.05, 0.2, 3.0);
        }
        // Nunca exatamente 0: para o monitor, temperatura 0 é "sem leitura".
        self.temp = walk(&mut self.rng, self.temp, 0.2, 18.0, 32.0);

        serde_json::json!({
            "AX_1": round2(self.accel[0]),
            "AY_1": round2(self.accel[1]),
            "AZ_1": round2(self.accel[2]),
            "VX_1": round2(self.vel[0]),
            "VY_1": round2(self.vel[1]),
            "VZ_1": round2(self.vel[2]),
            "DX_1": round2(self.dist[0]),
            "DY_1": round2(self.dist[1]),
            "DZ_1": round2(self.dist[2]),
            "HX_1": round2(self.height[0]),
            "HY_1": round2(self.height[1]),
            "HZ_1": round2(self.height[2]),
            "TEMP_1": round2(self.temp),
        })
        .to_string()
    }
}

fn walk(rng: &mut StdRng, value: f64, step: f64, min: f64, max: f64) -> f64 {
    (value + rng.gen_range(-step..=step)).clamp(min, max)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
