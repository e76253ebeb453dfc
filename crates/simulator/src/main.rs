//! # Bancada Simulator
//!
//! Faz as vezes do firmware do rig na outra ponta do link serial: responde
//! ao conjunto de comandos do monitor e, enquanto a leitura estiver ativa,
//! emite um objeto JSON de telemetria por intervalo.
//!
//! ## Uso
//! ```bash
//! socat -d -d pty,raw,echo=0,link=/tmp/ttyMON pty,raw,echo=0,link=/tmp/ttySIM
//! bancada_sim        # config.toml: [simulator] port = "/tmp/ttySIM"
//! bancada_monitor    # config.toml: [monitor]   port = "/tmp/ttyMON"
//! ```

mod rig;

use bancada_core::config::AppConfig;
use bancada_core::protocol::LineSplitter;
use rig::{RigSimulator, RigState};
use serialport::SerialPort;
use std::io::{Read, Write};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

fn main() {
    // ── Logging ──
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // ── Carregar config ──
    let config_path = AppConfig::default_path();
    let config = AppConfig::load(&config_path);

    if !config_path.exists() {
        if let Err(e) = config.save(&config_path) {
            error!("Não foi possível salvar config padrão: {e}");
        }
    }

    let sim_cfg = &config.simulator;
    let interval = Duration::from_secs_f64(sim_cfg.interval_secs);

    // ── Porta serial ──
    // Timeout curto: a leitura também serve de tick da emissão periódica.
    let mut port = match serialport::new(sim_cfg.port.clone(), sim_cfg.baud_rate)
        .timeout(Duration::from_millis(50))
        .open()
    {
        Ok(port) => port,
        Err(e) => {
            error!("Falha ao abrir {}: {e}", sim_cfg.port);
            std::process::exit(1);
        }
    };

    // ── Banner ──
    println!();
    println!("══════════════════════════════════════════════");
    println!("   ⚙ BANCADA SIM – FIRMWARE SIMULADO");
    println!("══════════════════════════════════════════════");
    println!("  Porta:     {} @ {}", sim_cfg.port, sim_cfg.baud_rate);
    println!("  Intervalo: {:.1}s", sim_cfg.interval_secs);
    println!("  Fragmenta: {}", if sim_cfg.fragment_output { "sim" } else { "não" });
    println!("══════════════════════════════════════════════");
    println!();

    let mut splitter = LineSplitter::default();
    let mut state = RigState::default();
    let mut sim = RigSimulator::from_entropy();
    let mut buf = [0u8; 512];
    let mut last_emit = Instant::now();

    loop {
        // ── Comandos do monitor ──
        match port.read(&mut buf) {
            Ok(0) => {
                info!("Monitor fechou a porta; encerrando");
                break;
            }
            Ok(n) => {
                for line in splitter.push_chunk(&buf[..n]) {
                    let command = rig::parse_command(&line);
                    debug!("comando recebido: {line}");
                    for reply in rig::respond(&mut state, command, &sim_cfg.wifi_ip) {
                        info!("→ {reply}");
                        if let Err(e) = write_line(&mut port, &reply) {
                            error!("Erro ao responder: {e}");
                        }
                    }
                }
            }
            Err(ref e)
                if e.kind() == std::io::ErrorKind::TimedOut
                    || e.kind() == std::io::ErrorKind::WouldBlock => {}
            Err(e) => {
                error!("Erro de leitura na porta: {e}");
                break;
            }
        }

        // ── Emissão periódica de telemetria ──
        if state.reading_active && last_emit.elapsed() >= interval {
            let frame = sim.next_frame();
            if let Err(e) = write_frame(&mut port, &frame, sim_cfg.fragment_output) {
                error!("Erro ao emitir telemetria: {e}");
            }
            last_emit = Instant::now();
        }
    }
}

fn write_line(port: &mut Box<dyn SerialPort>, line: &str) -> std::io::Result<()> {
    port.write_all(line.as_bytes())?;
    port.write_all(b"\n")?;
    port.flush()
}

/// Escreve um frame de telemetria; no modo fragmentado o objeto sai em
/// duas escritas (o JSON é ASCII puro), exercitando a remontagem do
/// monitor.
fn write_frame(port: &mut Box<dyn SerialPort>, frame: &str, fragment: bool) -> std::io::Result<()> {
    if fragment && frame.len() > 8 {
        let mid = frame.len() / 2;
        port.write_all(frame[..mid].as_bytes())?;
        port.flush()?;
        port.write_all(frame[mid..].as_bytes())?;
    } else {
        port.write_all(frame.as_bytes())?;
    }
    port.write_all(b"\n")?;
    port.flush()
}
