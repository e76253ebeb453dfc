//! Thread de leitura da serial: produtor único da fila de linhas.
//!
//! Um produtor (esta thread) e um consumidor (a UI, via `poll_serial`)
//! conversam por um channel FIFO limitado. O `send` é bloqueante de
//! propósito: descartar uma linha sob pressão corromperia a remontagem de
//! JSON do outro lado.

use bancada_core::protocol::LineSplitter;
use chrono::{DateTime, Local};
use crossbeam_channel::{Receiver, Sender, bounded};
use serialport::SerialPort;
use std::io::Read;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// Linha decodificada, com horário de chegada. Vive só na fila; é
/// consumida (e destruída) pelo assembler.
#[derive(Debug, Clone)]
pub struct RawLine {
    pub at: DateTime<Local>,
    pub text: String,
}

/// Mensagem da thread de leitura para o consumidor.
#[derive(Debug, Clone)]
pub enum SerialEvent {
    /// Linha completa decodificada do fluxo.
    Line(RawLine),
    /// O transporte morreu; a thread terminou e não reconecta sozinha.
    Disconnected(String),
}

/// Sinal de parada compartilhado com a thread de leitura.
///
/// Fechar a conexão é o único sinal de cancelamento: a thread reavalia o
/// flag a cada iteração (o timeout de leitura limita a demora).
#[derive(Debug, Clone)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

impl Default for StopFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// Inicia a thread de leitura sobre um handle da porta serial.
/// Retorna o receiver da fila e o sinal de parada.
pub fn spawn_reader_thread(
    port: Box<dyn SerialPort>,
    queue_capacity: usize,
) -> (Receiver<SerialEvent>, StopFlag) {
    let (tx, rx) = bounded::<SerialEvent>(queue_capacity.max(1));
    let stop = StopFlag::new();
    let thread_stop = stop.clone();

    std::thread::Builder::new()
        .name("serial-reader".into())
        .spawn(move || reader_loop(port, &tx, &thread_stop))
        .expect("Falha ao criar thread de leitura serial");

    (rx, stop)
}

/// Loop do produtor: lê o que houver, fatia em linhas e enfileira.
///
/// Timeout de leitura é rotina (reavalia o stop flag e segue). Qualquer
/// outro erro, fim de fluxo incluído, é terminal: a thread reporta
/// [`SerialEvent::Disconnected`] e encerra, sem retry.
fn reader_loop<R: Read>(mut port: R, tx: &Sender<SerialEvent>, stop: &StopFlag) {
    let mut splitter = LineSplitter::default();
    let mut buf = [0u8; 1024];

    info!("Thread de leitura serial iniciada");
    while !stop.is_set() {
        match port.read(&mut buf) {
            Ok(0) => {
                let _ = tx.send(SerialEvent::Disconnected(
                    "fim de fluxo na porta serial".into(),
                ));
                return;
            }
            Ok(n) => {
                for text in splitter.push_chunk(&buf[..n]) {
                    let line = RawLine { at: Local::now(), text };
                    if tx.send(SerialEvent::Line(line)).is_err() {
                        // Consumidor sumiu; nada mais a fazer.
                        return;
                    }
                }
            }
            Err(ref e)
                if e.kind() == std::io::ErrorKind::TimedOut
                    || e.kind() == std::io::ErrorKind::WouldBlock => {}
            Err(e) => {
                warn!("Erro de leitura na serial: {e}");
                let _ = tx.send(SerialEvent::Disconnected(format!("erro de leitura: {e}")));
                return;
            }
        }
    }
    debug!("Thread de leitura encerrada por desconexão local");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::io;

    /// Porta falsa que devolve um roteiro de leituras e depois quebra.
    struct ScriptedPort {
        script: VecDeque<io::Result<Vec<u8>>>,
    }

    impl ScriptedPort {
        fn new(script: Vec<io::Result<Vec<u8>>>) -> Self {
            Self { script: script.into() }
        }
    }

    impl Read for ScriptedPort {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.script.pop_front() {
                Some(Ok(bytes)) => {
                    buf[..bytes.len()].copy_from_slice(&bytes);
                    Ok(bytes.len())
                }
                Some(Err(e)) => Err(e),
                None => Err(io::Error::other("roteiro esgotado")),
            }
        }
    }

    fn timeout() -> io::Result<Vec<u8>> {
        Err(io::Error::new(io::ErrorKind::TimedOut, "timeout"))
    }

    #[test]
    fn lines_arrive_in_order_then_disconnect() {
        let port = ScriptedPort::new(vec![
            Ok(b"ACK:um\nST".to_vec()),
            timeout(),
            Ok(b"ATUS:dois\n".to_vec()),
        ]);
        let (tx, rx) = bounded(16);
        reader_loop(port, &tx, &StopFlag::new());

        let events: Vec<SerialEvent> = rx.try_iter().collect();
        assert_eq!(events.len(), 3);
        assert!(matches!(&events[0], SerialEvent::Line(l) if l.text == "ACK:um"));
        assert!(matches!(&events[1], SerialEvent::Line(l) if l.text == "STATUS:dois"));
        assert!(matches!(&events[2], SerialEvent::Disconnected(_)));
    }

    #[test]
    fn eof_counts_as_disconnect() {
        let port = ScriptedPort::new(vec![Ok(b"ACK:ok\n".to_vec()), Ok(Vec::new())]);
        let (tx, rx) = bounded(16);
        reader_loop(port, &tx, &StopFlag::new());

        let events: Vec<SerialEvent> = rx.try_iter().collect();
        assert_eq!(events.len(), 2);
        assert!(matches!(&events[1], SerialEvent::Disconnected(_)));
    }

    #[test]
    fn stop_flag_ends_the_loop_without_events() {
        let port = ScriptedPort::new(vec![timeout(), timeout()]);
        let (tx, rx) = bounded(16);
        let stop = StopFlag::new();
        stop.stop();
        reader_loop(port, &tx, &stop);
        assert!(rx.try_iter().next().is_none());
    }
}
