//! Comandos de controle enviados ao rig e o canal de saída.
//!
//! O caminho de comandos é desacoplado do caminho de leitura: não existe
//! correlação comando/resposta. Um `ACK:`/`ERR:` que chegue depois entra no
//! event log pelo fluxo normal de leitura, sem casar com o comando que o
//! provocou; limitação conhecida do protocolo do firmware, preservada.

use std::io::Write;
use thiserror::Error;

/// Falhas do transporte de saída.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transporte fechado: conecte a serial antes de enviar comandos")]
    Closed,

    #[error("falha de escrita no transporte: {0}")]
    Io(#[from] std::io::Error),
}

/// Conjunto fechado de comandos que o firmware entende.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    StartReading,
    StopReading,
    SetWifi { ssid: String, password: String },
    DisconnectWifi,
    Reset,
}

impl Command {
    /// String exata de fio, já com o terminador de linha.
    pub fn wire_string(&self) -> String {
        match self {
            Command::StartReading => "START_READING\n".to_string(),
            Command::StopReading => "STOP_READING\n".to_string(),
            Command::SetWifi { ssid, password } => format!("SET_WIFI:{ssid},{password}\n"),
            Command::DisconnectWifi => "DISCONNECT_WIFI\n".to_string(),
            Command::Reset => "RESET\n".to_string(),
        }
    }

    /// Nome curto para mensagens de log.
    pub fn label(&self) -> &'static str {
        match self {
            Command::StartReading => "START_READING",
            Command::StopReading => "STOP_READING",
            Command::SetWifi { .. } => "SET_WIFI",
            Command::DisconnectWifi => "DISCONNECT_WIFI",
            Command::Reset => "RESET",
        }
    }
}

/// Canal de comandos de saída.
///
/// Envolve qualquer `Write` (na prática, o clone de escrita da porta
/// serial). Falha de envio volta como `Err` para o chamador registrar no
/// event log; nunca derruba o monitor.
#[derive(Debug)]
pub struct CommandLink<W: Write> {
    writer: Option<W>,
}

impl<W: Write> CommandLink<W> {
    /// Canal sem transporte; todo envio falha com [`TransportError::Closed`].
    pub fn closed() -> Self {
        Self { writer: None }
    }

    /// Canal ligado a um transporte aberto.
    pub fn open(writer: W) -> Self {
        Self { writer: Some(writer) }
    }

    pub fn is_open(&self) -> bool {
        self.writer.is_some()
    }

    /// Solta o transporte (desconexão); envios voltam a falhar com `Closed`.
    pub fn detach(&mut self) {
        self.writer = None;
    }

    /// Serializa e escreve o comando no transporte.
    pub fn send(&mut self, command: &Command) -> Result<(), TransportError> {
        let writer = self.writer.as_mut().ok_or(TransportError::Closed)?;
        let wire = command.wire_string();
        if let Err(e) = writer.write_all(wire.as_bytes()).and_then(|()| writer.flush()) {
            // Transporte quebrado não se recupera sozinho; solta o handle
            // para o chamador tratar como desconectado.
            self.writer = None;
            return Err(TransportError::Io(e));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "porta removida"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn wire_strings_match_the_firmware_exactly() {
        assert_eq!(Command::StartReading.wire_string(), "START_READING\n");
        assert_eq!(Command::StopReading.wire_string(), "STOP_READING\n");
        assert_eq!(
            Command::SetWifi { ssid: "lab".into(), password: "s3nha".into() }.wire_string(),
            "SET_WIFI:lab,s3nha\n"
        );
        assert_eq!(Command::DisconnectWifi.wire_string(), "DISCONNECT_WIFI\n");
        assert_eq!(Command::Reset.wire_string(), "RESET\n");
    }

    #[test]
    fn send_writes_the_exact_bytes() {
        let mut link = CommandLink::open(Vec::new());
        link.send(&Command::StartReading).unwrap();
        link.send(&Command::Reset).unwrap();
        let written = link.writer.take().unwrap();
        assert_eq!(written, b"START_READING\nRESET\n");
    }

    #[test]
    fn send_on_closed_link_reports_instead_of_panicking() {
        let mut link: CommandLink<Vec<u8>> = CommandLink::closed();
        assert!(matches!(
            link.send(&Command::StartReading),
            Err(TransportError::Closed)
        ));
    }

    #[test]
    fn write_failure_detaches_the_transport() {
        let mut link = CommandLink::open(BrokenPipe);
        assert!(matches!(
            link.send(&Command::StopReading),
            Err(TransportError::Io(_))
        ));
        assert!(!link.is_open());
        // O próximo envio já reporta Closed, sem tocar o transporte morto.
        assert!(matches!(
            link.send(&Command::StopReading),
            Err(TransportError::Closed)
        ));
    }

    #[test]
    fn detach_closes_the_channel() {
        let mut link = CommandLink::open(Vec::new());
        assert!(link.is_open());
        link.detach();
        assert!(!link.is_open());
    }
}
