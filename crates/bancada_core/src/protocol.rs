//! Protocolo de linha do rig: divisão em linhas e montagem de frames.
//!
//! O firmware fala texto orientado a linhas sobre a serial, misturando
//! três tipos de mensagem:
//!
//! ```text
//! WIFI_STATUS:<CONNECTED|DISCONNECTED>:<ssid>:<ip>
//! ACK:<texto> | ERR:<texto> | STATUS:<texto>
//! {"AX_1":0.12,"AY_1":-0.03, ...}      ← objeto JSON de telemetria
//! ```
//!
//! Objetos JSON podem chegar quebrados em várias linhas ou concatenados na
//! mesma linha. O [`FrameAssembler`] acumula texto e fatia candidatos do
//! primeiro `{` ao primeiro `}` seguinte. O casamento de chaves NÃO é
//! balanceado: objetos aninhados não são suportados (o firmware nunca os
//! emite) e "corrigir" isso mudaria o comportamento observável com entrada
//! corrompida.

use crate::types::WifiStatus;
use serde_json::{Map, Value};

/// Prefixo das linhas de status de WiFi.
pub const WIFI_STATUS_PREFIX: &str = "WIFI_STATUS:";

/// Prefixos das respostas de controle de linha única.
pub const ACK_PREFIX: &str = "ACK:";
pub const ERR_PREFIX: &str = "ERR:";
pub const STATUS_PREFIX: &str = "STATUS:";

/// Tipo de uma resposta de controle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    Ack,
    Err,
    Status,
}

/// Mensagem classificada, extraída do fluxo serial.
///
/// Imutável depois de construída; a posse passa do assembler para o
/// roteador e termina lá.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// Objeto JSON de telemetria (chaves ainda não validadas contra o esquema).
    Telemetry(Map<String, Value>),
    /// Mudança de estado do WiFi do rig.
    WifiStatus(WifiStatus),
    /// Resposta de controle, repassada verbatim ao event log.
    ControlReply { kind: ReplyKind, text: String },
    /// Candidato a JSON que não parseou; vai para o event log.
    Malformed { raw: String },
}

// ──────────────────────────────────────────────
// LineSplitter
// ──────────────────────────────────────────────

/// Divide chunks arbitrários de bytes em linhas completas.
///
/// Decodificação UTF-8 tolerante (bytes inválidos viram U+FFFD, nunca
/// erro). A cauda sem terminador fica retida até o próximo chunk, então o
/// resultado independe de onde o transporte quebrou a leitura.
#[derive(Debug, Default)]
pub struct LineSplitter {
    partial: Vec<u8>,
}

impl LineSplitter {
    /// Anexa um chunk cru e devolve as linhas completadas por ele,
    /// sem terminadores e sem linhas vazias.
    pub fn push_chunk(&mut self, chunk: &[u8]) -> Vec<String> {
        self.partial.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.partial.iter().position(|&b| b == b'\n') {
            let mut raw: Vec<u8> = self.partial.drain(..=pos).collect();
            raw.pop(); // '\n'
            if raw.last() == Some(&b'\r') {
                raw.pop();
            }
            let text = String::from_utf8_lossy(&raw);
            let text = text.trim();
            if !text.is_empty() {
                lines.push(text.to_string());
            }
        }
        lines
    }
}

// ──────────────────────────────────────────────
// FrameAssembler
// ──────────────────────────────────────────────

/// Acumula linhas e extrai frames completos.
///
/// Dono exclusivo do buffer de texto; uma única instância por conexão,
/// sempre no contexto consumidor. O buffer só retém dados do primeiro `{`
/// não consumido em diante (nada antes de um `{` jamais compõe um frame).
#[derive(Debug, Default)]
pub struct FrameAssembler {
    buffer: String,
}

impl FrameAssembler {
    /// Processa uma linha decodificada e devolve os frames completados por
    /// ela, na ordem em que o delimitador de fechamento apareceu.
    ///
    /// Linhas de controle (`WIFI_STATUS`/`ACK`/`ERR`/`STATUS`) viram frame
    /// na hora e não passam pelo buffer JSON.
    pub fn push_line(&mut self, line: &str) -> Vec<Frame> {
        if let Some(rest) = line.strip_prefix(WIFI_STATUS_PREFIX) {
            // Menos de 4 partes: ignorada em silêncio, sem frame.
            return parse_wifi_status(rest)
                .map(Frame::WifiStatus)
                .into_iter()
                .collect();
        }

        for (prefix, kind) in [
            (ACK_PREFIX, ReplyKind::Ack),
            (ERR_PREFIX, ReplyKind::Err),
            (STATUS_PREFIX, ReplyKind::Status),
        ] {
            if line.starts_with(prefix) {
                return vec![Frame::ControlReply {
                    kind,
                    text: line.to_string(),
                }];
            }
        }

        self.buffer.push_str(line);
        self.buffer.push('\n');
        self.extract_json_frames()
    }

    /// Varre o buffer extraindo candidatos `{..}` enquanto houver. Um
    /// candidato corrompido vira [`Frame::Malformed`] e a varredura
    /// continua, para que um objeto ruim não bloqueie os válidos atrás.
    fn extract_json_frames(&mut self) -> Vec<Frame> {
        let mut frames = Vec::new();
        loop {
            let Some(open) = self.buffer.find('{') else {
                self.buffer.clear();
                break;
            };
            let Some(close) = self.buffer[open..].find('}') else {
                // Frame parcial: retém de '{' em diante e espera mais linhas.
                self.buffer.drain(..open);
                break;
            };
            let close = open + close;
            let candidate = self.buffer[open..=close].to_string();
            self.buffer.drain(..=close);

            match serde_json::from_str::<Map<String, Value>>(&candidate) {
                Ok(fields) => frames.push(Frame::Telemetry(fields)),
                Err(_) => frames.push(Frame::Malformed { raw: candidate }),
            }
        }
        frames
    }

    /// Conteúdo ainda não consumido (frame parcial pendente).
    pub fn pending(&self) -> &str {
        &self.buffer
    }
}

/// `WIFI_STATUS:<status>:<ssid>:<ip>`: exige as 4 partes; o campo de ip
/// fica com qualquer `:` adicional (split limitado a 4 partes).
fn parse_wifi_status(rest: &str) -> Option<WifiStatus> {
    let mut parts = rest.splitn(3, ':');
    let status = parts.next()?;
    let ssid = parts.next()?;
    let ip = parts.next()?;
    Some(WifiStatus {
        connected: status == "CONNECTED",
        ssid: ssid.to_string(),
        ip: ip.to_string(),
    })
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Passa o texto inteiro pelo pipeline linha a linha.
    fn run_lines(text: &str) -> Vec<Frame> {
        let mut asm = FrameAssembler::default();
        text.lines()
            .flat_map(|line| asm.push_line(line))
            .collect()
    }

    /// Passa os bytes pelo pipeline completo em chunks arbitrários.
    fn run_chunks(bytes: &[u8], chunk_size: usize) -> Vec<Frame> {
        let mut splitter = LineSplitter::default();
        let mut asm = FrameAssembler::default();
        let mut frames = Vec::new();
        for chunk in bytes.chunks(chunk_size.max(1)) {
            for line in splitter.push_chunk(chunk) {
                frames.extend(asm.push_line(&line));
            }
        }
        frames
    }

    fn telemetry_value(frame: &Frame, key: &str) -> Value {
        match frame {
            Frame::Telemetry(fields) => fields.get(key).cloned().unwrap_or(Value::Null),
            other => panic!("esperava Telemetry, veio {other:?}"),
        }
    }

    #[test]
    fn splitter_handles_crlf_and_empty_lines() {
        let mut s = LineSplitter::default();
        let lines = s.push_chunk(b"ACK:ok\r\n\r\n  \nSTATUS:ready\n");
        assert_eq!(lines, vec!["ACK:ok".to_string(), "STATUS:ready".to_string()]);
    }

    #[test]
    fn splitter_keeps_partial_tail() {
        let mut s = LineSplitter::default();
        assert!(s.push_chunk(b"ACK:par").is_empty());
        assert_eq!(s.push_chunk(b"cial\n"), vec!["ACK:parcial".to_string()]);
    }

    #[test]
    fn splitter_never_fails_on_invalid_utf8() {
        let mut s = LineSplitter::default();
        let lines = s.push_chunk(b"STATUS:\xff\xfeok\n");
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("STATUS:"));
        assert!(lines[0].ends_with("ok"));
    }

    #[test]
    fn back_to_back_objects_on_one_line() {
        let frames = run_lines(r#"{"AX_1":1}{"AY_1":2}"#);
        assert_eq!(frames.len(), 2);
        assert_eq!(telemetry_value(&frames[0], "AX_1"), json!(1));
        assert_eq!(telemetry_value(&frames[0], "AY_1"), Value::Null);
        assert_eq!(telemetry_value(&frames[1], "AY_1"), json!(2));
    }

    #[test]
    fn object_split_across_lines_emits_only_after_close() {
        let mut asm = FrameAssembler::default();
        assert!(asm.push_line(r#"{"AX_1":1"#).is_empty());
        assert!(!asm.pending().is_empty());
        let frames = asm.push_line("}");
        assert_eq!(frames.len(), 1);
        assert_eq!(telemetry_value(&frames[0], "AX_1"), json!(1));
    }

    #[test]
    fn malformed_candidate_does_not_block_the_next_object() {
        let frames = run_lines(r#"{"AX_1": }{"AY_1":3}"#);
        assert_eq!(frames.len(), 2);
        assert!(matches!(&frames[0], Frame::Malformed { raw } if raw.contains("AX_1")));
        assert_eq!(telemetry_value(&frames[1], "AY_1"), json!(3));
    }

    #[test]
    fn garbage_before_an_object_is_dropped() {
        let frames = run_lines("lixo sem chave\nmais lixo {\"VX_1\":4}");
        assert_eq!(frames.len(), 1);
        assert_eq!(telemetry_value(&frames[0], "VX_1"), json!(4));
    }

    #[test]
    fn wifi_status_connected_parses() {
        let frames = run_lines("WIFI_STATUS:CONNECTED:MySSID:192.168.1.50");
        assert_eq!(
            frames,
            vec![Frame::WifiStatus(WifiStatus {
                connected: true,
                ssid: "MySSID".into(),
                ip: "192.168.1.50".into(),
            })]
        );
    }

    #[test]
    fn wifi_status_disconnected_parses() {
        let frames = run_lines("WIFI_STATUS:DISCONNECTED::");
        assert_eq!(
            frames,
            vec![Frame::WifiStatus(WifiStatus::default())]
        );
    }

    #[test]
    fn wifi_status_with_too_few_parts_yields_nothing() {
        assert!(run_lines("WIFI_STATUS:DOWN").is_empty());
        assert!(run_lines("WIFI_STATUS:CONNECTED:so_ssid").is_empty());
    }

    #[test]
    fn wifi_ip_field_keeps_extra_colons() {
        let frames = run_lines("WIFI_STATUS:CONNECTED:lab:fe80::1");
        match &frames[0] {
            Frame::WifiStatus(s) => assert_eq!(s.ip, "fe80::1"),
            other => panic!("esperava WifiStatus, veio {other:?}"),
        }
    }

    #[test]
    fn control_replies_pass_through_verbatim() {
        let frames = run_lines("ACK:READING_STARTED\nERR:UNKNOWN_COMMAND:foo\nSTATUS:RESET");
        assert_eq!(frames.len(), 3);
        assert_eq!(
            frames[0],
            Frame::ControlReply { kind: ReplyKind::Ack, text: "ACK:READING_STARTED".into() }
        );
        assert_eq!(
            frames[1],
            Frame::ControlReply { kind: ReplyKind::Err, text: "ERR:UNKNOWN_COMMAND:foo".into() }
        );
        assert_eq!(
            frames[2],
            Frame::ControlReply { kind: ReplyKind::Status, text: "STATUS:RESET".into() }
        );
    }

    #[test]
    fn chunk_boundaries_do_not_change_the_frames() {
        let wire = b"WIFI_STATUS:CONNECTED:lab:10.0.0.9\n{\"AX_1\":1.5,\n\"AY_1\":-2}\nACK:ok\n{\"VX_1\":0.25}{\"bad\": }\nSTATUS:done\n";
        let whole = run_chunks(wire, wire.len());
        assert_eq!(whole.len(), 6);
        for chunk_size in 1..wire.len() {
            assert_eq!(
                run_chunks(wire, chunk_size),
                whole,
                "frames divergem com chunks de {chunk_size} bytes"
            );
        }
    }

    #[test]
    fn nested_braces_close_on_first_closing_brace() {
        // Limitação documentada: o fechamento é o primeiro '}', não o
        // balanceado. O objeto aninhado vira um Malformed truncado.
        let frames = run_lines(r#"{"a":{"b":1}}"#);
        assert!(matches!(&frames[0], Frame::Malformed { raw } if raw == r#"{"a":{"b":1}"#));
    }
}
