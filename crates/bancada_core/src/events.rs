//! Event log com timestamp e capacidade limitada.
//!
//! Ring com capacidade configurável: o log é contexto recente para o
//! operador, não um histórico permanente.

use chrono::{DateTime, Local};
use std::collections::VecDeque;

/// Linhas retidas por padrão.
pub const DEFAULT_CAPACITY: usize = 500;

/// Uma linha do event log.
#[derive(Debug, Clone)]
pub struct EventLogEntry {
    pub at: DateTime<Local>,
    pub message: String,
}

impl EventLogEntry {
    /// Formata como o painel exibe: `[2026-08-07 14:02:11] mensagem`.
    pub fn display(&self) -> String {
        format!("[{}] {}", self.at.format("%Y-%m-%d %H:%M:%S"), self.message)
    }
}

/// Ring de eventos, só-append, com evicção da linha mais antiga.
#[derive(Debug)]
pub struct EventLog {
    entries: VecDeque<EventLogEntry>,
    capacity: usize,
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.max(1)),
            capacity: capacity.max(1),
        }
    }

    /// Registra uma mensagem com o horário atual.
    pub fn push(&mut self, message: impl Into<String>) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(EventLogEntry {
            at: Local::now(),
            message: message.into(),
        });
    }

    /// Linhas em ordem de chegada (mais antiga primeiro).
    pub fn iter(&self) -> impl Iterator<Item = &EventLogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_keeps_only_the_newest() {
        let mut log = EventLog::new(3);
        for i in 0..5 {
            log.push(format!("evento {i}"));
        }
        assert_eq!(log.len(), 3);
        let messages: Vec<&str> = log.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["evento 2", "evento 3", "evento 4"]);
    }

    #[test]
    fn display_includes_timestamp_and_message() {
        let mut log = EventLog::default();
        log.push("porta aberta");
        let line = log.iter().next().unwrap().display();
        assert!(line.starts_with('['));
        assert!(line.ends_with("] porta aberta"));
    }
}
