//! Roteamento de frames para os sinks do monitor.

use crate::events::EventLog;
use crate::protocol::{Frame, ReplyKind};
use crate::store::TelemetryStore;
use crate::types::{self, SensorKind, TELEMETRY_SCHEMA, WifiStatus};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Destinos dos frames: histórico de telemetria, modelo de WiFi e event log.
///
/// O `match` sobre [`Frame`] é exaustivo de propósito: um tipo novo de
/// frame não compila sem decidir o destino dele. Fora o armazém e o modelo
/// de WiFi, nenhum estado sobrevive entre despachos.
pub struct EventRouter {
    pub store: Arc<TelemetryStore>,
    pub wifi: WifiStatus,
    pub log: EventLog,
}

impl EventRouter {
    pub fn new(store: Arc<TelemetryStore>, log: EventLog) -> Self {
        Self {
            store,
            wifi: WifiStatus::default(),
            log,
        }
    }

    /// Consome um frame e o entrega ao sink correspondente.
    pub fn dispatch(&mut self, frame: Frame) {
        match frame {
            Frame::Telemetry(fields) => {
                debug!("telemetria com {} chaves", fields.len());
                for spec in TELEMETRY_SCHEMA {
                    // Primeira grafia presente vence; ausente = sem leitura.
                    let Some(value) = spec.keys.iter().find_map(|k| fields.get(*k)) else {
                        continue;
                    };
                    let number = if spec.kind == SensorKind::Temperature {
                        types::coerce_temperature(value)
                    } else {
                        types::coerce_number(value)
                    };
                    if let Some(n) = number {
                        self.store.append(spec.kind, spec.axis, n);
                    }
                }
            }
            Frame::WifiStatus(status) => {
                if status != self.wifi {
                    if status.connected {
                        info!("WiFi conectado a {} ({})", status.ssid, status.ip);
                    } else {
                        info!("WiFi desconectado");
                    }
                }
                self.wifi = status;
            }
            Frame::ControlReply { kind, text } => {
                match kind {
                    ReplyKind::Err => warn!("rig reportou erro: {text}"),
                    _ => debug!("resposta de controle: {text}"),
                }
                self.log.push(text);
            }
            Frame::Malformed { raw } => {
                warn!("JSON inválido descartado ({} bytes)", raw.len());
                self.log.push(format!("JSON inválido recebido: {raw}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::FrameAssembler;
    use crate::types::Axis;
    use serde_json::json;

    fn router() -> EventRouter {
        EventRouter::new(Arc::new(TelemetryStore::default()), EventLog::default())
    }

    fn telemetry(fields: serde_json::Value) -> Frame {
        match fields {
            serde_json::Value::Object(map) => Frame::Telemetry(map),
            _ => unreachable!(),
        }
    }

    #[test]
    fn telemetry_fields_land_in_their_slots() {
        let mut r = router();
        r.dispatch(telemetry(json!({"AX_1": 1.5, "VY_1": "2.5", "DZ_1": -3})));
        assert_eq!(r.store.latest(SensorKind::Acceleration, Axis::X), Some(1.5));
        assert_eq!(r.store.latest(SensorKind::Velocity, Axis::Y), Some(2.5));
        assert_eq!(r.store.latest(SensorKind::Distance, Axis::Z), Some(-3.0));
        // Campos ausentes não entram no histórico.
        assert_eq!(r.store.len(SensorKind::Height, Axis::X), 0);
    }

    #[test]
    fn legacy_height_keys_are_accepted() {
        let mut r = router();
        r.dispatch(telemetry(json!({"HkDJ_1": 7.0, "HZZ_1": 8.0})));
        assert_eq!(r.store.latest(SensorKind::Height, Axis::Y), Some(7.0));
        assert_eq!(r.store.latest(SensorKind::Height, Axis::Z), Some(8.0));
    }

    #[test]
    fn temperature_zero_is_not_stored() {
        let mut r = router();
        r.dispatch(telemetry(json!({"TEMP_1": 0})));
        assert_eq!(r.store.len(SensorKind::Temperature, Axis::X), 0);
        r.dispatch(telemetry(json!({"TEMP_1": 24.5})));
        assert_eq!(r.store.latest(SensorKind::Temperature, Axis::X), Some(24.5));
    }

    #[test]
    fn non_numeric_fields_are_skipped_without_blocking_others() {
        let mut r = router();
        r.dispatch(telemetry(json!({"AX_1": "-", "AY_1": 2.0, "lixo": 9})));
        assert_eq!(r.store.len(SensorKind::Acceleration, Axis::X), 0);
        assert_eq!(r.store.latest(SensorKind::Acceleration, Axis::Y), Some(2.0));
    }

    #[test]
    fn wifi_frame_overwrites_the_whole_model() {
        let mut r = router();
        r.dispatch(Frame::WifiStatus(WifiStatus {
            connected: true,
            ssid: "lab".into(),
            ip: "10.0.0.9".into(),
        }));
        assert!(r.wifi.connected);
        r.dispatch(Frame::WifiStatus(WifiStatus::default()));
        assert_eq!(r.wifi, WifiStatus::default());
    }

    #[test]
    fn control_replies_and_malformed_go_to_the_log() {
        let mut r = router();
        r.dispatch(Frame::ControlReply {
            kind: ReplyKind::Ack,
            text: "ACK:READING_STARTED".into(),
        });
        r.dispatch(Frame::Malformed { raw: "{quebrado".into() });
        let messages: Vec<&str> = r.log.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], "ACK:READING_STARTED");
        assert!(messages[1].contains("{quebrado"));
    }

    #[test]
    fn assembled_stream_flows_end_to_end() {
        // Do texto do fio até os sinks, como o monitor faz.
        let mut asm = FrameAssembler::default();
        let mut r = router();
        for line in [
            "WIFI_STATUS:CONNECTED:lab:10.0.0.9",
            r#"{"AX_1":1}{"AX_1":2}"#,
            "ERR:sensor travado",
        ] {
            for frame in asm.push_line(line) {
                r.dispatch(frame);
            }
        }
        assert!(r.wifi.connected);
        assert_eq!(r.store.snapshot(SensorKind::Acceleration, Axis::X), vec![1.0, 2.0]);
        assert_eq!(r.log.len(), 1);
    }
}
