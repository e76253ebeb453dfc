//! Tipos do domínio: grandezas, eixos e o esquema de telemetria do rig.
//!
//! O firmware publica objetos JSON com um esquema fixo de 13 chaves
//! (aceleração, velocidade, distância e altura em 3 eixos, mais uma
//! temperatura). Uma revisão antiga do firmware usa as grafias `HkDJ_1` e
//! `HZZ_1` no lugar de `HY_1`/`HZ_1`; as duas formas são aceitas.

use serde_json::Value;

// ──────────────────────────────────────────────
// Grandezas e eixos
// ──────────────────────────────────────────────

/// Grandeza física medida pelo rig de sensores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    Acceleration,
    Velocity,
    Distance,
    Height,
    Temperature,
}

impl SensorKind {
    /// Rótulo para exibição nos painéis e gráficos.
    pub fn label(self) -> &'static str {
        match self {
            SensorKind::Acceleration => "Aceleração",
            SensorKind::Velocity => "Velocidade",
            SensorKind::Distance => "Distância",
            SensorKind::Height => "Altura",
            SensorKind::Temperature => "Temperatura",
        }
    }

    /// Todas as grandezas, na ordem de exibição.
    pub fn all() -> [SensorKind; 5] {
        [
            SensorKind::Acceleration,
            SensorKind::Velocity,
            SensorKind::Distance,
            SensorKind::Height,
            SensorKind::Temperature,
        ]
    }

    /// Eixos que esta grandeza possui (temperatura é escalar).
    pub fn axes(self) -> &'static [Axis] {
        match self {
            SensorKind::Temperature => &[Axis::X],
            _ => &[Axis::X, Axis::Y, Axis::Z],
        }
    }
}

/// Eixo de um sensor triaxial. Temperatura usa apenas [`Axis::X`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn label(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }
}

// ──────────────────────────────────────────────
// Esquema de telemetria
// ──────────────────────────────────────────────

/// Um campo do esquema: grafias aceitas da chave JSON e o slot de destino.
#[derive(Debug)]
pub struct FieldSpec {
    /// Grafias aceitas (a primeira presente no objeto vence).
    pub keys: &'static [&'static str],
    pub kind: SensorKind,
    pub axis: Axis,
}

/// Esquema fixo de 13 campos emitido pelo firmware.
///
/// Chaves desconhecidas no objeto são ignoradas; chaves ausentes viram
/// "sem leitura" e não entram no histórico.
pub const TELEMETRY_SCHEMA: &[FieldSpec] = &[
    FieldSpec { keys: &["AX_1"], kind: SensorKind::Acceleration, axis: Axis::X },
    FieldSpec { keys: &["AY_1"], kind: SensorKind::Acceleration, axis: Axis::Y },
    FieldSpec { keys: &["AZ_1"], kind: SensorKind::Acceleration, axis: Axis::Z },
    FieldSpec { keys: &["VX_1"], kind: SensorKind::Velocity, axis: Axis::X },
    FieldSpec { keys: &["VY_1"], kind: SensorKind::Velocity, axis: Axis::Y },
    FieldSpec { keys: &["VZ_1"], kind: SensorKind::Velocity, axis: Axis::Z },
    FieldSpec { keys: &["DX_1"], kind: SensorKind::Distance, axis: Axis::X },
    FieldSpec { keys: &["DY_1"], kind: SensorKind::Distance, axis: Axis::Y },
    FieldSpec { keys: &["DZ_1"], kind: SensorKind::Distance, axis: Axis::Z },
    FieldSpec { keys: &["HX_1"], kind: SensorKind::Height, axis: Axis::X },
    FieldSpec { keys: &["HY_1", "HkDJ_1"], kind: SensorKind::Height, axis: Axis::Y },
    FieldSpec { keys: &["HZ_1", "HZZ_1"], kind: SensorKind::Height, axis: Axis::Z },
    FieldSpec { keys: &["TEMP_1"], kind: SensorKind::Temperature, axis: Axis::X },
];

/// Conversão tolerante de um valor JSON para número.
///
/// Aceita números e strings numéricas; qualquer outra coisa (null, bool,
/// string vazia ou não numérica) vira ausente em vez de erro.
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Conversão de temperatura: zero ou vazio significa "sem leitura"
/// (convenção do firmware) e vira ausente.
pub fn coerce_temperature(value: &Value) -> Option<f64> {
    coerce_number(value).filter(|v| *v != 0.0)
}

// ──────────────────────────────────────────────
// WiFi
// ──────────────────────────────────────────────

/// Estado de WiFi reportado pelo rig via linha `WIFI_STATUS`.
///
/// Registro único, sobrescrito por inteiro a cada frame; sem histórico.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WifiStatus {
    pub connected: bool,
    pub ssid: String,
    pub ip: String,
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn schema_has_thirteen_fields() {
        assert_eq!(TELEMETRY_SCHEMA.len(), 13);
    }

    #[test]
    fn schema_covers_every_slot_once() {
        let mut seen = std::collections::HashSet::new();
        for spec in TELEMETRY_SCHEMA {
            assert!(seen.insert((spec.kind, spec.axis)), "slot duplicado no esquema");
        }
        assert_eq!(seen.len(), 13);
    }

    #[test]
    fn height_aliases_present() {
        let hy = TELEMETRY_SCHEMA
            .iter()
            .find(|s| s.kind == SensorKind::Height && s.axis == Axis::Y)
            .unwrap();
        assert!(hy.keys.contains(&"HY_1"));
        assert!(hy.keys.contains(&"HkDJ_1"));
    }

    #[test]
    fn coerce_accepts_numbers_and_numeric_strings() {
        assert_eq!(coerce_number(&json!(1.5)), Some(1.5));
        assert_eq!(coerce_number(&json!(-3)), Some(-3.0));
        assert_eq!(coerce_number(&json!("2.25")), Some(2.25));
        assert_eq!(coerce_number(&json!(" 7 ")), Some(7.0));
    }

    #[test]
    fn coerce_rejects_non_numeric() {
        assert_eq!(coerce_number(&json!("-")), None);
        assert_eq!(coerce_number(&json!("")), None);
        assert_eq!(coerce_number(&json!(null)), None);
        assert_eq!(coerce_number(&json!(true)), None);
        assert_eq!(coerce_number(&json!([1])), None);
    }

    #[test]
    fn temperature_zero_is_absent() {
        assert_eq!(coerce_temperature(&json!(0)), None);
        assert_eq!(coerce_temperature(&json!(0.0)), None);
        assert_eq!(coerce_temperature(&json!("")), None);
        assert_eq!(coerce_temperature(&json!(23.5)), Some(23.5));
    }

    #[test]
    fn temperature_axes_is_scalar() {
        assert_eq!(SensorKind::Temperature.axes(), &[Axis::X]);
        assert_eq!(SensorKind::Acceleration.axes().len(), 3);
    }
}
