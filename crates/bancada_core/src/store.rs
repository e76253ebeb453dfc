//! Janela deslizante de amostras por slot (grandeza, eixo).

use crate::types::{Axis, SensorKind};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Capacidade padrão de cada janela (amostras retidas para plotagem).
pub const DEFAULT_WINDOW: usize = 100;

type Slots = HashMap<(SensorKind, Axis), VecDeque<f64>>;

/// Armazém de séries temporais com evicção FIFO por slot.
///
/// Cada slot é um deque de capacidade fixa: inserir além dela expulsa
/// exatamente a amostra mais antiga, em O(1) amortizado. `append` roda no
/// contexto consumidor; `snapshot` pode ser chamado concorrentemente pela
/// UI: a leitura copia sob lock e as amostras são imutáveis depois de
/// inseridas, então a cópia é sempre consistente.
#[derive(Debug)]
pub struct TelemetryStore {
    capacity: usize,
    slots: Mutex<Slots>,
}

impl TelemetryStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Insere no fim da sequência do slot, expulsando a cabeça se a
    /// capacidade foi excedida. A coerção numérica é responsabilidade do
    /// chamador; aqui só entram valores já validados.
    pub fn append(&self, kind: SensorKind, axis: Axis, value: f64) {
        let mut slots = self.lock();
        let window = slots
            .entry((kind, axis))
            .or_insert_with(|| VecDeque::with_capacity(self.capacity));
        if window.len() >= self.capacity {
            window.pop_front();
        }
        window.push_back(value);
    }

    /// Cópia ordenada do slot (mais antigo primeiro), para plotagem.
    pub fn snapshot(&self, kind: SensorKind, axis: Axis) -> Vec<f64> {
        self.lock()
            .get(&(kind, axis))
            .map(|w| w.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Amostra mais recente do slot, se houver.
    pub fn latest(&self, kind: SensorKind, axis: Axis) -> Option<f64> {
        self.lock().get(&(kind, axis)).and_then(|w| w.back().copied())
    }

    /// Quantidade de amostras retidas no slot.
    pub fn len(&self, kind: SensorKind, axis: Axis) -> usize {
        self.lock().get(&(kind, axis)).map_or(0, VecDeque::len)
    }

    /// Descarta todas as séries (nova sessão de leitura).
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Slots> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for TelemetryStore {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_preserves_arrival_order() {
        let store = TelemetryStore::new(10);
        for v in [1.0, 2.0, 3.0] {
            store.append(SensorKind::Velocity, Axis::Z, v);
        }
        assert_eq!(store.snapshot(SensorKind::Velocity, Axis::Z), vec![1.0, 2.0, 3.0]);
        assert_eq!(store.latest(SensorKind::Velocity, Axis::Z), Some(3.0));
    }

    #[test]
    fn eviction_drops_exactly_the_oldest() {
        let store = TelemetryStore::new(100);
        for i in 0..101 {
            store.append(SensorKind::Acceleration, Axis::X, f64::from(i));
        }
        let snap = store.snapshot(SensorKind::Acceleration, Axis::X);
        assert_eq!(snap.len(), 100);
        // A 1ª amostra (0.0) foi expulsa; a cabeça é a 2ª inserida.
        assert_eq!(snap[0], 1.0);
        assert_eq!(snap[99], 100.0);
    }

    #[test]
    fn slots_are_independent() {
        let store = TelemetryStore::new(5);
        store.append(SensorKind::Height, Axis::X, 9.0);
        assert_eq!(store.len(SensorKind::Height, Axis::X), 1);
        assert_eq!(store.len(SensorKind::Height, Axis::Y), 0);
        assert!(store.snapshot(SensorKind::Distance, Axis::X).is_empty());
        assert_eq!(store.latest(SensorKind::Distance, Axis::X), None);
    }

    #[test]
    fn clear_empties_every_slot() {
        let store = TelemetryStore::default();
        store.append(SensorKind::Temperature, Axis::X, 21.0);
        store.clear();
        assert_eq!(store.len(SensorKind::Temperature, Axis::X), 0);
    }
}
