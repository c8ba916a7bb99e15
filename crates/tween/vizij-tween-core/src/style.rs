//! Style targets: where rendered values are read and presentation values written.

use std::cell::RefCell;

use hashbrown::HashMap;

use crate::units::{format_value, split_numeric};

/// One element's presentation attributes, addressed by normalized name.
pub trait StyleTarget {
    /// Current rendered value, e.g. `"12px"` or `"0.5"`.
    fn read(&self, name: &str) -> String;
    /// Write a presentation value, e.g. `"14px"`.
    fn write(&self, name: &str, value: &str);
}

/// In-memory style target.
///
/// Reads resolve convertible units to px through a px-per-unit table, which
/// mimics a browser's computed style closely enough for unit conversion at job start.
#[derive(Debug)]
pub struct MemoryStyle {
    values: RefCell<HashMap<String, String>>,
    writes: RefCell<Vec<(String, String)>>,
    px_per_unit: HashMap<String, f64>,
}

impl Default for MemoryStyle {
    fn default() -> Self {
        let px_per_unit = [
            ("px", 1.0),
            ("em", 16.0),
            ("rem", 16.0),
            ("pt", 96.0 / 72.0),
            ("in", 96.0),
            ("cm", 96.0 / 2.54),
            ("mm", 96.0 / 25.4),
        ]
        .into_iter()
        .map(|(u, s)| (u.to_string(), s))
        .collect();
        Self {
            values: RefCell::new(HashMap::new()),
            writes: RefCell::new(Vec::new()),
            px_per_unit,
        }
    }
}

impl MemoryStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value without recording a write.
    pub fn with(self, name: &str, value: &str) -> Self {
        self.values
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
        self
    }

    /// Override how many px one `unit` renders to (e.g. `%` against a parent).
    pub fn with_unit(mut self, unit: &str, px: f64) -> Self {
        self.px_per_unit.insert(unit.to_string(), px);
        self
    }

    /// Last value written or seeded, verbatim.
    pub fn get(&self, name: &str) -> Option<String> {
        self.values.borrow().get(name).cloned()
    }

    /// Every write to `name`, in order.
    pub fn history(&self, name: &str) -> Vec<String> {
        self.writes
            .borrow()
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
            .collect()
    }

    pub fn clear_history(&self) {
        self.writes.borrow_mut().clear();
    }
}

impl StyleTarget for MemoryStyle {
    fn read(&self, name: &str) -> String {
        let Some(raw) = self.get(name) else {
            return String::new();
        };
        let (value, unit) = split_numeric(&raw);
        match self.px_per_unit.get(&unit) {
            Some(scale) => format_value(value * scale, "px"),
            None => raw,
        }
    }

    fn write(&self, name: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
        self.writes
            .borrow_mut()
            .push((name.to_string(), value.to_string()));
    }
}
