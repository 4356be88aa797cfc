//! Per-exchange evaluation matrix
//!
//! Holds the latest note per (category, evaluator name, time frame) key.
//! Writes are last-writer-wins; no history is kept and readers pull.

use crate::models::{EvalNote, EvaluatorCategory, TimeFrame};
use dashmap::DashMap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Address of one matrix entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MatrixKey {
    pub category: EvaluatorCategory,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_frame: Option<TimeFrame>,
}

impl MatrixKey {
    pub fn new(category: EvaluatorCategory, name: impl Into<String>) -> Self {
        Self {
            category,
            name: name.into(),
            time_frame: None,
        }
    }

    pub fn with_time_frame(mut self, time_frame: Option<TimeFrame>) -> Self {
        self.time_frame = time_frame;
        self
    }
}

impl fmt::Display for MatrixKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.time_frame {
            Some(tf) => write!(f, "{}/{}@{}", self.category, self.name, tf),
            None => write!(f, "{}/{}", self.category, self.name),
        }
    }
}

#[derive(Debug, Default)]
pub struct EvaluationMatrix {
    entries: DashMap<MatrixKey, EvalNote>,
}

impl EvaluationMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the entry of an evaluator without time frame
    pub fn set(&self, category: EvaluatorCategory, name: &str, note: EvalNote) {
        self.set_key(MatrixKey::new(category, name), note);
    }

    pub fn set_for_time_frame(
        &self,
        category: EvaluatorCategory,
        name: &str,
        time_frame: Option<TimeFrame>,
        note: EvalNote,
    ) {
        self.set_key(
            MatrixKey::new(category, name).with_time_frame(time_frame),
            note,
        );
    }

    pub fn set_key(&self, key: MatrixKey, note: EvalNote) {
        self.entries.insert(key, note);
    }

    /// Current note, `Pending` if never written
    pub fn get(&self, category: EvaluatorCategory, name: &str) -> EvalNote {
        self.get_key(&MatrixKey::new(category, name))
    }

    pub fn get_for_time_frame(
        &self,
        category: EvaluatorCategory,
        name: &str,
        time_frame: Option<TimeFrame>,
    ) -> EvalNote {
        self.get_key(&MatrixKey::new(category, name).with_time_frame(time_frame))
    }

    pub fn get_key(&self, key: &MatrixKey) -> EvalNote {
        self.entries
            .get(key)
            .map(|entry| *entry.value())
            .unwrap_or(EvalNote::Pending)
    }

    /// Drop an entry. Returns the note it held.
    pub fn remove(&self, key: &MatrixKey) -> Option<EvalNote> {
        self.entries.remove(key).map(|(_, note)| note)
    }

    pub fn contains(&self, key: &MatrixKey) -> bool {
        self.entries.contains_key(key)
    }

    /// All entries of one category, ordered by key
    pub fn entries(&self, category: EvaluatorCategory) -> BTreeMap<MatrixKey, EvalNote> {
        self.entries
            .iter()
            .filter(|entry| entry.key().category == category)
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }

    pub fn snapshot(&self) -> BTreeMap<MatrixKey, EvalNote> {
        self.entries
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Update capability restricted to a single key
    pub fn writer(self: &Arc<Self>, key: MatrixKey) -> MatrixWriter {
        MatrixWriter {
            matrix: Arc::clone(self),
            key,
        }
    }
}

/// Handle given to event-driven workers; it can only touch its own key.
#[derive(Debug, Clone)]
pub struct MatrixWriter {
    matrix: Arc<EvaluationMatrix>,
    key: MatrixKey,
}

impl MatrixWriter {
    pub fn write(&self, note: EvalNote) {
        self.matrix.set_key(self.key.clone(), note);
    }

    pub fn read(&self) -> EvalNote {
        self.matrix.get_key(&self.key)
    }

    pub fn key(&self) -> &MatrixKey {
        &self.key
    }
}
