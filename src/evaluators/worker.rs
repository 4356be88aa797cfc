//! Evaluator worker contract and a closure-backed implementation

use crate::models::{EvalNote, EvaluatorCategory, TimeFrame};
use crate::signals::matrix::MatrixKey;
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// Identity of a worker inside one exchange session
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkerId {
    pub category: EvaluatorCategory,
    pub name: String,
    pub time_frame: Option<TimeFrame>,
}

impl WorkerId {
    pub fn new(
        category: EvaluatorCategory,
        name: impl Into<String>,
        time_frame: Option<TimeFrame>,
    ) -> Self {
        Self {
            category,
            name: name.into(),
            time_frame,
        }
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.time_frame {
            Some(tf) => write!(f, "{}/{}@{}", self.category, self.name, tf),
            None => write!(f, "{}/{}", self.category, self.name),
        }
    }
}

/// An independently scheduled unit producing one evaluation.
///
/// Implementations use interior mutability: the same worker is shared by
/// every strategy that depends on it.
pub trait EvaluatorWorker: Send + Sync {
    fn name(&self) -> &str;

    /// Category the worker writes its note under
    fn category(&self) -> EvaluatorCategory;

    /// Time frame of a technical worker, `None` for event-driven ones
    fn time_frame(&self) -> Option<TimeFrame> {
        None
    }

    /// Every category the worker is classified under (hybrids have several)
    fn parent_categories(&self) -> BTreeSet<EvaluatorCategory> {
        BTreeSet::from([self.category()])
    }

    fn is_active(&self) -> bool;

    fn set_active(&self, active: bool);

    /// Drop internal state; the next note is produced from scratch
    fn reset(&self);

    fn eval_note(&self) -> EvalNote;

    /// Flag input data as changed so the next refresh recomputes
    fn mark_data_changed(&self) {}

    /// Recompute the note immediately
    fn force_refresh(&self) {}

    fn id(&self) -> WorkerId {
        WorkerId::new(self.category(), self.name(), self.time_frame())
    }

    fn matrix_key(&self) -> MatrixKey {
        MatrixKey::new(self.category(), self.name()).with_time_frame(self.time_frame())
    }
}

type ComputeFn = Box<dyn Fn() -> EvalNote + Send + Sync>;

/// Worker whose evaluation is a closure.
///
/// Useful as an adapter around an existing indicator, and in tests.
pub struct FnWorker {
    name: String,
    category: EvaluatorCategory,
    time_frame: Option<TimeFrame>,
    parents: BTreeSet<EvaluatorCategory>,
    active: AtomicBool,
    data_changed: AtomicBool,
    note: Mutex<EvalNote>,
    compute: ComputeFn,
}

impl FnWorker {
    pub fn new<F>(name: impl Into<String>, category: EvaluatorCategory, compute: F) -> Self
    where
        F: Fn() -> EvalNote + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            category,
            time_frame: None,
            parents: BTreeSet::from([category]),
            active: AtomicBool::new(true),
            data_changed: AtomicBool::new(false),
            note: Mutex::new(EvalNote::Pending),
            compute: Box::new(compute),
        }
    }

    pub fn with_time_frame(mut self, time_frame: TimeFrame) -> Self {
        self.time_frame = Some(time_frame);
        self
    }

    /// Extra classifications on top of the worker's own category
    pub fn with_parent_categories<I>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = EvaluatorCategory>,
    {
        self.parents.extend(categories);
        self
    }

    pub fn inactive(self) -> Self {
        self.active.store(false, Ordering::SeqCst);
        self
    }

    pub fn has_data_changed(&self) -> bool {
        self.data_changed.load(Ordering::SeqCst)
    }
}

impl EvaluatorWorker for FnWorker {
    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> EvaluatorCategory {
        self.category
    }

    fn time_frame(&self) -> Option<TimeFrame> {
        self.time_frame
    }

    fn parent_categories(&self) -> BTreeSet<EvaluatorCategory> {
        self.parents.clone()
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::SeqCst);
    }

    fn reset(&self) {
        *self.note.lock() = EvalNote::Pending;
        self.data_changed.store(false, Ordering::SeqCst);
    }

    fn eval_note(&self) -> EvalNote {
        *self.note.lock()
    }

    fn mark_data_changed(&self) {
        self.data_changed.store(true, Ordering::SeqCst);
    }

    fn force_refresh(&self) {
        // inactive workers keep their last (possibly stale) note
        if !self.is_active() {
            return;
        }
        let note = (self.compute)();
        *self.note.lock() = note;
        self.data_changed.store(false, Ordering::SeqCst);
    }
}

impl fmt::Debug for FnWorker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnWorker")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("time_frame", &self.time_frame)
            .field("active", &self.is_active())
            .field("note", &self.eval_note())
            .finish()
    }
}
