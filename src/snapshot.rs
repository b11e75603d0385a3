//! Frozen views of machine state and partial overwrites of it.

use crate::tape::Tape;

/// A copy of the machine state taken after an instruction completed.
///
/// The tape is owned by the snapshot, so mutating or keeping it never affects the run it was
/// taken from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Address of the current cell.
    pub pointer: i64,

    /// Position of the next instruction to execute.
    pub cursor: usize,

    /// Copy of the tape.
    pub tape: Tape,

    /// Number of instructions completed so far, including the one that produced this snapshot.
    pub steps: u64,
}

/// A partial replacement of machine state.
///
/// Fields that are `None` are left untouched when the patch is applied.
///
/// ```
/// use brainfuck::snapshot::StatePatch;
///
/// let patch = StatePatch::new().pointer(-2).cursor(0);
/// assert_eq!(patch.pointer, Some(-2));
/// assert!(patch.tape.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatePatch {
    pub pointer: Option<i64>,
    pub cursor: Option<usize>,
    pub tape: Option<Tape>,
}

impl StatePatch {
    pub fn new() -> StatePatch {
        StatePatch::default()
    }

    pub fn pointer(mut self, pointer: i64) -> StatePatch {
        self.pointer = Some(pointer);
        self
    }

    pub fn cursor(mut self, cursor: usize) -> StatePatch {
        self.cursor = Some(cursor);
        self
    }

    pub fn tape(mut self, tape: Tape) -> StatePatch {
        self.tape = Some(tape);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pointer.is_none() && self.cursor.is_none() && self.tape.is_none()
    }
}

impl From<Snapshot> for StatePatch {
    /// Restores every patchable field of a snapshot. Used to rewind a run.
    fn from(snapshot: Snapshot) -> StatePatch {
        StatePatch {
            pointer: Some(snapshot.pointer),
            cursor: Some(snapshot.cursor),
            tape: Some(snapshot.tape),
        }
    }
}
