//! [Machine] for executing [programs](crate::program::Program) one instruction at a time.

use crate::event::Event;
use crate::instruction::Instruction;
use crate::program::Program;
use crate::snapshot::{Snapshot, StatePatch};
use crate::tape::Tape;

/// The outcome of a single call to [Machine::step].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The cursor was on a comment character and moved past it.
    Comment,

    /// An instruction was executed. Carries the state change it caused, if any.
    Executed(Option<Event>),

    /// A `.` was executed. The value of the current cell needs to be written out.
    Output(u8),

    /// The cursor is on a `,`. The instruction completes only once [Machine::deliver] is called.
    Input,

    /// The cursor is past the end of the program.
    Halted,
}

/// Converts delivered input to the value stored by `,`.
///
/// The first character's code point is stored modulo 256. Empty input stores 0.
pub fn input_value(input: &str) -> u8 {
    input.chars().next().map(|ch| ch as u32 as u8).unwrap_or(0)
}

/// Converts a cell value to the string handed to the write hook.
pub fn output_string(value: u8) -> String {
    char::from(value).to_string()
}

/// Contains the complete execution state of one run: the program, the tape, the pointer, the
/// cursor and the stack of open loops.
///
/// The machine is synchronous and never decides when to run the next instruction, that is left to
/// whoever calls [step](Machine::step). See [Run](crate::run::Run) for a driver with hooks.
#[derive(Debug, Clone)]
pub struct Machine {
    program: Program,
    tape: Tape,
    pointer: i64,
    cursor: usize,
    loop_stack: Vec<usize>,
    steps: u64,
}

impl Machine {
    /// Create a machine positioned at the first instruction, with a blank tape.
    pub fn new(program: Program) -> Machine {
        Machine {
            program,
            tape: Tape::new(),
            pointer: 0,
            cursor: 0,
            loop_stack: Vec::new(),
            steps: 0,
        }
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn pointer(&self) -> i64 {
        self.pointer
    }

    /// Position of the next instruction to execute.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of completed instructions. Comments are not counted.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Number of loops entered but not yet left.
    pub fn loop_depth(&self) -> usize {
        self.loop_stack.len()
    }

    /// Value of the cell under the pointer.
    pub fn cell(&self) -> u8 {
        self.tape.get(self.pointer)
    }

    /// The instruction under the cursor.
    pub fn current(&self) -> Option<Instruction> {
        self.program.get(self.cursor)
    }

    /// True once the cursor has passed the last instruction.
    pub fn is_finished(&self) -> bool {
        self.cursor >= self.program.len()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            pointer: self.pointer,
            cursor: self.cursor,
            tape: self.tape.clone(),
            steps: self.steps,
        }
    }

    /// Overwrites the fields present in `patch`. The loop stack and step count are kept.
    pub fn apply(&mut self, patch: StatePatch) {
        if let Some(pointer) = patch.pointer {
            self.pointer = pointer;
        }

        if let Some(cursor) = patch.cursor {
            self.cursor = cursor;
        }

        if let Some(tape) = patch.tape {
            self.tape = tape;
        }
    }

    /// Executes the instruction under the cursor and moves the cursor to the next one.
    ///
    /// A `,` is not executed here, the cursor stays on it and [Step::Input] is returned.
    pub fn step(&mut self) -> Step {
        let at = self.cursor;

        let ins = match self.program.get(at) {
            Some(ins) => ins,
            None => return Step::Halted,
        };

        let event = match ins {
            Instruction::Comment(_) => {
                self.cursor += 1;
                return Step::Comment;
            },
            Instruction::Input => return Step::Input,
            Instruction::Output => {
                self.cursor += 1;
                self.steps += 1;
                return Step::Output(self.cell());
            },
            Instruction::Right => {
                self.pointer += 1;
                self.cursor += 1;
                Some(Event::PointerMove { address: self.pointer })
            },
            Instruction::Left => {
                self.pointer -= 1;
                self.cursor += 1;
                Some(Event::PointerMove { address: self.pointer })
            },
            Instruction::Increment => {
                let value = self.tape.increment(self.pointer);
                self.cursor += 1;
                Some(Event::CellChange { address: self.pointer, value })
            },
            Instruction::Decrement => {
                let value = self.tape.decrement(self.pointer);
                self.cursor += 1;
                Some(Event::CellChange { address: self.pointer, value })
            },
            Instruction::LoopStart => {
                if self.cell() == 0 {
                    self.cursor = self.program.find_loop_end(at + 1) + 1;
                    Some(Event::Jump { from: at, to: self.cursor })
                } else {
                    self.loop_stack.push(at);
                    self.cursor += 1;
                    None
                }
            },
            Instruction::LoopEnd => {
                if self.cell() != 0 {
                    match self.loop_stack.last() {
                        Some(&open) => {
                            self.cursor = open + 1;
                            Some(Event::Jump { from: at, to: self.cursor })
                        },
                        // Unmatched `]`: nothing to jump back to.
                        None => {
                            self.cursor += 1;
                            None
                        },
                    }
                } else {
                    self.loop_stack.pop();
                    self.cursor += 1;
                    None
                }
            },
        };

        self.steps += 1;

        Step::Executed(event)
    }

    /// Completes a pending `,` by storing [input_value] of `input` in the current cell.
    ///
    /// Returns `None` without touching any state if the cursor is not on a `,`.
    pub fn deliver(&mut self, input: &str) -> Option<Event> {
        if self.current() != Some(Instruction::Input) {
            return None;
        }

        let value = input_value(input);
        self.tape.set(self.pointer, value);
        self.cursor += 1;
        self.steps += 1;

        Some(Event::CellChange { address: self.pointer, value })
    }
}
