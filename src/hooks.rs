//! The extension points of a run.
//!
//! A [Run](crate::run::Run) calls into a [Hooks] implementation whenever the program reads
//! input, writes output, completes an instruction or finishes. Every method has a default, so an
//! implementation only overrides what it cares about. With no overrides at all ([StdIo]) a run
//! behaves like a plain interpreter on the terminal.
//!
//! Hooks that cannot answer right away suspend the run instead of blocking: [read](Hooks::read)
//! returns [Input::Pending] and [tick](Hooks::tick) returns [Control::Pause]. The run is then
//! resumed through [Run::deliver](crate::run::Run::deliver) and
//! [Run::advance](crate::run::Run::advance).

use std::io::{self, BufRead, Write};

use crate::instruction::Instruction;
use crate::machine::Machine;
use crate::snapshot::{Snapshot, StatePatch};

/// Answer of a [read hook](Hooks::read).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Input is available now. Only the first character is stored, an empty string stores 0.
    Ready(String),

    /// Input will be supplied later with [Run::deliver](crate::run::Run::deliver). The run
    /// suspends until then.
    Pending,
}

impl From<String> for Input {
    fn from(input: String) -> Input {
        Input::Ready(input)
    }
}

impl From<&str> for Input {
    fn from(input: &str) -> Input {
        Input::Ready(input.to_string())
    }
}

/// Answer of a [tick hook](Hooks::tick).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Run the next instruction right away.
    Advance,

    /// Suspend the run. It continues when [Run::advance](crate::run::Run::advance) is called.
    Pause,
}

/// The view of a run handed to [Hooks::tick] after every completed instruction.
///
/// Reading through a [Tick] never exposes live state mutably; the only way to change the machine
/// from a hook is [patch](Tick::patch).
pub struct Tick<'m> {
    machine: &'m mut Machine,
    patched: bool,
}

impl<'m> Tick<'m> {
    pub(crate) fn new(machine: &'m mut Machine) -> Tick<'m> {
        Tick {
            machine,
            patched: false,
        }
    }

    /// Returns a copy of the machine state.
    pub fn snapshot(&self) -> Snapshot {
        self.machine.snapshot()
    }

    pub fn pointer(&self) -> i64 {
        self.machine.pointer()
    }

    /// Position of the next instruction to execute.
    pub fn cursor(&self) -> usize {
        self.machine.cursor()
    }

    pub fn steps(&self) -> u64 {
        self.machine.steps()
    }

    /// Value of the cell under the pointer.
    pub fn cell(&self) -> u8 {
        self.machine.cell()
    }

    /// The next instruction to execute, `None` if the run is about to finish.
    pub fn next_instruction(&self) -> Option<Instruction> {
        self.machine.current()
    }

    /// Overwrites parts of the live state before the run continues.
    pub fn patch(&mut self, patch: StatePatch) {
        self.patched |= !patch.is_empty();
        self.machine.apply(patch);
    }

    pub(crate) fn was_patched(&self) -> bool {
        self.patched
    }
}

/// Interface through which a run does input, output and pacing.
pub trait Hooks {
    /// Called when a `,` is executed.
    ///
    /// The default prompts on the standard output and delivers one line read from the standard
    /// input, without its line terminator.
    fn read(&mut self) -> io::Result<Input> {
        read_line_from_stdin()
    }

    /// Called when a `.` is executed, with the single character whose code point is the value of
    /// the current cell.
    ///
    /// The default writes to the standard output.
    fn write(&mut self, output: &str) -> io::Result<()> {
        io::stdout().write_all(output.as_bytes())
    }

    /// Called after every completed instruction.
    ///
    /// The default advances immediately.
    fn tick(&mut self, _tick: &mut Tick<'_>) -> Control {
        Control::Advance
    }

    /// Called once, when the cursor passes the end of the program.
    ///
    /// The default flushes the standard output.
    fn done(&mut self) {
        let _ = io::stdout().flush();
    }
}

impl<H: Hooks + ?Sized> Hooks for &mut H {
    fn read(&mut self) -> io::Result<Input> {
        (**self).read()
    }

    fn write(&mut self, output: &str) -> io::Result<()> {
        (**self).write(output)
    }

    fn tick(&mut self, tick: &mut Tick<'_>) -> Control {
        (**self).tick(tick)
    }

    fn done(&mut self) {
        (**self).done()
    }
}

const INPUT_PROMPT: &str = "input: ";

fn read_line_from_stdin() -> io::Result<Input> {
    let mut stdout = io::stdout();
    stdout.write_all(INPUT_PROMPT.as_bytes())?;
    stdout.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;

    let line = line.trim_end_matches(&['\n', '\r'][..]);

    Ok(Input::Ready(line.to_string()))
}

/// Hooks backed by the terminal. Uses every default of [Hooks].
pub struct StdIo;

impl Hooks for StdIo {}

/// Input supplied up front, handed out one character per `,`.
///
/// Once exhausted, every read yields NUL.
#[derive(Debug, Clone, Default)]
pub struct InputBuffer {
    buffer: Vec<char>,
    position: usize,
}

impl InputBuffer {
    pub fn new(input: &str) -> InputBuffer {
        InputBuffer {
            buffer: input.chars().collect(),
            position: 0,
        }
    }

    /// True if any input was supplied at all, consumed or not.
    pub fn is_ready(&self) -> bool {
        !self.buffer.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.position)
    }

    /// Returns the next character, or `'\0'` when the buffer is exhausted.
    pub fn next_char(&mut self) -> char {
        match self.buffer.get(self.position) {
            Some(ch) => {
                self.position += 1;
                *ch
            },
            None => '\0',
        }
    }
}

/// A hook set for tests and embedding.
///
/// Reads from a pre-determined [InputBuffer] and appends written output to a string.
#[derive(Debug, Clone, Default)]
pub struct BufferIo {
    input: InputBuffer,
    output: String,
    done: bool,
}

impl BufferIo {
    pub fn new() -> BufferIo {
        BufferIo::default()
    }

    pub fn with_input(input: &str) -> BufferIo {
        BufferIo {
            input: InputBuffer::new(input),
            ..BufferIo::default()
        }
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn into_output(self) -> String {
        self.output
    }

    /// True once the `done` hook has fired.
    pub fn is_done(&self) -> bool {
        self.done
    }
}

impl Hooks for BufferIo {
    fn read(&mut self) -> io::Result<Input> {
        Ok(Input::Ready(self.input.next_char().to_string()))
    }

    fn write(&mut self, output: &str) -> io::Result<()> {
        self.output.push_str(output);
        Ok(())
    }

    fn done(&mut self) {
        self.done = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_buffer_yields_nul_when_exhausted() {
        let mut buffer = InputBuffer::new("ab");

        assert!(buffer.is_ready());
        assert_eq!(buffer.next_char(), 'a');
        assert_eq!(buffer.remaining(), 1);
        assert_eq!(buffer.next_char(), 'b');
        assert_eq!(buffer.next_char(), '\0');
        assert_eq!(buffer.next_char(), '\0');
        assert!(!InputBuffer::new("").is_ready());
    }

    #[test]
    fn test_buffer_io_collects_output() {
        let mut io = BufferIo::with_input("x");

        assert_eq!(io.read().unwrap(), Input::Ready("x".into()));
        io.write("h").unwrap();
        io.write("i").unwrap();
        assert!(!io.is_done());
        io.done();

        assert!(io.is_done());
        assert_eq!(io.into_output(), "hi");
    }
}
