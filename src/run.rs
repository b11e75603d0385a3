//! [Run] coordinates a [Machine] with a set of [Hooks].
//!
//! A run is a state machine:
//!
//! ```text
//! Ready -> Running -> { Running | SuspendedOnRead | SuspendedOnTick } -> ... -> Done
//! ```
//!
//! It leaves `Running` only when a hook asks it to wait ([Input::Pending] or
//! [Control::Pause]) and re-enters it only through the matching continuation,
//! [deliver](Run::deliver) or [advance](Run::advance). The run never polls.
//!
//! # Example
//! ```
//! use brainfuck::hooks::BufferIo;
//! use brainfuck::run::{run_with, State};
//!
//! let mut io = BufferIo::with_input("A");
//! let run = run_with(",.", &mut io).expect("hooks never fail");
//!
//! assert_eq!(run.state(), State::Done);
//! drop(run);
//! assert_eq!(io.output(), "A");
//! ```

use std::fmt;
use std::io;

use slog::{debug, o, trace, Discard, Logger};

use crate::error::{Operation, RunError};
use crate::event::{Event, EventDispatcher, EventListener};
use crate::hooks::{Control, Hooks, Input, StdIo, Tick};
use crate::machine::{output_string, Machine, Step};
use crate::program::Program;
use crate::snapshot::{Snapshot, StatePatch};

/// Where a [Run] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Created but not started.
    Ready,

    /// Executing instructions.
    Running,

    /// Waiting for [Run::deliver].
    SuspendedOnRead,

    /// Waiting for [Run::advance].
    SuspendedOnTick,

    /// The cursor passed the end of the program and the `done` hook fired.
    Done,

    /// A hook failed. The `done` hook is never fired for an aborted run.
    Aborted,
}

impl State {
    pub fn is_suspended(&self) -> bool {
        match self {
            State::SuspendedOnRead | State::SuspendedOnTick => true,
            _ => false,
        }
    }

    /// True for [Done](State::Done) and [Aborted](State::Aborted).
    pub fn is_terminal(&self) -> bool {
        match self {
            State::Done | State::Aborted => true,
            _ => false,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            State::Ready => "ready",
            State::Running => "running",
            State::SuspendedOnRead => "waiting for input",
            State::SuspendedOnTick => "paused",
            State::Done => "done",
            State::Aborted => "aborted",
        };

        write!(f, "{}", name)
    }
}

/// One execution of a program.
///
/// Owns the machine state for its whole lifetime; two runs never share anything. Dropping a
/// suspended run cancels it.
pub struct Run<H> {
    machine: Machine,
    hooks: H,
    state: State,
    events: EventDispatcher,
    logger: Logger,
}

impl<H> Run<H> where H: Hooks {
    /// Create a run that has not been started yet.
    pub fn new<P: Into<Program>>(program: P, hooks: H) -> Run<H> {
        Run::with_logger(program, hooks, Logger::root(Discard, o!()))
    }

    /// Create a run that logs every step to `logger`.
    pub fn with_logger<P: Into<Program>>(program: P, hooks: H, logger: Logger) -> Run<H> {
        let program = program.into();
        let logger = logger.new(o!("length" => program.len()));

        Run {
            machine: Machine::new(program),
            hooks,
            state: State::Ready,
            events: EventDispatcher::default(),
            logger,
        }
    }

    pub fn set_logger(&mut self, logger: Logger) {
        self.logger = logger.new(o!("length" => self.machine.program().len()));
    }

    pub fn add_listener<L: EventListener + 'static>(&mut self, listener: L) {
        self.events.add_listener(listener);
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == State::Done
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn snapshot(&self) -> Snapshot {
        self.machine.snapshot()
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    pub fn into_hooks(self) -> H {
        self.hooks
    }

    /// Starts executing from the first instruction.
    ///
    /// Returns once the run finishes or a hook suspends it.
    pub fn start(&mut self) -> Result<State, RunError> {
        self.expect_state(Operation::Start, State::Ready)?;
        debug!(self.logger, "start");

        self.state = State::Running;
        self.drive()
    }

    /// Resumes a run paused by its tick hook.
    pub fn advance(&mut self) -> Result<State, RunError> {
        self.expect_state(Operation::Advance, State::SuspendedOnTick)?;
        debug!(self.logger, "advance"; "cursor" => self.machine.cursor());

        self.state = State::Running;
        self.drive()
    }

    /// Completes the `,` the run is waiting on and resumes it.
    pub fn deliver(&mut self, input: &str) -> Result<State, RunError> {
        self.expect_state(Operation::Deliver, State::SuspendedOnRead)?;
        debug!(self.logger, "deliver"; "input" => input);

        self.state = State::Running;
        self.complete_input(input);

        if self.state == State::Running {
            self.drive()
        } else {
            Ok(self.state)
        }
    }

    /// Overwrites parts of the live state while the run is paused.
    pub fn patch(&mut self, patch: StatePatch) -> Result<(), RunError> {
        self.expect_state(Operation::Patch, State::SuspendedOnTick)?;
        debug!(self.logger, "patch"; "patch" => ?patch);

        self.machine.apply(patch);
        Ok(())
    }

    fn expect_state(&self, operation: Operation, expected: State) -> Result<(), RunError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(RunError::InvalidState {
                operation,
                state: self.state,
            })
        }
    }

    /// Executes instructions until the run leaves the `Running` state.
    fn drive(&mut self) -> Result<State, RunError> {
        while self.state == State::Running {
            let at = self.machine.cursor();

            match self.machine.step() {
                Step::Halted => self.finish(),
                Step::Comment => (),
                Step::Executed(event) => {
                    if let Some(event) = event {
                        self.events.dispatch(&event);
                    }

                    self.trace_step(at);
                    self.tick();
                },
                Step::Output(value) => {
                    self.events.dispatch(&Event::Output { value });

                    if let Err(err) = self.hooks.write(&output_string(value)) {
                        return Err(self.abort(err));
                    }

                    self.trace_step(at);
                    self.tick();
                },
                Step::Input => match self.hooks.read() {
                    Ok(Input::Ready(input)) => self.complete_input(&input),
                    Ok(Input::Pending) => {
                        debug!(self.logger, "waiting for input"; "cursor" => at);
                        self.state = State::SuspendedOnRead;
                    },
                    Err(err) => return Err(self.abort(err)),
                },
            }
        }

        Ok(self.state)
    }

    fn complete_input(&mut self, input: &str) {
        let at = self.machine.cursor();

        if let Some(event) = self.machine.deliver(input) {
            self.events.dispatch(&event);
            self.trace_step(at);
        }

        self.tick();
    }

    fn tick(&mut self) {
        let mut tick = Tick::new(&mut self.machine);
        let control = self.hooks.tick(&mut tick);

        if tick.was_patched() {
            debug!(self.logger, "patched by tick hook";
                "pointer" => self.machine.pointer(),
                "cursor" => self.machine.cursor());
        }

        if control == Control::Pause {
            debug!(self.logger, "paused"; "cursor" => self.machine.cursor());
            self.state = State::SuspendedOnTick;
        }
    }

    fn finish(&mut self) {
        debug!(self.logger, "done"; "steps" => self.machine.steps());

        self.state = State::Done;
        self.hooks.done();
    }

    fn abort(&mut self, err: io::Error) -> RunError {
        debug!(self.logger, "hook failed, aborting"; "error" => %err);

        self.state = State::Aborted;
        RunError::Hook(err)
    }

    fn trace_step(&self, at: usize) {
        trace!(self.logger, "step";
            "step" => self.machine.steps(),
            "cursor" => at,
            "instruction" => %self.machine.program()[at],
            "pointer" => self.machine.pointer(),
            "cell" => self.machine.cell());
    }
}

/// Runs `program` on the terminal until it finishes.
pub fn run(program: &str) -> Result<Run<StdIo>, RunError> {
    run_with(program, StdIo)
}

/// Starts `program` with a custom hook set.
///
/// Returns the run once it has finished or been suspended by a hook. A suspended run is resumed
/// through the returned handle.
pub fn run_with<H: Hooks>(program: &str, hooks: H) -> Result<Run<H>, RunError> {
    let mut run = Run::new(program, hooks);
    run.start()?;
    Ok(run)
}
