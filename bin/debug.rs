use std::collections::BTreeSet;
use std::io::{self, Write};
use std::num::ParseIntError;

use clap::{App, Arg, ArgMatches};
use itertools::Itertools;
use slog::{o, Discard, Drain, Logger};
use slog_term::{FullFormat, TermDecorator};

use brainfuck::{
    error::RunError,
    hooks::{Control, Hooks, Input, Tick},
    run::{Run, State},
    snapshot::StatePatch,
    tape::Tape,
};

const TAPE_WINDOW: usize = 10;

#[derive(Debug)]
enum CommandError {
    InvalidFormat,
    UnknownCommand(String),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            CommandError::InvalidFormat => write!(f, "invalid format"),
            CommandError::UnknownCommand(cmd) => write!(f, "unknown command '{}', try help", cmd),
        }
    }
}

#[derive(Debug)]
enum Error {
    CommandError(CommandError),
    RunError(RunError),
    InvalidNumber(ParseIntError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::CommandError(ce) => write!(f, "command error: {}", ce),
            Error::RunError(re) => write!(f, "run error: {}", re),
            Error::InvalidNumber(e) => write!(f, "invalid number: {}", e),
        }
    }
}

impl From<CommandError> for Error {
    fn from(ce: CommandError) -> Error {
        Error::CommandError(ce)
    }
}

impl From<RunError> for Error {
    fn from(re: RunError) -> Error {
        Error::RunError(re)
    }
}

impl From<ParseIntError> for Error {
    fn from(e: ParseIntError) -> Error {
        Error::InvalidNumber(e)
    }
}

/// Hooks that pause on every instruction while stepping, or on breakpoints while continuing.
/// Input is always requested from the user through the `input` command.
#[derive(Default)]
struct DebugHooks {
    stepping: bool,
    breakpoints: BTreeSet<usize>,
}

impl Hooks for DebugHooks {
    fn read(&mut self) -> io::Result<Input> {
        Ok(Input::Pending)
    }

    fn write(&mut self, output: &str) -> io::Result<()> {
        let mut stdout = io::stdout();
        stdout.write_all(output.as_bytes())?;
        stdout.flush()
    }

    fn tick(&mut self, tick: &mut Tick<'_>) -> Control {
        if self.stepping || self.breakpoints.contains(&tick.cursor()) {
            Control::Pause
        } else {
            Control::Advance
        }
    }
}

struct Debugger {
    source: String,
    run: Run<DebugHooks>,
    logger: Logger,
    // Set once `continue` has stopped at a breakpoint on position 0 before starting.
    held_at_entry: bool,
}

impl Debugger {
    fn new(source: String, logger: Logger) -> Debugger {
        let run = Run::with_logger(source.as_str(), DebugHooks::default(), logger.clone());

        Debugger {
            source,
            run,
            logger,
            held_at_entry: false,
        }
    }

    fn restart(&mut self) {
        let breakpoints = std::mem::take(&mut self.run.hooks_mut().breakpoints);

        let hooks = DebugHooks {
            breakpoints,
            ..DebugHooks::default()
        };

        self.run = Run::with_logger(self.source.as_str(), hooks, self.logger.clone());
        self.held_at_entry = false;
    }

    /// Starts the run if it has not been started yet, otherwise resumes it.
    fn resume(&mut self, stepping: bool) -> Result<(), Error> {
        self.run.hooks_mut().stepping = stepping;

        let state = match self.run.state() {
            State::Ready => {
                // The tick hook only sees a cursor after an instruction ran, so a breakpoint on
                // the very first position is checked here.
                if !stepping && !self.held_at_entry && self.run.hooks().breakpoints.contains(&0) {
                    self.held_at_entry = true;
                    println!("\nBreakpoint at 0");
                    return Ok(());
                }

                self.run.start()?
            },
            State::SuspendedOnTick => self.run.advance()?,
            State::SuspendedOnRead => {
                println!("The program is waiting for input, use: input <text>");
                return Ok(());
            },
            state => {
                println!("The run is {}, use restart", state);
                return Ok(());
            },
        };

        self.report(state);
        Ok(())
    }

    fn report(&self, state: State) {
        match state {
            State::SuspendedOnRead => println!("\nWaiting for input at {}", self.run.machine().cursor()),
            State::SuspendedOnTick => {
                let cursor = self.run.machine().cursor();

                if self.run.hooks().breakpoints.contains(&cursor) && !self.run.hooks().stepping {
                    println!("\nBreakpoint at {}", cursor);
                }
            },
            State::Done => println!("\nProgram finished after {} steps", self.run.machine().steps()),
            _ => (),
        }
    }

    fn print_state(&self) {
        let machine = self.run.machine();

        println!("State:       {}", self.run.state());
        println!("Cursor:      {}", machine.cursor());
        println!("Next:        {}", machine.current().map(|ins| ins.to_string()).unwrap_or("<end>".into()));
        println!("Pointer:     {}", machine.pointer());
        println!("Cell:        {}", machine.cell());
        println!("Steps:       {}", machine.steps());
        println!("Loop depth:  {}", machine.loop_depth());
    }

    fn print_tape(&self, start: i64, len: usize) {
        let machine = self.run.machine();

        let cells = machine.tape()
            .window(start, len)
            .into_iter()
            .enumerate()
            .map(|(i, value)| {
                if start + i as i64 == machine.pointer() {
                    format!("[{:>3}]", value)
                } else {
                    format!(" {:>3} ", value)
                }
            })
            .join("");

        println!("{:>6}: {}", start, cells);
    }

    fn patch(&mut self, patch: StatePatch) -> Result<(), Error> {
        if self.run.state() == State::Ready {
            println!("The run has not started yet, use step first");
            return Ok(());
        }

        self.run.patch(patch)?;
        Ok(())
    }

    fn handle_line(&mut self, line: &str) -> Result<bool, Error> {
        let line = line.trim();

        let cmd = match line.split_whitespace().next() {
            Some(cmd) => cmd,
            None => return Ok(true),
        };

        let rest = line[cmd.len()..].trim();
        let args: Vec<_> = rest.split_whitespace().collect();

        match (cmd, args.as_slice()) {
            ("help", _) | ("h", _) => {
                println!("Available commands:");
                println!("  s, step                    Execute one instruction");
                println!("  c, continue                Run until a breakpoint or the end");
                println!("  b, break <pos>             Pause before the instruction at <pos>");
                println!("  d, delete <pos>            Remove a breakpoint");
                println!("  breakpoints                List all breakpoints");
                println!("  input <text>               Answer a pending ','");
                println!("  state                      Print the cursor, pointer and step count");
                println!("  tape [start] [len]         Print cells around the pointer or from <start>");
                println!("  set <value>                Overwrite the current cell");
                println!("  goto <pos>                 Move the cursor");
                println!("  pointer <address>          Move the pointer");
                println!("  restart                    Start over, keeping breakpoints");
                println!("  q, quit                    Leave the debugger");
            },
            ("s", []) | ("step", []) => self.resume(true)?,
            ("c", []) | ("continue", []) => self.resume(false)?,
            ("b", [pos]) | ("break", [pos]) => {
                let pos: usize = pos.parse()?;
                self.run.hooks_mut().breakpoints.insert(pos);
            },
            ("d", [pos]) | ("delete", [pos]) => {
                let pos: usize = pos.parse()?;
                self.run.hooks_mut().breakpoints.remove(&pos);
            },
            ("breakpoints", []) => {
                println!("{}", self.run.hooks().breakpoints.iter().join(", "));
            },
            ("input", _) => {
                // Spaces are valid input, so take the raw remainder.
                let state = self.run.deliver(rest)?;
                self.report(state);
            },
            ("state", []) => self.print_state(),
            ("tape", []) => {
                let start = self.run.machine().pointer() - (TAPE_WINDOW / 2) as i64;
                self.print_tape(start, TAPE_WINDOW);
            },
            ("tape", [start]) => self.print_tape(start.parse()?, TAPE_WINDOW),
            ("tape", [start, len]) => self.print_tape(start.parse()?, len.parse()?),
            ("set", [value]) => {
                let value: u8 = value.parse()?;
                let mut tape: Tape = self.run.machine().tape().clone();
                tape.set(self.run.machine().pointer(), value);
                self.patch(StatePatch::new().tape(tape))?;
            },
            ("goto", [pos]) => self.patch(StatePatch::new().cursor(pos.parse()?))?,
            ("pointer", [address]) => self.patch(StatePatch::new().pointer(address.parse()?))?,
            ("restart", []) => self.restart(),
            ("q", []) | ("quit", []) => return Ok(false),
            (cmd, _) => return Err(match cmd {
                "s" | "step" | "c" | "continue" | "b" | "break" | "d" | "delete" | "breakpoints"
                    | "state" | "tape" | "set" | "goto" | "pointer" | "restart" | "q" | "quit"
                    => CommandError::InvalidFormat,
                other => CommandError::UnknownCommand(other.to_string()),
            }.into()),
        }

        Ok(true)
    }

    fn repl(&mut self) {
        println!("Type help for a list of all available commands");

        loop {
            print!("{}> ", self.run.machine().cursor());
            let _ = io::stdout().flush();

            let mut input = String::new();

            match io::stdin().read_line(&mut input) {
                Ok(0) | Err(_) => break,
                Ok(_) => (),
            }

            match self.handle_line(input.trim_end_matches(&['\n', '\r'][..])) {
                Ok(true) => (),
                Ok(false) => break,
                Err(err) => eprintln!("Error: {}", err),
            }
        }
    }
}

fn parse_args() -> ArgMatches<'static> {
    App::new("bfdebug")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Interactive single-step debugger for Brainfuck programs")
        .arg(
            Arg::with_name("source")
                .help("File containing the program")
                .value_name("SOURCE")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("verbose")
                .help("Enables verbose logging")
                .long("verbose")
                .short("v"),
        )
        .get_matches()
}

fn main() {
    let args = parse_args();

    let path = args.value_of("source").unwrap_or_default();

    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("IO error: {}", err);
            std::process::exit(1);
        },
    };

    let logger = if args.is_present("verbose") {
        let decorator = TermDecorator::new().stderr().build();
        let drain = FullFormat::new(decorator).build().fuse();
        let drain = slog_async::Async::new(drain).build().fuse();
        Logger::root(drain, o!())
    } else {
        Logger::root(Discard, o!())
    };

    Debugger::new(source, logger).repl();
}
