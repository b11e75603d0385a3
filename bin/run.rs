use std::io;
use std::thread;
use std::time::Duration;

use clap::{App, Arg, ArgMatches};
use slog::{o, Discard, Drain, Logger};
use slog_term::{FullFormat, TermDecorator};

use brainfuck::{
    error::RunError,
    hooks::{Control, Hooks, Input, InputBuffer, StdIo, Tick},
    run::Run,
};

enum Error {
    Execution(RunError),
    InvalidDelay(String),
    IO(io::Error),
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Error {
        Error::IO(e)
    }
}

impl From<RunError> for Error {
    fn from(e: RunError) -> Error {
        Error::Execution(e)
    }
}

/// Terminal hooks with optional pre-supplied input and a delay between instructions.
struct CliHooks {
    input: Option<InputBuffer>,
    delay: Option<Duration>,
}

impl Hooks for CliHooks {
    fn read(&mut self) -> io::Result<Input> {
        match &mut self.input {
            Some(buffer) => Ok(Input::Ready(buffer.next_char().to_string())),
            None => StdIo.read(),
        }
    }

    fn tick(&mut self, _tick: &mut Tick<'_>) -> Control {
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }

        Control::Advance
    }
}

fn parse_arguments() -> ArgMatches<'static> {
    App::new("bfrun")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Utility for executing Brainfuck programs")
        .arg(Arg::with_name("source")
             .help("File containing the program, or the program itself with --eval")
             .value_name("SOURCE")
             .required(true)
             .index(1))
        .arg(Arg::with_name("eval")
             .help("Treat SOURCE as program text instead of a file path")
             .long("eval")
             .short("e"))
        .arg(Arg::with_name("input")
             .help("Input consumed one character per ',' instead of reading the terminal")
             .long("input")
             .short("i")
             .takes_value(true))
        .arg(Arg::with_name("delay")
             .help("Milliseconds to wait after every instruction")
             .long("delay")
             .short("d")
             .takes_value(true))
        .arg(Arg::with_name("verbose")
             .help("Enables verbose logging")
             .long("verbose")
             .short("v"))
        .get_matches()
}

fn main() {
    let args = parse_arguments();

    match run(&args) {
        Ok(()) => (),
        Err(err) => {
            match err {
                Error::IO(io) => eprintln!("IO error: {}", io),
                Error::Execution(e) => eprintln!("Execution error: {}", e),
                Error::InvalidDelay(d) => eprintln!("Invalid delay: {}", d),
            }

            std::process::exit(1);
        },
    }
}

fn logger(verbose: bool) -> Logger {
    if verbose {
        let decorator = TermDecorator::new().stderr().build();
        let drain = FullFormat::new(decorator).build().fuse();
        let drain = slog_async::Async::new(drain).build().fuse();
        Logger::root(drain, o!())
    } else {
        Logger::root(Discard, o!())
    }
}

fn run(args: &ArgMatches) -> Result<(), Error> {
    let source = args.value_of("source").unwrap_or_default();

    let program = if args.is_present("eval") {
        source.to_string()
    } else {
        std::fs::read_to_string(source)?
    };

    let delay = match args.value_of("delay") {
        None => None,
        Some(ms) => {
            let ms = ms.parse::<u64>()
                .map_err(|_| Error::InvalidDelay(ms.to_string()))?;
            Some(Duration::from_millis(ms))
        },
    };

    let hooks = CliHooks {
        input: args.value_of("input").map(InputBuffer::new),
        delay,
    };

    let mut run = Run::with_logger(program, hooks, logger(args.is_present("verbose")));

    run.start()?;

    Ok(())
}
