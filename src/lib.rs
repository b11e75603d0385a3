//! A Brainfuck interpreter built around a hook protocol.
//!
//! The interpreter itself only knows how to execute one instruction at a time. Everything else,
//! where input comes from, where output goes and when the next instruction runs, is decided by a
//! set of [Hooks](hooks::Hooks) supplied by the caller. The same engine can therefore:
//! - run a program to completion on the terminal,
//! - single-step it under a debugger,
//! - throttle it for an animated visualization,
//! - wait for input that arrives asynchronously.
//!
//! # Language
//!
//! | char | effect                                                                      |
//! |------|-----------------------------------------------------------------------------|
//! | `>`  | move the pointer one cell to the right                                      |
//! | `<`  | move the pointer one cell to the left                                       |
//! | `+`  | increment the current cell (255 wraps to 0)                                 |
//! | `-`  | decrement the current cell (0 wraps to 255)                                 |
//! | `.`  | write the current cell                                                      |
//! | `,`  | read one character into the current cell                                    |
//! | `[`  | if the current cell is zero, jump past the matching `]`                     |
//! | `]`  | if the current cell is non-zero, jump back to the instruction after its `[` |
//!
//! Every other character is a comment.
//!
//! # Example
//! ```
//! use brainfuck::{
//!     hooks::BufferIo,
//!     run::Run,
//! };
//!
//! let source = "++++++++[>++++++++<-]>+.+.+.";
//!
//! // Collect the output into a string instead of printing it.
//! let mut run = Run::new(source, BufferIo::new());
//!
//! run.start()
//!     .expect("an error occurred while running the program");
//!
//! assert!(run.is_done());
//! assert_eq!(run.hooks().output(), "ABC");
//! ```
//!
//! # Executables
//!
//! ## `bfrun`
//!
//! Runs a program from a file or from the command line. Enabled by the `bfrun` feature.
//!
//! ## `bfdebug`
//!
//! An interactive single-step debugger with breakpoints and state editing. Enabled by the
//! `bfdebug` feature.
pub mod instruction;
pub mod program;
pub mod tape;
pub mod machine;
pub mod snapshot;
pub mod hooks;
pub mod event;
pub mod run;
pub mod error;

pub use run::{run, run_with};
