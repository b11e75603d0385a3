use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::sync::mpsc;
use std::thread;

use brainfuck::{
    error::RunError,
    event::Event,
    hooks::{BufferIo, Control, Hooks, Input, Tick},
    run::{Run, State},
    run_with,
    snapshot::{Snapshot, StatePatch},
    tape::Tape,
};

/// Records every snapshot and pauses whenever `pause` is set.
#[derive(Default)]
struct Recorder {
    snapshots: Vec<Snapshot>,
    output: String,
    pending_reads: usize,
    pause: bool,
    done: usize,
}

impl Hooks for Recorder {
    fn read(&mut self) -> io::Result<Input> {
        self.pending_reads += 1;
        Ok(Input::Pending)
    }

    fn write(&mut self, output: &str) -> io::Result<()> {
        self.output.push_str(output);
        Ok(())
    }

    fn tick(&mut self, tick: &mut Tick<'_>) -> Control {
        self.snapshots.push(tick.snapshot());

        if self.pause {
            Control::Pause
        } else {
            Control::Advance
        }
    }

    fn done(&mut self) {
        self.done += 1;
    }
}

#[test]
fn test_read_delivers_first_character() {
    let mut io = BufferIo::with_input("A");
    run_with(",.", &mut io).unwrap();

    assert_eq!(io.output(), "A");
}

#[test]
fn test_write_called_exactly_once() {
    let mut run = Run::new(",.", Recorder::default());

    assert_eq!(run.start().unwrap(), State::SuspendedOnRead);
    assert_eq!(run.deliver("A").unwrap(), State::Done);

    let hooks = run.into_hooks();
    assert_eq!(hooks.output, "A");
    assert_eq!(hooks.pending_reads, 1);
    assert_eq!(hooks.done, 1);
}

#[test]
fn test_empty_input_stores_zero() {
    let mut run = Run::new("+++,", Recorder::default());
    run.start().unwrap();
    run.deliver("").unwrap();

    assert!(run.is_done());
    assert_eq!(run.machine().cell(), 0);
}

#[test]
fn test_exhausted_input_buffer_stores_zero() {
    let mut run = Run::new(",>,>,", BufferIo::with_input("hi"));
    run.start().unwrap();

    assert_eq!(run.machine().tape().window(0, 3), vec![b'h', b'i', 0]);
}

#[test]
fn test_unmatched_open_bracket_reaches_done() {
    let mut run = Run::new("++[", Recorder::default());

    assert_eq!(run.start().unwrap(), State::Done);

    let hooks = run.into_hooks();
    assert_eq!(hooks.done, 1);
    assert_eq!(hooks.snapshots.len(), 3);
    assert_eq!(hooks.snapshots[2].cursor, 3);
    assert_eq!(hooks.snapshots[2].tape.get(0), 2);
}

#[test]
fn test_unmatched_open_bracket_on_zero_cell_reaches_done() {
    let mut run = Run::new("[+++.", Recorder::default());

    assert_eq!(run.start().unwrap(), State::Done);
    assert!(run.machine().tape().is_blank());
    assert!(run.hooks().output.is_empty());
}

#[test]
fn test_snapshots_after_every_instruction() {
    let mut run = Run::new("+>+ <-", Recorder::default());
    run.start().unwrap();

    let snapshots = &run.hooks().snapshots;

    assert_eq!(snapshots.len(), 5);
    assert_eq!(
        snapshots.iter().map(|s| (s.pointer, s.cursor, s.steps)).collect::<Vec<_>>(),
        vec![(0, 1, 1), (1, 2, 2), (1, 3, 3), (0, 5, 4), (0, 6, 5)],
    );
    assert_eq!(snapshots[0].tape, Tape::from(&[1u8][..]));
    assert_eq!(snapshots[4].tape, Tape::from(&[0u8, 1][..]));
}

#[test]
fn test_snapshot_is_a_copy() {
    let mut run = Run::new("+", Recorder { pause: true, ..Recorder::default() });
    run.start().unwrap();

    let mut snapshot = run.hooks().snapshots[0].clone();
    snapshot.tape.set(0, 200);
    snapshot.pointer = 9;

    assert_eq!(run.machine().cell(), 1);
    assert_eq!(run.machine().pointer(), 0);
}

#[test]
fn test_pause_resume_from_retained_handle() {
    let mut run = Run::new("+++.", Recorder { pause: true, ..Recorder::default() });

    let mut state = run.start().unwrap();
    let mut pauses = 0;

    while state == State::SuspendedOnTick {
        pauses += 1;
        state = run.advance().unwrap();
    }

    assert_eq!(state, State::Done);
    assert_eq!(pauses, 4);
    assert_eq!(run.hooks().output, "\u{3}");
    assert_eq!(run.hooks().done, 1);
}

#[test]
fn test_patch_state_from_tick_hook() {
    // Skips the first output by moving the cursor forward, then edits the tape.
    struct Editor;

    impl Hooks for Editor {
        fn write(&mut self, _output: &str) -> io::Result<()> {
            Ok(())
        }

        fn tick(&mut self, tick: &mut Tick<'_>) -> Control {
            if tick.steps() == 1 {
                let mut tape = tick.snapshot().tape;
                tape.set(-1, 42);
                tick.patch(StatePatch::new().cursor(2).pointer(-1).tape(tape));
            }

            Control::Advance
        }
    }

    let mut run = Run::new("+>+", Editor);
    run.start().unwrap();

    assert!(run.is_done());
    assert_eq!(run.machine().tape().get(-1), 43);
    assert_eq!(run.machine().tape().get(0), 1);
    assert_eq!(run.machine().tape().get(1), 0);
}

#[test]
fn test_rewind_while_paused() {
    let mut run = Run::new("+++", Recorder { pause: true, ..Recorder::default() });
    run.start().unwrap();

    let first = run.snapshot();
    run.advance().unwrap();
    run.advance().unwrap();
    assert_eq!(run.machine().cell(), 3);

    run.patch(StatePatch::from(first)).unwrap();
    assert_eq!(run.machine().cell(), 1);
    assert_eq!(run.machine().cursor(), 1);

    run.hooks_mut().pause = false;
    assert_eq!(run.advance().unwrap(), State::Done);
    assert_eq!(run.machine().cell(), 3);
}

#[test]
fn test_read_delivered_from_another_thread() {
    let (sender, receiver) = mpsc::channel::<String>();

    let producer = thread::spawn(move || {
        for word in &["x", "yz"] {
            sender.send(word.to_string()).unwrap();
        }
    });

    let mut run = Run::new(",.,.", Recorder::default());
    let mut state = run.start().unwrap();

    while state == State::SuspendedOnRead {
        let input = receiver.recv().unwrap();
        state = run.deliver(&input).unwrap();
    }

    producer.join().unwrap();

    assert_eq!(state, State::Done);
    assert_eq!(run.hooks().output, "xy");
}

#[test]
fn test_failing_write_aborts_the_run() {
    struct Broken {
        done: bool,
    }

    impl Hooks for Broken {
        fn write(&mut self, _output: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn done(&mut self) {
            self.done = true;
        }
    }

    let mut run = Run::new("+.+", Broken { done: false });

    match run.start() {
        Err(RunError::Hook(err)) => assert_eq!(err.kind(), io::ErrorKind::BrokenPipe),
        other => panic!("expected a hook error, got {:?}", other),
    }

    assert_eq!(run.state(), State::Aborted);
    assert!(!run.hooks().done);
    assert!(run.advance().is_err());
}

#[test]
fn test_failing_read_aborts_the_run() {
    struct NoInput;

    impl Hooks for NoInput {
        fn read(&mut self) -> io::Result<Input> {
            Err(io::Error::new(io::ErrorKind::UnexpectedEof, "no input"))
        }
    }

    let mut run = Run::new(",", NoInput);

    assert!(run.start().is_err());
    assert_eq!(run.state(), State::Aborted);
}

#[test]
fn test_listeners_observe_events() {
    let events = Rc::new(RefCell::new(Vec::new()));

    let mut run = Run::new("+[>.<-]", BufferIo::new());

    let sink = events.clone();
    run.add_listener(move |event: &Event| sink.borrow_mut().push(*event));

    run.start().unwrap();

    assert_eq!(*events.borrow(), vec![
        Event::CellChange { address: 0, value: 1 },
        Event::PointerMove { address: 1 },
        Event::Output { value: 0 },
        Event::PointerMove { address: 0 },
        Event::CellChange { address: 0, value: 0 },
    ]);
}

#[test]
fn test_listeners_observe_stored_input_as_cell_change() {
    let events = Rc::new(RefCell::new(Vec::new()));

    let mut run = Run::new(">,.", BufferIo::with_input("q"));

    let sink = events.clone();
    run.add_listener(move |event: &Event| sink.borrow_mut().push(*event));

    run.start().unwrap();

    assert_eq!(*events.borrow(), vec![
        Event::PointerMove { address: 1 },
        Event::CellChange { address: 1, value: b'q' },
        Event::Output { value: b'q' },
    ]);
}

#[test]
fn test_listeners_observe_jumps() {
    let events = Rc::new(RefCell::new(Vec::new()));

    let mut run = Run::new("[-]++[-]", BufferIo::new());

    let sink = events.clone();
    run.add_listener(move |event: &Event| {
        if let Event::Jump { .. } = event {
            sink.borrow_mut().push(*event);
        }
    });

    run.start().unwrap();

    assert_eq!(*events.borrow(), vec![
        Event::Jump { from: 0, to: 3 },
        Event::Jump { from: 7, to: 6 },
    ]);
}

#[test]
fn test_runs_share_no_state() {
    let mut a = Run::new("+++", Recorder { pause: true, ..Recorder::default() });
    let mut b = Run::new("-", BufferIo::new());

    a.start().unwrap();
    b.start().unwrap();

    assert_eq!(a.machine().cell(), 1);
    assert_eq!(b.machine().cell(), 255);

    while a.state() == State::SuspendedOnTick {
        a.advance().unwrap();
    }

    assert_eq!(a.machine().cell(), 3);
    assert_eq!(b.machine().cell(), 255);
}
