//! Parsed program text.

use std::fmt;
use std::iter::FromIterator;
use std::ops::Index;

use crate::instruction::Instruction;

/// An immutable sequence of [instructions](Instruction), one per character of the source text.
///
/// Comment characters are kept so that cursor positions line up with character offsets in the
/// source text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    /// Decodes program text. Never fails: characters outside the command set become
    /// [comments](Instruction::Comment).
    pub fn parse(source: &str) -> Program {
        source.chars().map(Instruction::from_char).collect()
    }

    /// Number of positions in the program, comments included.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Returns the instruction at `cursor`, or `None` if the cursor is past the end.
    pub fn get(&self, cursor: usize) -> Option<Instruction> {
        self.instructions.get(cursor).copied()
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions[..]
    }

    /// Number of real commands in the program.
    pub fn command_count(&self) -> usize {
        self.instructions.iter().filter(|ins| ins.is_command()).count()
    }

    /// Renders the program with every comment character removed.
    pub fn commands_only(&self) -> String {
        self.instructions
            .iter()
            .filter(|ins| ins.is_command())
            .map(Instruction::as_char)
            .collect()
    }

    /// Finds the `]` matching a `[` by scanning forward from `from`, the position right after the
    /// `[`.
    ///
    /// The scan starts at depth one, goes one level deeper on every `[` and one level shallower
    /// on every `]`. Returns the position of the `]` that brings the depth to zero, or the
    /// length of the program if the loop is never closed.
    ///
    /// The result is not cached, every call scans again.
    pub fn find_loop_end(&self, from: usize) -> usize {
        let mut depth = 1usize;

        for (pos, ins) in self.instructions.iter().enumerate().skip(from) {
            match ins {
                Instruction::LoopStart => depth += 1,
                Instruction::LoopEnd => depth -= 1,
                _ => continue,
            }

            if depth == 0 {
                return pos;
            }
        }

        self.instructions.len()
    }
}

impl FromIterator<Instruction> for Program {
    fn from_iter<I>(iter: I) -> Self
        where I: IntoIterator<Item = Instruction>
    {
        Program {
            instructions: Vec::from_iter(iter),
        }
    }
}

impl From<&str> for Program {
    fn from(source: &str) -> Program {
        Program::parse(source)
    }
}

impl From<String> for Program {
    fn from(source: String) -> Program {
        Program::parse(&source)
    }
}

impl Index<usize> for Program {
    type Output = Instruction;

    fn index(&self, cursor: usize) -> &Instruction {
        &self.instructions[cursor]
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for ins in &self.instructions {
            write!(f, "{}", ins)?;
        }

        Ok(())
    }
}
