//! types for representing the commands of a program

use std::fmt;

/// A single character of program text, decoded into a command.
///
/// Every character of the source maps to exactly one [Instruction], so the index of an
/// instruction in a [Program](crate::program::Program) is also the index of the character it was
/// decoded from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Instruction {
    /// Moves the pointer one cell to the right. (`>`)
    Right,

    /// Moves the pointer one cell to the left. (`<`)
    Left,

    /// Increments the current cell, wrapping 255 to 0. (`+`)
    Increment,

    /// Decrements the current cell, wrapping 0 to 255. (`-`)
    Decrement,

    /// Sends the current cell to the write hook. (`.`)
    Output,

    /// Requests one character from the read hook and stores it in the current cell. (`,`)
    Input,

    /// Skips past the matching [LoopEnd](Instruction::LoopEnd) if the current cell is zero,
    /// otherwise enters the loop body. (`[`)
    LoopStart,

    /// Jumps back into the loop body if the current cell is non-zero, otherwise leaves the loop.
    /// (`]`)
    LoopEnd,

    /// Any other character. Occupies a position in the program but has no effect.
    Comment(char),
}

impl Instruction {
    pub fn from_char(ch: char) -> Instruction {
        match ch {
            '>' => Instruction::Right,
            '<' => Instruction::Left,
            '+' => Instruction::Increment,
            '-' => Instruction::Decrement,
            '.' => Instruction::Output,
            ',' => Instruction::Input,
            '[' => Instruction::LoopStart,
            ']' => Instruction::LoopEnd,
            other => Instruction::Comment(other),
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Instruction::Right => '>',
            Instruction::Left => '<',
            Instruction::Increment => '+',
            Instruction::Decrement => '-',
            Instruction::Output => '.',
            Instruction::Input => ',',
            Instruction::LoopStart => '[',
            Instruction::LoopEnd => ']',
            Instruction::Comment(ch) => *ch,
        }
    }

    /// Returns `true` for the eight real commands and `false` for comments.
    pub fn is_command(&self) -> bool {
        match self {
            Instruction::Comment(_) => false,
            _ => true,
        }
    }
}

impl From<char> for Instruction {
    fn from(ch: char) -> Instruction {
        Instruction::from_char(ch)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}
