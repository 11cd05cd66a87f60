use std::fmt;

/// Engine-level errors. Rule violations stay local to the table that
/// raised them — they are reported to the submitting player and never
/// propagate up to the hosting layer as a crash. A closed, hand-matched
/// enum with a manual `Display`, no `thiserror`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PokerError {
    InvalidAction(String),
    OutOfTurn { expected: usize, got: usize },
    ProtocolViolation(String),
    InvariantViolation(String),
}

impl fmt::Display for PokerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PokerError::InvalidAction(reason) => write!(f, "invalid action: {reason}"),
            PokerError::OutOfTurn { expected, got } => {
                write!(f, "out of turn: expected player {expected}, got {got}")
            }
            PokerError::ProtocolViolation(reason) => write!(f, "protocol violation: {reason}"),
            PokerError::InvariantViolation(reason) => write!(f, "invariant violation: {reason}"),
        }
    }
}

impl std::error::Error for PokerError {}
