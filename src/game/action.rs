use crate::game::player::Chips;
use std::fmt;

/// A betting action submitted by a human or a bot. `Raise` always carries
/// the player's new total bet for the street, never an increment — the
/// wire protocol's `bet` and `raise` are the same action at this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Fold,
    Check,
    Call,
    Raise(Chips),
    AllIn,
}

impl Action {
    pub fn is_aggro(&self) -> bool {
        matches!(self, Action::Raise(_) | Action::AllIn)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Fold => write!(f, "fold"),
            Action::Check => write!(f, "check"),
            Action::Call => write!(f, "call"),
            Action::Raise(total) => write!(f, "raise {total}"),
            Action::AllIn => write!(f, "all_in"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raise_and_all_in_are_aggro() {
        assert!(Action::Raise(40).is_aggro());
        assert!(Action::AllIn.is_aggro());
        assert!(!Action::Call.is_aggro());
    }
}
