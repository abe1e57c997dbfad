use thiserror::Error;

use super::scanner::{Command, Symbol};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum BalanceError {
    #[error("unmatched ']' at position: {position}")]
    Unopened { position: usize },
    #[error("unclosed '[' at position: {position}")]
    Unclosed { position: usize },
}

/// Checks that every loop delimiter in `source` has a partner.
///
/// Translation itself never calls this; unmatched brackets are emitted as-is
/// unless the caller opts in.
pub fn check(source: &[u8]) -> Result<(), BalanceError> {
    use Command as C;

    let mut open: Vec<usize> = Vec::new();
    for (position, &byte) in source.iter().enumerate() {
        match Symbol::from(byte) {
            Symbol::Command(C::LoopOpen) => open.push(position),
            Symbol::Command(C::LoopClose) => {
                open.pop().ok_or(BalanceError::Unopened { position })?;
            }
            _ => (),
        }
    }

    match open.first() {
        Some(&position) => Err(BalanceError::Unclosed { position }),
        None => Ok(()),
    }
}
