//! Selection prompt: reading one choice index from the operator.
//!
//! A prompt cycles through [`PromptState`] until it accepts a selection:
//!
//! ```text
//! AwaitingInput → Validating → Accepted
//!                            → Rejected → AwaitingInput
//! ```
//!
//! Rejection is never terminal. The only way out other than a valid
//! selection is the input stream failing or closing.

/// Index the operator enters to skip a label.
pub const SKIP_INDEX: i64 = -1;

/// What the operator picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// The label can't be assessed: record nothing, reveal nothing.
    Skip,

    /// Index into the label's choices.
    Choice(usize),
}

/// Why a line of input was not a valid selection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputFormatError {
    #[error("invalid number: '{0}'")]
    NotAnInteger(String),

    #[error("{value} is out of range, expected -1 to {max}")]
    OutOfRange { value: i64, max: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptState {
    AwaitingInput,
    Validating(String),
    Accepted(Selection),
    Rejected(InputFormatError),
}

impl PromptState {
    /// Advance a state that needs no I/O.
    ///
    /// `AwaitingInput` is returned unchanged: moving out of it requires a line
    /// of input, supplied by the caller as `Validating`.
    pub fn step(self, choice_count: usize) -> Self {
        match self {
            Self::Validating(input) => match parse_selection(&input, choice_count) {
                Ok(selection) => Self::Accepted(selection),
                Err(e) => Self::Rejected(e),
            },
            Self::Rejected(_) => Self::AwaitingInput,
            other => other,
        }
    }
}

/// Validate one line of input against a label with `choice_count` choices.
///
/// Accepts any integer in `-1..=choice_count - 1`, surrounding whitespace allowed.
pub fn parse_selection(input: &str, choice_count: usize) -> Result<Selection, InputFormatError> {
    let trimmed = input.trim();
    let value: i64 = trimmed
        .parse()
        .map_err(|_| InputFormatError::NotAnInteger(trimmed.to_string()))?;

    if value == SKIP_INDEX {
        return Ok(Selection::Skip);
    }

    match usize::try_from(value) {
        Ok(index) if index < choice_count => Ok(Selection::Choice(index)),
        _ => Err(InputFormatError::OutOfRange {
            value,
            max: i64::try_from(choice_count).unwrap_or(i64::MAX) - 1,
        }),
    }
}
