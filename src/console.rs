//! Line-based operator console.
//!
//! Generic over the input and output streams so interviews can be scripted
//! in tests; [`Console::stdio`] wires it to the terminal.
//!
//! A presented label looks like:
//!
//! ```text
//!     vehicle
//! [0]    bike
//! [1]    car
//! [-1]   -- Can't be assessed --
//! Insert corresponding number:
//! ```

use std::io::{self, BufRead, Stdout, StdinLock, Write};

use owo_colors::OwoColorize;

use crate::model::Label;
use crate::prompt::{PromptState, SKIP_INDEX, Selection};

const SKIP_TEXT: &str = "-- Can't be assessed --";
const SELECTION_PROMPT: &str = "Insert corresponding number: ";

pub struct Console<R, W> {
    input: R,
    output: W,
    color: bool,
}

impl Console<StdinLock<'static>, Stdout> {
    pub fn stdio(color: bool) -> Self {
        Self::new(io::stdin().lock(), io::stdout(), color)
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W, color: bool) -> Self {
        Self {
            input,
            output,
            color,
        }
    }

    /// Write one line of plain text.
    pub fn line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }

    /// Ask a free-text question until a non-empty answer is given.
    pub fn ask_text(&mut self, prompt: &str) -> io::Result<String> {
        loop {
            write!(self.output, "{prompt}")?;
            self.output.flush()?;
            let answer = self.read_line()?;
            let answer = answer.trim();
            if !answer.is_empty() {
                return Ok(answer.to_string());
            }
        }
    }

    /// Show a label and its numbered choices, followed by the skip option.
    pub fn present(&mut self, label: &Label) -> io::Result<()> {
        if self.color {
            writeln!(self.output, "\t{}", label.name.green())?;
        } else {
            writeln!(self.output, "\t{}", label.name)?;
        }
        for (i, choice) in label.choices.iter().enumerate() {
            writeln!(self.output, "[{i}]\t{}", choice.name)?;
        }
        writeln!(self.output, "[{SKIP_INDEX}]\t{SKIP_TEXT}")
    }

    /// Read selections until one is valid for `choice_count` choices.
    ///
    /// Invalid input is reported and the prompt repeats. Fails only when the
    /// input stream does.
    pub fn select(&mut self, choice_count: usize) -> io::Result<Selection> {
        let mut state = PromptState::AwaitingInput;
        loop {
            state = match state {
                PromptState::AwaitingInput => {
                    write!(self.output, "{SELECTION_PROMPT}")?;
                    self.output.flush()?;
                    PromptState::Validating(self.read_line()?)
                }
                PromptState::Accepted(selection) => {
                    writeln!(self.output)?;
                    return Ok(selection);
                }
                PromptState::Rejected(ref e) => {
                    tracing::debug!(error = %e, "rejected selection");
                    if self.color {
                        writeln!(self.output, "{}", e.yellow())?;
                    } else {
                        writeln!(self.output, "{e}")?;
                    }
                    state.step(choice_count)
                }
                validating @ PromptState::Validating(_) => validating.step(choice_count),
            };
        }
    }

    fn read_line(&mut self) -> io::Result<String> {
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "operator input closed",
            ));
        }
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::{Choice, LabelKind};

    fn size_label() -> Label {
        Label::new(
            "size",
            LabelKind::Categorical,
            vec![
                Choice::terminal("small"),
                Choice::terminal("medium"),
                Choice::terminal("large"),
            ],
        )
    }

    #[test]
    fn presents_label_choices_and_skip() {
        let mut out = Vec::new();
        let mut console = Console::new(&b""[..], &mut out, false);
        console.present(&size_label()).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "\tsize\n[0]\tsmall\n[1]\tmedium\n[2]\tlarge\n[-1]\t-- Can't be assessed --\n"
        );
    }

    #[test]
    fn select_retries_until_valid() {
        let mut out = Vec::new();
        let mut console = Console::new(&b"abc\n7\n2\n"[..], &mut out, false);

        let selection = console.select(3).unwrap();
        assert_eq!(selection, Selection::Choice(2));

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches(SELECTION_PROMPT).count(), 3);
        assert!(text.contains("invalid number: 'abc'"));
        assert!(text.contains("7 is out of range, expected -1 to 2"));
    }

    #[test]
    fn select_accepts_skip() {
        let mut out = Vec::new();
        let mut console = Console::new(&b"-1\n"[..], &mut out, false);
        assert_eq!(console.select(3).unwrap(), Selection::Skip);
    }

    #[test]
    fn select_fails_when_input_closes() {
        let mut out = Vec::new();
        let mut console = Console::new(&b"x\n"[..], &mut out, false);
        let err = console.select(3).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn ask_text_skips_blank_answers() {
        let mut out = Vec::new();
        let mut console = Console::new(&b"\n   \n  ana \n"[..], &mut out, false);
        assert_eq!(console.ask_text("Name: ").unwrap(), "ana");

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("Name: ").count(), 3);
    }
}
