//! The interview engine: turns one schema into one record per image.
//!
//! Labels wait on a stack. The top-level labels are pushed in declaration
//! order, so the last declared is asked first. Selecting a choice pushes its
//! sub-labels on top, so follow-up questions are asked before any label that
//! was already pending.

use std::io::{self, BufRead, Write};

use crate::console::Console;
use crate::model::{Label, LabelKind, Record, Schema, Value};
use crate::prompt::Selection;

/// Names of the identifying columns every record starts with.
#[derive(Debug, Clone)]
pub struct Columns {
    pub operator: String,
    pub image: String,
}

/// An interview over a shared, read-only schema.
pub struct Interview<'a> {
    schema: &'a Schema,
    columns: &'a Columns,
}

impl<'a> Interview<'a> {
    pub fn new(schema: &'a Schema, columns: &'a Columns) -> Self {
        Self { schema, columns }
    }

    /// Ask every reachable label about `image` and return the answers.
    ///
    /// Invalid operator input is retried at the prompt; the only error is
    /// the console itself failing.
    pub fn run<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
        operator: &str,
        image: &str,
    ) -> io::Result<Record> {
        let mut record =
            Record::identified(&self.columns.operator, operator, &self.columns.image, image);
        let mut pending: Vec<&'a Label> = self.schema.labels.iter().collect();

        while let Some(label) = pending.pop() {
            if !label.is_presented() {
                tracing::trace!(label = %label.name, "leaf without choices, nothing to ask");
                continue;
            }

            console.present(label)?;
            let index = match console.select(label.choices.len())? {
                Selection::Skip => {
                    tracing::debug!(label = %label.name, "skipped");
                    continue;
                }
                Selection::Choice(index) => index,
            };

            let choice = &label.choices[index];
            match label.kind {
                LabelKind::Categorical => record.insert(&label.name, choice.name.as_str()),
                LabelKind::Boolean => record.insert(&label.name, Value::Index(index)),
                LabelKind::Leaf => {}
            }
            tracing::debug!(label = %label.name, choice = %choice.name, "answered");

            pending.extend(&choice.sub_labels);
        }

        Ok(record)
    }
}
