//! Label schema loading.
//!
//! The schema document is JSON:
//!
//! ```text
//! { "labels": [
//!     { "label_name": "vehicle", "type": "categorical",
//!       "choices": [ "bike", { "choice_name": "car", "labels": [ ... ] } ] },
//!     { "label_name": "night", "type": "boolean" }
//! ] }
//! ```
//!
//! `type` defaults to `leaf`. A choice is a bare name or an object with
//! `choice_name` and optional nested `labels`. Both shapes are resolved into
//! [`Choice`] here; nothing downstream sees the raw document.

use std::{fs, io, path::Path, path::PathBuf};

use serde::Deserialize;

use crate::model::{Choice, Label, LabelKind, Schema};

/// Errors that can occur while loading a schema.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("schema not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read schema: {0}")]
    Io(#[from] io::Error),

    #[error("malformed schema: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("label type {kind} not supported (label '{label}')")]
    UnsupportedKind { label: String, kind: String },

    #[error("empty {0} in schema")]
    EmptyName(&'static str),

    #[error("categorical label '{0}' has no choices")]
    NoChoices(String),

    #[error("boolean label '{label}' has {count} choices, expected 2")]
    BooleanArity { label: String, count: usize },

    #[error("label '{0}' collides with a reserved record column")]
    ReservedName(String),
}

pub type Result<T> = core::result::Result<T, SchemaError>;

#[derive(Deserialize)]
struct RawSchema {
    labels: Vec<RawLabel>,
}

#[derive(Deserialize)]
struct RawLabel {
    label_name: String,
    #[serde(rename = "type")]
    kind: Option<String>,
    choices: Option<Vec<RawChoice>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawChoice {
    Bare(String),
    Nested {
        choice_name: String,
        labels: Option<Vec<RawLabel>>,
    },
}

/// Read and parse the schema document at `path`.
pub fn load(path: &Path) -> Result<Schema> {
    if !path.is_file() {
        return Err(SchemaError::NotFound(path.to_path_buf()));
    }
    let json = fs::read_to_string(path)?;
    parse(&json)
}

/// Parse a schema document.
pub fn parse(json: &str) -> Result<Schema> {
    let raw: RawSchema = serde_json::from_str(json)?;
    let labels = raw
        .labels
        .into_iter()
        .map(build_label)
        .collect::<Result<_>>()?;
    Ok(Schema { labels })
}

/// Reject schemas with a label named like one of the record's own columns.
pub fn check_reserved(schema: &Schema, reserved: &[&str]) -> Result<()> {
    match schema
        .all_labels()
        .into_iter()
        .find(|l| reserved.contains(&l.name.as_str()))
    {
        Some(label) => Err(SchemaError::ReservedName(label.name.clone())),
        None => Ok(()),
    }
}

fn build_label(raw: RawLabel) -> Result<Label> {
    if raw.label_name.is_empty() {
        return Err(SchemaError::EmptyName("label_name"));
    }

    let kind = match raw.kind.as_deref() {
        None => LabelKind::Leaf,
        Some(s) => s.parse::<LabelKind>().map_err(|kind| SchemaError::UnsupportedKind {
            label: raw.label_name.clone(),
            kind,
        })?,
    };

    let choices = raw
        .choices
        .unwrap_or_default()
        .into_iter()
        .map(build_choice)
        .collect::<Result<Vec<_>>>()?;

    if kind == LabelKind::Categorical && choices.is_empty() {
        return Err(SchemaError::NoChoices(raw.label_name));
    }
    if kind == LabelKind::Boolean && !choices.is_empty() && choices.len() != 2 {
        return Err(SchemaError::BooleanArity {
            label: raw.label_name,
            count: choices.len(),
        });
    }

    Ok(Label::new(raw.label_name, kind, choices))
}

fn build_choice(raw: RawChoice) -> Result<Choice> {
    let (name, labels) = match raw {
        RawChoice::Bare(name) => (name, None),
        RawChoice::Nested {
            choice_name,
            labels,
        } => (choice_name, labels),
    };

    if name.is_empty() {
        return Err(SchemaError::EmptyName("choice_name"));
    }

    let sub_labels = labels
        .unwrap_or_default()
        .into_iter()
        .map(build_label)
        .collect::<Result<_>>()?;

    Ok(Choice::with_labels(name, sub_labels))
}
