//! Labels and choices: the nodes of the question tree.

use std::fmt;
use std::str::FromStr;

/// How a label's answer is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    /// The selected choice's name is written to the record.
    Categorical,

    /// The selected choice's index (0 or 1) is written to the record.
    Boolean,

    /// Nothing is written. A leaf without choices is never presented.
    Leaf,
}

impl LabelKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Categorical => "categorical",
            Self::Boolean => "boolean",
            Self::Leaf => "leaf",
        }
    }
}

impl FromStr for LabelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "categorical" => Ok(Self::Categorical),
            "boolean" => Ok(Self::Boolean),
            "leaf" => Ok(Self::Leaf),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for LabelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A question node. Its name doubles as the record column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub name: String,
    pub kind: LabelKind,
    pub choices: Vec<Choice>,
}

impl Label {
    /// Builds a label, giving a boolean without choices the `true`/`false` pair.
    pub fn new(name: impl Into<String>, kind: LabelKind, choices: Vec<Choice>) -> Self {
        let choices = if kind == LabelKind::Boolean && choices.is_empty() {
            vec![Choice::terminal("true"), Choice::terminal("false")]
        } else {
            choices
        };

        Self {
            name: name.into(),
            kind,
            choices,
        }
    }

    /// Whether the operator is asked anything for this label.
    ///
    /// A leaf with no choices has nothing to select and completes silently.
    pub fn is_presented(&self) -> bool {
        !(self.kind == LabelKind::Leaf && self.choices.is_empty())
    }

    /// Walks this label and every label nested below it, depth first.
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a Label)) {
        f(self);
        for choice in &self.choices {
            for label in &choice.sub_labels {
                label.visit(f);
            }
        }
    }
}

/// One answer option of a label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub name: String,

    /// Follow-up questions revealed when this choice is selected.
    pub sub_labels: Vec<Label>,
}

impl Choice {
    /// A choice that reveals nothing further.
    pub fn terminal(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sub_labels: Vec::new(),
        }
    }

    pub fn with_labels(name: impl Into<String>, sub_labels: Vec<Label>) -> Self {
        Self {
            name: name.into(),
            sub_labels,
        }
    }
}

/// The top-level labels, in declaration order. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    pub labels: Vec<Label>,
}

impl Schema {
    /// Every label in the tree, depth first in declaration order.
    pub fn all_labels(&self) -> Vec<&Label> {
        let mut out = Vec::new();
        for label in &self.labels {
            label.visit(&mut |l| out.push(l));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boolean_without_choices_gets_true_false() {
        let label = Label::new("occluded", LabelKind::Boolean, vec![]);

        let names: Vec<&str> = label.choices.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["true", "false"]);
        assert!(label.choices.iter().all(|c| c.sub_labels.is_empty()));
    }

    #[test]
    fn boolean_keeps_explicit_choices() {
        let label = Label::new(
            "visible",
            LabelKind::Boolean,
            vec![Choice::terminal("yes"), Choice::terminal("no")],
        );
        assert_eq!(label.choices[0].name, "yes");
        assert_eq!(label.choices[1].name, "no");
    }

    #[test]
    fn kind_parses_known_names_only() {
        assert_eq!("categorical".parse::<LabelKind>(), Ok(LabelKind::Categorical));
        assert_eq!("boolean".parse::<LabelKind>(), Ok(LabelKind::Boolean));
        assert_eq!("leaf".parse::<LabelKind>(), Ok(LabelKind::Leaf));
        assert_eq!(
            "unsupported".parse::<LabelKind>(),
            Err("unsupported".to_string())
        );
    }

    #[test]
    fn empty_leaf_is_not_presented() {
        assert!(!Label::new("done", LabelKind::Leaf, vec![]).is_presented());
        assert!(
            Label::new("route", LabelKind::Leaf, vec![Choice::terminal("a")]).is_presented()
        );
        assert!(
            Label::new("size", LabelKind::Categorical, vec![Choice::terminal("s")])
                .is_presented()
        );
    }

    #[test]
    fn all_labels_walks_nested_choices() {
        let schema = Schema {
            labels: vec![
                Label::new(
                    "vehicle",
                    LabelKind::Categorical,
                    vec![
                        Choice::with_labels(
                            "car",
                            vec![Label::new("doors", LabelKind::Categorical, vec![
                                Choice::terminal("2"),
                                Choice::terminal("4"),
                            ])],
                        ),
                        Choice::terminal("bike"),
                    ],
                ),
                Label::new("night", LabelKind::Boolean, vec![]),
            ],
        };

        let names: Vec<&str> = schema.all_labels().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["vehicle", "doors", "night"]);
    }
}
