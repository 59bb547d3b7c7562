//! Inline content: text runs and their marks

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Formatting mark applied to a text run
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Mark {
    Bold,
    Italic,
    Underline,
    Strike,
    Code,
    Link { href: String },
    Highlight {
        #[serde(default)]
        color: Option<String>,
    },
}

/// Inline node inside a text block
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Inline {
    Text {
        text: String,
        #[serde(default)]
        marks: SmallVec<[Mark; 2]>,
    },
    HardBreak,
}

impl Inline {
    /// Unmarked text run
    pub fn text(text: impl Into<String>) -> Self {
        Inline::Text {
            text: text.into(),
            marks: SmallVec::new(),
        }
    }

    /// Text run carrying the given marks
    pub fn marked(text: impl Into<String>, marks: impl IntoIterator<Item = Mark>) -> Self {
        Inline::Text {
            text: text.into(),
            marks: marks.into_iter().collect(),
        }
    }

    /// Split plain text into runs, turning `\n` into hard breaks
    pub fn plain_runs(text: &str) -> Vec<Inline> {
        let mut runs = Vec::new();
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                runs.push(Inline::HardBreak);
            }
            if !line.is_empty() {
                runs.push(Inline::text(line));
            }
        }
        runs
    }

    /// Plain text of the node
    pub fn plain_text(&self) -> &str {
        match self {
            Inline::Text { text, .. } => text,
            Inline::HardBreak => "\n",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_runs() {
        let runs = Inline::plain_runs("Sur ce,\nle tribunal");
        assert_eq!(
            runs,
            vec![
                Inline::text("Sur ce,"),
                Inline::HardBreak,
                Inline::text("le tribunal"),
            ]
        );
        assert!(Inline::plain_runs("").is_empty());
    }

    #[test]
    fn test_marked_run() {
        let run = Inline::marked("Attendu", [Mark::Bold, Mark::Italic]);
        match run {
            Inline::Text { marks, .. } => assert_eq!(marks.len(), 2),
            Inline::HardBreak => panic!("expected text"),
        }
    }
}
