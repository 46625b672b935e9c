//! Compiled narrative AST as delivered by the gateway.
//!
//! Only the shapes are modelled here; the compiler itself is external.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticSeverity {
    Suggestion,
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub range: TextRange,
    pub message: String,
    pub severity: DiagnosticSeverity,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum InlineKind {
    Bold { text: AstText },
    Italics { text: AstText },
    Underline { text: AstText },
    Code { text: AstText },
    Javascript { code: String },
    Divert { path: Vec<String> },
    TempDivert { path: Vec<String> },
    /// `<>` glue: renders nothing, joins the surrounding blocks.
    Join,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AstInline {
    #[serde(flatten)]
    pub kind: InlineKind,
    #[serde(default)]
    pub range: TextRange,
}

impl AstInline {
    pub fn new(kind: InlineKind) -> Self {
        Self {
            kind,
            range: TextRange::default(),
        }
    }

    pub fn visible_text(&self) -> String {
        match &self.kind {
            InlineKind::Bold { text }
            | InlineKind::Italics { text }
            | InlineKind::Underline { text }
            | InlineKind::Code { text } => text.visible_text(),
            InlineKind::Javascript { code } => format!("{{{}}}", code),
            InlineKind::Divert { .. } | InlineKind::TempDivert { .. } | InlineKind::Join => {
                String::new()
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextPart {
    #[serde(default)]
    pub before: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<AstInline>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AstText {
    #[serde(default)]
    pub parts: Vec<TextPart>,
    #[serde(default)]
    pub tail: String,
    #[serde(default)]
    pub range: TextRange,
}

impl AstText {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            parts: Vec::new(),
            tail: text.into(),
            range: TextRange::default(),
        }
    }

    pub fn visible_text(&self) -> String {
        let mut out = String::new();
        for part in &self.parts {
            out.push_str(&part.before);
            if let Some(inline) = &part.text {
                out.push_str(&inline.visible_text());
            }
        }
        out.push_str(&self.tail);
        out
    }

    /// True when the text has no visible glyphs and carries at least one
    /// join inline.
    pub fn is_join_marker(&self) -> bool {
        let mut saw_join = false;
        for part in &self.parts {
            if !part.before.trim().is_empty() {
                return false;
            }
            match part.text.as_ref().map(|t| &t.kind) {
                Some(InlineKind::Join) => saw_join = true,
                None => {}
                Some(_) => return false,
            }
        }
        saw_join && self.tail.trim().is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AstAttribute {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AstChoice {
    pub text: AstText,
    #[serde(default)]
    pub children: Vec<AstBlock>,
    #[serde(default)]
    pub range: TextRange,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchKind {
    If,
    Not,
    Default,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AstBlock {
    Paragraph {
        text: AstText,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        attributes: Vec<AstAttribute>,
    },
    CodeBlock {
        language: String,
        text: String,
        #[serde(default)]
        range: TextRange,
    },
    ChoiceGroup {
        choices: Vec<AstChoice>,
        #[serde(default)]
        range: TextRange,
    },
    Match {
        matched: String,
        #[serde(rename = "matchKind")]
        kind: MatchKind,
        choices: Vec<AstChoice>,
        #[serde(default)]
        range: TextRange,
    },
    Header {
        title: String,
        depth: u8,
        #[serde(default)]
        range: TextRange,
    },
}

impl AstBlock {
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::Paragraph {
            text: AstText::plain(text),
            attributes: Vec::new(),
        }
    }

    pub fn join() -> Self {
        Self::Paragraph {
            text: AstText {
                parts: vec![TextPart {
                    before: String::new(),
                    text: Some(AstInline::new(InlineKind::Join)),
                }],
                tail: String::new(),
                range: TextRange::default(),
            },
            attributes: Vec::new(),
        }
    }

    pub fn is_join_marker(&self) -> bool {
        matches!(self, Self::Paragraph { text, .. } if text.is_join_marker())
    }

    pub fn choices(&self) -> Option<&[AstChoice]> {
        match self {
            Self::ChoiceGroup { choices, .. } | Self::Match { choices, .. } => Some(choices),
            _ => None,
        }
    }

    /// What the preview shows for this block; `None` when nothing visible.
    pub fn display_text(&self) -> Option<String> {
        let text = match self {
            Self::Paragraph { text, .. } => text.visible_text(),
            Self::CodeBlock { text, .. } => text.clone(),
            Self::Header { title, .. } => title.clone(),
            Self::ChoiceGroup { choices, .. } | Self::Match { choices, .. } => choices
                .iter()
                .map(|c| c.text.visible_text())
                .collect::<Vec<_>>()
                .join(" / "),
        };
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Compiler output attached to a file's loaded content.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CompiledDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub blocks: Vec<AstBlock>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileContents {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiled_content: Option<CompiledDocument>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recompiled {
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiled_content: Option<CompiledDocument>,
}

#[cfg(test)]
#[path = "../../tests/unit/models/ast.rs"]
mod tests;
