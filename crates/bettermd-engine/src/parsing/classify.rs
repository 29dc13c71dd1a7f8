use crate::models::BlockKind;

/// The prefix rule that classified a line. Rules are tried in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// `# ` prefix.
    Heading1,
    /// `## ` prefix.
    Heading2,
    /// `### ` prefix.
    Heading3,
    /// Line both starts and ends with `**`; kept verbatim.
    BoldLine,
    /// `* ` or `- ` prefix.
    ListItem,
    /// Nothing matched.
    Fallback,
}

/// Classification of a single line containing only local facts.
///
/// Each line is classified independently, without reference to its neighbours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineClass<'a> {
    pub kind: BlockKind,
    pub rule: Rule,
    /// Text carried into the block's leaf, with any block prefix removed.
    pub text: &'a str,
}

/// Classifies individual lines by ordered prefix rules, first match wins.
pub struct MarkdownLineClassifier;

impl MarkdownLineClassifier {
    /// Classifies a line (without its line terminator) into a [`LineClass`].
    pub fn classify<'a>(&self, line: &'a str) -> LineClass<'a> {
        if let Some(rest) = line.strip_prefix("# ") {
            return LineClass {
                kind: BlockKind::Heading1,
                rule: Rule::Heading1,
                text: rest,
            };
        }
        if let Some(rest) = line.strip_prefix("## ") {
            return LineClass {
                kind: BlockKind::Heading2,
                rule: Rule::Heading2,
                text: rest,
            };
        }
        if let Some(rest) = line.strip_prefix("### ") {
            return LineClass {
                kind: BlockKind::Heading3,
                rule: Rule::Heading3,
                text: rest,
            };
        }
        if line.starts_with("**") && line.ends_with("**") {
            // Emphasis delimiters are not parsed; the line passes through whole.
            return LineClass {
                kind: BlockKind::Paragraph,
                rule: Rule::BoldLine,
                text: line,
            };
        }
        if let Some(rest) = line
            .strip_prefix("* ")
            .or_else(|| line.strip_prefix("- "))
        {
            return LineClass {
                kind: BlockKind::ListItem,
                rule: Rule::ListItem,
                text: rest,
            };
        }

        LineClass {
            kind: BlockKind::Paragraph,
            rule: Rule::Fallback,
            text: line,
        }
    }
}
