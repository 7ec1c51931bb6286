//! Prompt templates for summarization

use distill_common::{DistillError, Result};

/// Template shared by the per-chunk and the combine step
pub const SUMMARIZER_TEMPLATE: &str = r#"Shorten the text in the DOCUMENT so that it answers the INQUIRY as well as possible.

Guidelines:
- Keep only facts stated in the DOCUMENT. Do not speculate or add opinions.
- Keep names, numbers, dates, addresses and URLs exactly as written.
- Drop content that is irrelevant to the INQUIRY.
- If nothing in the DOCUMENT relates to the INQUIRY, summarize its main points briefly.
- Answer in plain prose without headings.

INQUIRY: {inquiry}

DOCUMENT:
---
{document}
---

SUMMARY:"#;

/// Slot names of [`SUMMARIZER_TEMPLATE`]
pub const DOCUMENT_SLOT: &str = "document";
pub const INQUIRY_SLOT: &str = "inquiry";

/// A prompt with named `{slot}` placeholders
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
    input_variables: Vec<String>,
}

impl PromptTemplate {
    /// Create a template, checking that every declared variable has a placeholder
    pub fn new<S: Into<String>>(
        template: impl Into<String>,
        input_variables: impl IntoIterator<Item = S>,
    ) -> Result<Self> {
        let template = template.into();
        let input_variables: Vec<String> =
            input_variables.into_iter().map(Into::into).collect();

        for var in &input_variables {
            if !template.contains(&format!("{{{}}}", var)) {
                return Err(DistillError::invalid_input(format!(
                    "Prompt template has no placeholder for '{}'",
                    var
                )));
            }
        }

        Ok(Self {
            template,
            input_variables,
        })
    }

    /// The built-in summarization template
    pub fn summarizer() -> Self {
        Self {
            template: SUMMARIZER_TEMPLATE.to_string(),
            input_variables: vec![DOCUMENT_SLOT.to_string(), INQUIRY_SLOT.to_string()],
        }
    }

    /// Declared variable names
    pub fn input_variables(&self) -> &[String] {
        &self.input_variables
    }

    /// Substitute placeholders in one pass
    ///
    /// Values are inserted verbatim and never re-scanned. Values for
    /// undeclared names are ignored.
    pub fn render(&self, values: &[(&str, &str)]) -> Result<String> {
        for var in &self.input_variables {
            if !values.iter().any(|(name, _)| name == var) {
                return Err(DistillError::invalid_input(format!(
                    "Missing value for prompt variable '{}'",
                    var
                )));
            }
        }

        let mut rendered = String::with_capacity(
            self.template.len() + values.iter().map(|(_, v)| v.len()).sum::<usize>(),
        );
        let mut rest = self.template.as_str();

        while let Some(open) = rest.find('{') {
            rendered.push_str(&rest[..open]);
            let after = &rest[open + 1..];

            let substituted = after.find('}').and_then(|close| {
                let name = &after[..close];
                self.lookup(name, values).map(|value| (value, close))
            });

            match substituted {
                Some((value, close)) => {
                    rendered.push_str(value);
                    rest = &after[close + 1..];
                }
                None => {
                    rendered.push('{');
                    rest = after;
                }
            }
        }
        rendered.push_str(rest);

        Ok(rendered)
    }

    fn lookup<'a>(&self, name: &str, values: &[(&str, &'a str)]) -> Option<&'a str> {
        if !self.input_variables.iter().any(|v| v == name) {
            return None;
        }
        values
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarizer_template_slots() {
        let template = PromptTemplate::summarizer();
        let prompt = template
            .render(&[("document", "Tokens unlock in May."), ("inquiry", "When?")])
            .unwrap();
        assert!(prompt.contains("INQUIRY: When?"));
        assert!(prompt.contains("Tokens unlock in May."));
        assert!(!prompt.contains("{document}"));
    }

    #[test]
    fn test_missing_placeholder_rejected() {
        let err = PromptTemplate::new("Summarize: {document}", ["document", "inquiry"]).unwrap_err();
        assert!(matches!(err, DistillError::InvalidInput(_)));
    }

    #[test]
    fn test_missing_value_rejected() {
        let template = PromptTemplate::new("{document} / {inquiry}", ["document", "inquiry"]).unwrap();
        assert!(template.render(&[("document", "text")]).is_err());
    }

    #[test]
    fn test_values_not_rescanned() {
        let template = PromptTemplate::new("[{document}] ({inquiry})", ["document", "inquiry"]).unwrap();
        let prompt = template
            .render(&[("document", "literal {inquiry} here"), ("inquiry", "q")])
            .unwrap();
        assert_eq!(prompt, "[literal {inquiry} here] (q)");
    }

    #[test]
    fn test_unknown_braces_preserved() {
        let template = PromptTemplate::new("json: {\"a\": 1} {document}", ["document"]).unwrap();
        let prompt = template
            .render(&[("document", "body"), ("inquiry", "ignored")])
            .unwrap();
        assert_eq!(prompt, "json: {\"a\": 1} body");
    }
}
