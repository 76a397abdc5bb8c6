//! crates/tutor_core/src/prompt.rs
//!
//! A small prompt builder: fixed instruction sections with `{name}` placeholders,
//! sections included only when an optional field is present, and inline media.

use std::fmt;

/// One part of a rendered prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptPart {
    Text(String),
    /// A media reference, usually a `data:` URI.
    Media {
        url: String,
        content_type: Option<String>,
    },
}

/// A finalized prompt: plain text, or text interleaved with media.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prompt {
    parts: Vec<PromptPart>,
}

impl Prompt {
    pub fn parts(&self) -> &[PromptPart] {
        &self.parts
    }

    /// All text parts joined by newlines, media omitted.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                PromptPart::Text(text) => Some(text.as_str()),
                PromptPart::Media { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn has_media(&self) -> bool {
        self.parts
            .iter()
            .any(|part| matches!(part, PromptPart::Media { .. }))
    }
}

enum Block<'a> {
    Section(&'a str),
    Media {
        url: String,
        content_type: Option<String>,
    },
}

/// Composes a [`Prompt`] from sections. Placeholders are resolved at `build`,
/// so variables may be bound before or after the sections that use them.
pub struct PromptBuilder<'a> {
    blocks: Vec<Block<'a>>,
    vars: Vec<(&'static str, String)>,
}

impl<'a> PromptBuilder<'a> {
    pub fn new(instructions: &'a str) -> Self {
        Self {
            blocks: vec![Block::Section(instructions)],
            vars: Vec::new(),
        }
    }

    /// Binds `{name}` to a value.
    pub fn var(mut self, name: &'static str, value: impl fmt::Display) -> Self {
        self.vars.push((name, value.to_string()));
        self
    }

    /// Appends a section that is always included.
    pub fn section(mut self, template: &'a str) -> Self {
        self.blocks.push(Block::Section(template));
        self
    }

    /// Appends a section only when `value` is present, binding it to `{name}`.
    pub fn section_if(mut self, name: &'static str, value: Option<&str>, template: &'a str) -> Self {
        if let Some(value) = value {
            self.vars.push((name, value.to_string()));
            self.blocks.push(Block::Section(template));
        }
        self
    }

    /// Appends a media reference after the text accumulated so far.
    pub fn media(mut self, url: impl Into<String>, content_type: Option<&str>) -> Self {
        self.blocks.push(Block::Media {
            url: url.into(),
            content_type: content_type.map(str::to_string),
        });
        self
    }

    pub fn build(self) -> Prompt {
        let mut parts = Vec::new();
        let mut text: Vec<String> = Vec::new();

        for block in self.blocks {
            match block {
                Block::Section(template) => text.push(fill(template, &self.vars)),
                Block::Media { url, content_type } => {
                    if !text.is_empty() {
                        parts.push(PromptPart::Text(text.join("\n")));
                        text.clear();
                    }
                    parts.push(PromptPart::Media { url, content_type });
                }
            }
        }
        if !text.is_empty() {
            parts.push(PromptPart::Text(text.join("\n")));
        }

        Prompt { parts }
    }
}

/// Replaces `{name}` placeholders in a single left-to-right pass. Substituted
/// values are never rescanned, and unknown placeholders are left as written.
pub fn fill(template: &str, vars: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replaced = after.find('}').and_then(|close| {
            let name = &after[..close];
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (value, close))
        });
        match replaced {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_substitutes_known_placeholders() {
        let vars = vec![("grade", "5".to_string()), ("name", "Ravi".to_string())];
        assert_eq!(fill("Grade {grade} for {name}", &vars), "Grade 5 for Ravi");
    }

    #[test]
    fn test_fill_keeps_unknown_placeholders_and_braces() {
        let vars = vec![("grade", "5".to_string())];
        assert_eq!(fill("{unknown} {grade} {", &vars), "{unknown} 5 {");
        assert_eq!(fill("json: {\"a\": 1}", &vars), "json: {\"a\": 1}");
    }

    #[test]
    fn test_fill_does_not_rescan_values() {
        let vars = vec![
            ("question", "what is {grade}?".to_string()),
            ("grade", "5".to_string()),
        ];
        assert_eq!(fill("{question} / {grade}", &vars), "what is {grade}? / 5");
    }

    #[test]
    fn test_conditional_section_is_omitted_when_absent() {
        let prompt = PromptBuilder::new("Intro")
            .var("grade", 3)
            .section("Grade: {grade}")
            .section_if("tone", None, "Tone: {tone}")
            .section("Answer:")
            .build();
        assert_eq!(prompt.text(), "Intro\nGrade: 3\nAnswer:");
    }

    #[test]
    fn test_conditional_section_is_included_when_present() {
        let prompt = PromptBuilder::new("Intro")
            .section_if("tone", Some("happy"), "Tone: {tone}")
            .build();
        assert_eq!(prompt.text(), "Intro\nTone: happy");
    }

    #[test]
    fn test_media_splits_text_parts_in_order() {
        let prompt = PromptBuilder::new("Convert the following audio to text:")
            .media("data:audio/wav;base64,AAAA", Some("audio/wav"))
            .build();
        assert!(prompt.has_media());
        assert_eq!(
            prompt.parts(),
            &[
                PromptPart::Text("Convert the following audio to text:".to_string()),
                PromptPart::Media {
                    url: "data:audio/wav;base64,AAAA".to_string(),
                    content_type: Some("audio/wav".to_string()),
                },
            ]
        );
    }
}
