//! Output templates with `$name` placeholders.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::ServiceError;

const PASSAGE: &str = "$prefix<span class=\"bible-ref\">$reference<span class=\"bible-passage\">\
<span class=\"bible-passage-title\">$reference</span>\n$verses</span></span>$postfix";
const VERSE: &str = "<sup>$verseNum</sup> $verseText<br>";
const CHAPTER: &str = "<hr class=\"bible-chapter\" data-chapter=\"$chapter\">";
const BAD_REFERENCE: &str = "$prefix<span class=\"bible-bad-ref\">$badRef</span>$postfix";
const COUNT: &str = "<span class=\"bible-ref-count\">$count $noun</span>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Templates {
    pub passage: String,
    pub verse: String,
    pub chapter: String,
    pub bad_reference: String,
    pub count: String,
}

impl Default for Templates {
    fn default() -> Self {
        Templates {
            passage: PASSAGE.to_string(),
            verse: VERSE.to_string(),
            chapter: CHAPTER.to_string(),
            bad_reference: BAD_REFERENCE.to_string(),
            count: COUNT.to_string(),
        }
    }
}

impl Templates {
    /// Reads `passage.tmpl`, `verse.tmpl`, `chapter.tmpl`, `badRef.tmpl` and
    /// `count.tmpl` from `dir`, keeping the built-in template for any file
    /// that does not exist.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Templates, ServiceError> {
        let dir = dir.as_ref();
        let read = |name: &'static str, default: &str| -> Result<String, ServiceError> {
            match fs::read_to_string(dir.join(name)) {
                Ok(text) => Ok(text.trim_end_matches('\n').to_string()),
                Err(ref error) if error.kind() == io::ErrorKind::NotFound => {
                    Ok(default.to_string())
                }
                Err(source) => Err(ServiceError::Template { name, source }),
            }
        };

        Ok(Templates {
            passage: read("passage.tmpl", PASSAGE)?,
            verse: read("verse.tmpl", VERSE)?,
            chapter: read("chapter.tmpl", CHAPTER)?,
            bad_reference: read("badRef.tmpl", BAD_REFERENCE)?,
            count: read("count.tmpl", COUNT)?,
        })
    }

    pub fn passage(&self, reference: &str, verses: &str, prefix: &str, postfix: &str) -> String {
        let reference = escape_html(reference);
        fill(
            &self.passage,
            &[
                ("prefix", prefix),
                ("reference", reference.as_str()),
                ("verses", verses),
                ("postfix", postfix),
            ],
        )
    }

    pub fn verse(&self, number: u32, text: &str) -> String {
        let number = number.to_string();
        fill(
            &self.verse,
            &[("verseNum", number.as_str()), ("verseText", text)],
        )
    }

    pub fn chapter(&self, chapter: u32) -> String {
        let chapter = chapter.to_string();
        fill(&self.chapter, &[("chapter", chapter.as_str())])
    }

    /// `raw` is whatever the caller typed, so it is escaped before it lands
    /// in the markup.
    pub fn bad_reference(&self, raw: &str, prefix: &str, postfix: &str) -> String {
        let raw = escape_html(raw);
        fill(
            &self.bad_reference,
            &[("prefix", prefix), ("badRef", raw.as_str()), ("postfix", postfix)],
        )
    }

    pub fn count(&self, count: usize) -> String {
        let noun = if count == 1 { "Reference" } else { "References" };
        let count = count.to_string();
        fill(&self.count, &[("count", count.as_str()), ("noun", noun)])
    }
}

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Replaces `$name` placeholders in a single pass. Unknown names are left as
/// they are and substituted values are never scanned again.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(dollar) = rest.find('$') {
        out.push_str(&rest[..dollar]);
        let after = &rest[dollar + 1..];
        let len = after
            .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
            .unwrap_or_else(|| after.len());
        let name = &after[..len];
        match values.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(value),
            None => {
                out.push('$');
                out.push_str(name);
            }
        }
        rest = &after[len..];
    }
    out.push_str(rest);
    out
}
