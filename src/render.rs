//! Turning parsed references into passages, and citation lists into output.

use crate::books::BookRegistry;
use crate::cache::{CacheKey, ResultCache};
use crate::error::{BadReference, ReferenceError};
use crate::parser::{self, Reference, ReferenceKind};
use crate::store::{ChapterSpan, VerseStore};
use crate::templates::Templates;
use crate::verses;

/// A reference with its text, ready to be wrapped in the passage template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPassage {
    pub label: String,
    pub body: String,
}

/// Formatting options of one `render_citations` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub show_count: bool,
    /// Placed before the first reference.
    pub prefix: String,
    /// Placed after the last reference.
    pub postfix: String,
    /// Placed after every reference but the last.
    pub separator: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            show_count: true,
            prefix: String::new(),
            postfix: String::new(),
            separator: String::new(),
        }
    }
}

pub type Entry = Result<RenderedPassage, BadReference>;

/// Renders a single reference against `store`.
///
/// Returns `None` when the store has nothing for it, or is missing any of
/// the verses asked for.
pub fn render(
    templates: &Templates,
    store: &dyn VerseStore,
    reference: &Reference,
) -> Option<RenderedPassage> {
    let book = reference.book;
    match &reference.kind {
        ReferenceKind::SingleChapter { chapter } => {
            let texts = store.chapter(book.id, *chapter);
            if texts.is_empty() {
                return None;
            }
            let lines = texts
                .iter()
                .zip(1..)
                .map(|(text, number)| templates.verse(number, text))
                .collect::<Vec<_>>();
            Some(RenderedPassage {
                label: format!("{} {}", book.name, chapter),
                body: lines.join("\n"),
            })
        }
        ReferenceKind::ChapterVerses { chapter, verses } => {
            let mut verses = verses.clone();
            verses.sort();
            verses.dedup();

            let mut lines = Vec::with_capacity(verses.len());
            for (number, text) in verses.iter().zip(store.verses(book.id, *chapter, &verses)) {
                match text {
                    Some(ref text) if !text.is_empty() => lines.push(templates.verse(*number, text)),
                    _ => return None,
                }
            }
            if lines.is_empty() {
                return None;
            }
            Some(RenderedPassage {
                label: format!("{} {}:{}", book.name, chapter, verses::pretty(&verses)),
                body: lines.join("\n"),
            })
        }
        ReferenceKind::ChapterRange { chapter, chapter2 } => {
            let span = store.chapter_range(book.id, *chapter, *chapter2);
            Some(RenderedPassage {
                label: format!("{} {}-{}", book.plural_name(), chapter, chapter2),
                body: span_body(templates, &span, 1)?,
            })
        }
        ReferenceKind::CrossChapterRange {
            chapter,
            verse,
            chapter2,
            verse2,
        } => {
            let span = store.cross_chapter_range(book.id, *chapter, *verse, *chapter2, *verse2);
            Some(RenderedPassage {
                label: format!("{} {}:{}-{}:{}", book.name, chapter, verse, chapter2, verse2),
                body: span_body(templates, &span, *verse)?,
            })
        }
    }
}

/// Lays out a span's verses, with a chapter marker wherever one chapter ends
/// and the next begins. `first_verse` is the number of the span's first verse.
fn span_body(templates: &Templates, span: &ChapterSpan, first_verse: u32) -> Option<String> {
    if span.is_empty() {
        return None;
    }

    let mut lines = Vec::with_capacity(span.texts.len() + span.chapters.len());
    let mut number = first_verse;
    let mut current = 0;
    for (index, text) in span.texts.iter().enumerate() {
        lines.push(templates.verse(number, text));
        number += 1;

        let last = index + 1 == span.texts.len();
        match span.chapters.get(current) {
            Some(&(_, size)) if number > size && !last => {
                current += 1;
                number = 1;
                if let Some(&(next, _)) = span.chapters.get(current) {
                    lines.push(templates.chapter(next));
                }
            }
            _ => {}
        }
    }
    Some(lines.join("\n"))
}

/// Parses and renders citation lists against a verse store.
pub struct Citations<'a> {
    registry: BookRegistry,
    templates: &'a Templates,
    store: &'a dyn VerseStore,
    cache: &'a dyn ResultCache,
}

impl<'a> Citations<'a> {
    pub fn new(
        templates: &'a Templates,
        store: &'a dyn VerseStore,
        cache: &'a dyn ResultCache,
    ) -> Citations<'a> {
        Citations {
            registry: BookRegistry::canonical(),
            templates,
            store,
            cache,
        }
    }

    /// Every reference of the list, rendered or bad, in input order.
    pub fn entries(&self, citations: &str) -> Vec<Entry> {
        parser::parse(&self.registry, citations)
            .into_iter()
            .map(|parsed| {
                let reference = parsed?;
                render(self.templates, self.store, &reference).ok_or_else(|| {
                    debug!("no text for {:?}", reference.raw);
                    BadReference::new(&reference.raw, ReferenceError::NotFoundInStore)
                })
            })
            .collect()
    }

    /// Renders a whole citation list: an optional count line followed by one
    /// line per reference.
    pub fn render_citations(&self, citations: &str, options: &RenderOptions) -> String {
        let key = CacheKey::new(citations, options);
        if let Some(output) = self.cache.get(&key) {
            debug!("cache hit {}", key.as_str());
            return output;
        }
        debug!("cache miss {}", key.as_str());

        let output = self.assemble(&self.entries(citations), options);
        self.cache.put(key, output.clone());
        output
    }

    fn assemble(&self, entries: &[Entry], options: &RenderOptions) -> String {
        let mut output = String::new();
        if options.show_count {
            output.push_str(&self.templates.count(entries.len()));
            output.push('\n');
        }

        for (index, entry) in entries.iter().enumerate() {
            let prefix = if index == 0 { options.prefix.as_str() } else { "" };
            let postfix = if index + 1 == entries.len() {
                options.postfix.as_str()
            } else {
                options.separator.as_str()
            };

            let line = match entry {
                Ok(passage) => self
                    .templates
                    .passage(&passage.label, &passage.body, prefix, postfix),
                Err(bad) => self.templates.bad_reference(&bad.raw, prefix, postfix),
            };
            output.push_str(&line);
            output.push('\n');
        }
        output
    }
}
