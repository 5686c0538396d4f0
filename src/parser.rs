//! Citation grammar.
//!
//! A citation list is a `;` separated list of references, each one of:
//!
//! ```text
//! [Book] [Chapter]                            John 3
//! [Book] [Chapter]-[Chapter]                  Acts 2-4
//! [Book] [Chapter]:[Verses]                   Gen 1:1,3-5
//! [Book] [Chapter]:[Verse]-[Chapter]:[Verse]  Joshua 1:8-2:4
//! ```

use crate::books::{Book, BookRegistry};
use crate::error::{BadReference, ReferenceError};
use crate::verses::{self, parse_number};

/// Which of the four citation shapes a reference has.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceKind {
    SingleChapter { chapter: u32 },
    ChapterRange { chapter: u32, chapter2: u32 },
    /// Verses as written, expanded but not sorted.
    ChapterVerses { chapter: u32, verses: Vec<u32> },
    CrossChapterRange {
        chapter: u32,
        verse: u32,
        chapter2: u32,
        verse2: u32,
    },
}

/// A citation resolved to a book and classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub book: &'static Book,
    pub kind: ReferenceKind,
    pub raw: String,
}

impl Reference {
    pub fn chapter(&self) -> u32 {
        match self.kind {
            ReferenceKind::SingleChapter { chapter }
            | ReferenceKind::ChapterRange { chapter, .. }
            | ReferenceKind::ChapterVerses { chapter, .. }
            | ReferenceKind::CrossChapterRange { chapter, .. } => chapter,
        }
    }

    /// Last chapter, for chapter ranges and cross-chapter ranges only.
    pub fn chapter2(&self) -> Option<u32> {
        match self.kind {
            ReferenceKind::ChapterRange { chapter2, .. }
            | ReferenceKind::CrossChapterRange { chapter2, .. } => Some(chapter2),
            _ => None,
        }
    }

    /// Empty for whole chapters; `[start, end]` for a cross-chapter range.
    pub fn verses(&self) -> Vec<u32> {
        match &self.kind {
            ReferenceKind::ChapterVerses { verses, .. } => verses.clone(),
            ReferenceKind::CrossChapterRange { verse, verse2, .. } => vec![*verse, *verse2],
            _ => Vec::new(),
        }
    }
}

pub type ParseResult = Result<Reference, BadReference>;

/// Parses every segment of a citation list, in order. An empty segment, as
/// left by a trailing `;`, is a bad reference like any other.
pub fn parse(registry: &BookRegistry, citations: &str) -> Vec<ParseResult> {
    citations
        .split(';')
        .map(str::trim)
        .map(|segment| {
            let result = parse_reference(registry, segment);
            if let Err(bad) = &result {
                debug!("bad reference {}", bad);
            }
            result
        })
        .collect()
}

/// Parses one already trimmed reference.
pub fn parse_reference(registry: &BookRegistry, raw: &str) -> ParseResult {
    let bad = |error| BadReference::new(raw, error);

    if !raw.contains(' ') {
        return Err(bad(ReferenceError::MalformedSyntax("missing space")));
    }
    if raw.matches(':').count() > 2 {
        return Err(bad(ReferenceError::MalformedSyntax("too many colons")));
    }

    // The first character may be a digit itself, as in "2 John".
    let pos = raw
        .char_indices()
        .skip(1)
        .find(|(_, c)| c.is_ascii_digit())
        .map(|(pos, _)| pos)
        .ok_or_else(|| bad(ReferenceError::MalformedSyntax("no chapter")))?;

    let book_name = raw[..pos].trim();
    let numbers = raw[pos..]
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>();

    let fields = split_numbers(&numbers).map_err(bad)?;

    let book = registry
        .resolve(book_name)
        .ok_or_else(|| bad(ReferenceError::UnresolvedBook(book_name.to_string())))?;

    let kind = fields.classify().map_err(bad)?;

    Ok(Reference {
        book,
        kind,
        raw: raw.to_string(),
    })
}

/// The numeric tail split into its textual pieces, before validation.
struct Fields<'a> {
    chapter: &'a str,
    chapter2: Option<&'a str>,
    verses: Option<&'a str>,
    verse2: Option<&'a str>,
}

fn split_numbers(numbers: &str) -> Result<Fields, ReferenceError> {
    match numbers.matches(':').count() {
        0 => {
            let mut chapters = numbers.splitn(2, '-');
            Ok(Fields {
                chapter: chapters.next().unwrap_or(""),
                chapter2: chapters.next(),
                verses: None,
                verse2: None,
            })
        }
        1 => {
            let (chapter, verses) = split_once(numbers, ':')
                .ok_or(ReferenceError::MalformedSyntax("missing verse"))?;
            Ok(Fields {
                chapter,
                chapter2: None,
                verses: Some(verses),
                verse2: None,
            })
        }
        _ => {
            let (from, to) = split_once(numbers, '-')
                .ok_or(ReferenceError::MalformedSyntax("cross-chapter range without '-'"))?;
            let (chapter, verse) = split_once(from, ':')
                .ok_or(ReferenceError::MalformedSyntax("range start without ':'"))?;
            let (chapter2, verse2) = split_once(to, ':')
                .ok_or(ReferenceError::MalformedSyntax("range end without ':'"))?;
            Ok(Fields {
                chapter,
                chapter2: Some(chapter2),
                verses: Some(verse),
                verse2: Some(verse2),
            })
        }
    }
}

impl<'a> Fields<'a> {
    fn classify(&self) -> Result<ReferenceKind, ReferenceError> {
        let chapter = number(self.chapter)?;
        let chapter2 = match self.chapter2 {
            Some(field) => Some(number(field)?),
            None => None,
        };

        Ok(match (chapter2, self.verses, self.verse2) {
            (None, None, _) => ReferenceKind::SingleChapter { chapter },
            (Some(chapter2), None, _) => ReferenceKind::ChapterRange { chapter, chapter2 },
            (Some(chapter2), Some(verse), Some(verse2)) => ReferenceKind::CrossChapterRange {
                chapter,
                verse: number(verse)?,
                chapter2,
                verse2: number(verse2)?,
            },
            (_, Some(list), _) => ReferenceKind::ChapterVerses {
                chapter,
                verses: verses::expand(list)
                    .ok_or_else(|| ReferenceError::InvalidNumeric(list.to_string()))?,
            },
        })
    }
}

fn number(field: &str) -> Result<u32, ReferenceError> {
    parse_number(field).ok_or_else(|| ReferenceError::InvalidNumeric(field.to_string()))
}

fn split_once(s: &str, delimiter: char) -> Option<(&str, &str)> {
    let index = s.find(delimiter)?;
    Some((&s[..index], &s[index + delimiter.len_utf8()..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(raw: &str) -> ParseResult {
        parse_reference(&BookRegistry::canonical(), raw)
    }

    fn error_of(raw: &str) -> ReferenceError {
        parse_one(raw).unwrap_err().error
    }

    #[test]
    fn test_single_chapter() {
        let reference = parse_one("John 3").unwrap();
        assert_eq!(reference.book.id, 43);
        assert_eq!(reference.kind, ReferenceKind::SingleChapter { chapter: 3 });
        assert!(reference.verses().is_empty());
        assert_eq!(reference.chapter2(), None);
    }

    #[test]
    fn test_chapter_range() {
        let reference = parse_one("Gen 1-2").unwrap();
        assert_eq!(reference.book.id, 1);
        assert_eq!(
            reference.kind,
            ReferenceKind::ChapterRange {
                chapter: 1,
                chapter2: 2
            }
        );
        assert!(reference.verses().is_empty());
    }

    #[test]
    fn test_chapter_verses() {
        let reference = parse_one("Jn 3:16").unwrap();
        assert_eq!(reference.chapter(), 3);
        assert_eq!(reference.verses(), vec![16]);

        let reference = parse_one("Gen 1:7,1,3-5").unwrap();
        assert_eq!(reference.verses(), vec![7, 1, 3, 4, 5]);
    }

    #[test]
    fn test_cross_chapter_range() {
        let reference = parse_one("Joshua 1:8-2:4").unwrap();
        assert_eq!(reference.book.id, 6);
        assert_eq!(reference.chapter(), 1);
        assert_eq!(reference.chapter2(), Some(2));
        assert_eq!(reference.verses(), vec![8, 4]);
    }

    #[test]
    fn test_numbered_books_and_spacing() {
        let reference = parse_one("2 John 1").unwrap();
        assert_eq!(reference.book.id, 63);

        let reference = parse_one("1 Jn 1 : 5 - 7").unwrap();
        assert_eq!(reference.book.id, 62);
        assert_eq!(reference.verses(), vec![5, 6, 7]);

        let reference = parse_one("Gen. 1:1").unwrap();
        assert_eq!(reference.book.id, 1);
    }

    #[test]
    fn test_malformed_syntax() {
        assert_eq!(
            error_of("Gen1:1"),
            ReferenceError::MalformedSyntax("missing space")
        );
        assert_eq!(
            error_of("Gen 1:1:1:1"),
            ReferenceError::MalformedSyntax("too many colons")
        );
        assert_eq!(
            error_of("Song of Solomon"),
            ReferenceError::MalformedSyntax("no chapter")
        );
        assert!(matches!(
            error_of("Josh 1:8:2:4"),
            ReferenceError::MalformedSyntax(_)
        ));
    }

    #[test]
    fn test_unresolved_book() {
        assert_eq!(
            error_of("Xyz 1:1"),
            ReferenceError::UnresolvedBook("Xyz".to_string())
        );
    }

    #[test]
    fn test_invalid_numbers() {
        assert!(matches!(error_of("Gen 1a"), ReferenceError::InvalidNumeric(_)));
        assert!(matches!(error_of("Gen 1-b"), ReferenceError::InvalidNumeric(_)));
        assert!(matches!(error_of("Gen 1-2-3"), ReferenceError::InvalidNumeric(_)));
        assert!(matches!(error_of("Gen 1:x"), ReferenceError::InvalidNumeric(_)));
        assert!(matches!(error_of("Gen 1:3-"), ReferenceError::InvalidNumeric(_)));
        assert!(matches!(error_of("Gen 1:3-x:4"), ReferenceError::InvalidNumeric(_)));
        assert!(matches!(error_of("Gen 1:"), ReferenceError::InvalidNumeric(_)));
    }

    #[test]
    fn test_book_is_resolved_before_numbers_are_checked() {
        assert!(matches!(error_of("Xyz 1a"), ReferenceError::UnresolvedBook(_)));
    }

    #[test]
    fn test_parse_list_keeps_going_after_bad_reference() {
        let results = parse(&BookRegistry::canonical(), "Gen 1:1; Xyz 2;; John 3 ;");
        assert_eq!(results.len(), 5);
        assert!(results[0].is_ok());
        assert_eq!(results[1].as_ref().unwrap_err().raw, "Xyz 2");
        assert_eq!(results[3].as_ref().unwrap().raw, "John 3");
        for index in &[2, 4] {
            assert_eq!(
                results[*index],
                Err(BadReference::new(
                    "",
                    ReferenceError::MalformedSyntax("missing space")
                ))
            );
        }
    }

    #[test]
    fn test_trailing_semicolon_is_a_bad_reference() {
        let results = parse(&BookRegistry::canonical(), "Gen 1:1;");
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].as_ref().unwrap_err().raw, "");

        let results = parse(&BookRegistry::canonical(), "");
        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
    }

    #[test]
    fn test_numbers_beyond_any_chapter_are_invalid() {
        assert!(matches!(error_of("Gen 40000-2"), ReferenceError::InvalidNumeric(_)));
        assert!(matches!(error_of("Gen 70000:1-2:3"), ReferenceError::InvalidNumeric(_)));
        assert!(matches!(error_of("Gen 1:1-4294967295"), ReferenceError::InvalidNumeric(_)));
        assert!(matches!(error_of("Gen 1:2-1:1000"), ReferenceError::InvalidNumeric(_)));
        assert!(parse_one("Ps 119:176").is_ok());
    }
}
