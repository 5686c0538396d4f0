//! Where verse text comes from.
//!
//! | Type | When to use |
//! |------|-------------|
//! | [`MemoryVerseStore`] | Tests and small embedded texts |
//! | [`PostgresVerseStore`] | The `kjv` table of a PostgreSQL database |
//!
//! Stores never report errors to the renderer: a failed lookup is simply an
//! empty result, which the renderer turns into a bad reference.

use std::collections::BTreeMap;
use std::convert::TryFrom;
use std::ops::Bound::Included;

use postgres::Connection;

/// Verses fetched across one or more chapters, in chapter then verse order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChapterSpan {
    /// `(chapter, number of verses in that chapter)` for every chapter the
    /// span touches, counting the whole chapter even when the span only
    /// covers part of it.
    pub chapters: Vec<(u32, u32)>,
    pub texts: Vec<String>,
}

impl ChapterSpan {
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

pub trait VerseStore {
    fn verse(&self, book: u8, chapter: u32, verse: u32) -> Option<String>;

    /// Every verse of a chapter, in order.
    fn chapter(&self, book: u8, chapter: u32) -> Vec<String>;

    /// Every verse of `chapter..=chapter2`.
    fn chapter_range(&self, book: u8, chapter: u32, chapter2: u32) -> ChapterSpan;

    /// `chapter:verse` through `chapter2:verse2`, inclusive.
    fn cross_chapter_range(
        &self,
        book: u8,
        chapter: u32,
        verse: u32,
        chapter2: u32,
        verse2: u32,
    ) -> ChapterSpan;

    /// Texts aligned with `verses`; `None` where a verse does not exist.
    fn verses(&self, book: u8, chapter: u32, verses: &[u32]) -> Vec<Option<String>> {
        verses
            .iter()
            .map(|&verse| self.verse(book, chapter, verse))
            .collect()
    }
}

/// Verse texts held in a sorted map.
#[derive(Debug, Clone, Default)]
pub struct MemoryVerseStore {
    verses: BTreeMap<(u8, u32, u32), String>,
}

impl MemoryVerseStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, book: u8, chapter: u32, verse: u32, text: &str) {
        self.verses.insert((book, chapter, verse), text.to_string());
    }

    fn chapter_sizes(&self, book: u8, chapter: u32, chapter2: u32) -> Vec<(u32, u32)> {
        let mut sizes: Vec<(u32, u32)> = Vec::new();
        let range = (Included((book, chapter, 0)), Included((book, chapter2, u32::MAX)));
        for &(_, ch, _) in self.verses.range(range).map(|(key, _)| key) {
            if let Some(last) = sizes.last_mut() {
                if last.0 == ch {
                    last.1 += 1;
                    continue;
                }
            }
            sizes.push((ch, 1));
        }
        sizes
    }

    fn texts(&self, from: (u8, u32, u32), to: (u8, u32, u32)) -> Vec<String> {
        if from > to {
            return Vec::new();
        }
        self.verses
            .range((Included(from), Included(to)))
            .map(|(_, text)| text.clone())
            .collect()
    }
}

impl VerseStore for MemoryVerseStore {
    fn verse(&self, book: u8, chapter: u32, verse: u32) -> Option<String> {
        self.verses.get(&(book, chapter, verse)).cloned()
    }

    fn chapter(&self, book: u8, chapter: u32) -> Vec<String> {
        self.texts((book, chapter, 0), (book, chapter, u32::MAX))
    }

    fn chapter_range(&self, book: u8, chapter: u32, chapter2: u32) -> ChapterSpan {
        if chapter > chapter2 {
            return ChapterSpan::default();
        }
        ChapterSpan {
            chapters: self.chapter_sizes(book, chapter, chapter2),
            texts: self.texts((book, chapter, 0), (book, chapter2, u32::MAX)),
        }
    }

    fn cross_chapter_range(
        &self,
        book: u8,
        chapter: u32,
        verse: u32,
        chapter2: u32,
        verse2: u32,
    ) -> ChapterSpan {
        if (chapter, verse) > (chapter2, verse2) {
            return ChapterSpan::default();
        }
        ChapterSpan {
            chapters: self.chapter_sizes(book, chapter, chapter2),
            texts: self.texts((book, chapter, verse), (book, chapter2, verse2)),
        }
    }
}

/// Verse store over the `kjv` table:
///
/// ```sql
/// CREATE TABLE kjv (book_id SMALLINT, chapter SMALLINT, verse SMALLINT, text TEXT);
/// CREATE TABLE kjv_daily (month SMALLINT, day SMALLINT, verses TEXT);
/// ```
pub struct PostgresVerseStore {
    db: Connection,
}

impl PostgresVerseStore {
    pub fn new(db: Connection) -> Self {
        PostgresVerseStore { db }
    }

    /// Citation lists scheduled for a calendar day.
    pub fn daily_citations(&self, month: u32, day: u32) -> Vec<String> {
        let (month, day) = match (small(month), small(day)) {
            (Some(month), Some(day)) => (month, day),
            _ => return Vec::new(),
        };
        self.strings(
            "SELECT verses FROM kjv_daily WHERE month = $1 AND day = $2",
            &[&month, &day],
        )
    }

    fn strings(&self, query: &str, params: &[&dyn postgres::types::ToSql]) -> Vec<String> {
        match self.db.query(query, params) {
            Ok(rows) => rows.iter().map(|row| row.get(0)).collect(),
            Err(error) => {
                warn!("verse store query failed: {}", error);
                Vec::new()
            }
        }
    }

    fn chapter_sizes(&self, book: i16, chapter: i16, chapter2: i16) -> Vec<(u32, u32)> {
        let rows = self.db.query(
            "SELECT chapter, COUNT(*)
             FROM kjv
             WHERE book_id = $1 AND chapter BETWEEN $2 AND $3
             GROUP BY chapter
             ORDER BY chapter",
            &[&book, &chapter, &chapter2],
        );
        match rows {
            Ok(rows) => rows
                .iter()
                .map(|row| {
                    let chapter: i16 = row.get(0);
                    let count: i64 = row.get(1);
                    (chapter as u32, count as u32)
                })
                .collect(),
            Err(error) => {
                warn!("verse store query failed: {}", error);
                Vec::new()
            }
        }
    }
}

impl VerseStore for PostgresVerseStore {
    fn verse(&self, book: u8, chapter: u32, verse: u32) -> Option<String> {
        self.strings(
            "SELECT text FROM kjv WHERE book_id = $1 AND chapter = $2 AND verse = $3",
            &[&i16::from(book), &small(chapter)?, &small(verse)?],
        )
        .into_iter()
        .next()
    }

    fn chapter(&self, book: u8, chapter: u32) -> Vec<String> {
        let chapter = match small(chapter) {
            Some(chapter) => chapter,
            None => return Vec::new(),
        };
        self.strings(
            "SELECT text FROM kjv WHERE book_id = $1 AND chapter = $2 ORDER BY verse",
            &[&i16::from(book), &chapter],
        )
    }

    fn chapter_range(&self, book: u8, chapter: u32, chapter2: u32) -> ChapterSpan {
        let (chapter, chapter2) = match (small(chapter), small(chapter2)) {
            (Some(chapter), Some(chapter2)) => (chapter, chapter2),
            _ => return ChapterSpan::default(),
        };
        let book = i16::from(book);
        let texts = self.strings(
            "SELECT text
             FROM kjv
             WHERE book_id = $1 AND chapter BETWEEN $2 AND $3
             ORDER BY chapter, verse",
            &[&book, &chapter, &chapter2],
        );
        ChapterSpan {
            chapters: self.chapter_sizes(book, chapter, chapter2),
            texts,
        }
    }

    fn cross_chapter_range(
        &self,
        book: u8,
        chapter: u32,
        verse: u32,
        chapter2: u32,
        verse2: u32,
    ) -> ChapterSpan {
        let bounds = small(chapter)
            .and_then(|c| Some((c, small(verse)?, small(chapter2)?, small(verse2)?)));
        let (chapter, verse, chapter2, verse2) = match bounds {
            Some(bounds) => bounds,
            None => return ChapterSpan::default(),
        };
        let book = i16::from(book);
        let texts = self.strings(
            "SELECT text
             FROM kjv
             WHERE book_id = $1
               AND (chapter, verse) >= ($2::SMALLINT, $3::SMALLINT)
               AND (chapter, verse) <= ($4::SMALLINT, $5::SMALLINT)
             ORDER BY chapter, verse",
            &[&book, &chapter, &verse, &chapter2, &verse2],
        );
        ChapterSpan {
            chapters: self.chapter_sizes(book, chapter, chapter2),
            texts,
        }
    }

    fn verses(&self, book: u8, chapter: u32, verses: &[u32]) -> Vec<Option<String>> {
        let chapter = match small(chapter) {
            Some(chapter) => chapter,
            None => return vec![None; verses.len()],
        };
        // Verses no row can hold are left out and come back as `None`.
        let wanted = verses.iter().filter_map(|&v| small(v)).collect::<Vec<i16>>();
        let rows = self.db.query(
            "SELECT verse, text
             FROM kjv
             WHERE book_id = $1 AND chapter = $2 AND verse = ANY($3)",
            &[&i16::from(book), &chapter, &wanted],
        );
        let found = match rows {
            Ok(rows) => rows
                .iter()
                .map(|row| {
                    let verse: i16 = row.get(0);
                    let text: String = row.get(1);
                    (verse as u32, text)
                })
                .collect::<BTreeMap<u32, String>>(),
            Err(error) => {
                warn!("verse store query failed: {}", error);
                BTreeMap::new()
            }
        };
        verses.iter().map(|verse| found.get(verse).cloned()).collect()
    }
}

/// Column value for a chapter or verse number; `None` when no SMALLINT row
/// could hold it, in which case nothing is queried.
fn small(n: u32) -> Option<i16> {
    i16::try_from(n).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryVerseStore {
        let mut store = MemoryVerseStore::new();
        for verse in 1..=3 {
            store.insert(1, 1, verse, &format!("1:{}", verse));
        }
        for verse in 1..=2 {
            store.insert(1, 2, verse, &format!("2:{}", verse));
        }
        store.insert(2, 1, 1, "Exodus 1:1");
        store
    }

    #[test]
    fn test_chapter_is_ordered_and_scoped_to_book() {
        assert_eq!(store().chapter(1, 1), vec!["1:1", "1:2", "1:3"]);
        assert_eq!(store().chapter(2, 1), vec!["Exodus 1:1"]);
        assert!(store().chapter(1, 9).is_empty());
    }

    #[test]
    fn test_chapter_range_reports_sizes() {
        let span = store().chapter_range(1, 1, 2);
        assert_eq!(span.chapters, vec![(1, 3), (2, 2)]);
        assert_eq!(span.texts.len(), 5);
        assert!(store().chapter_range(1, 2, 1).is_empty());
    }

    #[test]
    fn test_cross_chapter_range_counts_whole_chapters() {
        let span = store().cross_chapter_range(1, 1, 2, 2, 1);
        assert_eq!(span.chapters, vec![(1, 3), (2, 2)]);
        assert_eq!(span.texts, vec!["1:2", "1:3", "2:1"]);
        assert!(store().cross_chapter_range(1, 2, 1, 1, 2).is_empty());
    }

    #[test]
    fn test_verses_align_with_request() {
        let texts = store().verses(1, 1, &[3, 9, 1]);
        assert_eq!(
            texts,
            vec![Some("1:3".to_string()), None, Some("1:1".to_string())]
        );
    }

    #[test]
    fn test_small_rejects_out_of_range_numbers() {
        assert_eq!(small(1), Some(1));
        assert_eq!(small(32767), Some(32767));
        assert_eq!(small(32768), None);
        assert_eq!(small(40000), None);
        assert_eq!(small(u32::MAX), None);
    }

    #[test]
    #[ignore]
    fn test_postgres_out_of_range_numbers_find_nothing() {
        use postgres::TlsMode;

        let url = std::env::var("DATABASE_URL").unwrap_or(String::from(crate::config::DEFAULT_URL));
        let db = Connection::connect(url, TlsMode::None).unwrap();
        let store = PostgresVerseStore::new(db);
        assert!(store.chapter_range(1, 40000, 2).is_empty());
        assert!(store.cross_chapter_range(1, 1, 1, 1, 40000).is_empty());
        assert_eq!(store.verses(1, 1, &[1, 40000]).len(), 2);
        assert_eq!(store.verses(1, 1, &[1, 40000])[1], None);
        assert_eq!(store.verses(1, 40000, &[1]), vec![None]);
    }

    #[test]
    #[ignore]
    fn test_postgres_chapter() {
        use postgres::TlsMode;

        let url = std::env::var("DATABASE_URL").unwrap_or(String::from(crate::config::DEFAULT_URL));
        let db = Connection::connect(url, TlsMode::None).unwrap();
        let store = PostgresVerseStore::new(db);
        assert!(!store.chapter(1, 1).is_empty());
    }
}
