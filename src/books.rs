//! The fixed 66-book canon and name resolution.

/// A book of the Bible with any abbreviations it is known by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Book {
    pub id: u8,
    pub name: &'static str,
    pub aliases: &'static [&'static str],
}

impl Book {
    const fn new(id: u8, name: &'static str, aliases: &'static [&'static str]) -> Book {
        Book { id, name, aliases }
    }

    /// Name used when a label spans several whole chapters ("Psalms 1-2").
    pub fn plural_name(&self) -> &'static str {
        match self.name {
            "Psalm" => "Psalms",
            name => name,
        }
    }

    fn is_match(&self, name: &str) -> bool {
        self.name.to_lowercase().starts_with(name)
            || self
                .aliases
                .iter()
                .any(|alt| alt.to_lowercase().starts_with(name))
    }
}

static BOOKS: [Book; 66] = [
    Book::new(1, "Genesis", &[]),
    Book::new(2, "Exodus", &[]),
    Book::new(3, "Leviticus", &[]),
    Book::new(4, "Numbers", &["Nmbs"]),
    Book::new(5, "Deuteronomy", &["Dt"]),
    Book::new(6, "Joshua", &[]),
    Book::new(7, "Judges", &["Jdgs"]),
    Book::new(8, "Ruth", &[]),
    Book::new(9, "I Samuel", &["1 Samuel"]),
    Book::new(10, "II Samuel", &["2 Samuel"]),
    Book::new(11, "I Kings", &["1 Kings"]),
    Book::new(12, "II Kings", &["2 Kings"]),
    Book::new(13, "I Chronicles", &["1 Chronicles"]),
    Book::new(14, "II Chronicles", &["2 Chronicles"]),
    Book::new(15, "Ezra", &[]),
    Book::new(16, "Nehemiah", &[]),
    Book::new(17, "Esther", &[]),
    Book::new(18, "Job", &[]),
    Book::new(19, "Psalm", &[]),
    Book::new(20, "Proverbs", &["Prvb"]),
    Book::new(21, "Ecclesiastes", &[]),
    Book::new(22, "Song of Solomon", &["SS", "SoS"]),
    Book::new(23, "Isaiah", &[]),
    Book::new(24, "Jeremiah", &[]),
    Book::new(25, "Lamentations", &[]),
    Book::new(26, "Ezekiel", &["Ezk"]),
    Book::new(27, "Daniel", &[]),
    Book::new(28, "Hosea", &[]),
    Book::new(29, "Joel", &[]),
    Book::new(30, "Amos", &[]),
    Book::new(31, "Obadiah", &[]),
    Book::new(32, "Jonah", &[]),
    Book::new(33, "Micah", &[]),
    Book::new(34, "Nahum", &[]),
    Book::new(35, "Habakkuk", &[]),
    Book::new(36, "Zephaniah", &[]),
    Book::new(37, "Haggai", &[]),
    Book::new(38, "Zechariah", &[]),
    Book::new(39, "Malachi", &[]),
    Book::new(40, "Matthew", &["Mt"]),
    Book::new(41, "Mark", &["Mk"]),
    Book::new(42, "Luke", &["Lk"]),
    Book::new(43, "John", &["Jn"]),
    Book::new(44, "Acts", &[]),
    Book::new(45, "Romans", &[]),
    Book::new(46, "I Corinthians", &["1 Corinthians"]),
    Book::new(47, "II Corinthians", &["2 Corinthians"]),
    Book::new(48, "Galatians", &[]),
    Book::new(49, "Ephesians", &[]),
    Book::new(50, "Philippians", &["Php"]),
    Book::new(51, "Colossians", &[]),
    Book::new(52, "I Thessalonians", &["1 Thessalonians"]),
    Book::new(53, "II Thessalonians", &["2 Thessalonians"]),
    Book::new(54, "I Timothy", &["1 Timothy"]),
    Book::new(55, "II Timothy", &["2 Timothy"]),
    Book::new(56, "Titus", &[]),
    Book::new(57, "Philemon", &["Phl"]),
    Book::new(58, "Hebrews", &[]),
    Book::new(59, "James", &["Jms", "Jas"]),
    Book::new(60, "I Peter", &["I Pt", "1 Peter", "1 Pt"]),
    Book::new(61, "II Peter", &["II Pt", "2 Peter", "2 Pt"]),
    Book::new(62, "I John", &["I Jn", "1 John", "1 Jn"]),
    Book::new(63, "II John", &["II Jn", "2 John", "2 Jn"]),
    Book::new(64, "III John", &["III Jn", "3 John", "3 Jn"]),
    Book::new(65, "Jude", &[]),
    Book::new(66, "Revelation", &[]),
];

/// Read-only view over the canon, handed by reference to whatever resolves names.
#[derive(Debug, Clone, Copy)]
pub struct BookRegistry {
    books: &'static [Book],
}

impl Default for BookRegistry {
    fn default() -> Self {
        BookRegistry::canonical()
    }
}

impl BookRegistry {
    pub fn canonical() -> BookRegistry {
        BookRegistry { books: &BOOKS }
    }

    pub fn books(&self) -> &'static [Book] {
        self.books
    }

    /// Finds the book a (possibly abbreviated) name refers to.
    ///
    /// Periods are ignored, runs of whitespace count as one space and the
    /// comparison is case-insensitive. A full book name wins outright;
    /// otherwise the first book in canonical order whose name or one of
    /// whose aliases starts with the input is returned. Matching is by
    /// prefix only, so "Eph" is Ephesians and never Zephaniah.
    pub fn resolve(&self, name: &str) -> Option<&'static Book> {
        let name = normalize(name);
        let first = name.chars().next()?;

        if let Some(book) = self.books.iter().find(|book| book.name.to_lowercase() == name) {
            return Some(book);
        }

        self.books
            .iter()
            .filter(|book| {
                // Numbered books keep their digit forms in the aliases.
                !first.is_alphabetic()
                    || book.name.chars().next().map(|c| c.to_ascii_lowercase()) == Some(first)
            })
            .find(|book| book.is_match(&name))
    }
}

fn normalize(name: &str) -> String {
    name.replace('.', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_contiguous() {
        let registry = BookRegistry::canonical();
        for (index, book) in registry.books().iter().enumerate() {
            assert_eq!(book.id as usize, index + 1);
        }
        assert_eq!(registry.books().len(), 66);
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let registry = BookRegistry::canonical();
        for name in &["john", "John", "JOHN"] {
            assert_eq!(registry.resolve(name).map(|b| b.id), Some(43));
        }
    }

    #[test]
    fn test_resolve_aliases() {
        let registry = BookRegistry::canonical();
        assert_eq!(registry.resolve("Mt").map(|b| b.id), Some(40));
        assert_eq!(registry.resolve("1 Jn").map(|b| b.id), Some(62));
        assert_eq!(registry.resolve("Jn").map(|b| b.id), Some(43));
        assert_eq!(registry.resolve("2 Pt").map(|b| b.id), Some(61));
        assert_eq!(registry.resolve("SoS").map(|b| b.id), Some(22));
        assert_eq!(registry.resolve("Jas").map(|b| b.id), Some(59));
    }

    #[test]
    fn test_resolve_prefix_not_substring() {
        let registry = BookRegistry::canonical();
        assert_eq!(registry.resolve("Eph").map(|b| b.id), Some(49));
        assert_eq!(registry.resolve("Zeph").map(|b| b.id), Some(36));
    }

    #[test]
    fn test_resolve_normalizes_input() {
        let registry = BookRegistry::canonical();
        assert_eq!(registry.resolve("Gen.").map(|b| b.id), Some(1));
        assert_eq!(registry.resolve("Song  of   Sol").map(|b| b.id), Some(22));
        assert_eq!(registry.resolve(" 1  John ").map(|b| b.id), Some(62));
    }

    #[test]
    fn test_resolve_ties_follow_canonical_order() {
        let registry = BookRegistry::canonical();
        assert_eq!(registry.resolve("Jo").map(|b| b.id), Some(6));
        assert_eq!(registry.resolve("J").map(|b| b.id), Some(6));
    }

    #[test]
    fn test_exact_name_wins() {
        let registry = BookRegistry::canonical();
        assert_eq!(registry.resolve("Jude").map(|b| b.id), Some(65));
        assert_eq!(registry.resolve("II John").map(|b| b.id), Some(63));
    }

    #[test]
    fn test_resolve_unknown() {
        let registry = BookRegistry::canonical();
        assert!(registry.resolve("Xyz").is_none());
        assert!(registry.resolve("").is_none());
        assert!(registry.resolve("...").is_none());
    }

    #[test]
    fn test_plural_name() {
        let registry = BookRegistry::canonical();
        assert_eq!(registry.resolve("Ps").map(|b| b.plural_name()), Some("Psalms"));
        assert_eq!(registry.resolve("Gen").map(|b| b.plural_name()), Some("Genesis"));
    }
}
