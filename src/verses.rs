//! Verse list syntax: "1,3-5,7" and back again.

/// Largest chapter or verse number accepted. Psalm 119 has 176 verses.
pub const MAX_NUMBER: u32 = 999;

/// Expands a comma separated list of verses and inclusive ranges.
///
/// Numbers come back in the order they were written; sorting is left to
/// whoever displays them. Returns `None` when any piece is not a number or a
/// `low-high` pair with `low <= high`, or when a number exceeds [`MAX_NUMBER`].
pub fn expand(verses: &str) -> Option<Vec<u32>> {
    let mut list = Vec::new();
    for piece in verses.split(',') {
        if is_number(piece) {
            list.push(parse_number(piece)?);
            continue;
        }

        let bounds = piece.split('-').collect::<Vec<_>>();
        if bounds.len() != 2 {
            return None;
        }
        let low = parse_number(bounds[0])?;
        let high = parse_number(bounds[1])?;
        if low > high {
            return None;
        }
        list.extend(low..=high);
    }
    Some(list)
}

/// Collapses a sorted list of verses into "1, 3-5, 7".
pub fn pretty(verses: &[u32]) -> String {
    let mut runs: Vec<String> = Vec::new();
    let mut index = 0;
    while index < verses.len() {
        let start = verses[index];
        while index + 1 < verses.len() && verses[index + 1] == verses[index] + 1 {
            index += 1;
        }
        let end = verses[index];
        if start == end {
            runs.push(start.to_string());
        } else {
            runs.push(format!("{}-{}", start, end));
        }
        index += 1;
    }
    runs.join(", ")
}

/// Non-empty and ASCII digits only.
pub(crate) fn is_number(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// A chapter or verse number no larger than [`MAX_NUMBER`].
pub(crate) fn parse_number(s: &str) -> Option<u32> {
    if !is_number(s) {
        return None;
    }
    s.parse().ok().filter(|&n| n <= MAX_NUMBER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_expand_mixed_list() {
        assert_eq!(expand("1,3-5,7"), Some(vec![1, 3, 4, 5, 7]));
        assert_eq!(expand("7,3-5,1"), Some(vec![7, 3, 4, 5, 1]));
        assert_eq!(expand("16"), Some(vec![16]));
        assert_eq!(expand("4-4"), Some(vec![4]));
    }

    #[test]
    fn test_expand_rejects_garbage() {
        assert_eq!(expand(""), None);
        assert_eq!(expand("1,,2"), None);
        assert_eq!(expand("1-2-3"), None);
        assert_eq!(expand("a"), None);
        assert_eq!(expand("3-"), None);
        assert_eq!(expand("5-3"), None);
        assert_eq!(expand("99999999999"), None);
    }

    #[test]
    fn test_expand_rejects_numbers_beyond_any_chapter() {
        assert_eq!(expand("1-4294967295"), None);
        assert_eq!(expand("1-200000000"), None);
        assert_eq!(expand("1000"), None);
        assert_eq!(expand("1,1000-1001"), None);
        assert_eq!(expand("998-999").map(|v| v.len()), Some(2));
    }

    #[test]
    fn test_pretty() {
        assert_eq!(pretty(&[1, 3, 4, 5, 7]), "1, 3-5, 7");
        assert_eq!(pretty(&[16]), "16");
        assert_eq!(pretty(&[1, 2]), "1-2");
        assert_eq!(pretty(&[]), "");
    }

    proptest! {
        #[test]
        fn expanded_set_ignores_token_order(mut tokens in prop::collection::vec((1u32..60, 0u32..5), 1..6)) {
            let render = |tokens: &[(u32, u32)]| {
                tokens
                    .iter()
                    .map(|&(start, len)| if len == 0 {
                        start.to_string()
                    } else {
                        format!("{}-{}", start, start + len)
                    })
                    .collect::<Vec<_>>()
                    .join(",")
            };
            let mut forward = expand(&render(&tokens)).unwrap();
            tokens.reverse();
            let mut backward = expand(&render(&tokens)).unwrap();
            forward.sort();
            backward.sort();
            prop_assert_eq!(forward, backward);
        }

        #[test]
        fn pretty_round_trips_through_expand(verses in prop::collection::btree_set(1u32..200, 1..30)) {
            let sorted = verses.iter().cloned().collect::<Vec<_>>();
            let label = pretty(&sorted).replace(' ', "");
            prop_assert_eq!(expand(&label).unwrap(), sorted);
        }
    }
}
