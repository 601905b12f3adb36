/*!
 * Case-insensitive substring matching and substitution over vertex group names.
 *
 * Both operations compare `str::to_lowercase` of the name against `str::to_lowercase` of the
 * query, so a name is renamed by `substitute` exactly when `matches` accepts it. A match that
 * starts or ends inside the lowercase form of a single character (e.g. `İ` lowercases to two
 * characters) replaces that whole character.
 */

/// A name together with its lowercase form and the alignment between the two.
struct Folded<'a> {
    name: &'a str,
    text: String,
    /// Byte offsets `(in name, in text)` where each character of `name` starts, followed by
    /// `(name.len(), text.len())`.
    bounds: Vec<(usize, usize)>,
}

impl<'a> Folded<'a> {
    fn new(name: &'a str) -> Self {
        let text = name.to_lowercase();
        let mut bounds = Vec::with_capacity(name.len() + 1);
        let mut lower = text.chars();
        let mut offset = 0;
        for (i, c) in name.char_indices() {
            bounds.push((i, offset));
            // Context-dependent mappings (final sigma) still produce one char per char.
            offset += lower
                .by_ref()
                .take(c.to_lowercase().count())
                .map(char::len_utf8)
                .sum::<usize>();
        }
        bounds.push((name.len(), text.len()));
        Folded { name, text, bounds }
    }

    /// First occurrence of `needle` in the lowercase text at or after character `from`.
    ///
    /// Returns the range of characters of `name` covered by the occurrence.
    fn find(&self, from: usize, needle: &str) -> Option<(usize, usize)> {
        let offset = self.bounds[from].1;
        let start = offset + self.text[offset..].find(needle)?;
        let end = start + needle.len();
        let first = self.bounds.partition_point(|&(_, f)| f <= start) - 1;
        let last = self.bounds.partition_point(|&(_, f)| f < end);
        Some((first, last))
    }
}

/// Returns true iff `query` is non-empty and its lowercase form occurs in the lowercase form of
/// `name`.
///
/// # Examples
/// ```
/// use vgroupx::algo::matches;
/// assert!(matches("head_detail", "HEAD"));
/// assert!(!matches("Torso", "head"));
/// assert!(!matches("Torso", ""));
/// ```
pub fn matches(name: &str, query: &str) -> bool {
    !query.is_empty() && name.to_lowercase().contains(&query.to_lowercase())
}

/// Replace every case-insensitive occurrence of `query` in `name` with `replacement`.
///
/// Occurrences are found left to right and do not overlap. Characters outside a match keep
/// their case. An empty `query` leaves `name` untouched, and an empty `replacement` deletes
/// the occurrences.
///
/// # Examples
/// ```
/// use vgroupx::algo::substitute;
/// assert_eq!(substitute("Head_HEAD", "head", "skull"), "skull_skull");
/// assert_eq!(substitute("aaa", "aa", "b"), "ba");
/// assert_eq!(substitute("Torso", "head", "skull"), "Torso");
/// ```
pub fn substitute(name: &str, query: &str, replacement: &str) -> String {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return name.to_string();
    }

    let folded = Folded::new(name);
    let mut out = String::with_capacity(name.len());
    let mut cursor = 0;
    while let Some((first, last)) = folded.find(cursor, &needle) {
        out.push_str(&folded.name[folded.bounds[cursor].0..folded.bounds[first].0]);
        out.push_str(replacement);
        cursor = last;
    }
    out.push_str(&folded.name[folded.bounds[cursor].0..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_query_matches_nothing() {
        assert!(!matches("Head", ""));
        assert!(!matches("", ""));
        assert_eq!(substitute("Head", "", "x"), "Head");
    }

    #[test]
    fn substitution_preserves_unmatched_case() {
        assert_eq!(substitute("Left_HeadBone", "head", "Skull"), "Left_SkullBone");
        assert_eq!(substitute("HEAD.L", "Head", "skull"), "skull.L");
    }

    #[test]
    fn empty_replacement_deletes() {
        assert_eq!(substitute("DEF-spine.001", "def-", ""), "spine.001");
    }

    #[test]
    fn occurrences_are_replaced_left_to_right_without_overlap() {
        assert_eq!(substitute("aaaa", "aa", "b"), "bb");
        assert_eq!(substitute("aaaaa", "AA", "b"), "bba");
        assert_eq!(substitute("abab", "bab", "x"), "ax");
    }

    #[test]
    fn non_ascii_names() {
        assert!(matches("Ärmel_links", "ärmel"));
        assert_eq!(substitute("ÄRMEL_links", "ärmel", "Arm"), "Arm_links");
    }

    #[test]
    fn final_sigma_follows_str_lowercase() {
        assert!(matches("ΟΔΟΣ", "οδος"));
        assert_eq!(substitute("ΟΔΟΣ_2", "οδος", "road"), "road_2");
        assert_eq!(substitute("ΟΔΟΣ", "ΟΔΟΣ", "x"), "x");
    }

    #[test]
    fn partial_lowercase_of_a_char_replaces_the_char() {
        // `İ` lowercases to `i` followed by a combining dot.
        assert!(matches("İris", "i"));
        assert_eq!(substitute("İris", "i", "X"), "XrXs");
        assert_eq!(substitute("İ", "i", "X"), "X");
    }

    proptest! {
        #[test]
        fn matches_is_lowercase_containment(name in "[a-zA-Z_. 0-9İΣσςßẞ]{0,12}", query in "[a-zA-Z_İΣσςß]{1,3}") {
            prop_assert_eq!(
                matches(&name, &query),
                name.to_lowercase().contains(&query.to_lowercase())
            );
        }

        #[test]
        fn substitute_is_identity_without_match(name in "[a-zA-Z_. 0-9İΣσς]{0,12}", query in "[a-zA-Z_İσß]{1,3}", repl in "[a-z]{0,4}") {
            prop_assume!(!matches(&name, &query));
            prop_assert_eq!(substitute(&name, &query, &repl), name);
        }

        #[test]
        fn substitute_changes_name_iff_it_matches(name in "[a-zA-Z_. İΣσςß]{0,12}", query in "[a-zA-Zİσß]{1,3}") {
            prop_assert_eq!(substitute(&name, &query, "#") != name, matches(&name, &query));
        }

        #[test]
        fn substitute_removes_every_occurrence(name in "[a-cA-C_]{0,12}", query in "[a-c]{1,2}") {
            let out = substitute(&name, &query, "_");
            prop_assert!(!matches(&out, &query));
        }
    }
}
