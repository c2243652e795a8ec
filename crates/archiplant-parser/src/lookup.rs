//! Name resolution helpers shared by normalization and validation.
//!
//! A [`Vocabulary`] maps free-form spellings to canonical values. Lookup is
//! tried twice: first as a case-insensitive exact match against a known
//! spelling, then against the folded form of the input (lowercase, with
//! `_`, `-` and whitespace removed). When both miss, the closest known
//! spelling by edit distance is offered as a suggestion.

/// Folds a name for lookup: lowercase, separators removed.
pub(crate) fn fold(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '_' | '-') && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Levenshtein distance between two strings, by `char`.
pub(crate) fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != *cb);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

/// Largest edit distance still worth suggesting for an input of this length.
fn suggestion_threshold(len: usize) -> usize {
    (len / 3).max(2)
}

/// Returns the candidate closest to `input`, if any is close enough.
///
/// Ties keep the earliest candidate.
pub(crate) fn closest<'a>(
    input: &str,
    candidates: impl IntoIterator<Item = &'a str>,
) -> Option<&'a str> {
    let folded = fold(input);
    let threshold = suggestion_threshold(folded.len());

    candidates
        .into_iter()
        .map(|candidate| (edit_distance(&folded, &fold(candidate)), candidate))
        .filter(|(distance, _)| *distance <= threshold)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| candidate)
}

/// A failed lookup, with the closest canonical spelling if one is near.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Unresolved {
    pub suggestion: Option<String>,
}

impl Unresolved {
    /// Formats the suggestion as diagnostic help text.
    pub fn help(&self) -> Option<String> {
        self.suggestion
            .as_ref()
            .map(|suggestion| format!("did you mean `{suggestion}`?"))
    }
}

/// A table of accepted spellings for one enumeration.
#[derive(Debug)]
pub(crate) struct Vocabulary<T: 'static> {
    /// `(spelling, folded spelling, value)`, canonical spellings first.
    entries: Vec<(String, String, T)>,
    display: fn(T) -> String,
}

impl<T: Copy + PartialEq + 'static> Vocabulary<T> {
    /// Creates an empty vocabulary. `display` renders a value's canonical
    /// spelling for suggestions.
    pub fn new(display: fn(T) -> String) -> Self {
        Self {
            entries: Vec::new(),
            display,
        }
    }

    /// Adds an accepted spelling.
    pub fn with(mut self, spelling: &str, value: T) -> Self {
        self.entries.push((spelling.to_string(), fold(spelling), value));
        self
    }

    /// Adds several accepted spellings for the same value.
    pub fn with_all(self, spellings: &[&str], value: T) -> Self {
        spellings
            .iter()
            .fold(self, |vocabulary, spelling| vocabulary.with(spelling, value))
    }

    /// Resolves `input` to a canonical value.
    pub fn resolve(&self, input: &str) -> Result<T, Unresolved> {
        let input = input.trim();

        if let Some((_, _, value)) = self
            .entries
            .iter()
            .find(|(spelling, _, _)| spelling.eq_ignore_ascii_case(input))
        {
            return Ok(*value);
        }

        let folded = fold(input);
        if let Some((_, _, value)) = self.entries.iter().find(|(_, key, _)| *key == folded) {
            return Ok(*value);
        }

        let suggestion = closest(
            input,
            self.entries.iter().map(|(spelling, _, _)| spelling.as_str()),
        )
        .and_then(|spelling| {
            self.entries
                .iter()
                .find(|(candidate, _, _)| candidate == spelling)
        })
        .map(|(_, _, value)| (self.display)(*value));

        Err(Unresolved { suggestion })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Fruit {
        Apple,
        BloodOrange,
    }

    fn vocabulary() -> Vocabulary<Fruit> {
        Vocabulary::new(|fruit| format!("{fruit:?}"))
            .with("Apple", Fruit::Apple)
            .with("Blood_Orange", Fruit::BloodOrange)
            .with_all(&["orange", "sanguine"], Fruit::BloodOrange)
    }

    #[test]
    fn test_fold() {
        assert_eq!(fold("Business_Actor"), "businessactor");
        assert_eq!(fold("business-actor"), "businessactor");
        assert_eq!(fold("Business Actor"), "businessactor");
    }

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("", ""), 0);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("goal", "goal"), 0);
        assert_eq!(edit_distance("", "abc"), 3);
    }

    #[test]
    fn test_resolve_exact_and_folded() {
        let vocabulary = vocabulary();

        assert_eq!(vocabulary.resolve("APPLE"), Ok(Fruit::Apple));
        assert_eq!(vocabulary.resolve("blood-orange"), Ok(Fruit::BloodOrange));
        assert_eq!(vocabulary.resolve(" BloodOrange "), Ok(Fruit::BloodOrange));
        assert_eq!(vocabulary.resolve("Sanguine"), Ok(Fruit::BloodOrange));
    }

    #[test]
    fn test_resolve_suggestion() {
        let err = vocabulary().resolve("Appel").unwrap_err();
        assert_eq!(err.suggestion.as_deref(), Some("Apple"));
        assert_eq!(err.help().as_deref(), Some("did you mean `Apple`?"));
    }

    #[test]
    fn test_resolve_no_suggestion_when_far() {
        let err = vocabulary().resolve("Zucchini").unwrap_err();
        assert_eq!(err.suggestion, None);
    }

    #[test]
    fn test_closest() {
        let candidates = ["checkout", "catalog", "cart"];
        assert_eq!(closest("chekout", candidates), Some("checkout"));
        assert_eq!(closest("zzzzzz", candidates), None);
    }
}
