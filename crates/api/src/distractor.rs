use rand::{seq::SliceRandom, Rng};
use regex::Regex;
use std::{borrow::Cow, collections::HashSet, sync::LazyLock};

/// Number of wrong options accompanying each correct answer.
pub const COUNT: usize = 3;

/// Search snippets shorter than this (in characters) carry too little text to pass as an answer.
pub const MIN_SNIPPET_CHARS: usize = 20;

/// Generic descriptions used when the upstream does not offer enough plausible distractors.
pub const FALLBACK: [&str; 6] = [
    "Um fenômeno natural",
    "Uma organização",
    "Um evento histórico",
    "Um lugar",
    "Um conceito filosófico",
    "Um processo biológico",
];

/// Matches opening and closing tags, including a tag left unterminated at the end of the text.
static MARKUP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"</?[^>]+(>|$)").unwrap());

/// Canonical form used whenever two texts are compared "loosely".
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

pub fn strip_markup(text: &str) -> Cow<'_, str> {
    MARKUP.replace_all(text, "")
}

/// Builds exactly [`COUNT`] distractors for `correct`. Candidates come from the descriptions of
/// related pages and from search snippets; whatever is missing is filled from [`FALLBACK`] in
/// order. The result never contains duplicates nor anything loosely equal to `correct`.
pub fn assemble<R, D, S>(correct: &str, descriptions: D, snippets: S, rng: &mut R) -> Vec<String>
where
    R: Rng + ?Sized,
    D: IntoIterator,
    D::Item: Into<String>,
    S: IntoIterator,
    S::Item: AsRef<str>,
{
    let target = normalize(correct);
    let snippets = snippets
        .into_iter()
        .map(|snippet| strip_markup(snippet.as_ref()).into_owned())
        .filter(|text| text.chars().count() >= MIN_SNIPPET_CHARS && normalize(text) != target);

    let mut seen = HashSet::new();
    let pool: Vec<_> = descriptions
        .into_iter()
        .map(Into::into)
        .chain(snippets)
        .filter(|text| seen.insert(text.clone()))
        .filter(|text| normalize(text) != target)
        .collect();
    drop(seen);

    let mut distractors: Vec<_> = pool.choose_multiple(rng, COUNT).cloned().collect();
    for phrase in FALLBACK {
        if distractors.len() >= COUNT {
            break;
        }
        if distractors.iter().any(|chosen| chosen == phrase) || normalize(phrase) == target {
            continue;
        }
        distractors.push(String::from(phrase));
    }

    distractors
}
