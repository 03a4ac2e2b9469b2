use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::InputFormat;

const NBSP: char = '\u{a0}';

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"));
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// A pair of strings treated as equal when comparing flagged content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Equivalence {
    pub from: String,
    pub to: String,
}

impl Equivalence {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Which differences between a flag's recorded content and the live text are
/// tolerated.
///
/// The markup switches only apply to [`InputFormat::Html`]; `equivalents` apply
/// to both formats, after the markup steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizationPolicy {
    pub strip_tags: bool,
    pub decode_entities: bool,
    pub nbsp_as_space: bool,
    pub collapse_whitespace: bool,
    pub equivalents: Vec<Equivalence>,
}

impl Default for NormalizationPolicy {
    fn default() -> Self {
        Self {
            strip_tags: true,
            decode_entities: true,
            nbsp_as_space: true,
            collapse_whitespace: true,
            equivalents: Vec::new(),
        }
    }
}

impl NormalizationPolicy {
    /// Literal comparison in every format.
    pub fn strict() -> Self {
        Self {
            strip_tags: false,
            decode_entities: false,
            nbsp_as_space: false,
            collapse_whitespace: false,
            equivalents: Vec::new(),
        }
    }

    pub fn normalizer(&self, format: InputFormat) -> Box<dyn Normalizer + '_> {
        match format {
            InputFormat::Text => Box::new(TextNormalizer { policy: self }),
            InputFormat::Html => Box::new(HtmlNormalizer { policy: self }),
        }
    }
}

/// Strategy deciding whether live text still holds a flag's content.
pub trait Normalizer {
    fn normalize<'a>(&self, text: &'a str) -> Cow<'a, str>;

    fn equivalent(&self, found: &str, expected: &str) -> bool {
        found == expected || self.normalize(found) == self.normalize(expected)
    }
}

pub struct TextNormalizer<'p> {
    policy: &'p NormalizationPolicy,
}

impl Normalizer for TextNormalizer<'_> {
    fn normalize<'a>(&self, text: &'a str) -> Cow<'a, str> {
        apply_equivalents(Cow::Borrowed(text), &self.policy.equivalents)
    }
}

pub struct HtmlNormalizer<'p> {
    policy: &'p NormalizationPolicy,
}

impl Normalizer for HtmlNormalizer<'_> {
    fn normalize<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let policy = self.policy;
        let mut out = Cow::Borrowed(text);

        if policy.strip_tags && TAG.is_match(&out) {
            out = Cow::Owned(TAG.replace_all(&out, "").into_owned());
        }
        if policy.decode_entities && out.contains('&') {
            out = Cow::Owned(html_escape::decode_html_entities(&out).into_owned());
        }
        if policy.nbsp_as_space && out.contains(NBSP) {
            out = Cow::Owned(out.replace(NBSP, " "));
        }
        if policy.collapse_whitespace && WHITESPACE_RUN.is_match(&out) {
            out = Cow::Owned(WHITESPACE_RUN.replace_all(&out, " ").into_owned());
        }

        apply_equivalents(out, &policy.equivalents)
    }
}

fn apply_equivalents<'a>(text: Cow<'a, str>, equivalents: &[Equivalence]) -> Cow<'a, str> {
    equivalents
        .iter()
        .filter(|eq| !eq.from.is_empty())
        .fold(text, |acc, eq| {
            if acc.contains(eq.from.as_str()) {
                Cow::Owned(acc.replace(eq.from.as_str(), &eq.to))
            } else {
                acc
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("D&amp;D", "D&D")]
    #[case("&nbsp;", "\u{a0}")]
    #[case("&nbsp;", " ")]
    #[case("<strong>a b</strong>", "a b")]
    #[case("a \n\t b", "a b")]
    fn html_mode_tolerates_markup(#[case] found: &str, #[case] expected: &str) {
        let policy = NormalizationPolicy::default();
        assert!(policy.normalizer(InputFormat::Html).equivalent(found, expected));
    }

    #[rstest]
    #[case("D&amp;D", "D&D")]
    #[case("a  b", "a b")]
    #[case("<b>x</b>", "x")]
    fn text_mode_is_literal(#[case] found: &str, #[case] expected: &str) {
        let policy = NormalizationPolicy::default();
        assert!(!policy.normalizer(InputFormat::Text).equivalent(found, expected));
    }

    #[test]
    fn strict_policy_keeps_entities_in_html() {
        let policy = NormalizationPolicy::strict();
        let html = policy.normalizer(InputFormat::Html);
        assert!(!html.equivalent("D&amp;D", "D&D"));
        assert!(html.equivalent("D&amp;D", "D&amp;D"));
    }

    #[test]
    fn configured_equivalents_apply_to_text_mode() {
        let policy = NormalizationPolicy {
            equivalents: vec![Equivalence::new("\u{2019}", "'")],
            ..NormalizationPolicy::default()
        };
        let text = policy.normalizer(InputFormat::Text);
        assert!(text.equivalent("don\u{2019}t", "don't"));
        assert!(!text.equivalent("dont", "don't"));
    }

    #[test]
    fn empty_equivalence_is_ignored() {
        let policy = NormalizationPolicy {
            equivalents: vec![Equivalence::new("", "x")],
            ..NormalizationPolicy::strict()
        };
        assert_eq!(policy.normalizer(InputFormat::Text).normalize("abc"), "abc");
    }

    #[test]
    fn normalize_borrows_when_nothing_changes() {
        let policy = NormalizationPolicy::default();
        let out = policy.normalizer(InputFormat::Html).normalize("plain");
        assert!(matches!(out, Cow::Borrowed("plain")));
    }
}
