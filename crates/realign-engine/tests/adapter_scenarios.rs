//! End-to-end scenarios for a single checked surface: extract, check, edit,
//! then select or replace what the checker flagged.

use pretty_assertions::assert_eq;
use realign_engine::{
    Adapter, AlignError, CheckAdapter, CheckResult, Document, InputFormat, Match,
    MatchWithReplacement, Span, SurfaceError,
};
use rstest::rstest;

const CHECK_ID: &str = "check-1";

/// Runs the check workflow over `text` and returns the adapter ready for requests.
async fn checked(text: &str, format: InputFormat) -> CheckAdapter<Document> {
    let mut adapter = CheckAdapter::new(Document::new(text, format));
    let extraction = adapter.extract_content_for_check().await.unwrap();
    assert_eq!(extraction.content, text);
    adapter.register_check_call(CHECK_ID);
    adapter
        .register_check_result(&CheckResult::new(CHECK_ID, Span::new(0, text.len())))
        .unwrap();
    adapter
}

/// The `nth` occurrence of `word` in `text`.
fn flag(text: &str, word: &str, nth: usize) -> Match {
    let (start, found) = text
        .match_indices(word)
        .nth(nth)
        .unwrap_or_else(|| panic!("{word:?} #{nth} not in {text:?}"));
    Match::new(found, Span::new(start, start + found.len()))
}

fn flag_replace(text: &str, word: &str, nth: usize, replacement: &str) -> MatchWithReplacement {
    let m = flag(text, word, nth);
    MatchWithReplacement::new(m.content, m.range, replacement)
}

fn text_of(adapter: &CheckAdapter<Document>) -> String {
    adapter.surface().text()
}

// ============ Selection ============

#[tokio::test]
async fn select_single_word() {
    let text = "wordOne wordTwo wordThree";
    let mut adapter = checked(text, InputFormat::Text).await;

    let aligned = adapter
        .select_ranges(CHECK_ID, &[flag(text, "wordTwo", 0)])
        .unwrap();

    assert_eq!(aligned[0].found_offset(), 8);
    assert_eq!(aligned[0].flag_length(), 7);
    assert_eq!(adapter.surface().selected_text(), "wordTwo");
    assert!(adapter.surface().is_focused());
}

#[tokio::test]
async fn select_twice_gives_identical_result() {
    let text = "wordOne wordTwo wordThree";
    let mut adapter = checked(text, InputFormat::Text).await;
    let matches = [flag(text, "wordThree", 0)];

    let first = adapter.select_ranges(CHECK_ID, &matches).unwrap();
    let second = adapter.select_ranges(CHECK_ID, &matches).unwrap();

    assert_eq!(first, second);
    assert_eq!(adapter.surface().version(), 0);
}

#[tokio::test]
async fn select_after_text_was_typed_before_the_match() {
    let text = "wordOne wordTwo wordThree";
    let mut adapter = checked(text, InputFormat::Text).await;
    adapter.surface_mut().replace(Span::at(0), "Preface. ").unwrap();

    let aligned = adapter
        .select_ranges(CHECK_ID, &[flag(text, "wordThree", 0)])
        .unwrap();

    assert_eq!(aligned[0].range, Span::new(25, 34));
    assert_eq!(adapter.surface().selected_text(), "wordThree");
}

#[tokio::test]
async fn select_multi_range_covers_first_to_last() {
    let text = "word0 blub mist word3";
    let mut adapter = checked(text, InputFormat::Text).await;

    adapter
        .select_ranges(CHECK_ID, &[flag(text, "blub", 0), flag(text, "mist", 0)])
        .unwrap();

    assert_eq!(adapter.surface().selected_text(), "blub mist");
}

#[tokio::test]
async fn edit_inside_match_is_content_modified() {
    let text = "wordOne wordTwo wordThree";
    let mut adapter = checked(text, InputFormat::Text).await;
    adapter.surface_mut().replace(Span::at(12), "X").unwrap();
    assert_eq!(text_of(&adapter), "wordOne wordXTwo wordThree");

    let result = adapter.select_ranges(CHECK_ID, &[flag(text, "wordTwo", 0)]);

    assert!(matches!(result, Err(AlignError::ContentModified)));
}

#[tokio::test]
async fn hidden_surface_refuses_selection() {
    let text = "wordOne wordTwo";
    let mut adapter = checked(text, InputFormat::Text).await;
    adapter.surface_mut().hide();

    let result = adapter.select_ranges(CHECK_ID, &[flag(text, "wordTwo", 0)]);

    assert!(matches!(result, Err(AlignError::Surface(SurfaceError::Hidden))));
}

#[tokio::test]
async fn detached_surface_refuses_selection() {
    let text = "wordOne wordTwo";
    let mut adapter = checked(text, InputFormat::Text).await;
    adapter.surface_mut().detach();

    let result = adapter.select_ranges(CHECK_ID, &[flag(text, "wordTwo", 0)]);

    assert!(matches!(result, Err(AlignError::Surface(SurfaceError::Detached))));
}

// ============ Replacement ============

#[tokio::test]
async fn replace_single_word() {
    let text = "wordOne wordTwo wordThree";
    let mut adapter = checked(text, InputFormat::Text).await;

    let outcome = adapter
        .replace_ranges(CHECK_ID, vec![flag_replace(text, "wordTwo", 0, "wordTwoReplacement")])
        .unwrap();

    assert_eq!(outcome.text, "wordOne wordTwoReplacement wordThree");
    assert_eq!(text_of(&adapter), outcome.text);
    assert_eq!(adapter.surface().selected_text(), "wordTwoReplacement");
}

#[rstest]
#[case::left_to_right(&["wordTwo", "wordThree"])]
#[case::right_to_left(&["wordThree", "wordTwo"])]
#[tokio::test]
async fn sequential_replacements_in_either_order(#[case] order: &[&str]) {
    let text = "wordOne wordTwo wordThree";
    let mut adapter = checked(text, InputFormat::Text).await;

    for word in order {
        let replacement = if *word == "wordTwo" { "X" } else { "Y" };
        adapter
            .replace_ranges(CHECK_ID, vec![flag_replace(text, word, 0, replacement)])
            .unwrap();
    }

    assert_eq!(text_of(&adapter), "wordOne X Y");
}

#[rstest]
#[case::first(0, "X wordSame")]
#[case::second(1, "wordSame X")]
#[tokio::test]
async fn repeated_words_are_told_apart(#[case] nth: usize, #[case] expected: &str) {
    let text = "wordSame wordSame";
    let mut adapter = checked(text, InputFormat::Text).await;

    adapter
        .replace_ranges(CHECK_ID, vec![flag_replace(text, "wordSame", nth, "X")])
        .unwrap();

    assert_eq!(text_of(&adapter), expected);
}

#[tokio::test]
async fn five_repeated_words_replaced_in_shuffled_order() {
    let text = "wordSame wordSame wordSame wordSame wordSame";
    let mut adapter = checked(text, InputFormat::Text).await;

    for nth in [3, 0, 4, 1, 2] {
        let replacement = format!("r{nth}");
        adapter
            .replace_ranges(CHECK_ID, vec![flag_replace(text, "wordSame", nth, &replacement)])
            .unwrap();
    }

    assert_eq!(text_of(&adapter), "r0 r1 r2 r3 r4");
}

#[tokio::test]
async fn adjacent_multi_range_replacement() {
    let text = "word0 blub mist word3";
    let mut adapter = checked(text, InputFormat::Text).await;
    let matches = vec![
        flag_replace(text, "blub", 0, "a"),
        flag_replace(text, " ", 1, ""),
        flag_replace(text, "mist", 0, "b"),
    ];

    let outcome = adapter.replace_ranges(CHECK_ID, matches).unwrap();

    assert_eq!(outcome.text, "word0 ab word3");
    assert_eq!(adapter.surface().selected_text(), "ab");
}

#[tokio::test]
async fn discontinuous_multi_range_replacement() {
    let text = "wordOne wordTwo wordThree wordFour";
    let mut adapter = checked(text, InputFormat::Text).await;
    let matches = vec![
        flag_replace(text, "wordThree", 0, "c"),
        flag_replace(text, "wordOne", 0, "a"),
    ];

    let outcome = adapter.replace_ranges(CHECK_ID, matches).unwrap();

    assert_eq!(outcome.text, "a wordTwo c wordFour");
    assert_eq!(outcome.selection, Span::new(0, 11));
}

#[rstest]
#[case::single_char("a b c", "b", "x", "a x c")]
#[case::whole_text("wordOne", "wordOne", "Whole", "Whole")]
#[case::entity_looking_text("wordOne wordTwo", "wordTwo", "&amp; &nbsp;", "wordOne &amp; &nbsp;")]
#[case::tag_looking_text("wordOne wordTwo", "wordTwo", "<b>bold</b>", "wordOne <b>bold</b>")]
#[tokio::test]
async fn replacement_text_is_inserted_literally(
    #[case] text: &str,
    #[case] word: &str,
    #[case] replacement: &str,
    #[case] expected: &str,
) {
    let mut adapter = checked(text, InputFormat::Text).await;

    adapter
        .replace_ranges(CHECK_ID, vec![flag_replace(text, word, 0, replacement)])
        .unwrap();

    assert_eq!(text_of(&adapter), expected);
}

#[tokio::test]
async fn removing_a_comma_is_one_minimal_edit() {
    let text = "wordOne, wordTwo";
    let mut adapter = checked(text, InputFormat::Text).await;

    let outcome = adapter
        .replace_ranges(CHECK_ID, vec![flag_replace(text, ",", 0, "")])
        .unwrap();

    assert_eq!(outcome.text, "wordOne wordTwo");
    assert_eq!(outcome.selection, Span::at(7));
    assert_eq!(adapter.surface().version(), 1);
}

#[tokio::test]
async fn replacement_after_edit_inside_match_fails_without_touching_text() {
    let text = "wordOne wordTwo wordThree";
    let mut adapter = checked(text, InputFormat::Text).await;
    adapter.surface_mut().replace(Span::at(12), "X").unwrap();

    let result = adapter.replace_ranges(CHECK_ID, vec![flag_replace(text, "wordTwo", 0, "Y")]);

    assert!(matches!(result, Err(AlignError::ContentModified)));
    assert_eq!(text_of(&adapter), "wordOne wordXTwo wordThree");
}

// ============ HTML surfaces ============

#[tokio::test]
async fn html_entity_matches_decoded_content() {
    let html = "<p>wordOne D&amp;D wordThree</p>";
    let mut adapter = checked(html, InputFormat::Html).await;
    let span = flag(html, "D&amp;D", 0).range;
    let matches = vec![MatchWithReplacement::new("D&D", span, "Dungeons &amp; Dragons")];

    let outcome = adapter.replace_ranges(CHECK_ID, matches).unwrap();

    assert_eq!(outcome.text, "<p>wordOne Dungeons &amp; Dragons wordThree</p>");
}

#[tokio::test]
async fn html_entity_survives_markup_edits_elsewhere() {
    let html = "<p>wordOne D&amp;D wordThree</p>";
    let mut adapter = checked(html, InputFormat::Html).await;
    adapter.surface_mut().replace(Span::at(3), "<b>new</b> ").unwrap();
    let span = flag(html, "D&amp;D", 0).range;

    let aligned = adapter
        .select_ranges(CHECK_ID, &[Match::new("D&D", span)])
        .unwrap();

    assert_eq!(adapter.surface().selected_text(), "D&amp;D");
    assert_eq!(aligned[0].found_offset(), span.start + "<b>new</b> ".len());
}

#[tokio::test]
async fn html_nbsp_matches_non_breaking_space() {
    let html = "<p>South&nbsp;is warm&nbsp;.</p>";
    let mut adapter = checked(html, InputFormat::Html).await;
    let second_nbsp = html.rfind("&nbsp;").unwrap();
    let matches = vec![
        flag_replace(html, "warm", 0, "warm."),
        MatchWithReplacement::new("\u{a0}", Span::new(second_nbsp, second_nbsp + 6), ""),
        flag_replace(html, ".", 0, ""),
    ];

    let outcome = adapter.replace_ranges(CHECK_ID, matches).unwrap();

    assert_eq!(outcome.text, "<p>South&nbsp;is warm.</p>");
    assert_eq!(adapter.surface().selected_text(), "warm.");
}

#[tokio::test]
async fn text_surface_does_not_decode_entities() {
    let text = "wordOne D&amp;D";
    let mut adapter = checked(text, InputFormat::Text).await;
    let span = flag(text, "D&amp;D", 0).range;

    let result = adapter.select_ranges(CHECK_ID, &[Match::new("D&D", span)]);

    assert!(matches!(result, Err(AlignError::ContentModified)));
}
