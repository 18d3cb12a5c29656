//! Property tests for the metrics engine.

use proptest::prelude::*;
use speakwell_analysis::{
    PaceFeedback, compute_pronunciation_score, detect_pauses, evaluate_pacing,
};
use speakwell_core::Word;

fn word_strategy() -> impl Strategy<Value = Word> {
    ("[a-z]{1,8}", 0i64..60_000, 0i64..2_000, 0.0f64..=1.0)
        .prop_map(|(text, start, len, conf)| Word::new(text, start, start + len, conf))
}

fn words_strategy(max: usize) -> impl Strategy<Value = Vec<Word>> {
    prop::collection::vec(word_strategy(), 0..max)
}

proptest! {
    #[test]
    fn score_is_within_bounds(words in words_strategy(64), threshold in 0.0f64..=1.0) {
        let report = compute_pronunciation_score(&words, threshold);
        prop_assert!(report.score <= 100);
        if words.is_empty() {
            prop_assert_eq!(report.score, 0);
            prop_assert!(report.mispronounced.is_empty());
        }
    }

    #[test]
    fn mispronounced_is_exact_filter(words in words_strategy(64), threshold in 0.0f64..=1.0) {
        let report = compute_pronunciation_score(&words, threshold);
        let expected: Vec<&str> = words
            .iter()
            .filter(|w| w.confidence < threshold)
            .map(|w| w.text.as_str())
            .collect();
        let actual: Vec<&str> = report.mispronounced.iter().map(|m| m.word.as_str()).collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn pacing_is_monotonic_in_word_count(
        words in words_strategy(200),
        extra in 0usize..50,
        duration in 0.1f64..120.0,
    ) {
        let mut more = words.clone();
        more.extend(std::iter::repeat_n(Word::new("x", 0, 1, 0.5), extra));
        let fewer = evaluate_pacing(&words, duration);
        let larger = evaluate_pacing(&more, duration);
        prop_assert!(larger.wpm >= fewer.wpm);
    }

    #[test]
    fn pacing_feedback_matches_wpm(words in words_strategy(300), duration in 0.1f64..120.0) {
        let report = evaluate_pacing(&words, duration);
        prop_assert_eq!(report.feedback, PaceFeedback::from_wpm(report.wpm));
    }

    #[test]
    fn pause_count_bounded_by_pairs(words in words_strategy(64)) {
        let report = detect_pauses(&words, 0.5);
        prop_assert!((report.count as usize) <= words.len().saturating_sub(1));
        prop_assert!(report.total_pause_sec >= 0.0);
        prop_assert_eq!(report.count == 0, report.total_pause_sec == 0.0);
    }
}
