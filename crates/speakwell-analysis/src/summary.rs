//! Natural-language summary assembly.

use crate::pronunciation::MispronouncedWord;

/// Join pacing, pronunciation and pause feedback into one summary.
///
/// The pronunciation clause names every mispronounced word in order, or
/// reports clear pronunciation when there are none.
pub fn generate_feedback_summary(
    pacing_feedback: &str,
    mispronounced: &[MispronouncedWord],
    pause_feedback: &str,
) -> String {
    let pronunciation = if mispronounced.is_empty() {
        "Your pronunciation was clear.".to_string()
    } else {
        let listed = mispronounced
            .iter()
            .map(|m| m.word.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        format!("Focus on pronouncing '{listed}' more clearly.")
    };

    format!("{pacing_feedback} {pronunciation} {pause_feedback}")
}
