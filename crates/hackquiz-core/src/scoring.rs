use crate::scoring::error::ScoreError;
use hackquiz_model::quiz::{ANSWER_KEY_ENTRY, Quiz};
use hackquiz_model::score::{QuestionOutcome, Score, ScoringMode};
use serde_json::Value;

pub mod error;

/// Scores a submission against a quiz.
///
/// Every response is worth `100 / n` points. Starting from 100, that share is
/// subtracted once per response that differs from the entry it is compared with.
/// Which entry that is depends on `mode`. The result is neither clamped nor rounded.
pub fn score(submission: &[Value], quiz: &Quiz, mode: ScoringMode) -> Result<Score, ScoreError> {
    if submission.is_empty() {
        return Err(ScoreError::EmptySubmission);
    }

    let share = 100.0 / submission.len() as f64;
    let mut score = 100.0;
    let mut mismatches = 0;
    let mut outcomes = Vec::with_capacity(submission.len());
    for (index, response) in submission.iter().enumerate() {
        let question = index.to_string();
        let key = compared_entry(mode, &question);
        let correct = is_correct(response, quiz, key)?;
        if !correct {
            score -= share;
            mismatches += 1;
        }
        outcomes.push(QuestionOutcome {
            compared_with: key.to_owned(),
            correct,
        });
    }

    tracing::debug!(quiz = %quiz.id, %mode, answered = submission.len(), mismatches, score, "scored submission");
    Ok(Score {
        quiz_id: quiz.id.clone(),
        score,
        answered: submission.len(),
        mismatches,
        mode,
        outcomes,
        elapsed_seconds: None,
    })
}

/// Key of the entry a response to `question` is compared with.
#[must_use]
pub fn compared_entry(mode: ScoringMode, question: &str) -> &str {
    match mode {
        ScoringMode::AnswerKey => ANSWER_KEY_ENTRY,
        ScoringMode::PerQuestion => question,
    }
}

/// Compares a response with the answer of entry `key`.
pub fn is_correct(response: &Value, quiz: &Quiz, key: &str) -> Result<bool, ScoreError> {
    let expected = quiz
        .answer(key)
        .ok_or_else(|| ScoreError::MissingEntry(key.to_owned()))?;
    Ok(response == expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn quiz(entries: Value) -> Quiz {
        Quiz::new("1".parse().unwrap(), serde_json::from_value(entries).unwrap())
    }

    #[test]
    fn test_answer_key_one_mismatch() {
        let quiz = quiz(json!({"0": "b", "1": "c", "2": "a", "3": "d"}));
        let answers = [json!("b"), json!("b"), json!("x"), json!("b")];

        let score = score(&answers, &quiz, ScoringMode::AnswerKey).unwrap();
        assert_eq!(score.score, 75.0);
        assert_eq!(score.mismatches, 1);
        assert_eq!(score.answered, 4);
        let correct: Vec<_> = score.outcomes.iter().map(|outcome| outcome.correct).collect();
        assert_eq!(correct, [true, true, false, true]);
        assert!(score.outcomes.iter().all(|outcome| outcome.compared_with == "0"));
    }

    #[test]
    fn test_answer_key_all_match() {
        let quiz = quiz(json!({"0": "b", "1": "c", "2": "a", "3": "d"}));
        let answers = vec![json!("b"); 4];

        assert_eq!(score(&answers, &quiz, ScoringMode::AnswerKey).unwrap().score, 100.0);
    }

    #[test]
    fn test_per_question() {
        let quiz = quiz(json!({
            "0": {"question": "1+1", "answer": 2},
            "1": {"question": "2+2", "answer": 4},
            "2": {"question": "3+3", "answer": 6},
            "3": {"question": "4+4", "answer": 8}
        }));
        let answers = [json!(2), json!(4), json!(5), json!(8)];

        let score = score(&answers, &quiz, ScoringMode::PerQuestion).unwrap();
        assert_eq!(score.score, 75.0);
        assert_eq!(score.mode, ScoringMode::PerQuestion);
        assert_eq!(
            score.outcomes[2],
            QuestionOutcome {
                compared_with: "2".to_owned(),
                correct: false
            }
        );
        assert!(score.outcomes[3].correct);
    }

    #[test]
    fn test_all_wrong_reaches_zero() {
        let quiz = quiz(json!({"0": "a"}));
        let answers = [json!("x"), json!("y")];

        let score = score(&answers, &quiz, ScoringMode::AnswerKey).unwrap();
        assert_eq!(score.score, 0.0);
        assert_eq!(score.mismatches, 2);
    }

    #[test]
    fn test_is_correct() {
        let quiz = quiz(json!({"0": "a", "1": {"question": "2+2", "answer": 4}}));
        assert_eq!(compared_entry(ScoringMode::AnswerKey, "1"), "0");
        assert_eq!(compared_entry(ScoringMode::PerQuestion, "1"), "1");
        assert_eq!(is_correct(&json!(4), &quiz, "1"), Ok(true));
        assert_eq!(is_correct(&json!("a"), &quiz, "1"), Ok(false));
        assert_eq!(
            is_correct(&json!("a"), &quiz, "5"),
            Err(ScoreError::MissingEntry("5".to_owned()))
        );
    }

    #[test]
    fn test_empty_submission() {
        let quiz = quiz(json!({"0": "a"}));
        assert_eq!(
            score(&[], &quiz, ScoringMode::AnswerKey),
            Err(ScoreError::EmptySubmission)
        );
    }

    #[test]
    fn test_missing_entry() {
        let two_entries = quiz(json!({"0": "a", "1": "b"}));
        let no_entries = quiz(json!({}));
        let answers = [json!("a"), json!("b"), json!("c")];
        assert_eq!(
            score(&answers, &two_entries, ScoringMode::PerQuestion),
            Err(ScoreError::MissingEntry("2".to_owned()))
        );
        assert_eq!(
            score(&answers, &no_entries, ScoringMode::AnswerKey),
            Err(ScoreError::MissingEntry("0".to_owned()))
        );
    }
}
