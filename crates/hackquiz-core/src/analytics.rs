use crate::scoring::error::ScoreError;
use crate::scoring::{compared_entry, is_correct};
use crate::session::SessionState;
use chrono::{DateTime, Utc};
use hackquiz_model::analytics::{AnswerRecord, RecordAnswer, SessionAnalytics, TopicPerformance, TopicSort};
use hackquiz_model::quiz::Quiz;
use hackquiz_model::score::ScoringMode;
use indexmap::IndexMap;
use std::cmp::Ordering;

/// Topic of questions without a `topic` field.
pub const GENERAL_TOPIC: &str = "General";

const WEAK_ACCURACY: f64 = 70.0;
const STRONG_ACCURACY: f64 = 80.0;
const SLOW_FACTOR: f64 = 1.2;

/// Checks a single answer the same way [`crate::scoring::score`] checks a response.
///
/// `time_spent_seconds` of the request wins over the time since `last_activity`.
pub fn evaluate_answer(
    quiz: &Quiz,
    mode: ScoringMode,
    request: RecordAnswer,
    last_activity: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<AnswerRecord, ScoreError> {
    let RecordAnswer {
        question,
        answer,
        time_spent_seconds,
    } = request;
    if quiz.entry(&question).is_none() {
        return Err(ScoreError::MissingEntry(question));
    }
    let correct = is_correct(&answer, quiz, compared_entry(mode, &question))?;
    let time_spent_seconds = time_spent_seconds
        .filter(|seconds| seconds.is_finite() && *seconds >= 0.0)
        .unwrap_or_else(|| ((now - last_activity).num_milliseconds() as f64 / 1000.0).max(0.0));
    Ok(AnswerRecord {
        topic: quiz.topic(&question).map(str::to_owned),
        question,
        answer,
        correct,
        time_spent_seconds,
        answered_at: now,
    })
}

#[derive(Default)]
struct Totals {
    answered: usize,
    correct: usize,
    time: f64,
}

impl Totals {
    fn add(&mut self, record: &AnswerRecord) {
        self.answered += 1;
        self.correct += usize::from(record.correct);
        self.time += record.time_spent_seconds;
    }

    fn accuracy(&self) -> f64 {
        ratio(self.correct as f64 * 100.0, self.answered)
    }

    fn average_time(&self) -> f64 {
        ratio(self.time, self.answered)
    }
}

fn ratio(value: f64, count: usize) -> f64 {
    if count == 0 { 0.0 } else { value / count as f64 }
}

/// Accuracy and timing of a session, overall and per topic.
///
/// A topic is weak if its accuracy is below 70% or its average time is more than
/// 1.2 times the overall average. It is strong with at least 80% accuracy and an
/// average time not above the overall average.
#[must_use]
pub fn summarize(state: &SessionState, sort: TopicSort) -> SessionAnalytics {
    let mut overall = Totals::default();
    let mut by_topic: IndexMap<&str, Totals> = IndexMap::new();
    for record in state.answers.values() {
        overall.add(record);
        let topic = record.topic.as_deref().unwrap_or(GENERAL_TOPIC);
        by_topic.entry(topic).or_default().add(record);
    }

    let mut topics: Vec<TopicPerformance> = by_topic
        .into_iter()
        .map(|(topic, totals)| TopicPerformance {
            topic: topic.to_owned(),
            answered: totals.answered,
            correct: totals.correct,
            accuracy: totals.accuracy(),
            total_time_seconds: totals.time,
            average_time_seconds: totals.average_time(),
        })
        .collect();
    match sort {
        TopicSort::Time => topics.sort_by(|a, b| descending(a.average_time_seconds, b.average_time_seconds)),
        TopicSort::Accuracy => topics.sort_by(|a, b| descending(b.accuracy, a.accuracy)),
        TopicSort::Count => topics.sort_by(|a, b| b.answered.cmp(&a.answered)),
    }

    let average_time = overall.average_time();
    let weak_topics = topics
        .iter()
        .filter(|topic| topic.accuracy < WEAK_ACCURACY || topic.average_time_seconds > average_time * SLOW_FACTOR)
        .map(|topic| topic.topic.clone())
        .collect();
    let strong_topics = topics
        .iter()
        .filter(|topic| topic.accuracy >= STRONG_ACCURACY && topic.average_time_seconds <= average_time)
        .map(|topic| topic.topic.clone())
        .collect();

    SessionAnalytics {
        session_id: state.marker.session_id,
        quiz_id: state.marker.quiz_id.clone(),
        started_at: state.marker.started_at,
        answered: overall.answered,
        correct: overall.correct,
        accuracy: overall.accuracy(),
        total_time_seconds: overall.time,
        average_time_seconds: average_time,
        sort,
        topics,
        weak_topics,
        strong_topics,
        answers: state.answers.values().cloned().collect(),
    }
}

fn descending(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use hackquiz_model::session::{SessionId, SessionMarker};
    use serde_json::{Value, json};

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(seconds, 0).unwrap()
    }

    fn quiz() -> Quiz {
        let entries = json!({
            "0": {"question": "d/dx x^2", "answer": "2x", "topic": "derivatives"},
            "1": {"question": "d/dx e^x", "answer": "e^x", "topic": "derivatives"},
            "2": {"question": "lim x->0 sin(x)/x", "answer": "1", "topic": "limits"},
            "3": {"question": "integral of 2x", "answer": "x^2 + C"}
        });
        Quiz::new("1".parse().unwrap(), serde_json::from_value(entries).unwrap())
    }

    fn answer(question: &str, answer: Value, time_spent_seconds: Option<f64>) -> RecordAnswer {
        RecordAnswer {
            question: question.to_owned(),
            answer,
            time_spent_seconds,
        }
    }

    fn state(records: Vec<AnswerRecord>) -> SessionState {
        let mut state = SessionState {
            marker: SessionMarker {
                session_id: SessionId::new(),
                quiz_id: Some("1".parse().unwrap()),
                started_at: at(0),
            },
            answers: IndexMap::new(),
        };
        for record in records {
            state.answers.insert(record.question.clone(), record);
        }
        state
    }

    #[test]
    fn test_evaluate_answer() {
        let quiz = quiz();
        let record = evaluate_answer(
            &quiz,
            ScoringMode::PerQuestion,
            answer("1", json!("e^x"), None),
            at(10),
            at(25),
        )
        .unwrap();
        assert!(record.correct);
        assert_eq!(record.topic.as_deref(), Some("derivatives"));
        assert_eq!(record.time_spent_seconds, 15.0);
        assert_eq!(record.answered_at, at(25));

        let record = evaluate_answer(
            &quiz,
            ScoringMode::AnswerKey,
            answer("1", json!("e^x"), Some(4.5)),
            at(10),
            at(25),
        )
        .unwrap();
        assert!(!record.correct);
        assert_eq!(record.time_spent_seconds, 4.5);

        assert_eq!(
            evaluate_answer(&quiz, ScoringMode::PerQuestion, answer("9", json!("a"), None), at(0), at(1)),
            Err(ScoreError::MissingEntry("9".to_owned()))
        );
    }

    #[test]
    fn test_summarize() {
        let quiz = quiz();
        let mode = ScoringMode::PerQuestion;
        let records = vec![
            evaluate_answer(&quiz, mode, answer("0", json!("2x"), Some(10.0)), at(0), at(10)).unwrap(),
            evaluate_answer(&quiz, mode, answer("1", json!("e^x"), Some(10.0)), at(10), at(20)).unwrap(),
            evaluate_answer(&quiz, mode, answer("2", json!("0"), Some(40.0)), at(20), at(60)).unwrap(),
            evaluate_answer(&quiz, mode, answer("3", json!("x^2 + C"), Some(20.0)), at(60), at(80)).unwrap(),
        ];
        let analytics = summarize(&state(records), TopicSort::Time);

        assert_eq!(analytics.answered, 4);
        assert_eq!(analytics.correct, 3);
        assert_eq!(analytics.accuracy, 75.0);
        assert_eq!(analytics.total_time_seconds, 80.0);
        assert_eq!(analytics.average_time_seconds, 20.0);
        let order: Vec<_> = analytics.topics.iter().map(|topic| topic.topic.as_str()).collect();
        assert_eq!(order, ["limits", GENERAL_TOPIC, "derivatives"]);
        assert_eq!(analytics.topics[2].answered, 2);
        assert_eq!(analytics.topics[2].average_time_seconds, 10.0);
        assert_eq!(analytics.weak_topics, ["limits"]);
        assert_eq!(analytics.strong_topics, [GENERAL_TOPIC, "derivatives"]);
        assert_eq!(analytics.answers.len(), 4);

        let by_accuracy = summarize(&state(analytics.answers.clone()), TopicSort::Accuracy);
        assert_eq!(by_accuracy.topics[0].topic, "limits");
        let by_count = summarize(&state(analytics.answers), TopicSort::Count);
        assert_eq!(by_count.topics[0].topic, "derivatives");
    }

    #[test]
    fn test_summarize_without_answers() {
        let analytics = summarize(&state(Vec::new()), TopicSort::default());
        assert_eq!(analytics.answered, 0);
        assert_eq!(analytics.accuracy, 0.0);
        assert_eq!(analytics.average_time_seconds, 0.0);
        assert!(analytics.topics.is_empty());
    }
}
