use hackquiz_model::quiz::{Quiz, QuizId};
use http::StatusCode;
use maud::{DOCTYPE, Markup, html};

fn layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                link rel="stylesheet" href="/static/css/style.css";
            }
            body {
                header {
                    a href="/" { "HackQuiz" }
                }
                main { (content) }
            }
        }
    }
}

pub(crate) fn home(quizzes: &[QuizId]) -> Markup {
    layout(
        "HackQuiz",
        html! {
            h1 { "Quizzes" }
            @if quizzes.is_empty() {
                p.empty { "No quizzes available yet." }
            } @else {
                ul.quizzes {
                    @for id in quizzes {
                        li {
                            a href={ "/quiz?id=" (id.as_str()) } { "Quiz " (id.as_str()) }
                        }
                    }
                }
            }
        },
    )
}

/// The questions themselves are fetched by `quiz.js` one at a time.
pub(crate) fn quiz(title: &str, quiz: &Quiz) -> Markup {
    let questions = quiz.entries.keys().map(String::as_str).collect::<Vec<_>>().join(",");
    layout(
        title,
        html! {
            h1 { (title) }
            section #quiz data-quiz-id=(quiz.id.as_str()) data-questions=(questions) {
                p.count { (quiz.len()) " questions" }
                button #start type="button" { "Start quiz" }
                form #question hidden {}
                p #result {}
            }
            script src="/static/js/quiz.js" defer {}
        },
    )
}

pub(crate) fn error_page(status: StatusCode, message: &str) -> Markup {
    let reason = status.canonical_reason().unwrap_or("Error");
    layout(
        reason,
        html! {
            h1 { (status.as_u16()) " " (reason) }
            p.error { (message) }
            a href="/" { "Back to all quizzes" }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_quiz_escapes_title() {
        let quiz = Quiz::new("1".parse().unwrap(), serde_json::from_value(json!({"0": "a"})).unwrap());
        let page = quiz_page_string("<b>Review</b>", &quiz);
        assert!(page.contains("&lt;b&gt;Review&lt;/b&gt;"));
        assert!(!page.contains("<b>Review</b>"));
    }

    #[test]
    fn test_home_without_quizzes() {
        assert!(home(&[]).into_string().contains("No quizzes available yet."));
    }

    #[test]
    fn test_error_page() {
        let page = error_page(StatusCode::NOT_FOUND, "quiz 3 not found").into_string();
        assert!(page.contains("404 Not Found"));
        assert!(page.contains("quiz 3 not found"));
    }

    fn quiz_page_string(title: &str, quiz: &Quiz) -> String {
        super::quiz(title, quiz).into_string()
    }
}
