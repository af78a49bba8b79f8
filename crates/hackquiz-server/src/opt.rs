use clap::{Parser, Subcommand};
use hackquiz_core::session::DEFAULT_MAX_SESSIONS;
use hackquiz_model::score::ScoringMode;
use std::net::IpAddr;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "hackquiz", about = "Serve quizzes stored as json files")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    Run(Run),
}

#[derive(Debug, Clone, Parser)]
pub(crate) struct Run {
    #[arg(long)]
    pub(crate) host: Option<IpAddr>,

    #[arg(short, long)]
    pub(crate) port: Option<u16>,

    #[arg(long, default_value = "static", help = "Directory served under /static")]
    pub(crate) static_dir: PathBuf,

    #[arg(long, default_value = "static/quiz", help = "Directory containing the quiz<id>.json files")]
    pub(crate) quiz_dir: PathBuf,

    #[arg(long, default_value = "Calculus Review 1", help = "Title shown on the quiz page")]
    pub(crate) quiz_title: String,

    #[arg(
        long,
        default_value_t = ScoringMode::AnswerKey,
        help = "answer-key compares every answer with entry \"0\", so only quizzes whose answers all equal entry \"0\" \
                can reach 100%. Quizzes with one answer per question, like static/quiz/quiz1.json, need per-question"
    )]
    pub(crate) scoring: ScoringMode,

    #[arg(long, help = "If set, the start time of the latest quiz is also written to this file")]
    pub(crate) session_marker: Option<PathBuf>,

    #[arg(long, default_value_t = 7200, help = "Seconds after which an unfinished session is dropped")]
    pub(crate) session_ttl: u32,

    #[arg(long, default_value_t = DEFAULT_MAX_SESSIONS, help = "Number of sessions kept before the oldest is dropped")]
    pub(crate) max_sessions: usize,

    #[arg(long, value_delimiter = ',', help = "Origins allowed to call the api from a browser")]
    pub(crate) origins: Vec<String>,

    #[arg(long = "sentry-dsn", help = "Sentry url")]
    pub(crate) sentry_dsn: Option<String>,

    #[arg(long, default_value = "dev", help = "Set the environment used by sentry")]
    pub(crate) env: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_defaults() {
        let Commands::Run(run) = Cli::parse_from(["hackquiz", "run"]).command;
        assert_eq!(run.host, None);
        assert_eq!(run.static_dir, PathBuf::from("static"));
        assert_eq!(run.quiz_dir, PathBuf::from("static/quiz"));
        assert_eq!(run.quiz_title, "Calculus Review 1");
        assert_eq!(run.scoring, ScoringMode::AnswerKey);
        assert_eq!(run.session_marker, None);
        assert_eq!(run.session_ttl, 7200);
        assert_eq!(run.max_sessions, DEFAULT_MAX_SESSIONS);
    }

    #[test]
    fn test_run_arguments() {
        let Commands::Run(run) = Cli::parse_from([
            "hackquiz",
            "run",
            "-p",
            "8080",
            "--scoring",
            "per-question",
            "--session-marker",
            "session.txt",
            "--session-ttl",
            "60",
            "--max-sessions",
            "5",
            "--origins",
            "http://a.example,http://b.example",
        ])
        .command;
        assert_eq!(run.port, Some(8080));
        assert_eq!(run.scoring, ScoringMode::PerQuestion);
        assert_eq!(run.session_marker, Some(PathBuf::from("session.txt")));
        assert_eq!(run.session_ttl, 60);
        assert_eq!(run.max_sessions, 5);
        assert_eq!(run.origins, ["http://a.example", "http://b.example"]);
        assert!(Cli::try_parse_from(["hackquiz", "run", "--scoring", "index"]).is_err());
    }
}
