use crate::opt::{Commands, Run};
use anyhow::Result;
use axum::serve;
use chrono::TimeDelta;
use clap::Parser;
use hackquiz_core::repository::{FileQuizRepository, QuizRepository};
use hackquiz_core::session::{MarkerFile, SessionStore};
use hackquiz_model::score::ScoringMode;
use hackquiz_utils::net::create_listener;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

mod app;
mod opt;
mod routes;
mod views;

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
const DEFAULT_PORT: u16 = 3030;

#[derive(Debug)]
pub(crate) struct InnerAppConfig {
    repository: Arc<dyn QuizRepository>,
    sessions: SessionStore,
    scoring: ScoringMode,
    quiz_title: String,
}

#[derive(Clone, Debug)]
pub(crate) struct AppConfig(Arc<InnerAppConfig>);

impl AppConfig {
    fn new(
        repository: Arc<dyn QuizRepository>,
        sessions: SessionStore,
        scoring: ScoringMode,
        quiz_title: String,
    ) -> Self {
        Self(Arc::new(InnerAppConfig {
            repository,
            sessions,
            scoring,
            quiz_title,
        }))
    }

    pub fn repository(&self) -> &dyn QuizRepository {
        self.0.repository.as_ref()
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.0.sessions
    }

    pub fn scoring(&self) -> ScoringMode {
        self.0.scoring
    }

    pub fn quiz_title(&self) -> &str {
        &self.0.quiz_title
    }
}

async fn run(opt: Run) -> Result<()> {
    let _guard = hackquiz_utils::tracing::setup(
        hackquiz_utils::tracing::TracingConfig::builder()
            .package(env!("CARGO_PKG_NAME"))
            .version(env!("CARGO_PKG_VERSION"))
            .sentry_dsn(opt.sentry_dsn.clone())
            .env(opt.env.clone())
            .build(),
    )?;

    let marker_file = opt.session_marker.as_deref().map(MarkerFile::new).transpose()?;
    if let Some(path) = &opt.session_marker {
        tracing::info!(?path, "writing session marker");
    }

    let repository = FileQuizRepository::from_dir(&opt.quiz_dir);
    match repository.list().await {
        Ok(quizzes) => tracing::info!(quiz_dir = ?opt.quiz_dir, count = quizzes.len(), "found quizzes"),
        Err(error) => tracing::warn!(
            quiz_dir = ?opt.quiz_dir,
            error = &error as &dyn std::error::Error,
            "could not list quizzes"
        ),
    }

    let Run {
        host,
        port,
        static_dir,
        quiz_title,
        scoring,
        session_ttl,
        max_sessions,
        origins,
        ..
    } = opt;

    tracing::info!(%scoring, session_ttl, max_sessions, "using scoring mode");
    let sessions = SessionStore::new(marker_file)
        .with_ttl(TimeDelta::seconds(i64::from(session_ttl)))
        .with_max_sessions(max_sessions);
    let app_config = AppConfig::new(
        Arc::new(repository),
        sessions,
        scoring,
        quiz_title,
    );

    let app = app::create_app(app_config, &static_dir, &origins)?;

    let listener = create_listener((host, port), (DEFAULT_HOST, DEFAULT_PORT)).await?;

    tracing::info!(local_addr = %listener.local_addr()?, "starting app");
    serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("app stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(error = &error as &dyn std::error::Error, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

fn main() -> Result<()> {
    let main = async {
        let opt = opt::Cli::parse();

        match opt.command {
            Commands::Run(o) => run(o).await?,
        }
        Ok(())
    };

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(main)
}
