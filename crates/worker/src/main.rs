use clap::Parser;
use homework_core::api::PracticumClient;
use homework_core::config::{Credentials, Settings};
use homework_core::notify::{LogNotifier, Notifier, TelegramNotifier};
use homework_core::poller::Poller;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "homework_worker")]
struct Args {
    /// Run a single poll cycle and exit.
    #[arg(long)]
    once: bool,

    /// Log messages instead of sending them to Telegram.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let settings = Settings::from_env();
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    // Returned, not exited, so the sentry guard is dropped and flushes.
    let credentials = require_credentials(&settings)?;

    let api = PracticumClient::from_settings(&settings, &credentials)?;

    if args.dry_run {
        run(Poller::from_settings(api, LogNotifier, &settings), args.once).await
    } else {
        let telegram = TelegramNotifier::from_settings(&settings, &credentials)?;
        run(Poller::from_settings(api, telegram, &settings), args.once).await
    }
}

async fn run<N: Notifier>(mut poller: Poller<PracticumClient, N>, once: bool) -> anyhow::Result<()> {
    if once {
        let outcome = poller.run_cycle(chrono::Utc::now()).await;
        tracing::info!(?outcome, "single poll cycle finished");
        return Ok(());
    }

    tokio::select! {
        _ = poller.run() => {}
        _ = shutdown_signal() => {
            tracing::info!("shutdown signal received; stopping poller");
        }
    }
    Ok(())
}

fn require_credentials(settings: &Settings) -> anyhow::Result<Credentials> {
    settings.check_tokens().map_err(|err| {
        let err = anyhow::Error::new(err);
        sentry_anyhow::capture_anyhow(&err);
        tracing::error!(error = %err, "required configuration missing; exiting");
        err
    })
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
