//! Watch command implementation

use crate::cli::output::format_snapshot_line;
use crate::cli::{load_config_with_overrides, WatchArgs};
use crate::client::ApiClient;
use crate::config::OrionConfig;
use crate::query::QueryOptions;
use crate::registry::Registry;
use crate::visibility::{Visibility, VisibilityWatcher};
use std::io::Write;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Handle `orion watch` command
pub async fn run_watch(args: &WatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config_with_overrides(&args.connection)?;
    crate::logging::init_tracing(&config.logging)?;
    tracing::debug!(?config, "Loaded configuration");

    let cancel_token = CancellationToken::new();
    tokio::spawn(shutdown_signal(cancel_token.clone()));

    let visibility = if config.polling.pause_when_hidden {
        visibility_signals(cancel_token.clone())
    } else {
        None
    };

    let mut stdout = std::io::stdout();
    execute_watch(&config, args, &mut stdout, visibility, cancel_token.clone()).await?;
    cancel_token.cancel();
    Ok(())
}

/// Poll until cancelled, the fetch limit is reached, or (for interval 0)
/// after the single fetch. Returns the number of lines written.
pub async fn execute_watch(
    config: &OrionConfig,
    args: &WatchArgs,
    out: &mut dyn Write,
    visibility: Option<watch::Receiver<Visibility>>,
    cancel_token: CancellationToken,
) -> Result<u64, Box<dyn std::error::Error>> {
    let interval_ms = args
        .interval_ms
        .unwrap_or(config.polling.default_interval_ms);
    let options = QueryOptions::poll_every(interval_ms);

    let registry = Arc::new(Registry::new(ApiClient::from_config(&config.api)?));
    let query = registry.query(
        Some(args.endpoint.endpoint()),
        args.filter.to_filter()?,
        options,
    )?;

    let watcher = visibility.map(|rx| {
        VisibilityWatcher::new(Arc::clone(&registry), rx).start(cancel_token.child_token())
    });

    tracing::info!(
        endpoint = %args.endpoint,
        interval_ms,
        "Watching endpoint"
    );

    let mut rx = query.subscribe();
    let mut seen = 0;
    let mut printed = 0;
    loop {
        let snapshot = tokio::select! {
            _ = cancel_token.cancelled() => break,
            result = rx.wait_for(|s| s.fetch_count > seen && !s.loading) => match result {
                Ok(snapshot) => snapshot.clone(),
                Err(_) => break,
            },
        };

        seen = snapshot.fetch_count;
        writeln!(out, "{}", format_snapshot_line(&snapshot, args.json))?;
        printed += 1;

        if !options.is_polling() || args.count.is_some_and(|limit| printed >= limit) {
            break;
        }
    }

    if options.is_polling() {
        registry.dispose(query.id())?;
    }
    if let Some(handle) = watcher {
        handle.abort();
    }

    Ok(printed)
}

/// Cancel `cancel_token` on Ctrl+C
async fn shutdown_signal(cancel_token: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("Received SIGINT, shutting down...");
        cancel_token.cancel();
    }
}

/// Map SIGUSR1 to Hidden and SIGUSR2 to Visible.
#[cfg(unix)]
fn visibility_signals(cancel_token: CancellationToken) -> Option<watch::Receiver<Visibility>> {
    use tokio::signal::unix::{signal, SignalKind};

    let (mut hide, mut show) = match (
        signal(SignalKind::user_defined1()),
        signal(SignalKind::user_defined2()),
    ) {
        (Ok(hide), Ok(show)) => (hide, show),
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not install visibility signal handlers");
            return None;
        }
    };

    let (tx, rx) = watch::channel(Visibility::Visible);
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = cancel_token.cancelled() => break,
                Some(()) = hide.recv() => {
                    let _ = tx.send(Visibility::Hidden);
                }
                Some(()) = show.recv() => {
                    let _ = tx.send(Visibility::Visible);
                }
                else => break,
            }
        }
    });

    Some(rx)
}

#[cfg(not(unix))]
fn visibility_signals(_cancel_token: CancellationToken) -> Option<watch::Receiver<Visibility>> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{BodyArgs, ConnectionArgs};
    use crate::endpoints::EndpointName;
    use serde_json::json;
    use std::path::PathBuf;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn args(interval_ms: u64, count: Option<u64>) -> WatchArgs {
        WatchArgs {
            endpoint: EndpointName::Version,
            filter: BodyArgs::default(),
            interval_ms: Some(interval_ms),
            count,
            json: true,
            connection: ConnectionArgs {
                config: PathBuf::from("nonexistent.toml"),
                api_url: None,
                log_level: None,
            },
        }
    }

    async fn version_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/version"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!("2.10.0")))
            .mount(&server)
            .await;
        server
    }

    fn config_for(server: &MockServer) -> OrionConfig {
        let mut config = OrionConfig::default();
        config.api.base_url = server.uri();
        config
    }

    #[tokio::test]
    async fn test_watch_zero_interval_fetches_once() {
        let server = version_server().await;
        let mut out = Vec::new();

        let printed = execute_watch(
            &config_for(&server),
            &args(0, None),
            &mut out,
            None,
            CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(printed, 1);
        let line: serde_json::Value =
            serde_json::from_str(String::from_utf8(out).unwrap().trim()).unwrap();
        assert_eq!(line["response"], "2.10.0");
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_watch_stops_after_count() {
        let server = version_server().await;
        let mut out = Vec::new();

        let printed = execute_watch(
            &config_for(&server),
            &args(1000, Some(2)),
            &mut out,
            None,
            CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(printed, 2);
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 2);
    }

    #[tokio::test]
    async fn test_watch_rejects_short_interval() {
        let server = version_server().await;
        let mut out = Vec::new();

        let result = execute_watch(
            &config_for(&server),
            &args(200, None),
            &mut out,
            None,
            CancellationToken::new(),
        )
        .await;

        assert!(result.is_err());
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_watch_cancelled() {
        let server = version_server().await;
        let mut out = Vec::new();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let printed = execute_watch(
            &config_for(&server),
            &args(1000, None),
            &mut out,
            None,
            cancel,
        )
        .await
        .unwrap();

        assert_eq!(printed, 0);
    }
}
