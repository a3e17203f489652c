//! Query command implementation

use crate::cli::output::format_response;
use crate::cli::{load_config_with_overrides, QueryArgs};
use crate::client::ApiClient;
use crate::config::OrionConfig;
use crate::query::{Query, QueryOptions};

/// Handle `orion query` command
pub async fn run_query(args: &QueryArgs) -> Result<String, Box<dyn std::error::Error>> {
    let config = load_config_with_overrides(&args.connection)?;
    crate::logging::init_tracing(&config.logging)?;
    tracing::debug!(?config, "Loaded configuration");

    execute_query(&config, args).await
}

/// Fetch once and render the response. A fetch error becomes the command error.
pub async fn execute_query(
    config: &OrionConfig,
    args: &QueryArgs,
) -> Result<String, Box<dyn std::error::Error>> {
    let client = ApiClient::from_config(&config.api)?;
    let body = args.filter.to_filter()?;

    let query = Query::new(
        client,
        Some(args.endpoint.endpoint()),
        body,
        QueryOptions::default(),
        0,
    )?;

    let snapshot = query
        .subscribe()
        .wait_for(|s| s.fetch_count > 0 && !s.loading)
        .await?
        .clone();

    if let Some(error) = snapshot.error {
        return Err(error.into());
    }

    match snapshot.response {
        Some(response) => Ok(format_response(&response, args.json)),
        None => Err("query settled without a response".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{BodyArgs, ConnectionArgs};
    use crate::endpoints::EndpointName;
    use serde_json::json;
    use std::path::PathBuf;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn args(endpoint: EndpointName, filter: BodyArgs) -> QueryArgs {
        QueryArgs {
            endpoint,
            filter,
            json: true,
            connection: ConnectionArgs {
                config: PathBuf::from("nonexistent.toml"),
                api_url: None,
                log_level: None,
            },
        }
    }

    fn config_for(server: &MockServer) -> OrionConfig {
        let mut config = OrionConfig::default();
        config.api.base_url = server.uri();
        config
    }

    #[tokio::test]
    async fn test_query_prints_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/flow_runs/count/"))
            .and(body_json(json!({"limit": 3})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(42)))
            .expect(1)
            .mount(&server)
            .await;

        let filter = BodyArgs {
            limit: Some(3),
            ..Default::default()
        };
        let output = execute_query(&config_for(&server), &args(EndpointName::FlowRunsCount, filter))
            .await
            .unwrap();

        assert_eq!(output, "42");
    }

    #[tokio::test]
    async fn test_query_http_error_is_command_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/settings"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = execute_query(
            &config_for(&server),
            &args(EndpointName::Settings, BodyArgs::default()),
        )
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), "HTTP 500: Internal Server Error");
    }
}
