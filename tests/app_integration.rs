use std::fs;
use tracing::info;

// Adds automatic logging to test
mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn create_mock_server() -> MockServer {
        MockServer::start().await
    }

    pub async fn mock_get(server: &MockServer, endpoint: &str, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(server)
            .await;
    }

    pub fn write_config(base_url: &str) -> tempfile::NamedTempFile {
        let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        let config_content = format!(
            r#"
api:
  base_url: "{base_url}"
feeds:
  quotes_interval_secs: 1
  limits_interval_secs: 1
  history_interval_secs: 1
"#
        );
        std::fs::write(config_file.path(), config_content).expect("Failed to write config file");
        config_file
    }
}

const QUOTES_BODY: &str = r#"[
    {
        "symbol": "BTC/USD",
        "name": "Bitcoin US Dollar",
        "currentPrice": 64250.5,
        "percentChange": 2.31,
        "exchange": "Coinbase Pro",
        "timestamp": 1754450000000
    },
    {
        "symbol": "ETH/USD",
        "name": "Ethereum US Dollar",
        "currentPrice": 3120.75,
        "percentChange": -0.42,
        "exchange": "Coinbase Pro",
        "timestamp": 1754450000000
    }
]"#;

const HISTORY_BODY: &str = r#"{
    "symbol": "BTC/USD",
    "name": "Bitcoin",
    "history": [
        {"date": "2026-08-04", "open": 63000.0, "high": 65100.0,
         "low": 62800.0, "close": 64250.5, "volume": "12345"},
        {"date": "2026-08-05", "open": 64250.5, "high": 64800.0,
         "low": 63500.0, "close": 64100.0, "volume": null}
    ],
    "minPrice": 62800.0,
    "maxPrice": 65100.0,
    "avgPrice": 64175.25
}"#;

const LIMITS_BODY: &str = r#"{
    "monthlyUsed": 450,
    "monthlyLimit": 500,
    "monthlyRemaining": 50,
    "monthlyPercentage": 90.0,
    "minuteUsed": 5,
    "minuteLimit": 20,
    "minuteRemaining": 15,
    "warningLevel": true
}"#;

#[test_log::test(tokio::test)]
async fn test_full_quotes_flow_with_mock() {
    let mock_server = test_utils::create_mock_server().await;
    test_utils::mock_get(&mock_server, "/indices", 200, QUOTES_BODY).await;
    let config_file = test_utils::write_config(&mock_server.uri());

    info!("Running quotes command against mock backend");
    let result = cryptick::run_command(
        cryptick::AppCommand::Quotes,
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Quotes command failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_full_history_flow_accepts_display_symbol() {
    let mock_server = test_utils::create_mock_server().await;
    // The backend only answers the route form; passing the display form on
    // the command line must still land here.
    test_utils::mock_get(&mock_server, "/indices/BTC-USD/history", 200, HISTORY_BODY).await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let result = cryptick::run_command(
        cryptick::AppCommand::History {
            symbol: "BTC/USD".to_string(),
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "History command failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_full_history_flow_accepts_route_symbol() {
    let mock_server = test_utils::create_mock_server().await;
    test_utils::mock_get(&mock_server, "/indices/BTC-USD/history", 200, HISTORY_BODY).await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let result = cryptick::run_command(
        cryptick::AppCommand::History {
            symbol: "BTC-USD".to_string(),
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "History command failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_full_limits_flow_with_mock() {
    let mock_server = test_utils::create_mock_server().await;
    test_utils::mock_get(&mock_server, "/meta/limits", 200, LIMITS_BODY).await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let result = cryptick::run_command(
        cryptick::AppCommand::Limits,
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Limits command failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_backend_error_fails_the_command() {
    let mock_server = test_utils::create_mock_server().await;
    test_utils::mock_get(&mock_server, "/indices", 500, "").await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let result = cryptick::run_command(
        cryptick::AppCommand::Quotes,
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_err(), "A 500 from the backend must surface");
}

#[test_log::test(tokio::test)]
async fn test_missing_config_file_fails_with_context() {
    let result = cryptick::run_command(
        cryptick::AppCommand::Quotes,
        Some("/nonexistent/cryptick/config.yaml"),
    )
    .await;
    assert!(result.is_err());
    let message = format!("{:?}", result.err().unwrap());
    assert!(message.contains("Failed to read config file"), "{message}");
}

#[test_log::test(tokio::test)]
async fn test_config_defaults_are_applied() {
    // A config with only the api section still runs; feed cadences come
    // from defaults.
    let mock_server = test_utils::create_mock_server().await;
    test_utils::mock_get(&mock_server, "/meta/limits", 200, LIMITS_BODY).await;

    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    fs::write(
        config_file.path(),
        format!("api:\n  base_url: \"{}\"\n", mock_server.uri()),
    )
    .expect("Failed to write config file");

    let result = cryptick::run_command(
        cryptick::AppCommand::Limits,
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Failed with: {:?}", result.err());
}
