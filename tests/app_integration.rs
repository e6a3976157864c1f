use cnb_rates::core::{
    Currency, ExchangeRateProvider, FailureKind, FeedConnector, RateFeedClient, RecordingReporter,
};
use cnb_rates::providers::CnbFeed;
use rust_decimal_macros::dec;
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

mod test_utils {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const FEED_PATH: &str = "/selected.txt";

    pub async fn mount_feed_response(
        server: &MockServer,
        currency: &str,
        body: &str,
        status_code: u16,
    ) {
        Mock::given(method("GET"))
            .and(path(FEED_PATH))
            .and(query_param("currency", currency))
            .and(query_param("format", "text"))
            .respond_with(ResponseTemplate::new(status_code).set_body_string(body))
            .mount(server)
            .await;
    }

    /// Feed serving USD and JPY, nothing for XYZ and an outage for EUR.
    pub async fn create_feed_mock_server() -> MockServer {
        let mock_server = MockServer::start().await;
        mount_feed_response(
            &mock_server,
            "USD",
            "Country|Currency|Amount|Code\nUSA|Dollar|1|USD\n01.01.2024|22.500\n02.01.2024|22.750",
            200,
        )
        .await;
        mount_feed_response(
            &mock_server,
            "JPY",
            "Currency: JPY|Amount: 100\nDate|Rate\n29.12.2023|15.712\n02.01.2024|15.786\n",
            200,
        )
        .await;
        mount_feed_response(&mock_server, "XYZ", "", 200).await;
        mount_feed_response(&mock_server, "EUR", "Service Unavailable", 503).await;
        mock_server
    }

    pub fn feed_url(server: &MockServer) -> String {
        format!("{}{FEED_PATH}", server.uri())
    }
}

fn currencies(codes: &[&str]) -> Vec<Currency> {
    codes
        .iter()
        .map(|code| Currency::new(code).expect("valid currency code"))
        .collect()
}

#[test_log::test(tokio::test)]
async fn test_batch_against_mock_feed() {
    let mock_server = test_utils::create_feed_mock_server().await;
    let feed = CnbFeed::new(&test_utils::feed_url(&mock_server), Duration::from_secs(5));
    let reporter = Arc::new(RecordingReporter::new());
    let provider = ExchangeRateProvider::new(feed).with_reporter(reporter.clone());

    let rates = provider
        .get_exchange_rates(&currencies(&["USD", "EUR", "XYZ", "JPY"]))
        .await;
    info!(?rates, "Received rates from mock feed");

    let summary: Vec<(&str, &str, rust_decimal::Decimal)> = rates
        .iter()
        .map(|rate| {
            (
                rate.source_currency().code(),
                rate.target_currency().code(),
                rate.value(),
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![("CZK", "USD", dec!(22.750)), ("CZK", "JPY", dec!(0.15786))]
    );

    // XYZ has no data and is not a failure
    let failures = reporter.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].currency_code, "EUR");
    assert_eq!(failures[0].kind, FailureKind::Transport);
}

#[test_log::test(tokio::test)]
async fn test_only_published_currency_is_returned() {
    let mock_server = test_utils::create_feed_mock_server().await;
    let feed = CnbFeed::new(&test_utils::feed_url(&mock_server), Duration::from_secs(5));
    let provider = ExchangeRateProvider::new(feed).with_concurrency(1);

    let rates = provider
        .get_exchange_rates(&currencies(&["USD", "XYZ"]))
        .await;

    assert_eq!(rates.len(), 1);
    assert_eq!(rates[0].target_currency().code(), "USD");
    assert_eq!(rates[0].value(), dec!(22.75));
}

#[test_log::test(tokio::test)]
async fn test_malformed_body_is_reported_as_parse_failure() {
    let mock_server = wiremock::MockServer::start().await;
    test_utils::mount_feed_response(&mock_server, "GBP", "<html>Maintenance</html>", 200).await;
    let feed = CnbFeed::new(&test_utils::feed_url(&mock_server), Duration::from_secs(5));
    let reporter = Arc::new(RecordingReporter::new());
    let provider = ExchangeRateProvider::new(feed).with_reporter(reporter.clone());

    let rates = provider.get_exchange_rates(&currencies(&["GBP"])).await;

    assert!(rates.is_empty());
    let failures = reporter.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].kind, FailureKind::Parse);
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_with_mock() {
    let mock_server = test_utils::create_feed_mock_server().await;

    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    let config_path = config_file.path();
    let config_content = format!(
        r#"
        currencies: [USD, EUR, XYZ, JPY]
        feed:
          base_url: {}
          timeout_secs: 5
          concurrency: 2
    "#,
        test_utils::feed_url(&mock_server)
    );
    fs::write(config_path, &config_content).expect("Failed to write config file");

    for format in [
        cnb_rates::cli::rates::OutputFormat::Table,
        cnb_rates::cli::rates::OutputFormat::Json,
    ] {
        let result = cnb_rates::run_command(
            cnb_rates::AppCommand::Rates {
                currencies: Vec::new(),
                format,
            },
            Some(config_path.to_str().unwrap()),
        )
        .await;
        assert!(
            result.is_ok(),
            "run_command failed with: {:?}",
            result.err()
        );
    }
}

#[test_log::test(tokio::test)]
async fn test_missing_config_file_is_an_error() {
    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = dir.path().join("missing.yaml");

    let result = cnb_rates::run_command(
        cnb_rates::AppCommand::Rates {
            currencies: currencies(&["USD"]),
            format: cnb_rates::cli::rates::OutputFormat::Table,
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(result.is_err());
}

#[test_log::test(tokio::test)]
#[ignore = "hits the live CNB feed"]
async fn test_real_cnb_feed() {
    let feed = CnbFeed::default();
    let client = feed.connect().expect("Failed to build client");
    let window = cnb_rates::core::DateWindow::ending_on(chrono::Local::now().date_naive(), 1);

    match client.fetch("USD", &window).await {
        Ok(body) => {
            info!(%body, "Received live feed response");
            let rate = cnb_rates::core::parse_rate(&body).expect("Failed to parse live body");
            assert!(rate > rust_decimal::Decimal::ZERO, "Rate should be positive");
        }
        Err(e) => {
            error!("CNB feed request failed: {e}\n{e:?}");
            panic!("CNB feed request failed: {e}");
        }
    }
}
