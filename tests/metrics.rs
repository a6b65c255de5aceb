//! Counters recorded by the notification cycle.
//!
//! This binary installs the global recorder, so it holds a single test.

mod helpers;

use helpers::{mock_dispatcher::MockDispatcher, sample_report, test_metrics::TestMetrics};
use tower_notify::config::{Config, GotifyConfig, InfluxConfig, SlackConfig, TeamsConfig};
use tower_notify::notification::Notifier;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn influx_config(host: &str) -> InfluxConfig {
    InfluxConfig {
        enabled: true,
        host: host.to_string(),
        database: "watchtower".to_string(),
        measurement: "scans".to_string(),
        ..Default::default()
    }
}

fn config(influx_host: &str) -> Config {
    Config {
        notifiers: vec![
            "slack".to_string(),
            "msteams".to_string(),
            "gotify".to_string(),
        ],
        // Two path segments instead of three.
        slack: SlackConfig {
            hook_url: "https://hooks.slack.com/services/aaa/bbb".to_string(),
            ..Default::default()
        },
        teams: TeamsConfig {
            hook_url: "https://outlook.office.com/webhook/ta/IncomingWebhook/tb/tc".to_string(),
        },
        gotify: GotifyConfig {
            url: "https://gotify.lan".to_string(),
            token: "aaa".to_string(),
        },
        influxdb: influx_config(influx_host),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_cycle_counters() {
    let metrics = TestMetrics::new();
    metrics::set_global_recorder(metrics.clone()).unwrap();

    let broken = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/write"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&broken)
        .await;
    let healthy = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/write"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&healthy)
        .await;
    let dispatcher = MockDispatcher::failing("teams://");

    // Cycle 1: malformed slack, refused teams, gotify sent, export fails.
    let notifier = Notifier::from_config(&config(&broken.uri()), "docker-01").unwrap();
    let cycle = notifier.notify(&sample_report(), &dispatcher).await;
    assert_eq!(cycle.failures().count(), 3);

    assert_eq!(metrics.provider_counter("notifications_sent_total", "gotify"), 1);
    assert_eq!(metrics.provider_counter("notifications_failed_total", "slack"), 1);
    assert_eq!(metrics.provider_counter("notifications_failed_total", "msteams"), 1);
    assert_eq!(metrics.provider_counter("notifications_sent_total", "msteams"), 0);
    assert_eq!(metrics.provider_counter("notifications_failed_total", "gotify"), 0);
    assert_eq!(metrics.get_counter("stats_export_failures_total"), 1);
    assert_eq!(metrics.get_counter("stats_exports_total"), 0);

    // Cycle 2: the export goes through.
    let notifier = Notifier::from_config(&config(&healthy.uri()), "docker-01").unwrap();
    notifier.notify(&sample_report(), &dispatcher).await;

    assert_eq!(metrics.provider_counter("notifications_sent_total", "gotify"), 2);
    assert_eq!(metrics.provider_counter("notifications_failed_total", "slack"), 2);
    assert_eq!(metrics.get_counter("stats_exports_total"), 1);
    assert_eq!(metrics.get_counter("stats_export_failures_total"), 1);
}
