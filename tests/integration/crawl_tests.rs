//! Integration tests for the crawler
//!
//! These tests use wiremock to serve profile pages and test the full
//! fetch, extract, accumulate and checkpoint cycle end-to-end.

use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use swimmer_crawler::config::Config;
use swimmer_crawler::crawler::{build_http_client, fetch_profile, Coordinator, FetchOutcome};
use swimmer_crawler::{CrawlerError, SwimmerRecord};
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(
    base_url: &str,
    start_id: u64,
    end_id: u64,
    batch_size: u64,
    output_dir: &Path,
) -> Config {
    let mut config = Config::default();
    config.crawler.start_id = start_id;
    config.crawler.end_id = end_id;
    config.crawler.batch_size = batch_size;
    config.crawler.batch_delay_ms = 0; // No throttling in tests
    config.http.profile_url_template = format!("{}/sportivi/detalii/{{id}}", base_url);
    config.http.user_agent = "TestBot/1.0".to_string();
    config.http.timeout_secs = 5;
    config.output.output_dir = output_dir.to_path_buf();
    config
}

/// Renders a profile page in the catalog's layout
fn profile_page(name: &str, birth_year: &str, history: &str) -> String {
    format!(
        r#"<html><head><title>Detalii sportiv</title></head><body>
        <h1>{}</h1>
        <ul id="sportiv-date">
            <li class="group"><span>Sexul</span><span>F</span></li>
            <li class="group"><span>Anul nasterii</span><span>{}</span></li>
            <li class="group"><span>Legitimat la clubul</span><span>CSM Constanța</span></li>
            <li class="group"><span>Numar legitimatie LPIN</span><span>LP-77</span></li>
        </ul>
        <div id="istoric" class="open group">
            <div class="istoric-rezultate">{}</div>
        </div>
        </body></html>"#,
        name, birth_year, history
    )
}

fn event_row(name: &str, time: &str, place: &str) -> String {
    format!(
        r#"<li class="grid grid-pad">
            <div class="col-6-12">{}</div>
            <div class="col-3-12">Timp realizat: {}</div>
            <div class="col-3-12">Locul obtinut: {}</div>
        </li>"#,
        name, time, place
    )
}

fn competition(title: &str, rows: &str) -> String {
    format!(
        r#"<div class="box"><div class="box_titlu">{}</div><ul>{}</ul></div>"#,
        title, rows
    )
}

fn default_history() -> String {
    competition(
        "Cupa Litoralului 2 June 2023 - 4 June 2023",
        &event_row("50m liber", "00:31.50", "3"),
    )
}

async fn mount_profile(server: &MockServer, id: u64, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("/sportivi/detalii/{}", id)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

async fn mount_status(server: &MockServer, id: u64, status: u16) {
    Mock::given(method("GET"))
        .and(path(format!("/sportivi/detalii/{}", id)))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

fn read_dataset(path: &Path) -> Vec<SwimmerRecord> {
    let text = std::fs::read_to_string(path).expect("Failed to read dataset");
    serde_json::from_str(&text).expect("Dataset is not valid JSON")
}

fn snapshot_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("Failed to list output dir")
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with("swimmers_data_"))
        .collect();
    names.sort();
    names
}

/// Log sink shared with a scoped subscriber
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

#[tokio::test]
async fn test_single_batch_run() {
    let mock_server = MockServer::start().await;
    let output_dir = tempdir().unwrap();

    for id in 100..=109 {
        match id {
            105 => mount_status(&mock_server, id, 404).await,
            106 => {
                mount_profile(
                    &mock_server,
                    id,
                    "<html><body><p>Sportivul nu exista</p></body></html>".to_string(),
                )
                .await
            }
            _ => {
                mount_profile(
                    &mock_server,
                    id,
                    profile_page(&format!("Înotător {}", id), "2010", &default_history()),
                )
                .await
            }
        }
    }

    let config = create_test_config(&mock_server.uri(), 100, 109, 10, output_dir.path());
    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let stats = coordinator.run().await.expect("Crawl failed");

    assert_eq!(stats.batches_completed, 1);
    assert_eq!(stats.records_collected, 8);
    assert_eq!(stats.not_found, 2);
    assert_eq!(stats.transport_failures, 0);

    // One canonical file and one snapshot
    let records = read_dataset(&output_dir.path().join("swimmers_data.json"));
    assert_eq!(records.len(), 8);
    assert_eq!(snapshot_files(output_dir.path()).len(), 1);
    assert!(!output_dir.path().join("swimmers_data.json.tmp").exists());

    // Absent identifiers are excluded, present ones appear exactly once
    let mut ids: Vec<u64> = records.iter().map(|r| r.id).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![100, 101, 102, 103, 104, 107, 108, 109]);

    let record = records.iter().find(|r| r.id == 101).unwrap();
    assert_eq!(record.name, "Înotător 101");
    assert_eq!(record.gender.as_deref(), Some("F"));
    assert_eq!(record.birth_year, Some(2010));
    assert_eq!(record.club.as_deref(), Some("CSM Constanța"));
    assert_eq!(record.lpin_license.as_deref(), Some("LP-77"));
    assert_eq!(record.federation_license, None);
    assert_eq!(record.competitions.len(), 1);
    assert_eq!(record.competitions[0].events[0].time, "00:31.50");
    assert_eq!(record.competitions[0].events[0].place, "3");
}

#[tokio::test]
async fn test_malformed_event_row_dropped() {
    let mock_server = MockServer::start().await;
    let output_dir = tempdir().unwrap();

    let malformed = r#"<li class="grid grid-pad">
        <div class="col-6-12">100m fluture</div>
        <div class="col-3-12">Timp realizat: 01:20.00</div>
    </li>"#;
    let history = competition(
        "Spring Cup 12 March 2023 - 15 March 2023",
        &format!("{}{}", event_row("50m bras", "00:41.00", "2"), malformed),
    );
    mount_profile(&mock_server, 1, profile_page("Elena Radu", "2008", &history)).await;

    let config = create_test_config(&mock_server.uri(), 1, 1, 10, output_dir.path());
    Coordinator::new(config).unwrap().run().await.expect("Crawl failed");

    let records = read_dataset(&output_dir.path().join("swimmers_data.json"));
    assert_eq!(records.len(), 1);
    let competitions = &records[0].competitions;
    assert_eq!(competitions.len(), 1);
    assert_eq!(competitions[0].name, "Spring Cup");
    assert_eq!(competitions[0].start_date, "12 March 2023");
    assert_eq!(competitions[0].end_date, "15 March 2023");
    assert_eq!(competitions[0].events.len(), 1);
    assert_eq!(competitions[0].events[0].name, "50m bras");
}

#[tokio::test]
async fn test_non_numeric_birth_year() {
    let mock_server = MockServer::start().await;
    let output_dir = tempdir().unwrap();

    mount_profile(
        &mock_server,
        7,
        profile_page("Andrei Stan", "n/a", &default_history()),
    )
    .await;

    let config = create_test_config(&mock_server.uri(), 7, 7, 1, output_dir.path());
    Coordinator::new(config).unwrap().run().await.expect("Crawl failed");

    let records = read_dataset(&output_dir.path().join("swimmers_data.json"));
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].birth_year, None);
    assert_eq!(records[0].gender.as_deref(), Some("F"));
    assert_eq!(records[0].club.as_deref(), Some("CSM Constanța"));
    assert_eq!(records[0].competitions.len(), 1);

    // Absent birth year is omitted rather than written as zero
    let text = std::fs::read_to_string(output_dir.path().join("swimmers_data.json")).unwrap();
    assert!(!text.contains("birth_year"));
}

#[tokio::test]
async fn test_not_found_logs_warning() {
    let mock_server = MockServer::start().await;
    mount_status(&mock_server, 404, 404).await;

    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let client = build_http_client(&Config::default().http).unwrap();
    let outcome = fetch_profile(
        &client,
        404,
        format!("{}/sportivi/detalii/404", mock_server.uri()),
    )
    .await;

    assert!(matches!(
        outcome,
        FetchOutcome::NotFound {
            status_code: Some(404)
        }
    ));

    let output = logs.contents();
    assert!(output.contains("WARN"));
    assert!(output.contains("swimmer ID 404"));
    assert!(output.contains("Status: 404"));
}

#[tokio::test]
async fn test_server_error_counts_as_not_found() {
    let mock_server = MockServer::start().await;
    let output_dir = tempdir().unwrap();

    mount_status(&mock_server, 1, 500).await;
    mount_profile(&mock_server, 2, profile_page("Ioana Pop", "2012", "")).await;

    let config = create_test_config(&mock_server.uri(), 1, 2, 2, output_dir.path());
    let stats = Coordinator::new(config).unwrap().run().await.unwrap();

    assert_eq!(stats.not_found, 1);
    let records = read_dataset(&output_dir.path().join("swimmers_data.json"));
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, 2);
    assert!(records[0].competitions.is_empty());
}

#[tokio::test]
async fn test_timeout_is_transport_failure() {
    let mock_server = MockServer::start().await;
    let output_dir = tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/sportivi/detalii/3"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(profile_page("Slow", "2000", ""))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;
    mount_profile(&mock_server, 4, profile_page("Fast", "2001", "")).await;

    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let mut config = create_test_config(&mock_server.uri(), 3, 4, 2, output_dir.path());
    config.http.timeout_secs = 1;
    let stats = Coordinator::new(config).unwrap().run().await.unwrap();

    assert_eq!(stats.transport_failures, 1);
    let records = read_dataset(&output_dir.path().join("swimmers_data.json"));
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "Fast");

    let output = logs.contents();
    let failure_line = output
        .lines()
        .find(|line| line.contains("Error fetching data for swimmer ID 3:"))
        .expect("transport failure should be logged");
    assert!(failure_line.contains("ERROR"));
    assert!(failure_line.contains("Request timeout"));
    assert!(!output.contains("swimmer ID 4:"));
}

#[tokio::test]
async fn test_checkpoint_after_every_batch() {
    let mock_server = MockServer::start().await;
    let output_dir = tempdir().unwrap();

    for id in 0..=24 {
        if id % 5 == 0 {
            mount_status(&mock_server, id, 404).await;
        } else {
            mount_profile(
                &mock_server,
                id,
                profile_page(&format!("Swimmer {}", id), "2011", &default_history()),
            )
            .await;
        }
    }

    let config = create_test_config(&mock_server.uri(), 0, 24, 10, output_dir.path());
    let stats = Coordinator::new(config).unwrap().run().await.unwrap();

    assert_eq!(stats.batches_completed, 3);
    assert_eq!(stats.identifiers_processed, 25);
    assert_eq!(stats.records_collected, 20);

    // One snapshot per batch, none overwritten even within the same second
    let snapshots = snapshot_files(output_dir.path());
    assert_eq!(snapshots.len(), 3);

    let mut sizes: Vec<usize> = snapshots
        .iter()
        .map(|name| read_dataset(&output_dir.path().join(name)).len())
        .collect();
    sizes.sort_unstable();
    assert_eq!(sizes, vec![8, 16, 20]);

    // Canonical file matches the final batch
    let records = read_dataset(&output_dir.path().join("swimmers_data.json"));
    assert_eq!(records.len(), 20);

    // Batches are appended in order: the first 8 records come from IDs 0..=9
    assert!(records[..8].iter().all(|r| r.id <= 9));
    assert!(records[8..16].iter().all(|r| (10..=19).contains(&r.id)));
}

#[tokio::test]
async fn test_persistence_failure_is_fatal() {
    let mock_server = MockServer::start().await;
    let scratch = tempdir().unwrap();

    // A regular file where the output directory should be
    let blocked = scratch.path().join("blocked");
    std::fs::write(&blocked, b"not a directory").unwrap();

    for id in 0..=5 {
        mount_profile(
            &mock_server,
            id,
            profile_page(&format!("Swimmer {}", id), "2011", ""),
        )
        .await;
    }

    let config = create_test_config(&mock_server.uri(), 0, 5, 3, &blocked);
    let result = Coordinator::new(config).unwrap().run().await;

    assert!(matches!(result, Err(CrawlerError::Output(_))));

    // The run stops after the first batch fails to persist
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
}
