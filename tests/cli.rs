use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ARG_BODY: &str = r#"[{"page":1,"pages":1,"per_page":"100","total":3},[
  {"country":{"id":"AR","value":"Argentina"},"countryiso3code":"ARG","date":"2018","value":41.3},
  {"country":{"id":"AR","value":"Argentina"},"countryiso3code":"ARG","date":"2020","value":null},
  {"country":{"id":"AR","value":"Argentina"},"countryiso3code":"ARG","date":"2019","value":42.9}
]]"#;

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("gini").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("gini"))
        .stdout(predicate::str::contains("--history"));
}

#[test]
fn cli_rejects_bad_country_code_before_any_request() {
    let mut cmd = Command::cargo_bin("gini").unwrap();
    cmd.env("GINI_BASE_URL", "http://127.0.0.1:9/unused").arg("AR1");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid country code"));
}

#[test]
fn cli_rejects_bad_date() {
    let mut cmd = Command::cargo_bin("gini").unwrap();
    cmd.env("GINI_BASE_URL", "http://127.0.0.1:9/unused")
        .args(["ARG", "--date", "last-year"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid --date"));
}

async fn serve(status: u16, body: &'static str, content_type: &'static str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/en/country/ARG/indicator/SI.POV.GINI"))
        .respond_with(ResponseTemplate::new(status).set_body_raw(body, content_type))
        .mount(&server)
        .await;
    server
}

fn run(base: String, args: &'static [&'static str]) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("gini").unwrap();
    cmd.env("GINI_BASE_URL", base).args(args);
    cmd.assert()
}

#[tokio::test]
async fn cli_prints_summary_history_and_transform() {
    let server = serve(200, ARG_BODY, "application/json").await;
    let base = format!("{}/v2/en/country", server.uri());

    tokio::task::spawn_blocking(move || {
        run(base, &["arg", "-H", "-C", "--stats"])
            .success()
            .stdout(predicate::str::contains("Country:      Argentina"))
            .stdout(predicate::str::contains("Latest Year:  2019"))
            .stdout(predicate::str::contains("Latest GINI:  42.90"))
            .stdout(predicate::str::contains("Output:       43"))
            .stdout(predicate::str::contains(
                "Year: 2018, Index: 41.30\n  Year: 2019, Index: 42.90",
            ))
            .stdout(predicate::str::contains("count=2 missing=1"));
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn cli_reports_no_data_and_succeeds() {
    let server = serve(
        200,
        r#"[{"message":[{"id":"120","value":"No data available for this query"}]}]"#,
        "application/json",
    )
    .await;
    let base = format!("{}/v2/en/country", server.uri());

    tokio::task::spawn_blocking(move || {
        run(base, &["ARG"])
            .success()
            .stdout(predicate::str::contains("No GINI data points found for ARG"));
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn cli_fails_on_non_json_response() {
    let server = serve(200, "<html>Invalid value</html>", "text/html").await;
    let base = format!("{}/v2/en/country", server.uri());

    tokio::task::spawn_blocking(move || {
        run(base, &["ARG"])
            .failure()
            .stderr(predicate::str::contains("error fetching data for ARG"));
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn cli_exports_records() {
    let server = serve(200, ARG_BODY, "application/json").await;
    let base = format!("{}/v2/en/country", server.uri());
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("arg.json");
    let out_arg = out.to_string_lossy().to_string();

    tokio::task::spawn_blocking(move || {
        let mut cmd = Command::cargo_bin("gini").unwrap();
        cmd.env("GINI_BASE_URL", base)
            .args(["ARG", "--out", out_arg.as_str()]);
        cmd.assert().success();
    })
    .await
    .unwrap();

    let v: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(v.as_array().unwrap().len(), 3);
}
