//! Integration tests for the Stratus control-plane server.
//!
//! These tests require a running server at `localhost:3000`. They are
//! marked `#[ignore]` so they don't run during normal `cargo test`.
//!
//! Run them with:
//! ```text
//! cargo test -p stratus-integration -- --ignored
//! ```

use std::sync::Once;

use serde_json::{Value, json};

/// Primary region of every test bucket.
pub const US_EAST: &str = "aws:us-east-1";
/// Warmup region of every test bucket.
pub const EU_WEST: &str = "aws:eu-west-1";
/// Plain (non-warmup) region of every test bucket.
pub const AP_SOUTH: &str = "gcp:ap-south-1";

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Endpoint URL for the control-plane server.
#[must_use]
pub fn endpoint_url() -> String {
    std::env::var("STRATUS_ENDPOINT_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned())
}

/// Create an HTTP client for the test run.
#[must_use]
pub fn client() -> reqwest::Client {
    init_tracing();
    reqwest::Client::new()
}

/// POST a JSON body to a control-plane path.
pub async fn post(client: &reqwest::Client, path: &str, body: &Value) -> reqwest::Response {
    client
        .post(format!("{}{path}", endpoint_url()))
        .json(body)
        .send()
        .await
        .unwrap_or_else(|e| panic!("POST {path} failed: {e}"))
}

/// PATCH a JSON body to a control-plane path.
pub async fn patch(client: &reqwest::Client, path: &str, body: &Value) -> reqwest::Response {
    client
        .patch(format!("{}{path}", endpoint_url()))
        .json(body)
        .send()
        .await
        .unwrap_or_else(|e| panic!("PATCH {path} failed: {e}"))
}

/// POST and decode the 200 JSON response, panicking on any other status.
pub async fn post_ok(client: &reqwest::Client, path: &str, body: &Value) -> Value {
    let response = post(client, path, body).await;
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    assert!(status.is_success(), "POST {path} -> {status}: {text}");
    serde_json::from_str(&text).unwrap_or_else(|e| panic!("POST {path} bad JSON: {e}"))
}

/// PATCH and require a 200.
pub async fn patch_ok(client: &reqwest::Client, path: &str, body: &Value) {
    let response = patch(client, path, body).await;
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    assert!(status.is_success(), "PATCH {path} -> {status}: {text}");
}

/// Generate a unique bucket name for a test.
#[must_use]
pub fn test_bucket_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().simple().to_string()[..8].to_owned();
    format!("test-{prefix}-{id}")
}

/// Register a three-region bucket (`US_EAST` primary, `EU_WEST` warmup,
/// `AP_SOUTH` plain) and return its name.
pub async fn register_test_bucket(client: &reqwest::Client, prefix: &str) -> String {
    let bucket = test_bucket_name(prefix);
    let locator = |tag: &str, is_primary: bool, need_warmup: bool| {
        let (cloud, region) = tag.split_once(':').unwrap();
        json!({
            "location_tag": tag,
            "cloud": cloud,
            "region": region,
            "bucket": format!("phys-{region}-{bucket}"),
            "prefix": "",
            "is_primary": is_primary,
            "need_warmup": need_warmup,
        })
    };
    let body = json!({
        "bucket": bucket,
        "locators": [
            locator(US_EAST, true, false),
            locator(EU_WEST, false, true),
            locator(AP_SOUTH, false, false),
        ],
    });
    let response = post(client, "/register_bucket", &body).await;
    assert!(
        response.status().is_success(),
        "failed to register bucket {bucket}",
    );
    bucket
}

/// Enable or suspend versioning on a bucket.
pub async fn set_versioning(client: &reqwest::Client, bucket: &str, enabled: bool) {
    let response = post(
        client,
        "/set_versioning",
        &json!({"bucket": bucket, "enabled": enabled}),
    )
    .await;
    assert!(response.status().is_success());
}

/// Start and complete a whole-object upload, returning the
/// `start_upload` response value.
pub async fn put_object(
    client: &reqwest::Client,
    bucket: &str,
    key: &str,
    region: &str,
    policy: &str,
    etag: &str,
) -> Value {
    let staged = post_ok(
        client,
        "/start_upload",
        &json!({
            "bucket": bucket,
            "key": key,
            "client_from_region": region,
            "policy": policy,
            "is_multipart": false,
        }),
    )
    .await;
    complete_all(client, &staged, policy, etag).await;
    staged
}

/// Complete every locator of a `start_upload` response.
pub async fn complete_all(client: &reqwest::Client, staged: &Value, policy: &str, etag: &str) {
    for locator in staged["locators"].as_array().expect("locators array") {
        let id = locator["id"].as_u64().expect("locator id");
        patch_ok(
            client,
            "/complete_upload",
            &json!({
                "id": id,
                "version_id": format!("cv-{id}"),
                "size": 42,
                "etag": etag,
                "last_modified": chrono::Utc::now().to_rfc3339(),
                "policy": policy,
            }),
        )
        .await;
    }
}

mod test_delete;
mod test_locate;
mod test_metrics;
mod test_multipart;
mod test_upload;
mod test_versioning;
