//! Locate / warmup / status integration tests.

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{
        AP_SOUTH, EU_WEST, US_EAST, client, post, post_ok, put_object, register_test_bucket,
    };

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_answer_health_probe() {
        let client = client();
        let response = client
            .get(format!("{}/healthz", crate::endpoint_url()))
            .send()
            .await
            .expect("health request");
        assert!(response.status().is_success());
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_prefer_client_region_over_primary() {
        let client = client();
        let bucket = register_test_bucket(&client, "tiebreak").await;
        put_object(&client, &bucket, "k", US_EAST, "push", "e1").await;

        // The push fanned out to the warmup region too.
        let located = post_ok(
            &client,
            "/locate_object",
            &json!({"bucket": bucket, "key": "k", "client_from_region": EU_WEST}),
        )
        .await;
        assert_eq!(located["tag"], EU_WEST);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_stage_warmup_into_plain_region() {
        let client = client();
        let bucket = register_test_bucket(&client, "warm").await;
        put_object(&client, &bucket, "k", US_EAST, "write_local", "e1").await;

        let staged = post_ok(
            &client,
            "/start_warmup",
            &json!({
                "bucket": bucket,
                "key": "k",
                "warmup_regions": [US_EAST, AP_SOUTH],
            }),
        )
        .await;
        assert_eq!(staged["src_locator"]["tag"], US_EAST);
        let dsts = staged["dst_locators"].as_array().unwrap();
        assert_eq!(dsts.len(), 1, "the primary's own region is skipped");
        assert_eq!(dsts[0]["tag"], AP_SOUTH);
        assert_eq!(dsts[0]["version_id"], staged["src_locator"]["version_id"]);

        // The staged replica is visible as pending.
        let statuses = post_ok(
            &client,
            "/locate_object_status",
            &json!({"bucket": bucket, "key": "k", "client_from_region": AP_SOUTH}),
        )
        .await;
        let statuses: Vec<&str> = statuses
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["status"].as_str().unwrap())
            .collect();
        assert!(statuses.contains(&"pending"));
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_404_on_unknown_key() {
        let client = client();
        let bucket = register_test_bucket(&client, "missing").await;
        let response = post(
            &client,
            "/locate_object",
            &json!({"bucket": bucket, "key": "nope", "client_from_region": US_EAST}),
        )
        .await;
        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_404_on_unknown_operation_path() {
        let client = client();
        let response = post(&client, "/no_such_operation", &json!({})).await;
        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    }
}
