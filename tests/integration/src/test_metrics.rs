//! Metrics sink integration tests.

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{client, post, post_ok};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_record_and_list_metrics() {
        let client = client();
        // Unique region per run keeps the count assertion stable against
        // other tests sharing the server.
        let region = format!("test:{}", uuid::Uuid::new_v4().simple());

        for latency in [0.010, 0.025] {
            let response = post(
                &client,
                "/record_metrics",
                &json!({
                    "requested_region": "aws:us-east-1",
                    "client_region": region,
                    "operation": "get_object",
                    "latency": latency,
                    "timestamp": chrono::Utc::now().to_rfc3339(),
                    "object_size": 1024,
                }),
            )
            .await;
            assert!(response.status().is_success());
        }

        let listed = post_ok(
            &client,
            "/list_metrics",
            &json!({"client_region": region}),
        )
        .await;
        assert_eq!(listed["count"], 2);
        assert_eq!(listed["metrics"].as_array().unwrap().len(), 2);
        assert_eq!(listed["metrics"][0]["operation"], "get_object");
    }
}
