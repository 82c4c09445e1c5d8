//! Upload protocol integration tests.

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{
        AP_SOUTH, EU_WEST, US_EAST, client, complete_all, post, post_ok, put_object,
        register_test_bucket,
    };

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_stage_push_upload_to_primary_and_warmup() {
        let client = client();
        let bucket = register_test_bucket(&client, "push").await;

        let staged = post_ok(
            &client,
            "/start_upload",
            &json!({
                "bucket": bucket,
                "key": "k",
                "client_from_region": AP_SOUTH,
                "policy": "push",
            }),
        )
        .await;

        let tags: Vec<&str> = staged["locators"]
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["tag"].as_str().unwrap())
            .collect();
        assert_eq!(tags, vec![US_EAST, EU_WEST]);
        assert!(staged["multipart_upload_id"].is_null());
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_conflict_on_unversioned_same_region_overwrite() {
        let client = client();
        let bucket = register_test_bucket(&client, "conflict").await;
        put_object(&client, &bucket, "k", US_EAST, "push", "e1").await;

        let response = post(
            &client,
            "/start_upload",
            &json!({
                "bucket": bucket,
                "key": "k",
                "client_from_region": US_EAST,
                "policy": "push",
            }),
        )
        .await;
        assert_eq!(response.status(), reqwest::StatusCode::CONFLICT);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_locate_object_after_complete() {
        let client = client();
        let bucket = register_test_bucket(&client, "locate").await;
        put_object(&client, &bucket, "k", US_EAST, "push", "e1").await;

        let located = post_ok(
            &client,
            "/locate_object",
            &json!({
                "bucket": bucket,
                "key": "k",
                "client_from_region": AP_SOUTH,
            }),
        )
        .await;
        // No locator in AP_SOUTH: the primary answers.
        assert_eq!(located["tag"], US_EAST);
        assert_eq!(located["size"], 42);
        assert_eq!(located["etag"], "e1");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_add_copy_on_read_replica() {
        let client = client();
        let bucket = register_test_bucket(&client, "cor").await;
        put_object(&client, &bucket, "k", US_EAST, "push", "e1").await;

        let staged = post_ok(
            &client,
            "/start_upload",
            &json!({
                "bucket": bucket,
                "key": "k",
                "client_from_region": AP_SOUTH,
                "policy": "copy_on_read",
            }),
        )
        .await;
        let locators = staged["locators"].as_array().unwrap();
        assert_eq!(locators.len(), 1);
        assert_eq!(locators[0]["tag"], AP_SOUTH);
        complete_all(&client, &staged, "copy_on_read", "e1").await;

        // Reads from the replica's region now hit it directly.
        let located = post_ok(
            &client,
            "/locate_object",
            &json!({
                "bucket": bucket,
                "key": "k",
                "client_from_region": AP_SOUTH,
            }),
        )
        .await;
        assert_eq!(located["tag"], AP_SOUTH);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_400_on_version_id_without_versioning() {
        let client = client();
        let bucket = register_test_bucket(&client, "nover").await;

        let response = post(
            &client,
            "/start_upload",
            &json!({
                "bucket": bucket,
                "key": "k",
                "client_from_region": US_EAST,
                "policy": "push",
                "version_id": 7,
            }),
        )
        .await;
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    }
}
