//! Versioning semantics integration tests.

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{
        US_EAST, client, post, post_ok, put_object, register_test_bucket, set_versioning,
    };

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_mint_growing_version_ids_when_enabled() {
        let client = client();
        let bucket = register_test_bucket(&client, "enabled").await;
        set_versioning(&client, &bucket, true).await;

        let first = put_object(&client, &bucket, "k", US_EAST, "write_local", "e1").await;
        let second = put_object(&client, &bucket, "k", US_EAST, "write_local", "e2").await;
        let v1 = first["locators"][0]["version"].as_u64().unwrap();
        let v2 = second["locators"][0]["version"].as_u64().unwrap();
        assert!(v2 > v1);

        let versions = post_ok(
            &client,
            "/list_objects_versioning",
            &json!({"bucket": bucket}),
        )
        .await;
        assert_eq!(versions.as_array().unwrap().len(), 2);

        let listed = post_ok(&client, "/list_objects", &json!({"bucket": bucket})).await;
        let listed = listed.as_array().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0]["etag"], "e2");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reuse_null_version_when_suspended() {
        let client = client();
        let bucket = register_test_bucket(&client, "suspended").await;
        set_versioning(&client, &bucket, false).await;

        let first = put_object(&client, &bucket, "k", US_EAST, "write_local", "e1").await;
        let v1 = first["locators"][0]["version"].as_u64().unwrap();

        let second = put_object(&client, &bucket, "k", US_EAST, "write_local", "e2").await;
        let v2 = second["locators"][0]["version"].as_u64().unwrap();
        assert_eq!(v1, v2, "null version is overwritten in place");

        let head = post_ok(
            &client,
            "/head_object",
            &json!({"bucket": bucket, "key": "k"}),
        )
        .await;
        assert_eq!(head["version_id"].as_u64(), Some(v1));
        assert_eq!(head["etag"], "e2");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_head_specific_versions() {
        let client = client();
        let bucket = register_test_bucket(&client, "headver").await;
        set_versioning(&client, &bucket, true).await;

        let first = put_object(&client, &bucket, "k", US_EAST, "write_local", "e1").await;
        let v1 = first["locators"][0]["version"].as_u64().unwrap();
        put_object(&client, &bucket, "k", US_EAST, "write_local", "e2").await;

        let head = post_ok(
            &client,
            "/head_object",
            &json!({"bucket": bucket, "key": "k", "version_id": v1}),
        )
        .await;
        assert_eq!(head["etag"], "e1");

        let latest = post_ok(
            &client,
            "/head_object",
            &json!({"bucket": bucket, "key": "k"}),
        )
        .await;
        assert_eq!(latest["etag"], "e2");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_404_head_on_unknown_version() {
        let client = client();
        let bucket = register_test_bucket(&client, "badver").await;
        set_versioning(&client, &bucket, true).await;
        put_object(&client, &bucket, "k", US_EAST, "write_local", "e1").await;

        let response = post(
            &client,
            "/head_object",
            &json!({"bucket": bucket, "key": "k", "version_id": 999_999}),
        )
        .await;
        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    }
}
