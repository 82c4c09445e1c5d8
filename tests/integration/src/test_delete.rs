//! Delete protocol integration tests.

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{
        US_EAST, client, patch_ok, post, post_ok, put_object, register_test_bucket,
        set_versioning,
    };

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_insert_delete_marker_on_enabled_bucket() {
        let client = client();
        let bucket = register_test_bucket(&client, "marker").await;
        set_versioning(&client, &bucket, true).await;
        put_object(&client, &bucket, "k", US_EAST, "push", "e1").await;

        let staged = post_ok(
            &client,
            "/start_delete_objects",
            &json!({
                "bucket": bucket,
                "object_identifiers": {"k": []},
            }),
        )
        .await;
        assert_eq!(staged["op_type"]["k"], "add");
        assert_eq!(staged["delete_markers"]["k"]["delete_marker"], true);
        assert!(staged["delete_markers"]["k"]["version_id"].is_u64());

        let ids: Vec<u64> = staged["locators"]["k"]
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["id"].as_u64().unwrap())
            .collect();
        let op_type = vec!["add"; ids.len()];
        patch_ok(
            &client,
            "/complete_delete_objects",
            &json!({"ids": ids, "op_type": op_type}),
        )
        .await;

        // The marker hides the key.
        let listed = post_ok(&client, "/list_objects", &json!({"bucket": bucket})).await;
        assert!(listed.as_array().unwrap().is_empty());
        let response = post(
            &client,
            "/locate_object",
            &json!({"bucket": bucket, "key": "k", "client_from_region": US_EAST}),
        )
        .await;
        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_remove_version_and_logical_row_on_explicit_delete() {
        let client = client();
        let bucket = register_test_bucket(&client, "verdel").await;
        set_versioning(&client, &bucket, true).await;
        let first = put_object(&client, &bucket, "k", US_EAST, "write_local", "e1").await;
        let v1 = first["locators"][0]["version"].as_u64().unwrap();

        let staged = post_ok(
            &client,
            "/start_delete_objects",
            &json!({
                "bucket": bucket,
                "object_identifiers": {"k": [v1]},
            }),
        )
        .await;
        assert_eq!(staged["op_type"]["k"], "delete");

        let ids: Vec<u64> = staged["locators"]["k"]
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["id"].as_u64().unwrap())
            .collect();
        let op_type = vec!["delete"; ids.len()];
        patch_ok(
            &client,
            "/complete_delete_objects",
            &json!({"ids": ids, "op_type": op_type}),
        )
        .await;

        // v1 was the only version: the logical row went with its last
        // locator.
        let response = post(
            &client,
            "/locate_object_status",
            &json!({"bucket": bucket, "key": "k", "client_from_region": US_EAST}),
        )
        .await;
        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_hard_delete_on_unversioned_bucket() {
        let client = client();
        let bucket = register_test_bucket(&client, "plaindel").await;
        put_object(&client, &bucket, "k", US_EAST, "push", "e1").await;

        let staged = post_ok(
            &client,
            "/start_delete_objects",
            &json!({
                "bucket": bucket,
                "object_identifiers": {"k": []},
            }),
        )
        .await;
        assert_eq!(staged["op_type"]["k"], "delete");
        assert_eq!(staged["delete_markers"]["k"]["delete_marker"], false);

        let ids: Vec<u64> = staged["locators"]["k"]
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["id"].as_u64().unwrap())
            .collect();
        let op_type = vec!["delete"; ids.len()];
        patch_ok(
            &client,
            "/complete_delete_objects",
            &json!({"ids": ids, "op_type": op_type}),
        )
        .await;

        let listed = post_ok(&client, "/list_objects", &json!({"bucket": bucket})).await;
        assert!(listed.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_400_on_version_ids_without_versioning() {
        let client = client();
        let bucket = register_test_bucket(&client, "delver").await;
        put_object(&client, &bucket, "k", US_EAST, "push", "e1").await;

        let response = post(
            &client,
            "/start_delete_objects",
            &json!({
                "bucket": bucket,
                "object_identifiers": {"k": [1]},
            }),
        )
        .await;
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_400_on_mismatched_complete_arrays() {
        let client = client();
        let response = crate::patch(
            &client,
            "/complete_delete_objects",
            &json!({"ids": [1, 2], "op_type": ["delete"]}),
        )
        .await;
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    }
}
