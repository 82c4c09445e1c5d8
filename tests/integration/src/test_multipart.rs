//! Multipart upload integration tests.

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{EU_WEST, US_EAST, client, patch_ok, post_ok, register_test_bucket};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_drive_multipart_upload_end_to_end() {
        let client = client();
        let bucket = register_test_bucket(&client, "mpu").await;

        let staged = post_ok(
            &client,
            "/start_upload",
            &json!({
                "bucket": bucket,
                "key": "big",
                "client_from_region": US_EAST,
                "policy": "push",
                "is_multipart": true,
            }),
        )
        .await;
        let upload_id = staged["multipart_upload_id"].as_str().unwrap().to_owned();
        let locators = staged["locators"].as_array().unwrap().clone();
        assert_eq!(locators.len(), 2);

        // Record the per-region cloud upload ids.
        for locator in &locators {
            let id = locator["id"].as_u64().unwrap();
            patch_ok(
                &client,
                "/set_multipart_id",
                &json!({"id": id, "multipart_upload_id": format!("cloud-{id}")}),
            )
            .await;
        }

        // Commit two parts on the primary.
        let primary = locators.iter().find(|l| l["tag"] == US_EAST).unwrap();
        let primary_id = primary["id"].as_u64().unwrap();
        for part_number in 1..=2 {
            patch_ok(
                &client,
                "/append_part",
                &json!({
                    "id": primary_id,
                    "part_number": part_number,
                    "etag": format!("pe-{part_number}"),
                    "size": 5_242_880,
                }),
            )
            .await;
        }

        // Siblings report their cloud ids and parts.
        let siblings = post_ok(
            &client,
            "/continue_upload",
            &json!({
                "bucket": bucket,
                "key": "big",
                "multipart_upload_id": upload_id,
                "do_list_parts": true,
            }),
        )
        .await;
        let siblings = siblings.as_array().unwrap();
        assert_eq!(siblings.len(), 2);
        let primary_sibling = siblings
            .iter()
            .find(|s| s["id"].as_u64() == Some(primary_id))
            .unwrap();
        assert_eq!(
            primary_sibling["multipart_upload_id"],
            format!("cloud-{primary_id}"),
        );
        assert_eq!(primary_sibling["parts"].as_array().unwrap().len(), 2);
        let warmup_sibling = siblings
            .iter()
            .find(|s| s["tag"] == EU_WEST)
            .unwrap();
        assert!(warmup_sibling["parts"].as_array().unwrap().is_empty());

        // Logical parts mirror the primary's.
        let parts = post_ok(
            &client,
            "/list_parts",
            &json!({
                "bucket": bucket,
                "key": "big",
                "upload_id": upload_id,
            }),
        )
        .await;
        assert_eq!(parts.as_array().unwrap().len(), 2);

        // The in-flight upload shows up in the listing until completion.
        let uploads = post_ok(
            &client,
            "/list_multipart_uploads",
            &json!({"bucket": bucket, "prefix": ""}),
        )
        .await;
        assert_eq!(uploads.as_array().unwrap().len(), 1);
        assert_eq!(uploads[0]["upload_id"], upload_id.as_str());

        crate::complete_all(&client, &staged, "push", "mpu-etag").await;

        let uploads = post_ok(
            &client,
            "/list_multipart_uploads",
            &json!({"bucket": bucket, "prefix": ""}),
        )
        .await;
        assert!(uploads.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_404_listing_parts_of_unknown_upload() {
        let client = client();
        let bucket = register_test_bucket(&client, "mpu404").await;

        let response = crate::post(
            &client,
            "/list_parts",
            &json!({
                "bucket": bucket,
                "key": "big",
                "upload_id": "nope",
            }),
        )
        .await;
        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    }
}
