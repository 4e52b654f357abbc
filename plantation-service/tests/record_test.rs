mod common;

use common::TestApp;

#[tokio::test]
async fn creating_a_record_increments_plucker_totals() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let token = app.register_user().await;

    let worker_a = app.create_plucker(&token, "Kamala").await;
    let worker_b = app.create_plucker(&token, "Nimal").await;
    let id_a = worker_a["id"].as_str().expect("id");
    let id_b = worker_b["id"].as_str().expect("id");

    app.create_record(
        &token,
        "2023-05-10T06:00:00Z",
        2.5,
        &[(id_a, 10.0), (id_b, 5.0)],
    )
    .await;

    assert_eq!(app.get_plucker(&token, id_a).await["collection"], 10.0);
    assert_eq!(app.get_plucker(&token, id_b).await["collection"], 5.0);

    app.cleanup().await;
}

#[tokio::test]
async fn deleting_a_record_rolls_totals_back() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let token = app.register_user().await;

    let worker_a = app.create_plucker(&token, "Kamala").await;
    let worker_b = app.create_plucker(&token, "Nimal").await;
    let id_a = worker_a["id"].as_str().expect("id");
    let id_b = worker_b["id"].as_str().expect("id");

    let record = app
        .create_record(
            &token,
            "2023-05-10T06:00:00Z",
            2.5,
            &[(id_a, 10.0), (id_b, 5.0)],
        )
        .await;
    let record_id = record["id"].as_str().expect("record id");

    let response = app
        .client
        .delete(format!("{}/records/{}", app.api, record_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to delete record");
    assert_eq!(response.status(), 200);

    assert_eq!(app.get_plucker(&token, id_a).await["collection"], 0.0);
    assert_eq!(app.get_plucker(&token, id_b).await["collection"], 0.0);

    app.cleanup().await;
}

#[tokio::test]
async fn delete_rollback_floors_at_zero_after_external_reduction() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let token = app.register_user().await;

    let worker = app.create_plucker(&token, "Kamala").await;
    let id = worker["id"].as_str().expect("id");

    let record = app
        .create_record(&token, "2023-05-10T06:00:00Z", 2.5, &[(id, 10.0)])
        .await;
    let record_id = record["id"].as_str().expect("record id");

    // Someone manually corrects the total below the record's contribution
    app.client
        .put(format!("{}/pluckers/{}", app.api, id))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "collection": 4.0 }))
        .send()
        .await
        .expect("Failed to overwrite collection");

    app.client
        .delete(format!("{}/records/{}", app.api, record_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to delete record");

    // max(0, 4 - 10), not a negative total
    assert_eq!(app.get_plucker(&token, id).await["collection"], 0.0);

    app.cleanup().await;
}

#[tokio::test]
async fn updating_detail_lines_moves_totals_with_them() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let token = app.register_user().await;

    let worker_a = app.create_plucker(&token, "Kamala").await;
    let worker_b = app.create_plucker(&token, "Nimal").await;
    let id_a = worker_a["id"].as_str().expect("id");
    let id_b = worker_b["id"].as_str().expect("id");

    let record = app
        .create_record(&token, "2023-05-10T06:00:00Z", 2.5, &[(id_a, 10.0)])
        .await;
    let record_id = record["id"].as_str().expect("record id");

    // Reassign the day's weight from Kamala to Nimal at a smaller weight
    let response = app
        .client
        .put(format!("{}/records/{}", app.api, record_id))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "pluckerDetails": [{ "pluckerId": id_b, "weight": 4.0 }]
        }))
        .send()
        .await
        .expect("Failed to update record");
    assert_eq!(response.status(), 200);

    assert_eq!(app.get_plucker(&token, id_a).await["collection"], 0.0);
    assert_eq!(app.get_plucker(&token, id_b).await["collection"], 4.0);

    app.cleanup().await;
}

#[tokio::test]
async fn records_list_is_sorted_by_date_descending() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let token = app.register_user().await;

    let worker = app.create_plucker(&token, "Kamala").await;
    let id = worker["id"].as_str().expect("id");

    app.create_record(&token, "2023-05-01T06:00:00Z", 2.0, &[(id, 1.0)])
        .await;
    app.create_record(&token, "2023-05-20T06:00:00Z", 2.0, &[(id, 2.0)])
        .await;
    app.create_record(&token, "2023-05-10T06:00:00Z", 2.0, &[(id, 3.0)])
        .await;

    let response = app
        .client
        .get(format!("{}/records", app.api))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to list records");
    assert_eq!(response.status(), 200);
    let records: Vec<serde_json::Value> = response.json().await.expect("records");

    let weights: Vec<f64> = records
        .iter()
        .filter_map(|r| r["totalWeight"].as_f64())
        .collect();
    assert_eq!(weights, vec![2.0, 3.0, 1.0]);

    app.cleanup().await;
}

#[tokio::test]
async fn unknown_record_id_is_not_found() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let token = app.register_user().await;

    let response = app
        .client
        .delete(format!("{}/records/no-such-record", app.api))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to delete record");
    assert_eq!(response.status(), 404);

    app.cleanup().await;
}
