mod common;

use common::TestApp;

#[tokio::test]
async fn create_plucker_starts_with_zero_collection() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let token = app.register_user().await;

    let plucker = app.create_plucker(&token, "Kamala").await;

    assert_eq!(plucker["name"], "Kamala");
    assert_eq!(plucker["status"], "active");
    assert_eq!(plucker["collection"], 0.0);
    assert_eq!(plucker["address"], "");

    app.cleanup().await;
}

#[tokio::test]
async fn create_plucker_requires_name_and_phone() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let token = app.register_user().await;

    let response = app
        .client
        .post(format!("{}/pluckers", app.api))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "name": "", "phone": "" }))
        .send()
        .await
        .expect("Failed to send create request");

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.expect("body");
    assert_eq!(body["error"], "Validation error");
    let details: Vec<String> = body["details"]
        .as_array()
        .expect("details array")
        .iter()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect();
    assert!(details.iter().any(|d| d.contains("Name is required")));
    assert!(details.iter().any(|d| d.contains("Phone number is required")));

    app.cleanup().await;
}

#[tokio::test]
async fn list_pluckers_is_sorted_by_name() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let token = app.register_user().await;

    app.create_plucker(&token, "Nimal").await;
    app.create_plucker(&token, "Amara").await;
    app.create_plucker(&token, "Kamala").await;

    let response = app
        .client
        .get(format!("{}/pluckers", app.api))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to list pluckers");
    assert_eq!(response.status(), 200);
    let pluckers: Vec<serde_json::Value> = response.json().await.expect("pluckers");

    let names: Vec<&str> = pluckers.iter().filter_map(|p| p["name"].as_str()).collect();
    assert_eq!(names, vec!["Amara", "Kamala", "Nimal"]);

    app.cleanup().await;
}

#[tokio::test]
async fn update_overwrites_fields_and_collection() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let token = app.register_user().await;

    let plucker = app.create_plucker(&token, "Kamala").await;
    let id = plucker["id"].as_str().expect("id");

    let response = app
        .client
        .put(format!("{}/pluckers/{}", app.api, id))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "status": "inactive",
            "collection": 42.5,
            "address": "Upper Division"
        }))
        .send()
        .await
        .expect("Failed to update plucker");
    assert_eq!(response.status(), 200);
    let updated: serde_json::Value = response.json().await.expect("plucker");

    assert_eq!(updated["status"], "inactive");
    assert_eq!(updated["collection"], 42.5);
    assert_eq!(updated["address"], "Upper Division");
    // Untouched fields survive a partial update
    assert_eq!(updated["name"], "Kamala");

    app.cleanup().await;
}

#[tokio::test]
async fn unknown_and_malformed_ids_are_both_not_found() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let token = app.register_user().await;

    for id in ["9e107d9d-0000-0000-0000-000000000000", "not-even-a-uuid"] {
        let response = app
            .client
            .get(format!("{}/pluckers/{}", app.api, id))
            .bearer_auth(&token)
            .send()
            .await
            .expect("Failed to get plucker");
        assert_eq!(response.status(), 404, "id {:?}", id);
    }

    app.cleanup().await;
}

#[tokio::test]
async fn delete_plucker_is_a_hard_delete() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let token = app.register_user().await;

    let plucker = app.create_plucker(&token, "Kamala").await;
    let id = plucker["id"].as_str().expect("id");

    let response = app
        .client
        .delete(format!("{}/pluckers/{}", app.api, id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to delete plucker");
    assert_eq!(response.status(), 200);

    let gone = app
        .client
        .get(format!("{}/pluckers/{}", app.api, id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to get plucker");
    assert_eq!(gone.status(), 404);

    // Deleting again reports not found
    let again = app
        .client
        .delete(format!("{}/pluckers/{}", app.api, id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to delete plucker");
    assert_eq!(again.status(), 404);

    app.cleanup().await;
}

#[tokio::test]
async fn top_pluckers_are_active_only_sorted_by_collection() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };
    let token = app.register_user().await;

    let totals = [("Amara", 50.0), ("Kamala", 80.0), ("Nimal", 65.0)];
    let mut ids = Vec::new();
    for (name, total) in totals {
        let plucker = app.create_plucker(&token, name).await;
        let id = plucker["id"].as_str().expect("id").to_string();
        app.client
            .put(format!("{}/pluckers/{}", app.api, id))
            .bearer_auth(&token)
            .json(&serde_json::json!({ "collection": total }))
            .send()
            .await
            .expect("Failed to set collection");
        ids.push(id);
    }

    // The biggest collector goes inactive and must drop out of the ranking
    app.client
        .put(format!("{}/pluckers/{}", app.api, ids[1]))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "status": "inactive" }))
        .send()
        .await
        .expect("Failed to deactivate");

    let response = app
        .client
        .get(format!("{}/pluckers/top?limit=2", app.api))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to fetch top pluckers");
    assert_eq!(response.status(), 200);
    let top: Vec<serde_json::Value> = response.json().await.expect("top");

    let names: Vec<&str> = top.iter().filter_map(|p| p["name"].as_str()).collect();
    assert_eq!(names, vec!["Nimal", "Amara"]);

    app.cleanup().await;
}
