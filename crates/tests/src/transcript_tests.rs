use serde_json::Value;

use crate::fixtures::test_app::TestApp;

async fn append(app: &TestApp, room: &str, speaker: &str, text: &str) -> reqwest::Response {
    app.client
        .post(app.url(&format!("/api/room/{}/transcript", room)))
        .json(&serde_json::json!({
            "identity": format!("{}-1", speaker.to_lowercase()),
            "speaker_name": speaker,
            "text": text,
        }))
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn append_and_list_in_spoken_order() {
    let app = TestApp::spawn().await;
    app.seed_room("standup").await;

    assert_eq!(append(&app, "standup", "Alice", "good morning").await.status(), 200);
    assert_eq!(append(&app, "standup", "Bob", "bonjour").await.status(), 200);

    let resp = app
        .client
        .get(app.url("/api/room/standup/transcript"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = resp.json().await.unwrap();

    assert_eq!(body["total"], 2);
    let items = body["items"].as_array().unwrap();
    assert_eq!(items[0]["speaker_name"], "Alice");
    assert_eq!(items[0]["text"], "good morning");
    assert_eq!(items[1]["speaker_name"], "Bob");
}

#[tokio::test]
async fn listing_is_paginated() {
    let app = TestApp::spawn().await;
    app.seed_room("marathon").await;

    for i in 0..30 {
        append(&app, "marathon", "Alice", &format!("line {}", i)).await;
    }

    let resp = app
        .client
        .get(app.url("/api/room/marathon/transcript?page=2&per_page=25"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();

    assert_eq!(body["total"], 30);
    assert_eq!(body["page"], 2);
    assert_eq!(body["total_pages"], 2);
    assert_eq!(body["items"].as_array().unwrap().len(), 5);
    assert_eq!(body["items"][0]["text"], "line 25");
}

#[tokio::test]
async fn empty_text_is_rejected() {
    let app = TestApp::spawn().await;
    app.seed_room("quiet").await;

    let resp = append(&app, "quiet", "Alice", "   ").await;
    assert_eq!(resp.status().as_u16(), 422);
}

#[tokio::test]
async fn appending_to_an_unknown_room_is_not_found() {
    let app = TestApp::spawn().await;

    let resp = append(&app, "ghost", "Alice", "anyone here?").await;
    assert_eq!(resp.status().as_u16(), 404);
}
