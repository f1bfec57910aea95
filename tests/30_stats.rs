mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn fetch_stats(client: &reqwest::Client, base_url: &str, token: &str) -> Result<Value> {
    let res = client
        .get(format!("{}/tasks/stats", base_url))
        .bearer_auth(token)
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "stats failed: {}", res.status());
    let body = res.json::<Value>().await?;
    anyhow::ensure!(body["success"] == true, "stats envelope: {}", body);
    Ok(body["data"].clone())
}

#[tokio::test]
async fn zero_tasks_yield_zero_counts() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (token, _) = common::register_account(&client, &server.base_url, "empty").await?;

    let stats = fetch_stats(&client, &server.base_url, &token).await?;
    assert_eq!(stats, json!({ "total": 0, "completed": 0, "pending": 0 }));

    Ok(())
}

#[tokio::test]
async fn counts_split_by_completion() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (token, _) = common::register_account(&client, &server.base_url, "counter").await?;

    for i in 0..5 {
        let res = client
            .post(format!("{}/tasks", server.base_url))
            .bearer_auth(&token)
            .json(&json!({ "title": format!("task {}", i), "completed": i < 2 }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let stats = fetch_stats(&client, &server.base_url, &token).await?;
    assert_eq!(stats, json!({ "total": 5, "completed": 2, "pending": 3 }));

    Ok(())
}

#[tokio::test]
async fn stats_only_count_the_callers_tasks() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (token_a, _) = common::register_account(&client, &server.base_url, "heidi").await?;
    let (token_b, _) = common::register_account(&client, &server.base_url, "ivan").await?;

    let res = client
        .post(format!("{}/tasks", server.base_url))
        .bearer_auth(&token_a)
        .json(&json!({ "title": "only mine" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let stats = fetch_stats(&client, &server.base_url, &token_b).await?;
    assert_eq!(stats, json!({ "total": 0, "completed": 0, "pending": 0 }));

    Ok(())
}
