use anyhow::{ensure, Context};
use serde_json::Value;
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 120;

pub struct SmokeClient {
    http: reqwest::Client,
    base_url: String,
}

impl SmokeClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build smoke http client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json(&self, path: &str) -> anyhow::Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let res = self.http.get(&url).send().await.with_context(|| {
            format!(
                "cannot connect to the fortune API at {}; is it running?",
                self.base_url
            )
        })?;

        let status = res.status();
        ensure!(status.is_success(), "GET {path} returned {status}");

        res.json::<Value>()
            .await
            .with_context(|| format!("GET {path} did not return JSON"))
    }

    pub async fn check_home(&self) -> anyhow::Result<()> {
        let body = self.get_json("/").await?;
        ensure!(
            body.get("endpoints").is_some_and(Value::is_object),
            "welcome page is missing its endpoint listing"
        );
        tracing::info!(base_url = %self.base_url, "api is running");
        Ok(())
    }

    pub async fn check_single(&self) -> anyhow::Result<Value> {
        let fortune = self.get_json("/fortune").await?;
        log_fortune("single", &fortune)?;
        Ok(fortune)
    }

    pub async fn check_batch(&self, count: u32) -> anyhow::Result<Vec<Value>> {
        let body = self.get_json(&format!("/fortune/batch?count={count}")).await?;
        let fortunes = body
            .get("fortunes")
            .and_then(Value::as_array)
            .context("batch response has no fortunes array")?
            .clone();
        ensure!(
            fortunes.len() == count as usize,
            "asked for {count} fortunes, got {}",
            fortunes.len()
        );
        for (i, fortune) in fortunes.iter().enumerate() {
            log_fortune(&format!("batch #{}", i + 1), fortune)?;
        }
        Ok(fortunes)
    }

    pub async fn check_lucky_numbers(&self) -> anyhow::Result<Value> {
        let fortune = self.get_json("/fortune/lucky-numbers").await?;
        log_fortune("lucky", &fortune)?;

        let numbers = fortune
            .get("lucky_numbers")
            .and_then(Value::as_array)
            .context("lucky numbers missing")?
            .iter()
            .map(|n| n.as_u64().map(|n| n.to_string()))
            .collect::<Option<Vec<_>>>()
            .context("lucky numbers must be integers")?;
        let color = fortune
            .get("lucky_color")
            .and_then(Value::as_str)
            .context("lucky color missing")?;

        tracing::info!(numbers = %numbers.join(", "), color, "lucky draw");
        Ok(fortune)
    }

    pub async fn run_all(&self, batch_count: u32, delay: Duration) -> anyhow::Result<()> {
        self.check_home().await?;
        self.check_single().await?;
        tokio::time::sleep(delay).await;
        self.check_batch(batch_count).await?;
        tokio::time::sleep(delay).await;
        self.check_lucky_numbers().await?;
        Ok(())
    }
}

fn log_fortune(label: &str, fortune: &Value) -> anyhow::Result<()> {
    let text = fortune
        .get("fortune")
        .and_then(Value::as_str)
        .context("record has no fortune text")?;
    let theme = fortune.get("theme").and_then(Value::as_str).unwrap_or("-");
    let style = fortune.get("style").and_then(Value::as_str).unwrap_or("-");

    match fortune.get("error").and_then(Value::as_str) {
        Some(error) => tracing::warn!(label, fortune = text, error, "server served the fallback fortune"),
        None => tracing::info!(label, fortune = text, theme, style, "fortune"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    fn record(text: &str) -> Value {
        json!({
            "fortune": text,
            "theme": "tea leaves",
            "style": "mysterious and cryptic",
            "timestamp": "2026-10-19T09:00:00Z",
        })
    }

    async fn spawn_mock_api(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn mock_api() -> Router {
        Router::new()
            .route("/", get(|| async { Json(json!({"endpoints": {"/fortune": "GET"}})) }))
            .route("/fortune", get(|| async { Json(record("Beware.")) }))
            .route(
                "/fortune/batch",
                get(|Query(q): Query<HashMap<String, usize>>| async move {
                    let count = q.get("count").copied().unwrap_or(3);
                    let fortunes: Vec<_> = (1..=count).map(|i| record(&format!("#{i}"))).collect();
                    Json(json!({"fortunes": fortunes, "count": count}))
                }),
            )
            .route(
                "/fortune/lucky-numbers",
                get(|| async {
                    let mut r = record("Lucky.");
                    r["lucky_numbers"] = json!([4, 8, 15, 16, 23, 42]);
                    r["lucky_color"] = json!("Cosmic Blue");
                    Json(r)
                }),
            )
    }

    #[tokio::test]
    async fn runs_every_check_against_a_healthy_api() {
        let base_url = spawn_mock_api(mock_api()).await;
        let client = SmokeClient::new(&format!("{base_url}/")).unwrap();

        client.run_all(4, Duration::ZERO).await.unwrap();
        assert_eq!(client.check_batch(2).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn non_success_status_fails_the_check() {
        let app = Router::new().route(
            "/fortune",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let client = SmokeClient::new(&spawn_mock_api(app).await).unwrap();

        let err = client.check_single().await.unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn unreachable_server_names_the_base_url() {
        let client = SmokeClient::new("http://127.0.0.1:1").unwrap();

        let err = client.check_home().await.unwrap_err();
        assert!(err.to_string().contains("http://127.0.0.1:1"));
    }

    #[test]
    fn fortune_without_text_is_rejected() {
        assert!(log_fortune("x", &json!({"theme": "tea leaves"})).is_err());
        assert!(log_fortune("x", &record("ok")).is_ok());
    }
}
