use reqwest::{header, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{
    eligibility::{EligibilityClient, EligibilitySnapshot},
    error::{Result, SubmitError},
    platform::types::{
        AsyncJobToken, QueryResultBundle, RowSet, SubmissionReceipt, SubmissionRequest, Team,
        UserProfile, UserTeamIds,
    },
};

/// Authenticated session against the challenge platform's REST API
#[derive(Clone)]
pub struct PlatformClient {
    http: Client,
    base_url: String,
}

impl PlatformClient {
    pub fn new(base_url: &str, access_token: &str, timeout: Duration) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        let bearer = header::HeaderValue::from_str(&format!("Bearer {}", access_token.trim()))
            .map_err(|_| SubmitError::Config("access token contains invalid characters".to_string()))?;
        headers.insert(header::AUTHORIZATION, bearer);

        let http = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        debug!("GET {}", path);
        let response = self.http.get(self.url(path)).send().await?;
        Self::read_json(response).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        debug!("POST {}", path);
        let response = self.http.post(self.url(path)).json(body).send().await?;
        Self::read_json(response).await
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(Self::platform_error(response).await);
        }
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn platform_error(response: Response) -> SubmitError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("reason").and_then(|r| r.as_str()).map(str::to_string))
            .unwrap_or(body);
        SubmitError::Platform { status, message }
    }

    /// Profile of the token's owner; doubles as the login check
    pub async fn get_user_profile(&self) -> Result<UserProfile> {
        self.get_json("/userProfile").await
    }

    pub async fn get_user_team_ids(&self, owner_id: i64) -> Result<Vec<String>> {
        let ids: UserTeamIds = self.get_json(&format!("/user/{}/team/id", owner_id)).await?;
        Ok(ids.team_ids)
    }

    pub async fn get_team(&self, team_id: &str) -> Result<Team> {
        self.get_json(&format!("/team/{}", team_id)).await
    }

    /// Run a table query as an asynchronous job and poll until it finishes
    pub async fn query_table(
        &self,
        table_id: &str,
        sql: &str,
        attempts: u32,
        interval: Duration,
    ) -> Result<RowSet> {
        let body = json!({
            "concreteType": "org.sagebionetworks.repo.model.table.QueryBundleRequest",
            "entityId": table_id,
            "query": { "sql": sql },
            "partMask": 1,
        });
        let job: AsyncJobToken = self
            .post_json(&format!("/entity/{}/table/query/async/start", table_id), &body)
            .await?;
        debug!("Started table query job {} on {}", job.token, table_id);

        let path = format!("/entity/{}/table/query/async/get/{}", table_id, job.token);
        for attempt in 1..=attempts {
            let response = self.http.get(self.url(&path)).send().await?;
            if response.status() == StatusCode::ACCEPTED {
                debug!("Table query {} still running (attempt {}/{})", job.token, attempt, attempts);
                if attempt < attempts {
                    tokio::time::sleep(interval).await;
                }
                continue;
            }
            let bundle: QueryResultBundle = Self::read_json(response).await?;
            return Ok(bundle.query_result.query_results);
        }

        warn!("Table query {} did not finish after {} attempts", job.token, attempts);
        Err(SubmitError::Platform {
            status: StatusCode::ACCEPTED.as_u16(),
            message: format!("table query on {} timed out", table_id),
        })
    }

    /// Register a stored file against an evaluation queue on behalf of a team
    pub async fn submit(
        &self,
        request: &SubmissionRequest,
        etag: &str,
        eligibility_hash: &str,
    ) -> Result<SubmissionReceipt> {
        let path = format!(
            "/evaluation/submission?etag={}&submissionEligibilityHash={}",
            etag, eligibility_hash
        );
        self.post_json(&path, request).await
    }
}

impl EligibilityClient for PlatformClient {
    async fn fetch_eligibility(&self, evaluation_id: &str, team_id: &str) -> Result<EligibilitySnapshot> {
        let path = format!(
            "/evaluation/{}/team/{}/submissionEligibility",
            evaluation_id, team_id
        );
        debug!("GET {}", path);
        let response = self.http.get(self.url(&path)).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Eligibility request for team {} returned {}", team_id, status);
            return Err(SubmitError::SubmissionWindowClosed {
                evaluation_id: evaluation_id.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve each canned response to one connection, in order
    async fn serve(responses: Vec<String>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            for response in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = socket.read(&mut buf).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&buf[..n]);
                }
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.shutdown().await.ok();
            }
        });
        format!("http://{}", addr)
    }

    fn response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )
    }

    #[tokio::test]
    async fn test_refused_eligibility_means_window_closed() {
        let base = serve(vec![response("403 Forbidden", r#"{"reason":"closed"}"#)]).await;
        let client = PlatformClient::new(&base, "token", Duration::from_secs(5)).unwrap();

        let result = client.fetch_eligibility("9614112", "123456").await;
        assert!(matches!(
            result,
            Err(SubmitError::SubmissionWindowClosed { ref evaluation_id, status: 403 }) if evaluation_id == "9614112"
        ));
    }

    #[tokio::test]
    async fn test_fetch_eligibility_reads_snapshot() {
        let body = r#"{"teamId":"123456","evaluationId":"9614112",
            "teamEligibility":{"isEligible":true,"isRegistered":true,"isQuotaFilled":false},
            "membersEligibility":[{"principalId":4444,"isEligible":true,"isRegistered":true,
                "isQuotaFilled":false,"hasConflictingSubmission":false}],
            "eligibilityStateHash":32345}"#;
        let base = serve(vec![response("200 OK", body)]).await;
        let client = PlatformClient::new(&base, "token", Duration::from_secs(5)).unwrap();

        let snapshot = client.fetch_eligibility("9614112", "123456").await.unwrap();
        assert_eq!(snapshot.eligibility_state_hash, "32345");
        assert_eq!(snapshot.members_eligibility[0].principal_id, 4444);
    }

    #[tokio::test]
    async fn test_query_table_gives_up_while_pending() {
        let base = serve(vec![
            response("201 Created", r#"{"token":"job-1"}"#),
            response("202 Accepted", r#"{}"#),
            response("202 Accepted", r#"{}"#),
        ])
        .await;
        let client = PlatformClient::new(&base, "token", Duration::from_secs(5)).unwrap();

        let started = std::time::Instant::now();
        let result = client
            .query_table("syn17096669", "select 1", 2, Duration::from_millis(300))
            .await;
        assert!(matches!(result, Err(SubmitError::Platform { status: 202, .. })));
        assert!(started.elapsed() < Duration::from_millis(550));
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = PlatformClient::new("https://example.org/repo/v1/", "token", Duration::from_secs(5)).unwrap();
        assert_eq!(client.url("/userProfile"), "https://example.org/repo/v1/userProfile");
    }

    #[test]
    fn test_rejects_token_with_newline() {
        let result = PlatformClient::new("https://example.org", "bad\ntoken", Duration::from_secs(5));
        assert!(matches!(result, Err(SubmitError::Config(_))));
    }
}
