//! HTTP client for the savings recommendation agent.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, date_filter::DateRange};

/// How long to wait for the agent before giving up.
const AGENT_TIMEOUT: Duration = Duration::from_secs(120);

/// Where the agent lives and what to ask it for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentSettings {
    /// The agent's base URL, e.g. "http://localhost:8082".
    pub base_url: String,
    /// The user to get recommendations for.
    pub user_id: i64,
    /// Whether the agent may call out to an external model.
    pub use_external_agent: bool,
}

/// The JSON body sent to the agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub user_id: i64,
    pub use_external_agent: bool,
    /// The first day to consider as YYYY-MM-DD.
    pub start_date: Option<String>,
    /// The last day to consider as YYYY-MM-DD.
    pub end_date: Option<String>,
}

/// A piece of savings advice and the steps to follow it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub description: String,
    #[serde(default)]
    pub actions: Vec<String>,
}

/// The JSON body the agent responds with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationResponse {
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    /// Which model produced the recommendations.
    #[serde(default)]
    pub source: Option<String>,
}

/// Sends recommendation requests to the agent.
#[derive(Debug, Clone)]
pub struct AgentClient {
    http: reqwest::Client,
    settings: AgentSettings,
}

impl AgentClient {
    /// Create a client for the agent described by `settings`.
    ///
    /// # Errors
    /// Returns [Error::HttpClientError] if the HTTP client cannot be built,
    /// e.g. if the TLS backend fails to initialise.
    pub fn new(settings: AgentSettings) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(AGENT_TIMEOUT)
            .build()
            .map_err(|error| Error::HttpClientError(error.to_string()))?;

        Ok(Self { http, settings })
    }

    /// The request asking for recommendations on the transactions in `range`.
    pub fn request_for(&self, range: &DateRange) -> RecommendationRequest {
        RecommendationRequest {
            user_id: self.settings.user_id,
            use_external_agent: self.settings.use_external_agent,
            start_date: range.start.map(|date| date.to_string()),
            end_date: range.end.map(|date| date.to_string()),
        }
    }

    fn recommendations_url(&self) -> String {
        format!(
            "{}/recommendations",
            self.settings.base_url.trim_end_matches('/')
        )
    }

    /// Ask the agent for recommendations.
    ///
    /// # Errors
    /// Returns [Error::RecommendationRequest] with a message for the user if
    /// the agent cannot be reached, responds with a non-success status, or
    /// sends a body that is not a recommendation response.
    pub async fn get_recommendations(
        &self,
        request: &RecommendationRequest,
    ) -> Result<RecommendationResponse, Error> {
        let url = self.recommendations_url();
        tracing::debug!("requesting recommendations from {url}: {request:?}");

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|error| {
                tracing::error!("could not reach recommendation agent at {url}: {error}");
                Error::RecommendationRequest("Failed to fetch".to_owned())
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("recommendation agent responded with {status}");
            return Err(Error::RecommendationRequest(
                "Failed to fetch recommendations".to_owned(),
            ));
        }

        response
            .json::<RecommendationResponse>()
            .await
            .map_err(|error| {
                tracing::error!("could not decode recommendation response: {error}");
                Error::RecommendationRequest("Received an invalid response from the agent".to_owned())
            })
    }
}

#[cfg(test)]
mod tests {
    use axum::{Json, Router, http::StatusCode, routing::post};
    use serde_json::{Value, json};
    use time::macros::date;
    use tokio::net::TcpListener;

    use crate::{Error, date_filter::DateRange};

    use super::{AgentClient, AgentSettings, Recommendation, RecommendationRequest};

    /// Serve `router` on a random local port and return its base URL.
    async fn spawn_agent(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        format!("http://{address}")
    }

    fn get_client(base_url: String) -> AgentClient {
        AgentClient::new(AgentSettings {
            base_url,
            user_id: 1,
            use_external_agent: true,
        })
        .unwrap()
    }

    fn january_request(client: &AgentClient) -> RecommendationRequest {
        client.request_for(&DateRange::new(
            date!(2024 - 01 - 01),
            date!(2024 - 01 - 31),
        ))
    }

    #[tokio::test]
    async fn sends_request_and_decodes_recommendations() {
        let router = Router::new().route(
            "/recommendations",
            post(|Json(body): Json<Value>| async move {
                Json(json!({
                    "recommendations": [
                        {
                            "description": format!(
                                "Spend less between {} and {}",
                                body["start_date"].as_str().unwrap_or_default(),
                                body["end_date"].as_str().unwrap_or_default(),
                            ),
                            "actions": ["Cook at home"],
                        },
                        { "description": "No actions" },
                    ],
                    "source": "local",
                }))
            }),
        );
        let client = get_client(spawn_agent(router).await);

        let response = client
            .get_recommendations(&january_request(&client))
            .await
            .unwrap();

        assert_eq!(
            response.recommendations,
            [
                Recommendation {
                    description: "Spend less between 2024-01-01 and 2024-01-31".to_owned(),
                    actions: vec!["Cook at home".to_owned()],
                },
                Recommendation {
                    description: "No actions".to_owned(),
                    actions: vec![],
                },
            ]
        );
        assert_eq!(response.source.as_deref(), Some("local"));
    }

    #[tokio::test]
    async fn request_body_has_user_and_dates() {
        let client = get_client("http://localhost:8082".to_owned());

        let body = serde_json::to_value(january_request(&client)).unwrap();

        assert_eq!(
            body,
            json!({
                "user_id": 1,
                "use_external_agent": true,
                "start_date": "2024-01-01",
                "end_date": "2024-01-31",
            })
        );
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let router = Router::new().route(
            "/recommendations",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model crashed") }),
        );
        let client = get_client(spawn_agent(router).await);

        let result = client.get_recommendations(&january_request(&client)).await;

        assert_eq!(
            result,
            Err(Error::RecommendationRequest(
                "Failed to fetch recommendations".to_owned()
            ))
        );
    }

    #[tokio::test]
    async fn malformed_body_is_reported() {
        let router = Router::new().route("/recommendations", post(|| async { "not json" }));
        let client = get_client(spawn_agent(router).await);

        let result = client.get_recommendations(&january_request(&client)).await;

        assert!(matches!(result, Err(Error::RecommendationRequest(_))));
    }

    #[tokio::test]
    async fn missing_recommendations_is_empty() {
        let router = Router::new().route(
            "/recommendations",
            post(|| async { Json(json!({ "source": "local" })) }),
        );
        let client = get_client(format!("{}/", spawn_agent(router).await));

        let response = client
            .get_recommendations(&january_request(&client))
            .await
            .unwrap();

        assert!(response.recommendations.is_empty());
    }
}
