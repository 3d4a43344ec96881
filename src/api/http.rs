use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use super::{Airline, Airport, ApiError, FlightIds, LogbookApi, Result, UserRecord};
use crate::form::FlightPayload;

/// Talks to a logbook server over HTTP
pub struct HttpApi {
    base: String,
    token: Option<String>,
    client: Client,
}

impl HttpApi {
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        Self {
            base: base_url.trim_end_matches('/').to_string(),
            token,
            client: Client::new(),
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.authorized(self.client.get(format!("{}{}", self.base, path)))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.authorized(self.client.post(format!("{}{}", self.base, path)))
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn expect_json<T>(
        &self,
        builder: RequestBuilder,
        resource: &'static str,
        identifier: &str,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(handle_unsuccessful_request(response, status, resource, identifier).await);
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }
}

#[async_trait]
impl LogbookApi for HttpApi {
    async fn me(&self) -> Result<UserRecord> {
        self.expect_json(self.get("/users/me"), "user", "me").await
    }

    async fn usernames(&self) -> Result<Vec<String>> {
        self.expect_json(self.get("/users"), "users", "all").await
    }

    async fn airport(&self, icao: &str) -> Result<Airport> {
        self.expect_json(self.get(&format!("/airports/{icao}")), "airport", icao)
            .await
    }

    async fn airline(&self, icao: &str) -> Result<Airline> {
        self.expect_json(self.get(&format!("/airlines/{icao}")), "airline", icao)
            .await
    }

    async fn create_flights(
        &self,
        payload: &FlightPayload,
        local_airport_time: bool,
    ) -> Result<FlightIds> {
        let builder = self
            .post(&format!("/flights?timezones={local_airport_time}"))
            .json(payload);

        self.expect_json(builder, "flight", "new").await
    }
}

async fn handle_unsuccessful_request(
    response: Response,
    status: StatusCode,
    resource: &'static str,
    identifier: &str,
) -> ApiError {
    match status {
        StatusCode::NOT_FOUND => ApiError::NotFound {
            resource,
            identifier: identifier.to_string(),
        },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized,
        _ => match response.text().await {
            Ok(text) => ApiError::Other(text),
            Err(e) => ApiError::Other(e.to_string()),
        },
    }
}
