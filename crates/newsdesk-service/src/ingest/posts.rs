use std::ops::RangeInclusive;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use super::{DEFAULT_USER_AGENT, create_client};
use crate::config::PostSourceConfig;
use crate::errors::Result;
use crate::models::NewPost;

/// One element of the collection endpoint's JSON array. Other fields are ignored.
#[derive(Debug, Deserialize)]
struct PostPayload {
    id: i32,
    title: String,
    body: String,
}

#[derive(Debug, Default)]
pub struct PostFetchReport {
    pub posts: Vec<NewPost>,
    /// User ids that produced nothing because the request failed
    pub skipped: Vec<i32>,
}

/// Fetches posts one user id at a time from a paginated collection endpoint.
#[derive(Debug, Clone)]
pub struct PostFetcher {
    client: Client,
    endpoint: String,
    user_ids: RangeInclusive<i32>,
}

impl PostFetcher {
    pub fn new(client: Client, endpoint: impl Into<String>, user_ids: RangeInclusive<i32>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            user_ids,
        }
    }

    pub fn from_config(config: &PostSourceConfig) -> Result<Self> {
        let client = create_client(
            DEFAULT_USER_AGENT,
            config.timeout_secs.map(Duration::from_secs),
        )?;
        Ok(Self::new(
            client,
            config.endpoint.clone(),
            config.first_user_id..=config.last_user_id,
        ))
    }

    /// Request every user id in order. Failures skip the id; they never fail
    /// the whole fetch.
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    pub async fn fetch(&self) -> PostFetchReport {
        let mut report = PostFetchReport::default();

        for user_id in self.user_ids.clone() {
            match self.fetch_user(user_id).await {
                Some(posts) => report.posts.extend(posts),
                None => report.skipped.push(user_id),
            }
        }

        info!(
            fetched = report.posts.len(),
            skipped = report.skipped.len(),
            "Post fetch finished"
        );
        report
    }

    /// Posts for one user, or `None` if the upstream didn't answer with a
    /// successful, decodable response.
    pub async fn fetch_user(&self, user_id: i32) -> Option<Vec<NewPost>> {
        let response = match self
            .client
            .get(&self.endpoint)
            .query(&[("userId", user_id)])
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                warn!(user_id, error = %err, "Post request failed");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(user_id, status = %status, "Skipping user after non-success status");
            return None;
        }

        let payload: Vec<PostPayload> = match response.json().await {
            Ok(payload) => payload,
            Err(err) => {
                warn!(user_id, error = %err, "Post response was not the expected JSON");
                return None;
            }
        };

        debug!(user_id, count = payload.len(), "Fetched posts for user");

        Some(
            payload
                .into_iter()
                .map(|post| NewPost {
                    user_id,
                    post_id: post.id,
                    title: post.title,
                    body: post.body,
                })
                .collect(),
        )
    }
}
