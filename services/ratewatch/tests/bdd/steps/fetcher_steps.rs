//! BDD step definitions for rate fetching feature

use std::sync::Arc;

use cucumber::{given, then, when};

use ratewatch::fetcher::HttpRateFetcher;
use ratewatch::io::{HttpClient, HttpResponse};
use ratewatch::RateWatchError;

use crate::world::RateWatchWorld;

const ENDPOINT: &str = "http://rates.test/data/price";

/// HTTP client returning a canned response
struct CannedClient {
    status: u16,
    body: String,
}

#[async_trait::async_trait]
impl HttpClient for CannedClient {
    async fn get(&self, _url: &str) -> ratewatch::Result<HttpResponse> {
        Ok(HttpResponse {
            status: self.status,
            body: self.body.clone(),
        })
    }
}

/// HTTP client that simulates network failure
struct UnreachableClient;

#[async_trait::async_trait]
impl HttpClient for UnreachableClient {
    async fn get(&self, _url: &str) -> ratewatch::Result<HttpResponse> {
        Err(RateWatchError::Http("connection refused".to_string()))
    }
}

#[given(expr = "an endpoint that responds with status {int} and body {string}")]
fn endpoint_responds(world: &mut RateWatchWorld, status: u16, body: String) {
    let client = CannedClient { status, body };
    world.fetcher_under_test = Some(Box::new(HttpRateFetcher::new(Arc::new(client))));
}

#[given("an endpoint that is unreachable")]
fn endpoint_unreachable(world: &mut RateWatchWorld) {
    world.fetcher_under_test = Some(Box::new(HttpRateFetcher::new(Arc::new(
        UnreachableClient,
    ))));
}

#[when("the rate is fetched")]
async fn rate_is_fetched(world: &mut RateWatchWorld) {
    let fetcher = world.fetcher_under_test.as_ref().expect("fetcher not set");
    world.fetch_result = Some(fetcher.fetch(ENDPOINT).await);
}

#[then(expr = "the fetch should succeed with body {string}")]
fn fetch_succeeds(world: &mut RateWatchWorld, expected: String) {
    let result = world.fetch_result.as_ref().expect("no fetch result");
    match result {
        Ok(body) => assert_eq!(body, &expected),
        Err(e) => panic!("expected success, got {}", e),
    }
}

#[then(expr = "the fetch should fail mentioning {string}")]
fn fetch_fails(world: &mut RateWatchWorld, fragment: String) {
    let result = world.fetch_result.as_ref().expect("no fetch result");
    match result {
        Err(RateWatchError::Fetch(msg)) => {
            assert!(msg.contains(&fragment), "'{}' not in '{}'", fragment, msg)
        }
        other => panic!("expected a fetch error, got {:?}", other),
    }
}
