//! BDD step definitions for webhook delivery

use std::sync::Arc;

use cucumber::{given, then, when};
use tokio::sync::RwLock;

use teams_republisher::config::Settings;
use teams_republisher::io::{HttpClient, HttpResponse};
use teams_republisher::RepublisherError;

use crate::world::{RepublisherWorld, WebhookBehaviour};

/// Fake webhook that records every posted card
struct FakeWebhook {
    behaviour: WebhookBehaviour,
    posted: Arc<RwLock<Vec<serde_json::Value>>>,
}

#[async_trait::async_trait]
impl HttpClient for FakeWebhook {
    async fn post_json(
        &self,
        _url: &str,
        body: &serde_json::Value,
    ) -> teams_republisher::Result<HttpResponse> {
        match self.behaviour {
            WebhookBehaviour::Unreachable => {
                Err(RepublisherError::Http("connection refused".to_string()))
            }
            WebhookBehaviour::Accept => {
                self.posted.write().await.push(body.clone());
                Ok(HttpResponse {
                    status: 200,
                    body: "1".to_string(),
                })
            }
            WebhookBehaviour::Reject(status) => {
                self.posted.write().await.push(body.clone());
                Ok(HttpResponse {
                    status,
                    body: "rejected".to_string(),
                })
            }
        }
    }
}

#[given("a Teams webhook that accepts messages")]
fn webhook_accepts(world: &mut RepublisherWorld) {
    world.webhook = Some(WebhookBehaviour::Accept);
}

#[given(expr = "a Teams webhook that rejects messages with status {int}")]
fn webhook_rejects(world: &mut RepublisherWorld, status: u16) {
    world.webhook = Some(WebhookBehaviour::Reject(status));
}

#[given("a Teams webhook that is unreachable")]
fn webhook_unreachable(world: &mut RepublisherWorld) {
    world.webhook = Some(WebhookBehaviour::Unreachable);
}

#[when("the notification is republished")]
async fn republish(world: &mut RepublisherWorld) {
    let http = FakeWebhook {
        behaviour: world.webhook.expect("webhook not set"),
        posted: Arc::clone(&world.posted),
    };
    let result = teams_republisher::run(&world.raw, &Settings::default(), Arc::new(http)).await;
    world.republish_result = Some(result);
}

#[then("republishing should succeed")]
fn republish_succeeds(world: &mut RepublisherWorld) {
    let result = world.republish_result.as_ref().expect("no result");
    result.as_ref().unwrap();
}

#[then("republishing should fail with a configuration error")]
fn republish_config_error(world: &mut RepublisherWorld) {
    let result = world.republish_result.as_ref().expect("no result");
    assert!(matches!(result, Err(RepublisherError::Config(_))), "{result:?}");
}

#[then("republishing should fail with a delivery error")]
fn republish_delivery_error(world: &mut RepublisherWorld) {
    let result = world.republish_result.as_ref().expect("no result");
    assert!(matches!(result, Err(RepublisherError::Delivery(_))), "{result:?}");
}

#[then("republishing should fail with an HTTP error")]
fn republish_http_error(world: &mut RepublisherWorld) {
    let result = world.republish_result.as_ref().expect("no result");
    assert!(matches!(result, Err(RepublisherError::Http(_))), "{result:?}");
}

#[then(expr = "{int} card(s) should have been posted")]
async fn cards_posted(world: &mut RepublisherWorld, count: usize) {
    assert_eq!(world.posted.read().await.len(), count);
}

#[then(expr = "the posted card should have theme colour {string}")]
async fn card_colour(world: &mut RepublisherWorld, colour: String) {
    let posted = world.posted.read().await;
    let card = posted.last().expect("no card posted");
    assert_eq!(card["themeColor"], colour.as_str());
}

#[then(expr = "the posted card should have {int} action(s)")]
async fn card_actions(world: &mut RepublisherWorld, count: usize) {
    let posted = world.posted.read().await;
    let card = posted.last().expect("no card posted");
    let actions = card
        .get("potentialAction")
        .and_then(|a| a.as_array())
        .map_or(0, |a| a.len());
    assert_eq!(actions, count);
}
