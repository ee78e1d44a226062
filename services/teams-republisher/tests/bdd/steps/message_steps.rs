//! BDD step definitions for message building

use cucumber::{given, then, when};

use teams_republisher::config::Settings;
use teams_republisher::dashboard::DashboardLinkTable;
use teams_republisher::message::{build_message, ChatMessage, TRUNCATION_MARKER};
use teams_republisher::params::Invocation;
use teams_republisher::state::state_color;
use teams_republisher::RepublisherError;

use crate::world::RepublisherWorld;

fn message(world: &RepublisherWorld) -> &ChatMessage {
    match world.message_result.as_ref().expect("no message built") {
        Ok(message) => message,
        Err(e) => panic!("message building failed: {e}"),
    }
}

#[given(expr = "a {string} notification for service {string} on host {string} in state {string}")]
fn service_notification(
    world: &mut RepublisherWorld,
    notification_type: String,
    service: String,
    host: String,
    state: String,
) {
    world.raw.webhook_url = Some("http://localhost:9000/hook".to_string());
    world.raw.notification_target = Some("service".to_string());
    world.raw.notification_type = Some(notification_type);
    world.raw.host.name = Some(host.clone());
    world.raw.host.display_name = Some(host);
    world.raw.service.display_name = Some(service.clone());
    world.raw.service.name = Some(service);
    world.raw.service.state = Some(state);
}

#[given(expr = "a {string} notification for host {string} displayed as {string} in state {string}")]
fn host_notification(
    world: &mut RepublisherWorld,
    notification_type: String,
    host: String,
    display_name: String,
    state: String,
) {
    world.raw.webhook_url = Some("http://localhost:9000/hook".to_string());
    world.raw.notification_target = Some("host".to_string());
    world.raw.notification_type = Some(notification_type);
    world.raw.host.name = Some(host);
    world.raw.host.display_name = Some(display_name);
    world.raw.host.state = Some(state);
}

#[given(expr = "the plugin output is {int} characters long")]
fn output_length(world: &mut RepublisherWorld, length: usize) {
    let output = "o".repeat(length);
    world.raw.service.output = Some(output.clone());
    world.raw.host.output = Some(output);
}

#[given(expr = "the service check command is {string}")]
fn service_check_command(world: &mut RepublisherWorld, command: String) {
    world.raw.service.check_command = Some(command);
}

#[given(expr = "the Icinga base URL {string}")]
fn icinga_base_url(world: &mut RepublisherWorld, url: String) {
    world.raw.icinga_base_url = Some(url);
}

#[given(expr = "the Grafana base URL {string}")]
fn grafana_base_url(world: &mut RepublisherWorld, url: String) {
    world.raw.dashboard_base_url = Some(url);
}

#[given(expr = "a dashboard link file mapping {string} to dashboard {string} panel {string}")]
fn dashboard_link_file(
    world: &mut RepublisherWorld,
    command: String,
    dashboard: String,
    panel: String,
) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("grafana-panels.ini");
    std::fs::write(
        &path,
        format!(
            "[{}]\ndashboard = \"{}\"\npanelId = \"{}\"\n",
            command, dashboard, panel
        ),
    )
    .expect("write link file");
    world.raw.dashboard_config_path = Some(path);
    world.link_dir = Some(dir);
}

#[given(expr = "a dashboard link file path that does not exist")]
fn missing_link_file(world: &mut RepublisherWorld) {
    world.raw.dashboard_config_path = Some("/nonexistent/grafana-panels.ini".into());
}

#[when("the message is built")]
fn build(world: &mut RepublisherWorld) {
    let result = Invocation::from_raw(&world.raw, &Settings::default()).and_then(|invocation| {
        let links =
            DashboardLinkTable::load(invocation.event.links.dashboard_config_path.as_deref())?;
        build_message(&invocation.event, &invocation.emoji, &links)
    });
    world.message_result = Some(result);
}

#[then(expr = "the title should be {string}")]
fn title_is(world: &mut RepublisherWorld, title: String) {
    assert_eq!(message(world).title, title);
}

#[then(expr = "the section name should be {string}")]
fn section_name(world: &mut RepublisherWorld, name: String) {
    assert_eq!(message(world).sections[0].name, name);
}

#[then(expr = "the section output should be {int} characters plus the truncation marker")]
fn truncated_output(world: &mut RepublisherWorld, length: usize) {
    let output = &message(world).sections[0].output;
    assert!(output.ends_with(TRUNCATION_MARKER), "{output}");
    assert_eq!(output.chars().count(), length + TRUNCATION_MARKER.chars().count());
}

#[then(expr = "the section output should be {int} characters")]
fn untruncated_output(world: &mut RepublisherWorld, length: usize) {
    assert_eq!(message(world).sections[0].output.chars().count(), length);
}

#[then(expr = "the message colour should be the colour of {string}")]
fn colour_of(world: &mut RepublisherWorld, state: String) {
    assert_eq!(
        message(world).color,
        state_color(&state).expect("state has a colour")
    );
}

#[then(expr = "the message should have exactly {int} section")]
fn section_count(world: &mut RepublisherWorld, count: usize) {
    assert_eq!(message(world).sections.len(), count);
}

#[then(expr = "the message should have {int} link button(s)")]
fn link_count(world: &mut RepublisherWorld, count: usize) {
    assert_eq!(message(world).links.len(), count);
}

#[then(expr = "link button {int} should be {string} pointing to {string}")]
fn link_is(world: &mut RepublisherWorld, index: usize, label: String, url: String) {
    let link = &message(world).links[index - 1];
    assert_eq!(link.label, label);
    assert_eq!(link.url, url);
}

#[then("building should fail with a configuration error")]
fn config_error(world: &mut RepublisherWorld) {
    let result = world.message_result.as_ref().expect("no result");
    assert!(
        matches!(result, Err(RepublisherError::Config(_))),
        "expected configuration error, got {result:?}"
    );
}
