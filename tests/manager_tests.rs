use std::collections::BTreeMap;

use oscli::client::{ApiErrorKind, ClientConfig, Credentials, HttpClient};
use oscli::services::baremetal::{RebootType, ServerFilters, ServerManager};
use oscli::services::block_storage::{VolumeCreate, VolumeFilters, VolumeManager, VolumeUpdate};
use oscli::services::identity::{UserManager, USER_TENANT};
use oscli::services::monitoring::{AlarmManager, MeterManager};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_at(endpoint: &str) -> HttpClient {
    HttpClient::new(ClientConfig {
        credentials: Some(Credentials::Token("static-token".to_string())),
        endpoint_override: Some(Url::parse(endpoint).unwrap()),
        ..ClientConfig::default()
    })
    .unwrap()
}

fn client(server: &MockServer) -> HttpClient {
    client_at(&format!("{}/v2", server.uri()))
}

#[tokio::test]
async fn test_list_sends_only_supplied_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/volumes"))
        .and(query_param("name", "foo"))
        .and(query_param_is_missing("status"))
        .and(query_param_is_missing("all_tenants"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "volumes": [{"id": "v-1", "name": "foo", "size": 10}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let filters = VolumeFilters {
        name: Some("foo".to_string()),
        status: Some(String::new()),
        all_tenants: false,
    };
    let volumes = VolumeManager::default()
        .list(&mut client(&server), &filters, false)
        .await
        .unwrap();
    assert_eq!(volumes.len(), 1);
    assert_eq!(volumes.resources()[0].id().as_deref(), Some("v-1"));
}

#[tokio::test]
async fn test_list_follows_next_links_when_paginating() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/servers"))
        .and(query_param_is_missing("marker"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "servers": [{"id": "s-1"}],
            "servers_links": [
                {"rel": "next", "href": format!("{}/v2/servers?marker=s-1", server.uri())}
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/servers"))
        .and(query_param("marker", "s-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "servers": [{"id": "s-2"}]
        })))
        .mount(&server)
        .await;

    let mut client = client(&server);
    let manager = ServerManager::default();

    let first_page = manager
        .list(&mut client, &ServerFilters::default(), false)
        .await
        .unwrap();
    assert_eq!(first_page.len(), 1);

    let all = manager
        .list(&mut client, &ServerFilters::default(), true)
        .await
        .unwrap();
    let ids: Vec<String> = all.into_iter().filter_map(|server| server.id()).collect();
    assert_eq!(ids, vec!["s-1", "s-2"]);
}

#[tokio::test]
async fn test_missing_resource_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/volumes/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "itemNotFound": {"message": "Volume missing could not be found.", "code": 404}
        })))
        .mount(&server)
        .await;

    let error = VolumeManager::default()
        .get(&mut client(&server), "missing")
        .await
        .unwrap_err();
    assert_eq!(error.kind(), Some(ApiErrorKind::NotFound));
    assert!(error.to_string().contains("could not be found"));
}

#[tokio::test]
async fn test_create_wraps_fields_in_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/volumes"))
        .and(body_json(json!({"volume": {"size": 10, "name": "data"}})))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({
            "volume": {"id": "v-9", "name": "data", "size": 10, "status": "creating"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let volume = VolumeManager::default()
        .create(
            &mut client(&server),
            &VolumeCreate {
                size: 10,
                name: Some("data".to_string()),
                metadata: BTreeMap::new(),
                ..VolumeCreate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(volume.id().as_deref(), Some("v-9"));
    assert_eq!(volume.get_str("status"), Some("creating"));
}

#[tokio::test]
async fn test_update_without_fields_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let updated = VolumeManager::default()
        .update(&mut client(&server), "v-1", &VolumeUpdate::default())
        .await
        .unwrap();
    assert!(updated.is_none());
}

#[tokio::test]
async fn test_update_with_empty_response_refetches() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v2/volumes/v-1"))
        .and(body_json(json!({"volume": {"name": "renamed"}})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/volumes/v-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "volume": {"id": "v-1", "name": "renamed"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let updated = VolumeManager::default()
        .update(
            &mut client(&server),
            "v-1",
            &VolumeUpdate {
                name: Some("renamed".to_string()),
                description: None,
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.name(), Some("renamed"));
}

#[tokio::test]
async fn test_server_actions_post_action_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/servers/s-1/action"))
        .and(body_json(json!({"reboot": {"type": "HARD"}})))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/servers/s-1/action"))
        .and(body_json(json!({"os-stop": null})))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client(&server);
    let manager = ServerManager::default();
    manager.reboot(&mut client, "s-1", RebootType::Hard).await.unwrap();
    manager.stop(&mut client, "s-1").await.unwrap();
}

#[tokio::test]
async fn test_volume_extend_action() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/volumes/v-1/action"))
        .and(body_json(json!({"os-extend": {"new_size": 20}})))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    VolumeManager::default()
        .extend(&mut client(&server), "v-1", 20)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_user_show_with_tenant() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/users/u-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {"id": "u-1", "name": "alice", "tenantId": "t-1"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/tenants/t-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tenant": {"id": "t-1", "name": "demo"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let user = UserManager::default()
        .get_with_tenant(&mut client(&server), "u-1")
        .await
        .unwrap();
    assert_eq!(user.get(USER_TENANT), Some(&json!({"id": "t-1", "name": "demo"})));
}

#[tokio::test]
async fn test_user_show_with_deleted_tenant() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/users/u-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {"id": "u-1", "name": "alice", "tenantId": "gone"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/tenants/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let user = UserManager::default()
        .get_with_tenant(&mut client(&server), "u-1")
        .await
        .unwrap();
    assert_eq!(user.name(), Some("alice"));
    assert!(user.get(USER_TENANT).is_none());
}

#[tokio::test]
async fn test_alarm_state_and_meter_statistics() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/alarms/a-1/state"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("insufficient data")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/meters/cpu_util/statistics"))
        .and(query_param("period", "600"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"avg": 12.5, "max": 40.0, "min": 1.0, "count": 6, "period": 600}
        ])))
        .mount(&server)
        .await;

    // Monitoring collections carry their own version prefix
    let mut client = client_at(&server.uri());
    let state = AlarmManager::default().state(&mut client, "a-1").await.unwrap();
    assert_eq!(state, "insufficient data");

    let statistics = MeterManager::default()
        .statistics(&mut client, "cpu_util", Some(600))
        .await
        .unwrap();
    assert_eq!(statistics.len(), 1);
    assert_eq!(statistics.resources()[0].get("count"), Some(&json!(6)));
}
