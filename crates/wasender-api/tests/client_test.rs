use serde_json::json;
use std::time::{Duration, Instant};
use wasender_api::{
    ContactMessage, ImageMessage, LocationMessage, RetryConfig, SendOptions, TextMessage,
    WasenderClient, WasenderConfig, WasenderError,
};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> WasenderClient {
    WasenderClient::new(WasenderConfig::new("testkey").with_base_url(server.uri())).unwrap()
}

fn client_with_pat(server: &MockServer) -> WasenderClient {
    WasenderClient::new(
        WasenderConfig::new("testkey")
            .with_base_url(server.uri())
            .with_personal_access_token("pat-token"),
    )
    .unwrap()
}

fn rate_limited(retry_after: u64) -> ResponseTemplate {
    ResponseTemplate::new(429).set_body_json(json!({
        "success": false,
        "message": "Too many requests",
        "retry_after": retry_after,
    }))
}

// ─── Messaging ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_send_text_returns_body_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/send-message"))
        .and(header("authorization", "Bearer testkey"))
        .and(header("accept", "application/json"))
        .and(header("user-agent", "wasenderapi-rust-sdk"))
        .and(body_json(json!({"to": "123", "text": "hi"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "message": "Message sent"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server).send_text(("123", "hi"), None).await.unwrap();
    assert_eq!(result, json!({"success": true, "message": "Message sent"}));
}

#[tokio::test]
async fn test_structured_and_discrete_forms_send_same_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/send-message"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&server)
        .await;
    let client = client_for(&server);

    client
        .send_image(ImageMessage::new("123", "https://img").with_caption("caption"), None)
        .await
        .unwrap();
    client
        .send_image(("123", "https://img", Some("caption")), None)
        .await
        .unwrap();
    client
        .send_contact(ContactMessage::new("123", "John Doe", "+123456789"), None)
        .await
        .unwrap();
    client
        .send_contact(("123", "John Doe", "+123456789"), None)
        .await
        .unwrap();
    client
        .send_location(
            LocationMessage::new("123", 1.23, 4.56).with_name("Place").with_address("Address"),
            None,
        )
        .await
        .unwrap();
    client
        .send_location(("123", 1.23, 4.56, Some("Place"), Some("Address")), None)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 6);
    let bodies: Vec<serde_json::Value> = requests
        .iter()
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect();
    for pair in bodies.chunks(2) {
        assert_eq!(pair[0], pair[1]);
    }
    assert_eq!(bodies[4]["messageType"], "location");
    assert_eq!(bodies[2]["contact"]["phone"], "+123456789");
}

#[tokio::test]
async fn test_send_options_merged_under_typed_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/send-message"))
        .and(body_json(json!({"to": "123", "text": "hi", "quoted": "MSG1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let options = SendOptions::new().field("quoted", "MSG1").field("text", "lost");
    client_for(&server)
        .send_text(TextMessage::new("123", "hi"), options)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_invalid_message_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .send_audio(("123", ""), None)
        .await
        .unwrap_err();
    assert!(matches!(err, WasenderError::InvalidMessage(_)));
}

#[tokio::test]
async fn test_api_error_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/send-message"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "fail"})))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .send_text(TextMessage::new("123", "fail"), None)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.response().unwrap()["error"], "fail");
    assert!(err.to_string().starts_with("Wasender API error:"));
}

#[tokio::test]
async fn test_empty_success_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/contacts/123/block"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let result = client_for(&server).block_contact("123").await.unwrap();
    assert_eq!(result, json!({"success": true}));
}

// ─── Retry policy ────────────────────────────────────────────────────

#[tokio::test]
async fn test_429_retried_until_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/send-message"))
        .respond_with(rate_limited(0))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/send-message"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .send_text(("123", "hi"), SendOptions::from(RetryConfig::retries(3)))
        .await
        .unwrap();
    assert_eq!(result["success"], true);
}

#[tokio::test]
async fn test_429_exhausts_after_max_retries_plus_one() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/send-message"))
        .respond_with(rate_limited(0))
        .expect(3)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .send_text(("123", "hi"), SendOptions::from(RetryConfig::retries(2)))
        .await
        .unwrap_err();
    assert!(err.is_rate_limited());
    assert_eq!(err.response().unwrap()["retry_after"], 0);
}

#[tokio::test]
async fn test_retry_waits_retry_after_seconds() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/send-message"))
        .respond_with(rate_limited(1))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/send-message"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&server)
        .await;

    let started = Instant::now();
    client_for(&server)
        .send_text(("123", "hi"), SendOptions::from(RetryConfig::retries(1)))
        .await
        .unwrap();
    assert!(started.elapsed() >= Duration::from_secs(1));
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_429_not_retried_when_disabled() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/send-message"))
        .respond_with(rate_limited(5))
        .expect(2)
        .mount(&server)
        .await;
    let client = client_for(&server);

    let started = Instant::now();
    let err = client
        .send_text(("123", "hi"), SendOptions::from(RetryConfig::new(false, 3)))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(429));

    let err = client
        .send_text(("123", "hi"), SendOptions::from(RetryConfig::retries(0)))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(429));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_non_429_errors_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/send-message"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .send_text(("123", "hi"), SendOptions::from(RetryConfig::retries(3)))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert!(err.response().is_none());
}

#[tokio::test]
async fn test_management_endpoints_do_not_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/groups"))
        .respond_with(rate_limited(0))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server).get_groups().await.unwrap_err();
    assert!(err.is_rate_limited());
}

// ─── Contacts / groups ───────────────────────────────────────────────

#[tokio::test]
async fn test_contact_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/contacts"))
        .and(header("authorization", "Bearer testkey"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "contacts": []})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/contacts/123/profile-picture"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "url": "https://img"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/contacts/123/unblock"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "message": "Unblocked"})))
        .mount(&server)
        .await;
    let client = client_for(&server);

    assert!(client.get_contacts().await.unwrap()["contacts"].is_array());
    assert_eq!(
        client.get_contact_profile_picture("123").await.unwrap()["url"],
        "https://img"
    );
    assert_eq!(client.unblock_contact("123").await.unwrap()["message"], "Unblocked");
}

#[tokio::test]
async fn test_group_participant_and_settings_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/groups/123@g.us/participants/add"))
        .and(body_json(json!({"participants": ["111", "222"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/groups/123@g.us/settings"))
        .and(body_json(json!({"announce": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server);

    client
        .add_group_participants("123@g.us", &["111", "222"])
        .await
        .unwrap();
    client
        .update_group_settings("123@g.us", &json!({"announce": true}))
        .await
        .unwrap();
}

// ─── Sessions ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_session_call_without_pat_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let client = client_for(&server);

    let err = client.get_all_whatsapp_sessions().await.unwrap_err();
    assert!(matches!(err, WasenderError::Config(_)));
    let err = client.get_session_status("abc").await.unwrap_err();
    assert!(matches!(err, WasenderError::Config(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_session_calls_use_personal_access_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/whatsapp-sessions"))
        .and(header("authorization", "Bearer pat-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": []})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/whatsapp-sessions/7/connect"))
        .and(query_param("qrAsImage", "true"))
        .and(header("authorization", "Bearer pat-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": {"status": "NEED_SCAN"}})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/whatsapp-sessions/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_with_pat(&server);

    assert!(client.get_all_whatsapp_sessions().await.unwrap()["data"].is_array());
    let connected = client.connect_whatsapp_session(7, true).await.unwrap();
    assert_eq!(connected["data"]["status"], "NEED_SCAN");
    client.delete_whatsapp_session(7).await.unwrap();
}

#[tokio::test]
async fn test_create_and_update_session_send_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/whatsapp-sessions"))
        .and(body_json(json!({"name": "Support", "phone_number": "+15550001"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"success": true, "data": {"id": 9}})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/whatsapp-sessions/9"))
        .and(body_json(json!({"name": "Sales"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_with_pat(&server);

    let created = client
        .create_whatsapp_session(&json!({"name": "Support", "phone_number": "+15550001"}))
        .await
        .unwrap();
    assert_eq!(created["data"]["id"], 9);
    client
        .update_whatsapp_session(9, &json!({"name": "Sales"}))
        .await
        .unwrap();
}

// ─── Endpoint paths ──────────────────────────────────────────────────

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": data}))
}

#[tokio::test]
async fn test_contact_info_and_block_paths() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/contacts/15550001"))
        .and(header("authorization", "Bearer testkey"))
        .respond_with(ok(json!({"jid": "15550001@s.whatsapp.net"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/contacts/15550001/block"))
        .and(header("authorization", "Bearer testkey"))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server);

    let info = client.get_contact_info("15550001").await.unwrap();
    assert_eq!(info["data"]["jid"], "15550001@s.whatsapp.net");
    client.block_contact("15550001").await.unwrap();
}

#[tokio::test]
async fn test_group_read_paths() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/groups"))
        .and(header("authorization", "Bearer testkey"))
        .respond_with(ok(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/groups/123@g.us/metadata"))
        .and(header("authorization", "Bearer testkey"))
        .respond_with(ok(json!({"subject": "Team"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/groups/123@g.us/participants"))
        .and(header("authorization", "Bearer testkey"))
        .respond_with(ok(json!([{"id": "111"}])))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server);

    assert!(client.get_groups().await.unwrap()["data"].is_array());
    assert_eq!(
        client.get_group_metadata("123@g.us").await.unwrap()["data"]["subject"],
        "Team"
    );
    assert_eq!(
        client.get_group_participants("123@g.us").await.unwrap()["data"][0]["id"],
        "111"
    );
}

#[tokio::test]
async fn test_remove_group_participants_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/groups/123@g.us/participants/remove"))
        .and(header("authorization", "Bearer testkey"))
        .and(body_json(json!({"participants": ["333"]})))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .remove_group_participants("123@g.us", &["333".to_string()])
        .await
        .unwrap();
}

#[tokio::test]
async fn test_session_detail_paths_use_personal_access_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/whatsapp-sessions/7"))
        .and(header("authorization", "Bearer pat-token"))
        .respond_with(ok(json!({"id": 7})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/whatsapp-sessions/7/qr-code"))
        .and(header("authorization", "Bearer pat-token"))
        .respond_with(ok(json!({"qrCode": "2@abc"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/whatsapp-sessions/7/disconnect"))
        .and(header("authorization", "Bearer pat-token"))
        .respond_with(ok(json!({"status": "DISCONNECTED"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/whatsapp-sessions/7/regenerate-api-key"))
        .and(header("authorization", "Bearer pat-token"))
        .respond_with(ok(json!({"api_key": "new-key"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sessions/abc/status"))
        .and(header("authorization", "Bearer pat-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "connected"})))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_with_pat(&server);

    assert_eq!(client.get_whatsapp_session_details(7).await.unwrap()["data"]["id"], 7);
    assert_eq!(
        client.get_whatsapp_session_qr_code(7).await.unwrap()["data"]["qrCode"],
        "2@abc"
    );
    assert_eq!(
        client.disconnect_whatsapp_session(7).await.unwrap()["data"]["status"],
        "DISCONNECTED"
    );
    assert_eq!(
        client.regenerate_api_key(7).await.unwrap()["data"]["api_key"],
        "new-key"
    );
    assert_eq!(client.get_session_status("abc").await.unwrap()["status"], "connected");
}

#[tokio::test]
async fn test_connect_without_qr_image_sends_no_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/whatsapp-sessions/7/connect"))
        .and(header("authorization", "Bearer pat-token"))
        .respond_with(ok(json!({"status": "NEED_SCAN"})))
        .expect(1)
        .mount(&server)
        .await;

    client_with_pat(&server)
        .connect_whatsapp_session(7, false)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.query(), None);
}
