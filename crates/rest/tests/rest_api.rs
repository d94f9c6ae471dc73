//! Integration test: boots an in-process fake of the platform's REST API,
//! points a real [`RestClient`] at it, and checks the requests that arrive
//! as well as how responses and failures surface.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{FromRequest, Multipart, Path, Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use ck_domain::config::ApiConfig;
use ck_domain::model::{Attachment, AvatarData, Embed, IntentsOptions};
use ck_domain::resolver::EndpointResolver;
use ck_domain::Error;
use ck_rest::{BotApi, Credential, RestClient};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::net::TcpListener;

// ── Fake API ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Recorded {
    method: &'static str,
    path: String,
    authorization: Option<String>,
    body: Value,
    files: Vec<RecordedFile>,
}

#[derive(Debug, Clone)]
struct RecordedFile {
    field: String,
    file_name: Option<String>,
    data: Vec<u8>,
}

#[derive(Clone)]
struct FakeApi {
    log: Arc<Mutex<Vec<Recorded>>>,
    /// When set, every route answers with this status.
    fail_with: Option<StatusCode>,
}

impl FakeApi {
    fn record(&self, entry: Recorded) {
        self.log.lock().push(entry);
    }

    fn rejected(&self) -> Option<Response> {
        self.fail_with.map(|status| {
            (status, Json(json!({ "message": "401: Unauthorized", "code": 0 }))).into_response()
        })
    }
}

fn bot_user() -> Value {
    json!({ "id": "42", "username": "bot", "discriminator": "0001", "avatar": null, "bot": true })
}

fn auth(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

async fn get_me(State(api): State<FakeApi>, headers: HeaderMap) -> Response {
    api.record(Recorded {
        method: "GET",
        path: "/users/@me".into(),
        authorization: auth(&headers),
        body: Value::Null,
        files: vec![],
    });
    if let Some(r) = api.rejected() {
        return r;
    }
    Json(bot_user()).into_response()
}

async fn patch_me(State(api): State<FakeApi>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    api.record(Recorded {
        method: "PATCH",
        path: "/users/@me".into(),
        authorization: auth(&headers),
        body: body.clone(),
        files: vec![],
    });
    if let Some(r) = api.rejected() {
        return r;
    }
    let mut user = bot_user();
    if let Some(avatar) = body.get("avatar") {
        user["avatar"] = json!(format!("hash-of-{}", avatar.as_str().unwrap_or_default().len()));
    }
    if let Some(color) = body.get("banner_color").and_then(Value::as_u64) {
        user["banner_color"] = json!(format!("#{color:06x}"));
    }
    Json(user).into_response()
}

async fn get_gateway(State(api): State<FakeApi>, headers: HeaderMap) -> Response {
    api.record(Recorded {
        method: "GET",
        path: "/gateway/bot".into(),
        authorization: auth(&headers),
        body: Value::Null,
        files: vec![],
    });
    if let Some(r) = api.rejected() {
        return r;
    }
    Json(json!({ "url": "wss://gateway.example", "shards": 1 })).into_response()
}

async fn post_message(
    State(api): State<FakeApi>,
    Path(channel_id): Path<String>,
    req: Request,
) -> Response {
    let authorization = auth(req.headers());
    let is_multipart = req
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));

    let (body, files) = if is_multipart {
        let mut mp = Multipart::from_request(req, &api).await.unwrap();
        let mut payload = Value::Null;
        let mut files = Vec::new();
        while let Some(field) = mp.next_field().await.unwrap() {
            let name = field.name().unwrap_or_default().to_owned();
            let file_name = field.file_name().map(str::to_owned);
            let data = field.bytes().await.unwrap().to_vec();
            if name == "payload_json" {
                payload = serde_json::from_slice(&data).unwrap();
            } else {
                files.push(RecordedFile {
                    field: name,
                    file_name,
                    data,
                });
            }
        }
        (payload, files)
    } else {
        let Json(v) = Json::<Value>::from_request(req, &api).await.unwrap();
        (v, vec![])
    };

    api.record(Recorded {
        method: "POST",
        path: format!("/channels/{channel_id}/messages"),
        authorization,
        body: body.clone(),
        files,
    });
    if let Some(r) = api.rejected() {
        return r;
    }
    Json(json!({
        "id": "m1",
        "channel_id": channel_id,
        "content": body["content"],
        "author": bot_user(),
    }))
    .into_response()
}

async fn patch_app_bot(State(api): State<FakeApi>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    api.record(Recorded {
        method: "PATCH",
        path: "/applications/@me/bot".into(),
        authorization: auth(&headers),
        body,
        files: vec![],
    });
    if let Some(r) = api.rejected() {
        return r;
    }
    Json(json!({ "id": "app1" })).into_response()
}

/// Boots the fake on an ephemeral port.  Returns its address and the
/// request log.
async fn start_fake_api(fail_with: Option<StatusCode>) -> (SocketAddr, Arc<Mutex<Vec<Recorded>>>) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let api = FakeApi {
        log: log.clone(),
        fail_with,
    };
    let app = Router::new()
        .route("/api/v9/users/@me", get(get_me).patch(patch_me))
        .route("/api/v9/gateway/bot", get(get_gateway))
        .route("/api/v9/channels/:channel_id/messages", post(post_message))
        .route("/api/v9/applications/@me/bot", patch(patch_app_bot))
        .with_state(api);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, log)
}

fn client_for(addr: SocketAddr, token: &str) -> RestClient {
    let cfg = ApiConfig {
        base_url: format!("http://{addr}/api/v9"),
        ..Default::default()
    };
    RestClient::new(&cfg, Credential::new(token)).unwrap()
}

// ── Tests ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn fetch_self_sends_bot_authorization() {
    let (addr, log) = start_fake_api(None).await;
    let client = client_for(addr, "T1");

    let me = client.fetch_self().await.unwrap();
    assert_eq!(me.id, "42");
    assert_eq!(me.username, "bot");

    let log = log.lock();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].method, "GET");
    assert_eq!(log[0].authorization.as_deref(), Some("Bot T1"));
}

#[tokio::test]
async fn gateway_url_is_read_from_gateway_bot() {
    let (addr, log) = start_fake_api(None).await;
    let client = client_for(addr, "T1");

    assert_eq!(client.fetch_gateway_url().await.unwrap(), "wss://gateway.example");
    assert_eq!(
        client.resolve_gateway_url().await.unwrap(),
        "wss://gateway.example"
    );
    assert!(log.lock().iter().all(|r| r.path == "/gateway/bot"));
}

#[tokio::test]
async fn post_message_sends_content_and_decodes_message() {
    let (addr, log) = start_fake_api(None).await;
    let client = client_for(addr, "T1");

    let msg = client.post_message("C1", "hello").await.unwrap();
    assert_eq!(msg.id, "m1");
    assert_eq!(msg.content, "hello");
    assert_eq!(msg.author.id, "42");
    assert_eq!(msg.channel_id.as_deref(), Some("C1"));

    let log = log.lock();
    assert_eq!(log[0].path, "/channels/C1/messages");
    assert_eq!(log[0].body, json!({ "content": "hello" }));
}

#[tokio::test]
async fn embed_is_sent_verbatim() {
    let (addr, log) = start_fake_api(None).await;
    let client = client_for(addr, "T1");

    let embed = Embed::new()
        .title("Status")
        .color(0x00ff00)
        .field("uptime", "3d", true)
        .field("shards", "1", false);
    client
        .post_message_with_embed("C1", "report", &embed)
        .await
        .unwrap();

    let log = log.lock();
    let body = &log[0].body;
    assert_eq!(body["content"], "report");
    assert_eq!(body["embed"]["title"], "Status");
    assert_eq!(body["embed"]["color"], 0x00ff00);
    assert_eq!(body["embed"]["fields"][0]["name"], "uptime");
    assert_eq!(body["embed"]["fields"][1]["name"], "shards");
}

#[tokio::test]
async fn attachment_is_uploaded_as_named_file_part() {
    let (addr, log) = start_fake_api(None).await;
    let client = client_for(addr, "T1");

    let msg = client
        .post_message_with_attachment("C1", "hello", &Attachment::new("a.txt", "data"))
        .await
        .unwrap();
    assert_eq!(msg.content, "hello");

    let log = log.lock();
    let req = &log[0];
    assert_eq!(req.body["content"], "hello");
    assert_eq!(req.body["attachments"][0]["filename"], "a.txt");
    assert_eq!(req.files.len(), 1);
    assert_eq!(req.files[0].field, "files[0]");
    assert_eq!(req.files[0].file_name.as_deref(), Some("a.txt"));
    assert_eq!(req.files[0].data, b"data");
}

#[tokio::test]
async fn avatar_bytes_are_sent_as_data_uri() {
    let (addr, log) = start_fake_api(None).await;
    let client = client_for(addr, "T1");

    let png = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    let user = client.patch_avatar(&AvatarData::Bytes(png)).await.unwrap();
    assert!(user.avatar.is_some());

    let log = log.lock();
    let avatar = log[0].body["avatar"].as_str().unwrap();
    assert!(avatar.starts_with("data:image/png;base64,"));
}

#[tokio::test]
async fn banner_color_is_sent_as_integer() {
    let (addr, log) = start_fake_api(None).await;
    let client = client_for(addr, "T1");

    let user = client.patch_banner_color(0x5865f2).await.unwrap();
    assert_eq!(user.banner_color.as_deref(), Some("#5865f2"));
    assert_eq!(log.lock()[0].body, json!({ "banner_color": 0x5865f2 }));
}

#[tokio::test]
async fn enabling_all_intents_sends_32767() {
    let (addr, log) = start_fake_api(None).await;
    let client = client_for(addr, "T1");

    client.patch_intents(IntentsOptions { all: true }).await.unwrap();

    let log = log.lock();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].path, "/applications/@me/bot");
    assert_eq!(log[0].body, json!({ "intents": 32767 }));
}

#[tokio::test]
async fn intents_not_all_sends_nothing() {
    let (addr, log) = start_fake_api(None).await;
    let client = client_for(addr, "T1");

    client.patch_intents(IntentsOptions { all: false }).await.unwrap();
    assert!(log.lock().is_empty());
}

#[tokio::test]
async fn unauthorized_avatar_update_hides_status() {
    let (addr, _log) = start_fake_api(Some(StatusCode::UNAUTHORIZED)).await;
    let client = client_for(addr, "bad-token");

    let err = client
        .patch_avatar(&AvatarData::DataUri("data:image/png;base64,AA==".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::RequestFailed { operation: "update_avatar" }));

    let text = err.to_string();
    assert_eq!(text, "request failed: update_avatar");
    assert!(!text.contains("401"));
    assert!(!text.contains("Unauthorized"));
}

#[tokio::test]
async fn every_operation_labels_its_failure() {
    let (addr, _log) = start_fake_api(Some(StatusCode::INTERNAL_SERVER_ERROR)).await;
    let client = client_for(addr, "T1");

    let cases: Vec<(&str, Error)> = vec![
        ("fetch_self", client.fetch_self().await.unwrap_err()),
        ("fetch_gateway_url", client.fetch_gateway_url().await.unwrap_err()),
        ("send_message", client.post_message("C1", "x").await.unwrap_err()),
        (
            "send_message_with_embed",
            client
                .post_message_with_embed("C1", "x", &Embed::new())
                .await
                .unwrap_err(),
        ),
        (
            "send_message_with_attachment",
            client
                .post_message_with_attachment("C1", "x", &Attachment::new("f", "y"))
                .await
                .unwrap_err(),
        ),
        ("update_banner_color", client.patch_banner_color(1).await.unwrap_err()),
        (
            "enable_all_intents",
            client
                .patch_intents(IntentsOptions { all: true })
                .await
                .unwrap_err(),
        ),
    ];

    for (expected, err) in cases {
        match err {
            Error::RequestFailed { operation } => assert_eq!(operation, expected),
            other => panic!("{expected}: unexpected error {other:?}"),
        }
    }
}
