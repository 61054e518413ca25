use ctxmenud::config::HandlerConfig;
use ctxmenud::proto as pb;
use ctxmenud::server::{handle_connection, new_sessions, AuditLogger};
use ctxmenud::wire::{read_envelope, write_envelope};
use std::fs;
use std::os::unix::net::UnixStream;
use std::thread::{self, JoinHandle};

struct Client {
    stream: UnixStream,
    next_id: u32,
    server: JoinHandle<()>,
}

impl Client {
    fn spawn(audit_dir: Option<&std::path::Path>) -> Self {
        let (client, mut server_end) = UnixStream::pair().unwrap();
        let audit = audit_dir.map(AuditLogger::new);
        let server = thread::spawn(move || {
            let sessions = new_sessions();
            handle_connection(
                &mut server_end,
                Some("tab-1"),
                &sessions,
                &HandlerConfig::default(),
                audit.as_ref(),
            )
            .unwrap();
        });
        Self {
            stream: client,
            next_id: 0,
            server,
        }
    }

    fn send(&mut self, payload: pb::request::Payload) -> String {
        self.next_id += 1;
        let request_id = format!("r{}", self.next_id);
        let envelope = pb::Envelope {
            message: Some(pb::envelope::Message::Request(pb::Request {
                request_id: request_id.clone(),
                session_id: String::new(),
                payload: Some(payload),
            })),
        };
        write_envelope(&mut self.stream, &envelope).unwrap();
        request_id
    }

    fn response(&mut self) -> pb::Response {
        match read_envelope(&mut self.stream).unwrap().unwrap().message {
            Some(pb::envelope::Message::Response(resp)) => resp,
            other => panic!("expected response, got {other:?}"),
        }
    }

    fn event(&mut self) -> pb::Event {
        match read_envelope(&mut self.stream).unwrap().unwrap().message {
            Some(pb::envelope::Message::Event(event)) => event,
            other => panic!("expected event, got {other:?}"),
        }
    }

    fn right_click(&mut self, node: u64) {
        self.send(pb::request::Payload::ContextMenu(pb::ContextMenuEvent {
            target_node_id: node,
            client_x: 12.0,
            client_y: 34.0,
            input_source: 1,
            default_prevented: false,
        }));
    }

    fn finish(self) {
        drop(self.stream);
        self.server.join().unwrap();
    }
}

fn element(id: u64, parent_id: u64, tag: &str, attributes: &[(&str, &str)]) -> pb::NodeSnapshot {
    pb::NodeSnapshot {
        id,
        parent_id,
        kind: pb::NodeKind::Element as i32,
        tag: tag.to_string(),
        attributes: attributes
            .iter()
            .map(|(name, value)| pb::Attribute {
                name: name.to_string(),
                value: value.to_string(),
            })
            .collect(),
        ..Default::default()
    }
}

fn text(id: u64, parent_id: u64, text: &str) -> pb::NodeSnapshot {
    pb::NodeSnapshot {
        id,
        parent_id,
        kind: pb::NodeKind::Text as i32,
        text: text.to_string(),
        ..Default::default()
    }
}

fn page() -> pb::DocumentSnapshot {
    pb::DocumentSnapshot {
        url: "https://example.com/articles/".to_string(),
        nodes: vec![
            element(1, 0, "body", &[]),
            element(2, 1, "a", &[("href", "story"), ("data-share", "mastodon")]),
            text(3, 2, "Read the story"),
            element(4, 1, "svg:a", &[("xlink:type", "simple")]),
            element(5, 1, "p", &[]),
            text(6, 5, "Plain prose"),
        ],
        cookies: vec!["sid=1".to_string()],
        ..Default::default()
    }
}

fn extra(state: &pb::ContextMenuState, key: &str) -> Option<String> {
    let field = state.extras.as_ref()?.fields.get(key)?;
    match field.kind.as_ref()? {
        prost_types::value::Kind::StringValue(value) => Some(value.clone()),
        _ => None,
    }
}

#[test]
fn classifies_links_and_registered_types() {
    let mut client = Client::spawn(None);

    client.send(pb::request::Payload::LoadDocument(page()));
    let resp = client.response();
    assert!(resp.error.is_none());
    assert_eq!(resp.session_id, "tab-1");
    assert_eq!(
        resp.payload,
        Some(pb::response::Payload::LoadDocument(pb::LoadDocumentResponse { node_count: 6 }))
    );

    client.right_click(3);
    let event = client.event();
    assert_eq!(event.name, "Content:ContextMenu");
    let state = event.state.unwrap();
    assert_eq!(state.types, vec!["link"]);
    assert_eq!(state.link_url, "https://example.com/articles/story");
    assert_eq!(state.link_protocol.as_deref(), Some("https"));
    assert_eq!(state.link_title, "Read the story");
    assert_eq!((state.x_pos, state.y_pos, state.source), (12.0, 34.0, 1));

    client.send(pb::request::Payload::RegisterType(pb::RegisterType {
        name: "share".to_string(),
        requires_type: "link".to_string(),
        requires_attribute: "data-share".to_string(),
    }));
    assert_eq!(
        client.response().payload,
        Some(pb::response::Payload::RegisterType(pb::RegisterTypeResponse { registered: 1 }))
    );

    client.right_click(2);
    let state = client.event().state.unwrap();
    assert_eq!(state.types, vec!["link", "share"]);
    assert_eq!(extra(&state, "share").as_deref(), Some("mastodon"));

    client.right_click(6);
    let state = client.event().state.unwrap();
    assert_eq!(state.types, vec!["content-text"]);
    assert!(state.extras.is_none());

    client.send(pb::request::Payload::UnregisterType(pb::UnregisterType {
        name: "share".to_string(),
    }));
    assert_eq!(
        client.response().payload,
        Some(pb::response::Payload::UnregisterType(pb::UnregisterTypeResponse { removed: 1 }))
    );

    client.finish();
}

#[test]
fn aborted_and_ignored_events_emit_nothing() {
    let mut client = Client::spawn(None);
    client.send(pb::request::Payload::LoadDocument(page()));
    client.response();

    client.right_click(4);
    client.right_click(999);
    client.send(pb::request::Payload::ContextMenu(pb::ContextMenuEvent {
        target_node_id: 6,
        default_prevented: true,
        ..Default::default()
    }));
    client.send(pb::request::Payload::PageHide(pb::PageHide {}));

    // the next frame on the stream is this response, not an event
    let request_id = client.send(pb::request::Payload::ClearPrivateData(pb::ClearPrivateData {
        data: "cookies".to_string(),
    }));
    let resp = client.response();
    assert_eq!(resp.request_id, request_id);
    assert_eq!(
        resp.payload,
        Some(pb::response::Payload::ClearPrivateData(pb::ClearPrivateDataResponse { cleared: true }))
    );

    client.send(pb::request::Payload::ClearPrivateData(pb::ClearPrivateData {
        data: "history".to_string(),
    }));
    assert_eq!(
        client.response().payload,
        Some(pb::response::Payload::ClearPrivateData(pb::ClearPrivateDataResponse { cleared: false }))
    );

    client.finish();
}

#[test]
fn rejects_bad_requests() {
    let mut client = Client::spawn(None);

    client.send(pb::request::Payload::ClearPrivateData(pb::ClearPrivateData {
        data: "cookies".to_string(),
    }));
    assert_eq!(client.response().error.unwrap().code, "invalid_session");

    let mut snapshot = page();
    snapshot.nodes.swap(0, 1);
    client.send(pb::request::Payload::LoadDocument(snapshot));
    assert_eq!(client.response().error.unwrap().code, "invalid_snapshot");

    client.send(pb::request::Payload::RegisterType(pb::RegisterType {
        name: " ".to_string(),
        ..Default::default()
    }));
    assert_eq!(client.response().error.unwrap().code, "invalid_request");

    let stray = pb::Envelope {
        message: Some(pb::envelope::Message::Event(pb::Event::default())),
    };
    write_envelope(&mut client.stream, &stray).unwrap();
    assert_eq!(client.response().error.unwrap().code, "invalid_request");

    client.finish();
}

#[test]
fn audit_log_records_menus_and_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let mut client = Client::spawn(Some(dir.path()));
    client.send(pb::request::Payload::LoadDocument(page()));
    client.response();

    client.right_click(6);
    client.event();
    client.right_click(4);
    client.finish();

    let contents = fs::read_to_string(dir.path().join("tab-1.jsonl")).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("\"types\":[\"content-text\"]"));
    assert!(lines[1].contains("\"event\":\"contextmenu_aborted\""));
    assert!(lines[1].contains("\"code\":\"empty_href\""));
}
