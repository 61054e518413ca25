//! Socket front end. Each session id owns one loaded document and one
//! context menu handler; a handler only runs while the session map is
//! locked, so classifications never interleave.

use crate::classifier::PointerContext;
use crate::config::HandlerConfig;
use crate::dom::Document;
use crate::emitter::FramedSink;
use crate::handler::{ContentEvent, ContextMenuHandler, PointerContextEvent};
use crate::node::InspectableNode;
use crate::privacy::clear_private_data;
use crate::proto as pb;
use crate::services::Environment;
use crate::state::PopupState;
use crate::wire::{read_envelope, write_envelope};
use std::collections::HashMap;
use std::env;
use std::fs::{self, OpenOptions};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

pub struct ContentSession {
    session_id: String,
    document: Option<Document>,
    handler: ContextMenuHandler,
}

impl ContentSession {
    fn new(session_id: String, config: &HandlerConfig) -> Self {
        Self {
            session_id,
            document: None,
            handler: ContextMenuHandler::new(config.clone()),
        }
    }
}

pub type SharedSessions = Arc<Mutex<HashMap<String, ContentSession>>>;

pub fn new_sessions() -> SharedSessions {
    Arc::new(Mutex::new(HashMap::new()))
}

pub struct AuditLogger {
    dir: PathBuf,
}

impl AuditLogger {
    pub fn from_env() -> Option<Self> {
        let dir = env::var("CTXMENUD_AUDIT_LOG_DIR")
            .unwrap_or_else(|_| "/tmp/ctxmenud/audit".to_string());
        let trimmed = dir.trim();
        if trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("off")
            || trimmed.eq_ignore_ascii_case("disabled")
        {
            return None;
        }
        Some(Self::new(trimmed))
    }

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn write_line(&self, session_id: &str, line: &str) {
        if let Err(err) = fs::create_dir_all(&self.dir) {
            log::warn!("audit log: {err}");
            return;
        }
        let file_name = format!("{}.jsonl", sanitize_session_id(session_id));
        let path = self.dir.join(file_name);
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(mut file) => {
                if let Err(err) = file.write_all(line.as_bytes()) {
                    log::warn!("audit log: {err}");
                }
            }
            Err(err) => log::warn!("audit log: {err}"),
        }
    }
}

/// Serves framed requests until the peer hangs up.
pub fn handle_connection<S: Read + Write>(
    stream: &mut S,
    session_id: Option<&str>,
    sessions: &SharedSessions,
    config: &HandlerConfig,
    audit_logger: Option<&AuditLogger>,
) -> io::Result<()> {
    let default_session_id = session_id.unwrap_or_default().to_string();

    loop {
        let envelope = match read_envelope(stream)? {
            Some(env) => env,
            None => return Ok(()),
        };

        let req = match envelope.message {
            Some(pb::envelope::Message::Request(req)) => req,
            _ => {
                let resp = error_response("", "", "invalid_request", "expected request");
                write_envelope(stream, &resp)?;
                continue;
            }
        };

        if let Some(resp) = handle_request(req, &default_session_id, sessions, config, audit_logger, stream) {
            write_envelope(stream, &resp)?;
        }
    }
}

/// Commands get a response; content events only ever produce
/// `Content:ContextMenu` events on `out`.
fn handle_request<W: Write>(
    req: pb::Request,
    default_session_id: &str,
    sessions: &SharedSessions,
    config: &HandlerConfig,
    audit_logger: Option<&AuditLogger>,
    out: &mut W,
) -> Option<pb::Envelope> {
    let request_id = req.request_id.clone();
    let session_id = resolve_session_id(&req.session_id, default_session_id);

    let Some(payload) = req.payload else {
        return Some(error_response(&request_id, &session_id, "invalid_request", "missing payload"));
    };

    match payload {
        pb::request::Payload::LoadDocument(snapshot) => {
            if session_id.is_empty() {
                return Some(error_response(&request_id, &session_id, "invalid_request", "session_id is required"));
            }
            let document = match Document::from_snapshot(&snapshot) {
                Ok(document) => document,
                Err(err) => return Some(error_response(&request_id, &session_id, err.code, &err.message)),
            };
            let node_count = document.len() as u32;
            with_session_or_create(sessions, &session_id, config, |entry| {
                // a new document is a navigation; nothing survives it
                entry.handler.reset();
                entry.document = Some(document);
            });
            Some(wrap_response(
                request_id,
                session_id,
                pb::response::Payload::LoadDocument(pb::LoadDocumentResponse { node_count }),
            ))
        }
        pb::request::Payload::ContextMenu(event) => {
            let handled = with_session(sessions, &session_id, |entry| {
                dispatch_context_menu(entry, &event, out, audit_logger)
            });
            if handled.is_none() {
                log::warn!("context menu for unknown session {session_id:?} dropped");
            }
            None
        }
        pb::request::Payload::PageHide(_) => {
            with_session(sessions, &session_id, |entry| entry.handler.reset());
            None
        }
        pb::request::Payload::RegisterType(register) => {
            if register.name.trim().is_empty() {
                return Some(error_response(&request_id, &session_id, "invalid_request", "name is required"));
            }
            if session_id.is_empty() {
                return Some(error_response(&request_id, &session_id, "invalid_request", "session_id is required"));
            }
            let registered = with_session_or_create(sessions, &session_id, config, |entry| {
                let pb::RegisterType {
                    name,
                    requires_type,
                    requires_attribute,
                } = register;
                let handler = declarative_type(name.clone(), requires_type, requires_attribute);
                entry.handler.register_type(name, handler);
                entry.handler.registry().len() as u32
            });
            Some(wrap_response(
                request_id,
                session_id,
                pb::response::Payload::RegisterType(pb::RegisterTypeResponse { registered }),
            ))
        }
        pb::request::Payload::UnregisterType(unregister) => {
            let removed = with_session(sessions, &session_id, |entry| {
                let removed = entry.handler.unregister_type(&unregister.name) as u32;
                if entry.handler.registry().is_empty() {
                    log::debug!("no extension types left in session {}", entry.session_id);
                }
                removed
            });
            match removed {
                Some(removed) => Some(wrap_response(
                    request_id,
                    session_id,
                    pb::response::Payload::UnregisterType(pb::UnregisterTypeResponse { removed }),
                )),
                None => Some(invalid_session(&request_id, &session_id)),
            }
        }
        pb::request::Payload::ClearPrivateData(clear) => {
            let cleared = with_session(sessions, &session_id, |entry| {
                entry
                    .document
                    .as_mut()
                    .map(|document| clear_private_data(document, &clear.data))
            });
            match cleared {
                Some(Some(cleared)) => Some(wrap_response(
                    request_id,
                    session_id,
                    pb::response::Payload::ClearPrivateData(pb::ClearPrivateDataResponse { cleared }),
                )),
                _ => Some(invalid_session(&request_id, &session_id)),
            }
        }
    }
}

fn dispatch_context_menu<W: Write>(
    entry: &mut ContentSession,
    event: &pb::ContextMenuEvent,
    out: &mut W,
    audit_logger: Option<&AuditLogger>,
) {
    let ContentSession {
        session_id,
        document,
        handler,
    } = entry;
    let Some(document) = document.as_ref() else {
        log::warn!("context menu before any document was loaded in session {session_id}");
        return;
    };

    let target = document.node(event.target_node_id);
    if target.is_none() {
        log::debug!("context menu target {} not in document", event.target_node_id);
    }
    let ignored = target.is_none() || event.default_prevented;
    let content_event = ContentEvent::ContextMenu(PointerContextEvent {
        target,
        pointer: PointerContext {
            client_x: event.client_x,
            client_y: event.client_y,
            input_source: event.input_source,
        },
        default_prevented: event.default_prevented,
    });

    let env = Environment::uniform(document);
    let mut sink = FramedSink::new(&mut *out, session_id.clone());
    match handler.handle_event(content_event, &env, &mut sink) {
        Ok(()) => {
            if let Some(state) = handler.previous_state().filter(|_| !ignored) {
                log_audit_menu(audit_logger, session_id, state);
            }
        }
        Err(err) => {
            log::warn!("context menu on node {} aborted: {err}", event.target_node_id);
            log_audit_abort(audit_logger, session_id, err.code);
        }
    }
}

/// Handler for a type registered over the wire: optionally requires a tag
/// already present and an attribute on the clicked node, whose value is
/// copied into the state's extras.
fn declarative_type(
    name: String,
    requires_type: String,
    requires_attribute: String,
) -> impl Fn(&mut PopupState, &dyn InspectableNode) -> bool + Send + Sync + 'static {
    move |state: &mut PopupState, node: &dyn InspectableNode| -> bool {
        if !requires_type.is_empty() && !state.has_type(&requires_type) {
            return false;
        }
        if requires_attribute.is_empty() {
            return true;
        }
        match node.attribute(&requires_attribute) {
            Some(value) => {
                state.extras.insert(name.clone(), value);
                true
            }
            None => false,
        }
    }
}

fn lock_sessions(sessions: &SharedSessions) -> MutexGuard<'_, HashMap<String, ContentSession>> {
    sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn with_session<T, F>(sessions: &SharedSessions, session_id: &str, op: F) -> Option<T>
where
    F: FnOnce(&mut ContentSession) -> T,
{
    let mut map = lock_sessions(sessions);
    let entry = map.get_mut(session_id)?;
    Some(op(entry))
}

fn with_session_or_create<T, F>(
    sessions: &SharedSessions,
    session_id: &str,
    config: &HandlerConfig,
    op: F,
) -> T
where
    F: FnOnce(&mut ContentSession) -> T,
{
    let mut map = lock_sessions(sessions);
    let entry = map
        .entry(session_id.to_string())
        .or_insert_with(|| ContentSession::new(session_id.to_string(), config));
    op(entry)
}

fn resolve_session_id(requested: &str, default_session_id: &str) -> String {
    if !requested.is_empty() {
        requested.to_string()
    } else {
        default_session_id.to_string()
    }
}

fn log_audit_menu(logger: Option<&AuditLogger>, session_id: &str, state: &PopupState) {
    let types = state
        .types
        .iter()
        .map(|tag| format!("\"{}\"", escape_json_string(tag)))
        .collect::<Vec<_>>()
        .join(",");
    let details = format!("\"types\":[{types}],\"x\":{},\"y\":{}", state.x_pos, state.y_pos);
    log_audit_event(logger, session_id, "contextmenu", &details);
}

fn log_audit_abort(logger: Option<&AuditLogger>, session_id: &str, code: &str) {
    let details = format!("\"code\":\"{}\"", escape_json_string(code));
    log_audit_event(logger, session_id, "contextmenu_aborted", &details);
}

fn log_audit_event(logger: Option<&AuditLogger>, session_id: &str, event: &str, details: &str) {
    let Some(logger) = logger else {
        return;
    };
    let mut line = String::new();
    line.push_str("{\"ts_ms\":");
    line.push_str(&current_millis().to_string());
    line.push_str(",\"event\":\"");
    line.push_str(&escape_json_string(event));
    line.push_str("\",\"session_id\":\"");
    line.push_str(&escape_json_string(session_id));
    line.push('"');
    if !details.trim().is_empty() {
        line.push(',');
        line.push_str(details);
    }
    line.push_str("}\n");
    logger.write_line(session_id, &line);
}

fn current_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

fn sanitize_session_id(session_id: &str) -> String {
    let out: String = session_id
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
                ch
            } else {
                '_'
            }
        })
        .collect();
    if out.is_empty() {
        "content".to_string()
    } else {
        out
    }
}

fn escape_json_string(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

fn wrap_response(
    request_id: String,
    session_id: String,
    payload: pb::response::Payload,
) -> pb::Envelope {
    pb::Envelope {
        message: Some(pb::envelope::Message::Response(pb::Response {
            request_id,
            session_id,
            error: None,
            payload: Some(payload),
        })),
    }
}

fn invalid_session(request_id: &str, session_id: &str) -> pb::Envelope {
    error_response(request_id, session_id, "invalid_session", "session not initialized")
}

fn error_response(request_id: &str, session_id: &str, code: &str, message: &str) -> pb::Envelope {
    pb::Envelope {
        message: Some(pb::envelope::Message::Response(pb::Response {
            request_id: request_id.to_string(),
            session_id: session_id.to_string(),
            error: Some(pb::Error {
                code: code.to_string(),
                message: message.to_string(),
            }),
            payload: None,
        })),
    }
}
