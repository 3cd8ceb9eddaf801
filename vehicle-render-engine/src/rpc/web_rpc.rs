use crate::attachments::{AttachmentKind, ModeAttachment};
use crate::engine::scene::parts::{Part, ResolvedParts};
use crate::engine::systems::viewer_inputs::{
    Drivetrain, InputError, InputUpdate, TechMetadata, TrunkControl, VehicleMode, ViewerInputs,
};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC 2.0 error object.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Resource managing bidirectional RPC communication between the host page and Bevy.
/// Handles both request-response patterns and notification broadcasting.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the host without expecting response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    /// Queue response for transmission to the host.
    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }
}

/// Ordering points for systems that consume RPC updates or publish notifications.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RpcSet {
    Receive,
    Send,
}

/// Plugin establishing the RPC layer: `postMessage` on WASM, in-process queues on native.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .init_resource::<MessageQueue>()
            .init_resource::<OutboundQueue>()
            .add_event::<IncomingRpcMessage>()
            .configure_sets(Update, RpcSet::Receive.before(RpcSet::Send))
            .add_systems(
                Update,
                (process_incoming_messages, handle_rpc_messages)
                    .chain()
                    .in_set(RpcSet::Receive),
            )
            .add_systems(Update, send_outgoing_messages.in_set(RpcSet::Send));

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(message_queue: Res<MessageQueue>) {
    let queue_clone = message_queue.0.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        // Filter messages to ensure they contain string data.
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    match window() {
        Some(window) => {
            if let Err(e) =
                window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
            {
                error!("Failed to register message listener: {:?}", e);
            }
        }
        None => error!("Window object not available"),
    }

    // Prevent closure from being dropped by transferring ownership to JS.
    closure.forget();
}

/// Thread-safe inbound queue. Fed by the `message` listener on WASM and by
/// `push` from native hosts and tests.
#[derive(Resource, Default, Clone)]
pub struct MessageQueue(Arc<Mutex<Vec<String>>>);

impl MessageQueue {
    pub fn push(&self, message: impl Into<String>) {
        if let Ok(mut queue) = self.0.lock() {
            queue.push(message.into());
        }
    }
}

/// Serialized messages leaving the engine on native builds.
#[derive(Resource, Default, Clone)]
pub struct OutboundQueue(Arc<Mutex<Vec<String>>>);

impl OutboundQueue {
    pub fn drain(&self) -> Vec<String> {
        self.0
            .lock()
            .map(|mut queue| std::mem::take(&mut *queue))
            .unwrap_or_default()
    }
}

/// Event representing incoming RPC message from the host.
#[derive(Event)]
struct IncomingRpcMessage {
    content: String,
}

fn process_incoming_messages(
    message_queue: Res<MessageQueue>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let messages = if let Ok(mut queue) = message_queue.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

/// Read-only view of the viewer handed to request handlers.
pub struct ViewerState<'a> {
    pub inputs: &'a ViewerInputs,
    pub trunk: &'a TrunkControl,
    pub parts: &'a ResolvedParts,
    pub attachments: Vec<AttachmentKind>,
}

/// Response for the caller plus the input change the request asked for.
#[derive(Debug, Default)]
pub struct RpcOutcome {
    pub response: Option<RpcResponse>,
    pub update: Option<InputUpdate>,
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut inputs: ResMut<ViewerInputs>,
    mut trunk: ResMut<TrunkControl>,
    parts: Res<ResolvedParts>,
    attachments: Query<&ModeAttachment>,
) {
    for event in events.read() {
        debug!("Received RPC: {}", event.content);

        let request = match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => request,
            Err(parse_error) => {
                warn!("RPC parse error: {}", parse_error);
                continue;
            }
        };

        let outcome = {
            let state = ViewerState {
                inputs: &inputs,
                trunk: &trunk,
                parts: &parts,
                attachments: attachments.iter().map(|a| a.kind).collect(),
            };
            handle_rpc_request(&request, &state)
        };

        if let Some(update) = outcome.update {
            update.apply(&mut inputs, &mut trunk);
        }
        if let Some(response) = outcome.response {
            rpc_interface.queue_response(response);
        }
    }
}

/// Handle one request. Only requests with IDs get a response, but
/// notifications still apply their update.
pub fn handle_rpc_request(request: &RpcRequest, state: &ViewerState) -> RpcOutcome {
    let result = match request.method.as_str() {
        "set_mode" => handle_set_mode(&request.params),
        "set_drivetrain" => handle_set_drivetrain(&request.params),
        "set_body_style" => handle_set_body_style(&request.params),
        "set_tech_metadata" => handle_set_tech_metadata(&request.params),
        "set_trunk_open" => handle_set_trunk_open(&request.params),
        "get_viewer_state" => Ok((viewer_state_json(state), None)),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            return RpcOutcome {
                response: request.id.clone().map(|id| {
                    create_error_response(
                        id,
                        -32601,
                        "Method not found",
                        Some(serde_json::json!({"method": request.method})),
                    )
                }),
                update: None,
            };
        }
    };

    match result {
        Ok((result_value, update)) => RpcOutcome {
            response: request.id.clone().map(|id| RpcResponse {
                jsonrpc: "2.0".to_string(),
                result: Some(result_value),
                error: None,
                id: Some(id),
            }),
            update,
        },
        Err(error) => {
            warn!("RPC {} rejected: {}", request.method, error.message);
            RpcOutcome {
                response: request.id.clone().map(|id| RpcResponse {
                    jsonrpc: "2.0".to_string(),
                    result: None,
                    error: Some(error),
                    id: Some(id),
                }),
                update: None,
            }
        }
    }
}

type HandlerResult = Result<(serde_json::Value, Option<InputUpdate>), RpcError>;

fn handle_set_mode(params: &serde_json::Value) -> HandlerResult {
    #[derive(Deserialize)]
    struct ModeParams {
        mode: String,
    }

    let parsed = serde_json::from_value::<ModeParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'mode' parameter"))?;
    let mode = parsed.mode.parse::<VehicleMode>()?;

    Ok((
        serde_json::json!({ "success": true, "mode": mode }),
        Some(InputUpdate::Mode(mode)),
    ))
}

fn handle_set_drivetrain(params: &serde_json::Value) -> HandlerResult {
    #[derive(Deserialize)]
    struct DrivetrainParams {
        drivetrain: String,
    }

    let parsed = serde_json::from_value::<DrivetrainParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'drivetrain' parameter"))?;
    let drivetrain = parsed.drivetrain.parse::<Drivetrain>()?;

    Ok((
        serde_json::json!({ "success": true, "drivetrain": drivetrain }),
        Some(InputUpdate::Drivetrain(drivetrain)),
    ))
}

fn handle_set_body_style(params: &serde_json::Value) -> HandlerResult {
    #[derive(Deserialize)]
    struct BodyStyleParams {
        body_style: String,
    }

    let parsed = serde_json::from_value::<BodyStyleParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'body_style' parameter"))?;
    let body_style = parsed.body_style.trim().to_string();
    if body_style.is_empty() {
        return Err(RpcError::invalid_params("'body_style' must not be empty"));
    }

    Ok((
        serde_json::json!({ "success": true, "body_style": body_style }),
        Some(InputUpdate::BodyStyle(body_style)),
    ))
}

fn handle_set_tech_metadata(params: &serde_json::Value) -> HandlerResult {
    let metadata = params
        .get("metadata")
        .cloned()
        .ok_or_else(|| RpcError::invalid_params("Expected 'metadata' parameter"))?;
    let tech = TechMetadata::from_value(metadata)?;

    Ok((
        serde_json::json!({ "success": true, "keys": tech.as_map().len() }),
        Some(InputUpdate::TechMetadata(tech)),
    ))
}

fn handle_set_trunk_open(params: &serde_json::Value) -> HandlerResult {
    #[derive(Deserialize)]
    struct TrunkParams {
        open: bool,
    }

    let parsed = serde_json::from_value::<TrunkParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected boolean 'open' parameter"))?;

    Ok((
        serde_json::json!({ "success": true, "open": parsed.open }),
        Some(InputUpdate::TrunkOpen(parsed.open)),
    ))
}

fn viewer_state_json(state: &ViewerState) -> serde_json::Value {
    let resolved: Vec<&str> = Part::ALL
        .iter()
        .filter(|part| state.parts.get(**part).is_some())
        .map(Part::canonical_name)
        .collect();
    let missing: Vec<&str> = state
        .parts
        .missing_parts()
        .iter()
        .map(Part::canonical_name)
        .collect();

    serde_json::json!({
        "mode": state.inputs.mode,
        "drivetrain": state.inputs.drivetrain,
        "body_style": state.inputs.body_style,
        "tech_metadata": state.inputs.tech,
        "trunk_open": state.trunk.open,
        "vehicle_loaded": state.parts.root().is_some(),
        "resolved_parts": resolved,
        "missing_parts": missing,
        "attachments": state.attachments,
    })
}

/// Create standardized error response with optional data payload.
fn create_error_response(
    id: serde_json::Value,
    code: i32,
    message: &str,
    data: Option<serde_json::Value>,
) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(RpcError {
            code,
            message: message.to_string(),
            data,
        }),
        id: Some(id),
    }
}

/// Send queued notifications and responses to the host.
fn send_outgoing_messages(
    mut rpc_interface: ResMut<WebRpcInterface>,
    outbound: Res<OutboundQueue>,
) {
    // Send notifications first.
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification, &outbound);
    }

    // Send responses second to maintain order.
    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response, &outbound);
    }
}

/// Send serialized message to the parent window, or the outbound queue on native.
fn send_message_to_parent<T: Serialize>(message: &T, outbound: &OutboundQueue) {
    let json = match serde_json::to_string(message) {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to serialize message: {}", e);
            return;
        }
    };

    #[cfg(target_arch = "wasm32")]
    {
        let _ = outbound;
        if let Some(window) = window() {
            if let Some(parent) = window.parent().ok().flatten() {
                if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                    error!("Failed to send message to parent: {:?}", e);
                }
            } else {
                warn!("No parent window available for message transmission");
            }
        } else {
            error!("Window object not available");
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Ok(mut queue) = outbound.0.lock() {
            queue.push(json);
        }
    }
}

/// Standard RPC error codes and constructors.
impl RpcError {
    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }
}

impl From<InputError> for RpcError {
    fn from(error: InputError) -> Self {
        Self::invalid_params(&error.to_string())
    }
}
