//! JSON-RPC 2.0 communication layer for the host page embedding the viewer.
//!
//! Implements bidirectional messaging between the Bevy engine and the host UI via
//! iframe postMessage on WASM, and through in-process queues (`MessageQueue`,
//! `OutboundQueue`) on native builds and in tests.
//!
//! ## Architecture
//!
//! The RPC system uses standard JSON-RPC 2.0 protocol with:
//! - **Requests**: Expect responses with matching IDs
//! - **Notifications**: One-way messages without responses
//! - **Responses**: Reply to requests with results or errors
//!
//! ## Message Flow
//!
//! ```text
//! Host (Parent Window)   <──postMessage──>  Bevy (iframe)
//!        │                                        │
//!        ├─ Request (with ID) ──────────────────> │
//!        │                                        ├─ Process request
//!        │ <───────────────── Response (with ID) ─┤
//!        │                                        │
//!        │ <────────── Notification (no ID) ─────┤
//! ```
//!
//! ## Adding New RPC Methods
//!
//! ### 1. Define Request Handler
//!
//! Add a new method case in `handle_rpc_request()`:
//!
//! ```rust,ignore
//! pub fn handle_rpc_request(request: &RpcRequest, state: &ViewerState) -> RpcOutcome {
//!     let result = match request.method.as_str() {
//!         "your_method_name" => handle_your_method(&request.params),
//!         // ... existing methods
//!         _ => { /* -32601 Method not found */ }
//!     };
//!     // ... response creation
//! }
//! ```
//!
//! ### 2. Implement Handler Function
//!
//! Handlers stay pure: they return the result payload plus the `InputUpdate`
//! to apply, and `handle_rpc_messages` writes the update to the resources.
//!
//! ```rust,ignore
//! fn handle_your_method(params: &Value) -> HandlerResult {
//!     // Deserialize parameters
//!     #[derive(Deserialize)]
//!     struct YourParams {
//!         field: String,
//!     }
//!
//!     let parsed = serde_json::from_value::<YourParams>(params.clone())
//!         .map_err(|_| RpcError::invalid_params("Expected 'field' parameter"))?;
//!
//!     // Process logic here
//!
//!     // Return success response and the input change
//!     Ok((
//!         json!({ "success": true, "result": parsed.field.clone() }),
//!         Some(InputUpdate::BodyStyle(parsed.field)),
//!     ))
//! }
//! ```
//!
//! ### 3. Call From the Host
//!
//! ```typescript
//! // Request-response pattern
//! const response = await window.postMessage({
//!   jsonrpc: "2.0",
//!   method: "your_method_name",
//!   params: { field: "value" },
//!   id: 1
//! }, "*");
//!
//! // Notification pattern (no response expected)
//! window.postMessage({
//!   jsonrpc: "2.0",
//!   method: "your_notification",
//!   params: { data: "value" }
//! }, "*");
//! ```
//!
//! ## Sending Notifications from Bevy
//!
//! Use `WebRpcInterface::send_notification()` to push updates to the host:
//!
//! ```rust,ignore
//! fn your_system(mut rpc: ResMut<WebRpcInterface>) {
//!     rpc.send_notification("event_name", json!({
//!         "data": "value",
//!         "timestamp": 123456
//!     }));
//! }
//! ```
//!
//! ## Error Handling
//!
//! Standard JSON-RPC 2.0 error codes:
//! - `-32600`: Invalid request
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32603`: Internal error
//!
//! ## Existing Methods
//!
//! ### Viewer Inputs
//! - `set_mode`: Switch between showroom/safety/performance/utility
//! - `set_drivetrain`: FWD, RWD, AWD or 4WD
//! - `set_body_style`: Load another variant from the vehicle manifest
//! - `set_tech_metadata`: Replace the technical metadata object
//! - `set_trunk_open`: Open or close the trunk cargo volume
//!
//! ### Queries
//! - `get_viewer_state`: Current inputs, resolved parts and active attachments
//!
//! ### Notifications (Bevy to host)
//! - `mode_applied`: Sent after each configurator pass with attachment kinds and labels
//! - `fps_update`: Smoothed frame rate every half second

/// JSON-RPC 2.0 bidirectional communication system for host page integration.
///
/// Handles request-response patterns, notifications, and WASM message listeners.
pub mod web_rpc;
