pub mod attachments;
pub mod engine;
pub mod rpc;
