//! Taleweaver Shared - Wire types for the narrator and gateway services.
//!
//! This crate contains the request/response bodies exchanged over HTTP:
//! - Narrator boundary: `/initialize`, `/action`
//! - Gateway boundary: `/init`, `/send-message`
//! - Per-agent query endpoint: `/query`
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - serde only
//! 2. **No business logic** - pure data types and serialization
//! 3. **No domain IDs** - raw `i64`/`i32`/`String` in DTOs

pub mod requests;
pub mod responses;

pub use requests::{
    ActionRequest, AgentQueryRequest, CharacterInit, InitContextRequest, InitializeRequest,
    SendMessageRequest,
};
pub use responses::{
    ActionResponse, AgentQueryResponse, AgentReply, InitContextResponse, SendMessageResponse,
};
