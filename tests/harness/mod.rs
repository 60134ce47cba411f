//! Integration Test Harness
//!
//! - `TestServer` - Runs a real mycm server on a random port
//! - `StubProvider` - Canned HTTP provider that records every request
//!
//! # Example
//!
//! ```rust,ignore
//! use harness::{StubProvider, TestServer};
//!
//! #[tokio::test]
//! async fn test_post() {
//!     let gemini = StubProvider::json(200, harness::gemini_reply("COPY: ...")).await.unwrap();
//!     let stability = StubProvider::json(200, harness::stability_reply("iVBOR...")).await.unwrap();
//!     let server = TestServer::start(TestServer::settings(&gemini, &stability)).await.unwrap();
//!
//!     let resp = server.post("/posts", &body).await.unwrap();
//!     assert_eq!(resp.status(), 200);
//! }
//! ```

#![allow(dead_code)]

mod server;
mod stub;

pub use server::TestServer;
pub use stub::{gemini_reply, stability_reply, RecordedRequest, StubProvider};

/// Standard request body for the La Tostadería profile
pub fn tostaderia_request(idea: &str) -> serde_json::Value {
    serde_json::json!({
        "profile": {
            "name": "La Tostadería",
            "description": "cafetería de especialidad en Villa Crespo, onda rústica y amigable",
            "location": "Villa Crespo, CABA"
        },
        "topic_idea": idea
    })
}
