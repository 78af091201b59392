//! Ports for external collaborators
//!
//! The engine depends on a small set of collaborator interfaces abstracted
//! from any concrete hosted platform: a blob store for generated documents,
//! an email sender for levy notices, and a document renderer that turns
//! aggregated report rows into bytes. Each domain additionally defines its
//! own store port over the relational database.
//!
//! All calls are single-shot async requests. There is no retry or backoff
//! layer; failures surface synchronously to the caller.

use std::fmt;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Error type for port operations
///
/// A unified error type that all port implementations use, keeping error
/// handling consistent across database and external-service adapters.
#[derive(Debug, Error)]
pub enum PortError {
    /// The requested entity was not found
    #[error("Not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    /// A validation error occurred
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// The operation conflicts with existing data
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Connection to the underlying system failed
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An internal error occurred
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PortError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        PortError::Validation {
            message: message.into(),
        }
    }

    /// Creates a Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        PortError::Conflict {
            message: message.into(),
        }
    }

    /// Creates a Connection error
    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true if this error indicates the entity was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }

    /// Returns true if this error indicates a conflict with existing state
    pub fn is_conflict(&self) -> bool {
        matches!(self, PortError::Conflict { .. })
    }
}

/// Marker trait for all domain ports
///
/// All port traits extend this marker to ensure they are thread-safe and
/// usable in async contexts.
pub trait DomainPort: Send + Sync + 'static {}

/// Blob storage for generated documents and notices
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Uploads bytes to the given path
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), PortError>;

    /// Downloads the bytes stored at the given path
    async fn download(&self, path: &str) -> Result<Vec<u8>, PortError>;

    /// Creates a time-limited signed URL for the given path
    async fn create_signed_url(&self, path: &str, ttl_seconds: u64) -> Result<String, PortError>;
}

/// An outbound email message
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: Option<String>,
    pub text: Option<String>,
    /// Attachments as (filename, content_type, bytes)
    pub attachments: Vec<(String, String, Vec<u8>)>,
}

/// Email delivery for levy notices and reports
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Sends a message, returning the provider's message id
    async fn send(&self, message: EmailMessage) -> Result<String, PortError>;
}

/// Renders aggregated report data into document bytes (e.g. PDF)
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    /// Renders the named template with the supplied data
    async fn render(&self, template_name: &str, data: Value) -> Result<Vec<u8>, PortError>;
}
