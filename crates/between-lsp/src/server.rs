//! LSP server for the Between IDL.
//!
//! Synchronous and single-threaded: each frame is decoded, handled to
//! completion and its replies written before the next frame is read.
//! Unknown methods and undecodable params are logged and ignored so a
//! misbehaving client never takes the server down.

use std::io::{Read, Write};

use lsp_types::{
    DidChangeTextDocumentParams, DidCloseTextDocumentParams, DidOpenTextDocumentParams,
    InitializeResult, PublishDiagnosticsParams, SemanticTokens, SemanticTokensFullOptions,
    SemanticTokensOptions, SemanticTokensParams, SemanticTokensServerCapabilities,
    ServerCapabilities, ServerInfo, TextDocumentSyncCapability, TextDocumentSyncKind, Url,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::handlers::semantic_tokens::{legend, semantic_tokens};
use crate::message::{Incoming, Notification, Outgoing, Response};
use crate::session::Session;
use crate::transport::{write_message, FrameReader, TransportError};

pub const SERVER_NAME: &str = "between-lsp";

/// Between Language Server state.
#[derive(Debug, Default)]
pub struct BetweenLanguageServer {
    /// Open documents and their state
    session: Session,
    shutdown_requested: bool,
    exit_requested: bool,
}

impl BetweenLanguageServer {
    /// Create a new language server instance.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Whether an `exit` notification has been received.
    pub fn is_exiting(&self) -> bool {
        self.exit_requested
    }

    /// Serve frames from `reader` until end of input or `exit`.
    pub fn run<R: Read, W: Write>(&mut self, reader: R, mut writer: W) -> Result<(), TransportError> {
        tracing::info!("Between Language Server loop started");
        let mut frames = FrameReader::new(reader);

        while let Some(body) = frames.next_frame()? {
            for message in self.handle_frame(&body) {
                write_message(&mut writer, &message)?;
            }
            if self.exit_requested {
                break;
            }
        }

        if !self.shutdown_requested {
            tracing::warn!("Input ended without a shutdown request");
        }
        tracing::info!("Between Language Server loop finished");
        Ok(())
    }

    /// Handle one frame body, returning the messages to send back.
    pub fn handle_frame(&mut self, body: &[u8]) -> Vec<Outgoing> {
        match serde_json::from_slice::<Incoming>(body) {
            Ok(message) => self.handle_message(message),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring frame that is not a JSON-RPC message");
                Vec::new()
            }
        }
    }

    pub fn handle_message(&mut self, message: Incoming) -> Vec<Outgoing> {
        let Incoming {
            id, method, params, ..
        } = message;

        let Some(method) = method else {
            tracing::debug!(?id, "Ignoring response from client");
            return Vec::new();
        };
        tracing::debug!(%method, request = id.is_some(), "Handling message");

        match id {
            Some(id) => self
                .handle_request(&method, params)
                .map(|result| vec![Response::new(id, result).into()])
                .unwrap_or_default(),
            None => self.handle_notification(&method, params),
        }
    }

    // =========================================================================
    // REQUESTS
    // =========================================================================

    fn handle_request(&mut self, method: &str, params: Value) -> Option<Value> {
        match method {
            "initialize" => {
                tracing::info!("Initializing Between Language Server");
                to_json(&initialize_result())
            }
            "textDocument/semanticTokens/full" => {
                let params: SemanticTokensParams = decode(method, params)?;
                to_json(&self.semantic_tokens_full(&params.text_document.uri))
            }
            "shutdown" => {
                tracing::info!("Shutting down Between Language Server");
                self.shutdown_requested = true;
                Some(Value::Null)
            }
            _ => {
                tracing::warn!(%method, "Ignoring unknown request");
                None
            }
        }
    }

    fn semantic_tokens_full(&self, uri: &Url) -> SemanticTokens {
        let data = match self.session.get(uri) {
            Some(doc) => semantic_tokens(&doc.syntax),
            None => {
                tracing::warn!(%uri, "Semantic tokens requested for unknown document");
                Vec::new()
            }
        };
        SemanticTokens {
            result_id: None,
            data,
        }
    }

    // =========================================================================
    // NOTIFICATIONS
    // =========================================================================

    fn handle_notification(&mut self, method: &str, params: Value) -> Vec<Outgoing> {
        match method {
            "initialized" => {
                tracing::info!("Between Language Server initialized");
                Vec::new()
            }
            "textDocument/didOpen" => decode(method, params)
                .and_then(|p| self.did_open(p))
                .into_iter()
                .collect(),
            "textDocument/didChange" => decode(method, params)
                .and_then(|p| self.did_change(p))
                .into_iter()
                .collect(),
            "textDocument/didClose" => decode(method, params)
                .and_then(|p| self.did_close(p))
                .into_iter()
                .collect(),
            "exit" => {
                tracing::info!("Exit requested");
                self.exit_requested = true;
                Vec::new()
            }
            _ if method.starts_with("$/") => {
                tracing::debug!(%method, "Ignoring optional notification");
                Vec::new()
            }
            _ => {
                tracing::warn!(%method, "Ignoring unknown notification");
                Vec::new()
            }
        }
    }

    fn did_open(&mut self, params: DidOpenTextDocumentParams) -> Option<Outgoing> {
        let uri = params.text_document.uri;
        tracing::debug!(%uri, "Document opened");
        let diagnostics = self.session.open(uri.clone(), params.text_document.text).diagnostics.clone();
        publish_diagnostics(uri, diagnostics)
    }

    fn did_change(&mut self, params: DidChangeTextDocumentParams) -> Option<Outgoing> {
        let uri = params.text_document.uri;
        tracing::debug!(%uri, "Document changed");

        // Full sync: the last change carries the whole document.
        let Some(change) = params.content_changes.into_iter().last() else {
            tracing::warn!(%uri, "Change notification without content");
            return None;
        };
        if change.range.is_some() {
            tracing::warn!(%uri, "Ranged change received under full sync; treating text as whole document");
        }

        let Some(doc) = self.session.apply_full_replace(&uri, change.text) else {
            tracing::warn!(%uri, "Change for a document that is not open");
            return None;
        };
        let diagnostics = doc.diagnostics.clone();
        publish_diagnostics(uri, diagnostics)
    }

    fn did_close(&mut self, params: DidCloseTextDocumentParams) -> Option<Outgoing> {
        let uri = params.text_document.uri;
        tracing::debug!(%uri, "Document closed");
        if self.session.close(&uri).is_none() {
            tracing::warn!(%uri, "Close for a document that is not open");
        }
        publish_diagnostics(uri, Vec::new())
    }
}

/// Capabilities advertised in response to `initialize`.
pub fn initialize_result() -> InitializeResult {
    InitializeResult {
        capabilities: ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::FULL)),
            semantic_tokens_provider: Some(SemanticTokensServerCapabilities::SemanticTokensOptions(
                SemanticTokensOptions {
                    work_done_progress_options: Default::default(),
                    legend: legend(),
                    range: None,
                    full: Some(SemanticTokensFullOptions::Bool(true)),
                },
            )),
            ..Default::default()
        },
        server_info: Some(ServerInfo {
            name: SERVER_NAME.to_string(),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
        }),
    }
}

fn publish_diagnostics(uri: Url, diagnostics: Vec<lsp_types::Diagnostic>) -> Option<Outgoing> {
    let params = PublishDiagnosticsParams {
        uri,
        diagnostics,
        version: None,
    };
    to_json(&params).map(|p| Notification::new("textDocument/publishDiagnostics", p).into())
}

fn decode<P: DeserializeOwned>(method: &str, params: Value) -> Option<P> {
    match serde_json::from_value(params) {
        Ok(params) => Some(params),
        Err(e) => {
            tracing::error!(%method, error = %e, "Failed to decode params");
            None
        }
    }
}

fn to_json(value: &impl Serialize) -> Option<Value> {
    match serde_json::to_value(value) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode result");
            None
        }
    }
}
