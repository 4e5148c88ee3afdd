//! Document analysis for the Between Language Server.

pub mod document;

pub use document::DocumentState;
