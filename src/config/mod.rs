//! Stored pipeline documents.

pub(crate) mod document;
