//! Multipart form accumulator.
//!
//! `FormData` collects the fields of a `multipart/form-data` body before
//! submission: plain text fields and file-upload fields, in append order.
//! The order is what the server sees.
//!
//! A `FormData` is consumed by exactly one
//! [`Connection::post_form`](crate::connection::Connection::post_form) call;
//! it is moved into the call, so reuse after submission is a compile error
//! rather than a runtime hazard. File paths are not checked when appended; a missing or unreadable
//! file surfaces when the request is executed.

use std::io;
use std::path::PathBuf;

use reqwest::blocking::multipart;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPart {
    /// An ordinary form input, sent inline.
    Text { name: String, value: String },
    /// A file-upload input; the file at `path` is read at send time.
    File { name: String, path: PathBuf },
}

#[derive(Debug, Clone, Default)]
pub struct FormData {
    parts: Vec<FormPart>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a plain field. Empty names are passed through untouched; what
    /// a server makes of them is its own business.
    pub fn add_text(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.parts.push(FormPart::Text { name: name.into(), value: value.into() });
        self
    }

    /// Appends a file-upload field. `path` is not validated here.
    pub fn add_file(&mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> &mut Self {
        self.parts.push(FormPart::File { name: name.into(), path: path.into() });
        self
    }

    /// Fields in append order.
    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Lowers the field list into the transport engine's multipart form.
    /// This is where file fields are opened, so a bad path fails here at
    /// execution time, not at append time.
    pub(crate) fn into_multipart(self) -> io::Result<multipart::Form> {
        let mut form = multipart::Form::new();
        for part in self.parts {
            form = match part {
                FormPart::Text { name, value } => form.text(name, value),
                FormPart::File { name, path } => form.file(name, path)?,
            };
        }
        Ok(form)
    }
}
