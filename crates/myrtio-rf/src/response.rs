//! Reply sent back to the submitter of a payload
//!
//! The listener answers every payload with a minimal HTTP/1.1 response:
//! `200` with the parsed command count, or a bare `400` header block.

use core::fmt::{self, Write};

use heapless::String;

use crate::ingest::IngestError;

const BODY_SIZE: usize = 48;

fn reason_phrase(code: u16) -> &'static str {
    match code {
        200 => "OK",
        400 => "Bad Request",
        _ => "Unknown",
    }
}

/// Response Headers.
#[derive(Debug, Clone, Copy)]
pub struct ResponseHeaders {
    status: u16,
    content_length: Option<usize>,
}

impl ResponseHeaders {
    /// Create response headers with a status code.
    pub const fn from_code(code: u16) -> Self {
        Self {
            status: code,
            content_length: None,
        }
    }

    /// Success status code.
    pub const fn success() -> Self {
        Self::from_code(200)
    }

    /// Bad request status code.
    pub const fn bad_request() -> Self {
        Self::from_code(400)
    }

    /// Set the content length.
    #[must_use]
    pub const fn with_content_length(mut self, content_length: usize) -> Self {
        self.content_length = Some(content_length);
        self
    }

    /// Status code
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Write the header block, including the terminating blank line.
    pub fn write_to(&self, writer: &mut impl Write) -> fmt::Result {
        write!(writer, "HTTP/1.1 {} {}\r\n", self.status, reason_phrase(self.status))?;
        write!(writer, "Content-Type: text/plain\r\n")?;
        if let Some(content_length) = self.content_length {
            write!(writer, "Content-Length: {}\r\n", content_length)?;
        }
        write!(writer, "Connection: close\r\n\r\n")
    }
}

/// Write the full response for an ingestion result.
///
/// On success the body reports the parsed entry count, which includes
/// skipped entries. A rejected payload gets headers only.
pub fn write_response(
    writer: &mut impl Write,
    result: Result<usize, IngestError>,
) -> fmt::Result {
    let mut body = String::<BODY_SIZE>::new();
    let headers = match result {
        Ok(count) => {
            write!(body, "Number of parsed commands {:4}\r\n", count)?;
            ResponseHeaders::success()
        }
        Err(_) => ResponseHeaders::bad_request(),
    };

    headers
        .with_content_length(body.len())
        .write_to(writer)?;
    writer.write_str(&body)
}
