//! JSON rendering for outlines.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::{Error, Result};
use crate::model::Outline;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with four-space indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert an outline to JSON.
///
/// Non-ASCII text is written verbatim, never `\u` escaped.
pub fn to_json(outline: &Outline, format: JsonFormat) -> Result<String> {
    let bytes = match format {
        JsonFormat::Pretty => {
            let mut buf = Vec::new();
            let mut serializer =
                Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
            outline
                .serialize(&mut serializer)
                .map(|_| buf)
                .map_err(render_error)?
        }
        JsonFormat::Compact => serde_json::to_vec(outline).map_err(render_error)?,
    };

    String::from_utf8(bytes).map_err(|e| Error::Render(format!("JSON is not UTF-8: {}", e)))
}

fn render_error(e: serde_json::Error) -> Error {
    Error::Render(format!("JSON serialization error: {}", e))
}
