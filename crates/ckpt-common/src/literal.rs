//! SQL string literal quoting
//!
//! Table inserts always bind parameters. These helpers are only for places
//! where values end up inside SQL text, such as the replayable dump export.

use std::borrow::Cow;

/// Double every single quote so the value can sit between `'...'`.
pub fn escape_literal(value: &str) -> Cow<'_, str> {
    if value.contains('\'') {
        Cow::Owned(value.replace('\'', "''"))
    } else {
        Cow::Borrowed(value)
    }
}

/// Render a complete quoted SQL string literal
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", escape_literal(value))
}
