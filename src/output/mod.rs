// src/output/mod.rs
//! Delivery of the harvested table.
//!
//! Rendering is pure; [`writer`] is the only place that touches the
//! filesystem or stdout.

mod writer;

use crate::error::AppError;
use crate::model::PhotoRow;
use std::path::PathBuf;

pub use writer::deliver;

/// Where the rendered table goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryTarget {
    WriteFile { path: PathBuf },
    PrintToStdout,
}

impl DeliveryTarget {
    pub fn from_option(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => DeliveryTarget::WriteFile { path },
            None => DeliveryTarget::PrintToStdout,
        }
    }
}

/// Renders rows as a pretty-printed JSON array.
pub fn render_table(rows: &[PhotoRow]) -> Result<String, AppError> {
    let mut rendered = serde_json::to_string_pretty(rows)?;
    rendered.push('\n');
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn table_is_a_json_array_of_rows() {
        let rows = vec![
            PhotoRow {
                group: "memes".to_string(),
                post_id: "55".to_string(),
                id: 1,
                date: 100,
                url: Some("u1".to_string()),
            },
            PhotoRow {
                group: "@chan".to_string(),
                post_id: "7".to_string(),
                id: 1,
                date: 200,
                url: None,
            },
        ];

        let rendered = render_table(&rows).unwrap();
        let parsed: Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(
            parsed,
            json!([
                { "group": "memes", "post_id": "55", "id": 1, "date": 100, "url": "u1" },
                { "group": "@chan", "post_id": "7", "id": 1, "date": 200, "url": null }
            ])
        );
    }

    #[test]
    fn missing_path_means_stdout() {
        assert_eq!(DeliveryTarget::from_option(None), DeliveryTarget::PrintToStdout);
    }
}
