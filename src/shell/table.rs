//! Stateless table renderers.
//!
//! Ragged rows and out-of-range highlight columns are caller errors. Debug
//! builds assert on them; release builds render whatever cells exist.

use crate::types::KeyFact;
use maud::{Markup, html};
use serde::Deserialize;

/// Tabular comparison data as written in content files.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Zero-based column to emphasize, e.g. the subject of a comparison.
    #[serde(default)]
    pub highlight_col: Option<usize>,
}

impl DataTable {
    pub fn render(&self) -> Markup {
        data_table(&self.headers, &self.rows, self.highlight_col)
    }
}

/// Render `rows` under `headers`, marking cells of `highlight_col`.
pub fn data_table(headers: &[String], rows: &[Vec<String>], highlight_col: Option<usize>) -> Markup {
    debug_assert!(
        rows.iter().all(|row| row.len() == headers.len()),
        "every row must have one cell per header"
    );
    debug_assert!(
        highlight_col.is_none_or(|col| col < headers.len()),
        "highlight column out of range"
    );
    let highlighted = |col: usize| highlight_col == Some(col);
    html! {
        div.table-wrap {
            table.data-table {
                thead {
                    tr {
                        @for (col, header) in headers.iter().enumerate() {
                            th scope="col" class=[highlighted(col).then_some("highlight")] { (header) }
                        }
                    }
                }
                tbody {
                    @for row in rows {
                        tr {
                            @for (col, cell) in row.iter().enumerate() {
                                @if col == 0 {
                                    th scope="row" class=[highlighted(col).then_some("highlight")] { (cell) }
                                } @else {
                                    td class=[highlighted(col).then_some("highlight")] { (cell) }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Label/value facts as a description list.
pub fn key_facts_table(facts: &[KeyFact]) -> Markup {
    html! {
        dl.key-facts {
            @for fact in facts {
                div.key-fact {
                    dt { (fact.label) }
                    dd { (fact.value) }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn comparison() -> DataTable {
        DataTable {
            headers: strings(&["Metric", "XRP", "Solana"]),
            rows: vec![
                strings(&["Settlement", "3-5s", "~0.4s"]),
                strings(&["Fee", "$0.0002", "$0.00025"]),
            ],
            highlight_col: Some(1),
        }
    }

    #[test]
    fn renders_headers_and_rows_in_order() {
        let html = comparison().render().into_string();
        assert_eq!(html.matches("<tr>").count(), 3);
        let metric = html.find("Metric").unwrap();
        let settlement = html.find("Settlement").unwrap();
        let fee = html.find("Fee").unwrap();
        assert!(metric < settlement && settlement < fee);
    }

    #[test]
    fn first_cell_is_row_header() {
        let html = comparison().render().into_string();
        assert!(html.contains(r#"<th scope="row">Settlement</th>"#));
        assert!(html.contains(r#"<th scope="col">Metric</th>"#));
    }

    #[test]
    fn highlight_column_marks_header_and_cells() {
        let html = comparison().render().into_string();
        assert_eq!(html.matches(r#"class="highlight""#).count(), 3);
        assert!(html.contains(r#"<td class="highlight">3-5s</td>"#));
        assert!(html.contains("<td>~0.4s</td>"));
    }

    #[test]
    fn no_highlight_by_default() {
        let table = DataTable {
            highlight_col: None,
            ..comparison()
        };
        assert!(!table.render().into_string().contains("highlight"));
    }

    #[test]
    fn empty_rows_render_header_only() {
        let html = data_table(&strings(&["A", "B"]), &[], None).into_string();
        assert!(html.contains("<tbody></tbody>"));
    }

    #[test]
    #[should_panic(expected = "one cell per header")]
    #[cfg(debug_assertions)]
    fn ragged_rows_fail_fast_in_debug() {
        data_table(&strings(&["A", "B"]), &[strings(&["only one"])], None);
    }

    #[test]
    fn deserializes_from_toml() {
        let table: DataTable = toml::from_str(
            r#"
headers = ["Year", "Low", "High"]
rows = [["2026", "$1.20", "$4.00"]]
highlight_col = 2
"#,
        )
        .unwrap();
        assert_eq!(table.highlight_col, Some(2));
        assert_eq!(table.rows[0][2], "$4.00");
    }

    #[test]
    fn key_facts_render_as_description_list() {
        let facts = vec![
            KeyFact::new("Max supply", "100B XRP"),
            KeyFact::new("Consensus", "XRPL Consensus"),
        ];
        let html = key_facts_table(&facts).into_string();
        assert!(html.starts_with(r#"<dl class="key-facts">"#));
        assert!(html.contains("<dt>Max supply</dt><dd>100B XRP</dd>"));
        assert_eq!(html.matches("<dt>").count(), 2);
    }
}
