//! Plain-text table output.

use async_trait::async_trait;
use fleetgrid_lib::bulk::{BulkAction, BulkActionDispatcher};
use fleetgrid_lib::error::DispatchError;
use fleetgrid_lib::view::{CheckState, SortDirection, TableView, TableWindow};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::machine::{self, Machine, SortKey};

const MAX_CELL_WIDTH: usize = 32;

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let target = max_width.saturating_sub(1);
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > target {
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result.push('…');
    result
}

fn pad(s: &str, width: usize) -> String {
    format!("{}{}", s, " ".repeat(width.saturating_sub(s.width())))
}

fn checkbox(state: CheckState) -> &'static str {
    match state {
        CheckState::Checked => "[x]",
        CheckState::Indeterminate => "[-]",
        CheckState::Unchecked => "[ ]",
    }
}

fn sort_marker(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Ascending => " ▲",
        SortDirection::Descending => " ▼",
        SortDirection::None => "",
    }
}

/// Renders a window as a status line, a header, the rows and a page footer.
pub fn table(view: &TableView<SortKey, Machine>, window: &TableWindow<'_, Machine>) -> String {
    let mut out = format!("{} ({} machines)\n", window.status, window.filtered_count);
    if !window.status.is_ready() {
        return out;
    }

    let headers: Vec<String> = view
        .columns()
        .iter()
        .map(|column| {
            let marker = column
                .sort_key()
                .map_or("", |key| sort_marker(view.sort().direction_for(key)));
            format!("{}{}", column.header(), marker)
        })
        .collect();
    let rows: Vec<Vec<String>> = window
        .rows
        .iter()
        .map(|m| {
            machine::cells(m)
                .iter()
                .map(|cell| truncate_to_width(cell, MAX_CELL_WIDTH))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            rows.iter()
                .map(|row| row[i].width())
                .chain([header.width()])
                .max()
                .unwrap_or(0)
        })
        .collect();
    let line = |check: &str, cells: &[String]| {
        let cells: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| pad(cell, *width))
            .collect();
        format!("{} {}\n", check, cells.join("  ").trim_end())
    };

    out.push_str(&line(checkbox(window.header_check), headers.as_slice()));
    for (id, row) in window.visible_ids.iter().zip(&rows) {
        let check = if view.selection().contains(id) { "[x]" } else { "[ ]" };
        out.push_str(&line(check, row.as_slice()));
    }
    out.push_str(&format!(
        "Page {} of {} · {} selected\n",
        window.page,
        window.total_pages,
        view.selection().len()
    ));
    out
}

/// Prints bulk actions as JSON instead of sending them to a server.
pub struct PrintDispatcher;

#[async_trait]
impl BulkActionDispatcher<String> for PrintDispatcher {
    async fn dispatch(&self, action: &BulkAction<String>) -> Result<(), DispatchError> {
        let json = serde_json::to_string_pretty(action)
            .map_err(|e| DispatchError::new(action.action(), e.to_string()))?;
        println!("{}", json);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("koala", 10), "koala");
        assert_eq!(truncate_to_width("koala.maas", 6), "koala…");
    }

    #[test]
    fn test_pad() {
        assert_eq!(pad("ab", 4), "ab  ");
        assert_eq!(pad("abcdef", 4), "abcdef");
    }

    #[test]
    fn test_table_output() {
        let machines: Vec<Machine> = serde_json::from_str(
            r#"[{"system_id": "a1", "hostname": "koala", "status": "Ready"}]"#,
        )
        .unwrap();
        let mut view = TableView::new(machine::columns()).unwrap();
        view.update_sort(SortKey::Fqdn).unwrap();
        view.toggle_row(&"a1".to_string());
        let window = view.render(&machines, false, &fleetgrid_lib::view::NoFilter, None);

        let out = table(&view, &window);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Ready (1 machines)");
        assert!(lines[1].starts_with("[x] FQDN ▼"));
        assert!(lines[2].starts_with("[x] koala"));
        assert_eq!(lines[3], "Page 1 of 1 · 1 selected");
    }

    #[test]
    fn test_empty_table_prints_status_only() {
        let view = TableView::new(machine::columns()).unwrap();
        let machines: Vec<Machine> = Vec::new();
        let window = view.render(&machines, false, &fleetgrid_lib::view::NoFilter, None);
        assert_eq!(table(&view, &window), "No items (0 machines)\n");
    }
}
