use colored::*;
use serde::Serialize;

use super::position::DropdownPosition;
use super::SearchForm;

pub const LISTBOX_ID: &str = "ticker-suggestions";

/// One row of the detached suggestion surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionRow {
    pub id: String,
    pub role: &'static str,
    pub display: String,
    pub file: String,
    #[serde(rename = "aria-selected")]
    pub selected: bool,
}

/// Accessibility attributes for the search input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputA11y {
    pub role: &'static str,
    #[serde(rename = "aria-autocomplete")]
    pub autocomplete: &'static str,
    #[serde(rename = "aria-expanded")]
    pub expanded: bool,
    #[serde(rename = "aria-controls")]
    pub controls: &'static str,
    #[serde(rename = "aria-activedescendant", skip_serializing_if = "Option::is_none")]
    pub active_descendant: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListView {
    pub listbox_id: &'static str,
    pub role: &'static str,
    pub position: DropdownPosition,
    pub rows: Vec<OptionRow>,
    pub input: InputA11y,
}

fn row_id(position: usize) -> String {
    format!("{}-{}", LISTBOX_ID, position)
}

/// Snapshot of what the dropdown should draw. Holds no state of its own.
pub fn render(form: &SearchForm) -> ListView {
    let highlight = form.highlight();
    let rows: Vec<OptionRow> = form
        .suggestions()
        .iter()
        .enumerate()
        .map(|(i, item)| OptionRow {
            id: row_id(i),
            role: "option",
            display: item.display.clone(),
            file: item.file.clone(),
            selected: highlight == Some(i),
        })
        .collect();

    ListView {
        listbox_id: LISTBOX_ID,
        role: "listbox",
        position: form.position(),
        input: InputA11y {
            role: "combobox",
            autocomplete: "list",
            expanded: form.is_open(),
            controls: LISTBOX_ID,
            active_descendant: highlight.filter(|&i| i < rows.len()).map(row_id),
        },
        rows,
    }
}

/// Draws the list for a terminal host.
pub fn render_terminal(view: &ListView) -> String {
    if !view.position.is_displayed() {
        return String::new();
    }
    view.rows
        .iter()
        .map(|row| {
            if row.selected {
                format!("{} {}  {}", ">".green(), row.display.bold().green(), row.file.dimmed())
            } else {
                format!("  {}  {}", row.display, row.file.dimmed())
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
