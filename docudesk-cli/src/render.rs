//! Plain-text rendering of table views and records.

use docudesk_lib::query::PageLink;
use docudesk_lib::table::FooterView;
use docudesk_lib::table::TableBody;
use docudesk_lib::table::TableContent;
use docudesk_lib::table::TableView;
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

/// Cells wider than this are cut with an ellipsis.
const MAX_CELL_WIDTH: usize = 40;

const COLUMN_GAP: &str = "  ";

pub fn table(view: &TableView) -> String {
    match view {
        TableView::Invalid { message } => format!("{message}\n"),
        TableView::Table(content) => table_content(content),
    }
}

fn table_content(content: &TableContent) -> String {
    let headers: Vec<String> = content
        .headers
        .iter()
        .map(|h| match h.sort_glyph {
            Some(glyph) => format!("{} {glyph}", h.title),
            None => h.title.clone(),
        })
        .collect();

    let rows: Vec<Vec<String>> = match &content.body {
        TableBody::Rows(rows) => rows
            .iter()
            .map(|row| row.cells.iter().map(|c| truncate(c, MAX_CELL_WIDTH)).collect())
            .collect(),
        TableBody::Loading | TableBody::Empty => Vec::new(),
    };

    let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.width());
        }
    }

    let mut out = String::new();
    out.push_str(&line(&headers, &widths));
    let rules: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    out.push_str(&line(&rules, &widths));

    match &content.body {
        TableBody::Loading => out.push_str("Loading…\n"),
        TableBody::Empty => out.push_str("No results\n"),
        TableBody::Rows(_) => {
            for row in &rows {
                out.push_str(&line(row, &widths));
            }
        }
    }

    if let Some(footer) = &content.footer {
        out.push('\n');
        out.push_str(&footer_text(footer));
    }
    out
}

fn line(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| pad(cell, *width))
        .collect();
    let mut line = padded.join(COLUMN_GAP).trim_end().to_string();
    line.push('\n');
    line
}

fn footer_text(footer: &FooterView) -> String {
    let links: Vec<String> = footer
        .links
        .iter()
        .map(|link| match link {
            PageLink::Page(n) if *n == footer.current_page => format!("[{n}]"),
            other => other.to_string(),
        })
        .collect();

    let mut out = format!("{} · {}\n", footer.summary, footer.page_label);
    if !links.is_empty() {
        let prev = if footer.has_prev { "‹ " } else { "" };
        let next = if footer.has_next { " ›" } else { "" };
        out.push_str(&format!("{prev}{}{next}\n", links.join(" ")));
    }
    out
}

/// Key/value lines, keys aligned.
pub fn details(fields: &[(&str, Option<String>)]) -> String {
    let width = fields.iter().map(|(k, _)| k.width()).max().unwrap_or(0);
    let mut out = String::new();
    for (key, value) in fields {
        let value = value.as_deref().unwrap_or("-");
        out.push_str(&format!("{}  {value}\n", pad(key, width)));
    }
    out
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(fill))
}

fn truncate(text: &str, max: usize) -> String {
    let text = text.replace(['\n', '\r'], " ");
    if text.width() <= max {
        return text;
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use docudesk_lib::table::HeaderView;
    use docudesk_lib::table::RowView;

    use super::*;

    fn content(body: TableBody) -> TableContent {
        TableContent {
            headers: vec![
                HeaderView {
                    title: "Name".to_string(),
                    sortable: true,
                    sort_glyph: Some("↑"),
                },
                HeaderView {
                    title: "Status".to_string(),
                    sortable: true,
                    sort_glyph: None,
                },
            ],
            body,
            all_selected: false,
            selected_count: 0,
            footer: None,
        }
    }

    #[test]
    fn columns_are_aligned_by_display_width() {
        let body = TableBody::Rows(vec![
            RowView {
                cells: vec!["Facture été".to_string(), "active".to_string()],
                selected: false,
            },
            RowView {
                cells: vec!["領収書".to_string(), "archived".to_string()],
                selected: false,
            },
        ]);
        let text = table(&TableView::Table(content(body)));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Name ↑       Status");
        assert_eq!(lines[2], "Facture été  active");
        assert_eq!(lines[3], "領収書       archived");
    }

    #[test]
    fn empty_and_loading_bodies() {
        assert!(table(&TableView::Table(content(TableBody::Empty))).ends_with("No results\n"));
        assert!(table(&TableView::Table(content(TableBody::Loading))).ends_with("Loading…\n"));
    }

    #[test]
    fn footer_marks_the_current_page() {
        let footer = FooterView {
            page_size: 20,
            page_size_options: vec![10, 20, 50, 100],
            links: vec![PageLink::Page(1), PageLink::Page(2), PageLink::Page(3)],
            current_page: 2,
            summary: "Showing 21 to 40 of 47 results".to_string(),
            page_label: "Page 2 of 3".to_string(),
            has_prev: true,
            has_next: true,
        };
        assert_eq!(
            footer_text(&footer),
            "Showing 21 to 40 of 47 results · Page 2 of 3\n‹ 1 [2] 3 ›\n"
        );
    }

    #[test]
    fn long_cells_are_truncated() {
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("ab\ncd", 10), "ab cd");
    }

    #[test]
    fn missing_detail_values_show_a_dash() {
        let text = details(&[("Name", Some("Alpha".to_string())), ("Description", None)]);
        assert_eq!(text, "Name         Alpha\nDescription  -\n");
    }
}
