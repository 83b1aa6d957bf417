use chrono::DateTime;
use taskstream_core::{
    AppViewModel, JobRowView, ModalKind, OutputListingView, RowActionView, Severity,
};

/// Renders the panel as plain text for the terminal.
pub fn render(view: &AppViewModel) -> String {
    let mut out = Vec::new();

    let sites = view
        .site_options
        .iter()
        .map(|site| {
            if *site == view.selected_site {
                format!("[{site}]")
            } else {
                site.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    let lock = if view.sites_selection_disabled { " (locked)" } else { "" };
    out.push(format!("Sites: {sites}{lock}"));

    let auto = if view.auto_reload { "on" } else { "off" };
    let updated = view
        .last_update_ms
        .map(format_time)
        .unwrap_or_else(|| "never".to_string());
    out.push(format!(
        "Page {} | Auto-reload: {} | Last update: {}",
        view.page, auto, updated
    ));
    if !view.message.is_empty() {
        out.push(view.message.clone());
    }

    if view.loading {
        out.push("Loading...".to_string());
    }
    out.extend(table(view));

    let mut controls = Vec::new();
    if view.show_prev {
        controls.push("<prev>");
    }
    if view.show_next {
        controls.push("<next>");
    }
    if !view.refresh_disabled {
        controls.push("<refresh>");
    }
    if !controls.is_empty() {
        out.push(controls.join(" "));
    }

    if let Some(modal) = &view.modal {
        let kind = match modal.kind {
            ModalKind::Error => "ERROR",
        };
        out.push(format!("!! [{kind}] {}: {} (type 'dismiss')", modal.title, modal.message));
    }

    out.join("\n")
}

fn table(view: &AppViewModel) -> Vec<String> {
    if view.rows.is_empty() {
        return if view.loading {
            Vec::new()
        } else {
            vec!["No jobs to show.".to_string()]
        };
    }

    let mut header = view.columns.clone();
    header.push("action".to_string());
    let cells: Vec<Vec<String>> = view
        .rows
        .iter()
        .map(|row| {
            let mut cells = row.cells.clone();
            cells.push(action_label(&row.action));
            cells
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = vec![format_row(&header, &widths)];
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    for (row, cells) in view.rows.iter().zip(&cells) {
        lines.push(format_row(cells, &widths));
        if row.expanded {
            lines.extend(details(row));
        }
    }
    lines
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}

fn action_label(action: &RowActionView) -> String {
    match action {
        RowActionView::Hidden => String::new(),
        RowActionView::Button { label } => format!("[{label}]"),
        RowActionView::Disabled { label } => format!("({label})"),
        RowActionView::Loading => "...".to_string(),
    }
}

fn details(row: &JobRowView) -> Vec<String> {
    let Some(details) = &row.details else {
        return Vec::new();
    };
    let mut lines = vec!["    Logs:".to_string()];
    lines.extend(details.logs.lines().map(|line| format!("      {line}")));
    lines.push("    Outputs:".to_string());
    match &details.outputs {
        OutputListingView::Loading => lines.push("      loading...".to_string()),
        OutputListingView::Failed(message) => lines.push(format!("      error: {message}")),
        OutputListingView::Files(files) if files.is_empty() => {
            lines.push("      (none)".to_string())
        }
        OutputListingView::Files(files) => {
            for file in files {
                let mut line = if file.is_directory {
                    format!("      {}/", file.name)
                } else {
                    format!("      {}", file.name)
                };
                if file.downloading {
                    line.push_str("  downloading...");
                }
                if let Some(status) = &file.status {
                    let tag = match status.severity {
                        Severity::Success => "ok",
                        Severity::Warning => "warning",
                        Severity::Error => "error",
                    };
                    line.push_str(&format!("  [{tag}] {}", status.text));
                }
                lines.push(line);
            }
        }
    }
    lines
}

fn format_time(ms: u64) -> String {
    DateTime::from_timestamp_millis(ms as i64)
        .map(|time| time.format("%H:%M:%S UTC").to_string())
        .unwrap_or_else(|| ms.to_string())
}
