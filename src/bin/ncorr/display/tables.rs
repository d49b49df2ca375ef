use std::io::{self, Write};

use nmr_correlate::{Correlation, Element, ProtonsCount, SignalSnapshot, State, StateError};

use crate::util::{index_list, truncate};

const INDENT: &str = "      ";

const MAX_ROWS: usize = 40;

#[derive(Clone, Copy)]
enum Align {
    Left,
    Right,
}

struct Column {
    header: &'static str,
    width: usize,
    align: Align,
}

const fn col(header: &'static str, width: usize, align: Align) -> Column {
    Column {
        header,
        width,
        align,
    }
}

pub fn print_snapshot_info(snapshot: &SignalSnapshot) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let mut rows: Vec<Vec<String>> = snapshot
        .signals_1d
        .iter()
        .map(|(atom, signals)| vec![format!("1D {atom}"), signals.len().to_string()])
        .collect();
    rows.extend(snapshot.signals_2d.iter().map(|(experiment, signals)| {
        vec![
            experiment.name().to_uppercase(),
            signals.len().to_string(),
        ]
    }));
    rows.extend(snapshot.editing.iter().map(|(kind, signals)| {
        vec![format!("Editing {kind}"), signals.len().to_string()]
    }));
    if rows.is_empty() {
        rows.push(vec!["(no signals)".to_string(), "0".to_string()]);
    }

    print_table(
        &mut out,
        "Signal Snapshot",
        &[col("Source", 30, Align::Left), col("Signals", 19, Align::Right)],
        &rows,
    );
}

pub fn print_correlations(list: &[Correlation]) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let rows: Vec<Vec<String>> = list
        .iter()
        .map(|c| {
            vec![
                c.label.clone(),
                c.delta().map(|d| format!("{d:.2}")).unwrap_or_else(|| "—".to_string()),
                c.experiment_type()
                    .map(|t| t.name().to_string())
                    .unwrap_or_else(|| "pseudo".to_string()),
                protons_cell(c),
                format_equivalences(c.equivalences),
                attachments_cell(list, c),
            ]
        })
        .collect();

    print_table(
        &mut out,
        "Correlations",
        &[
            col("Label", 5, Align::Left),
            col("δ ppm", 7, Align::Right),
            col("Source", 6, Align::Left),
            col("nH", 5, Align::Left),
            col("Eq", 4, Align::Right),
            col("Attached", 10, Align::Left),
        ],
        &rows,
    );
}

pub fn print_state(state: &State) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let rows: Vec<Vec<String>> = if state.is_empty() {
        vec![vec![
            "—".to_string(),
            "—".to_string(),
            "—".to_string(),
            "no target formula".to_string(),
        ]]
    } else {
        state
            .iter()
            .map(|(atom, s)| {
                let status = match &s.error {
                    Some(error) if !error.is_empty() => describe_error(error),
                    _ => "\x1b[32mcomplete\x1b[0m".to_string(),
                };
                vec![
                    atom.to_string(),
                    format_count(s.current),
                    s.total.to_string(),
                    status,
                ]
            })
            .collect()
    };

    print_table(
        &mut out,
        "Assignment Progress",
        &[
            col("Atom", 4, Align::Left),
            col("Current", 7, Align::Right),
            col("Total", 5, Align::Right),
            col("Status", 27, Align::Left),
        ],
        &rows,
    );
}

fn protons_cell(c: &Correlation) -> String {
    if c.atom_type == Element::H {
        return String::new();
    }
    let text = match &c.protons_count {
        ProtonsCount::Unknown => "?".to_string(),
        ProtonsCount::Resolved(n) => n.to_string(),
        ProtonsCount::Ambiguous(candidates) => candidates
            .iter()
            .map(u8::to_string)
            .collect::<Vec<_>>()
            .join("/"),
    };
    if c.edited.protons_count {
        format!("{text}*")
    } else {
        text
    }
}

fn attachments_cell(list: &[Correlation], c: &Correlation) -> String {
    c.attachments
        .values()
        .flatten()
        .filter_map(|&i| list.get(i))
        .map(|other| other.label.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

fn describe_error(error: &StateError) -> String {
    let mut parts = Vec::new();
    if error.incomplete {
        parts.push("incomplete".to_string());
    }
    if !error.not_attached.is_empty() {
        parts.push(format!("unattached {}", index_list(&error.not_attached, 3)));
    }
    if !error.ambiguous_attachment.is_empty() {
        parts.push(format!(
            "ambiguous {}",
            index_list(&error.ambiguous_attachment, 3)
        ));
    }
    if !error.out_of_limit.is_empty() {
        parts.push(format!("over {}", index_list(&error.out_of_limit, 3)));
    }
    parts.join("; ")
}

fn format_count(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

fn format_equivalences(value: f64) -> String {
    if value == 0.0 {
        String::new()
    } else {
        format!("+{}", format_count(value))
    }
}

/// Pads `cell` to `width` visible characters, ignoring ANSI color sequences.
fn pad(cell: &str, width: usize, align: Align) -> String {
    let visible = strip_ansi(cell);
    let shown = if visible.chars().count() > width {
        truncate(&visible, width)
    } else {
        cell.to_string()
    };
    let fill = " ".repeat(width.saturating_sub(strip_ansi(&shown).chars().count()));
    match align {
        Align::Left => format!("{shown}{fill}"),
        Align::Right => format!("{fill}{shown}"),
    }
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for next in chars.by_ref() {
                if next == 'm' {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn rule(columns: &[Column], left: &str, mid: &str, right: &str) -> String {
    let segments: Vec<String> = columns.iter().map(|c| "─".repeat(c.width + 2)).collect();
    format!("{INDENT}{left}{}{right}", segments.join(mid))
}

fn print_table(out: &mut impl Write, title: &str, columns: &[Column], rows: &[Vec<String>]) {
    let _ = writeln!(out, "{INDENT}┌─ {title} ─┐");
    let _ = writeln!(out, "{}", rule(columns, "┌", "┬", "┐"));

    let header: Vec<String> = columns
        .iter()
        .map(|c| pad(c.header, c.width, c.align))
        .collect();
    let _ = writeln!(out, "{INDENT}│ {} │", header.join(" │ "));
    let _ = writeln!(out, "{}", rule(columns, "├", "┼", "┤"));

    for row in rows.iter().take(MAX_ROWS) {
        let cells: Vec<String> = columns
            .iter()
            .zip(row)
            .map(|(c, cell)| pad(cell, c.width, c.align))
            .collect();
        let _ = writeln!(out, "{INDENT}│ {} │", cells.join(" │ "));
    }

    if rows.len() > MAX_ROWS {
        let more = format!("({} more rows)", rows.len() - MAX_ROWS);
        let cells: Vec<String> = columns
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let text = if i == 0 { "..." } else if i == 1 { more.as_str() } else { "" };
                pad(text, c.width, Align::Left)
            })
            .collect();
        let _ = writeln!(out, "{INDENT}│ {} │", cells.join(" │ "));
    }

    let _ = writeln!(out, "{}", rule(columns, "└", "┴", "┘"));
    let _ = writeln!(out);
}
