//! Two-column label/value tables for terminal output.

/// Render `rows` with labels left-aligned in a column one space wider than
/// the longest label, then a space and the value.
///
/// ```
/// use chia_tools_utils::render_rows;
/// let out = render_rows(&[("Config", "mainnet"), ("Full Node", "Not Running")]);
/// assert_eq!(out, "Config     mainnet\nFull Node  Not Running\n");
/// ```
pub fn render_rows<L, V>(rows: &[(L, V)]) -> String
where
    L: AsRef<str>,
    V: AsRef<str>,
{
    let width = rows
        .iter()
        .map(|(label, _)| label.as_ref().chars().count())
        .max()
        .unwrap_or(0)
        + 1;

    let mut out = String::new();
    for (label, value) in rows {
        out.push_str(&format!("{:<width$} {}\n", label.as_ref(), value.as_ref()));
    }
    out
}
