use crate::errors::errors::{Error, ErrorTip};

use super::issues::Issue;

/*
    error: message
    -> main.lang:20:9
       |
    20 | let a = 300;
       | --------^
*/

/// Line `line` (1-based) of `source`, without its terminator.
pub fn get_line(source: &str, line: u32) -> Option<&str> {
    if line == 0 {
        return None;
    }
    source
        .split('\n')
        .nth(line as usize - 1)
        .map(|text| text.trim_end_matches('\r'))
}

fn remove_starting_whitespace(string: &str) -> (&str, usize) {
    let trimmed = string.trim_start_matches([' ', '\t']);
    (trimmed, string.len() - trimmed.len())
}

fn render_excerpt(out: &mut String, location: &str, source: Option<&str>, line: u32, column: u32) {
    out.push_str(&format!("-> {}\n", location));

    let Some(text) = source.and_then(|source| get_line(source, line)) else {
        return;
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;
    let (text, removed_whitespace) = remove_starting_whitespace(text);
    let arrows = (column as usize).saturating_sub(removed_whitespace).max(1);

    out.push_str(&format!("{:>padding$}\n", "|"));
    out.push_str(&format!("{} | {}\n", line_string, text.trim_end()));
    out.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));
}

/// Renders an issue with a caret under the first token it points at.
/// `source` is the text of the issue's file, when available.
pub fn render_issue(issue: &Issue, source: Option<&str>) -> String {
    let mut out = format!("{}: {}\n", issue.severity, issue.message());
    render_excerpt(
        &mut out,
        &issue.code_ref.to_string(),
        source,
        issue.code_ref.line,
        issue.code_ref.column,
    );
    out
}

/// Renders a fatal error the same way, with its tip when it has one.
pub fn render_error(error: &Error, source: Option<&str>) -> String {
    let mut out = match error.get_tip() {
        ErrorTip::None => format!("error: {}: {}\n", error.get_error_name(), error.get_impl()),
        tip => format!(
            "error: {}: {} ({})\n",
            error.get_error_name(),
            error.get_impl(),
            tip
        ),
    };
    let position = error.get_position();
    render_excerpt(
        &mut out,
        &position.to_string(),
        source,
        position.line,
        position.column,
    );
    out
}
