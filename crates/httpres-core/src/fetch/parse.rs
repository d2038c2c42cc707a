//! Parse HTTP response header lines into a ResponseHead.

use super::ResponseHead;

/// Parse collected header lines into a ResponseHead.
///
/// `lines` should hold a single response block (status line first). Lines
/// that are neither a status line nor `Name: value` are ignored. Values are
/// kept verbatim apart from surrounding whitespace; entity tags keep their
/// quotes and weak prefix.
pub(crate) fn parse_head(lines: &[String]) -> ResponseHead {
    let mut status = 0;
    let mut headers = Vec::new();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            status = parse_status_line(line).unwrap_or(0);
            headers.clear();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_string(), value.trim().to_string()));
        }
    }

    ResponseHead { status, headers }
}

/// `HTTP/1.1 200 OK` or `HTTP/2 304` → the status code.
fn parse_status_line(line: &str) -> Option<u32> {
    line.split_whitespace().nth(1)?.parse().ok()
}
