//! Parses IEC duration text (`"T#1d2h3m4s5ms"`, `"500ms"`, `"t#1.5s"`) to
//! integer milliseconds. Case-insensitive, optional `T#` prefix, units in
//! any order, `ms` always matched before bare `m` (spec.md §6, §9).

/// Parses a TIME literal to milliseconds. Malformed input (no recognizable
/// number/unit pairs at all) parses as `0`; this mirrors the evaluator's
/// "never fail, produce a defined value" policy rather than returning a
/// `Result` for what is, at this layer, always AST-supplied text.
pub fn parse_time_literal(raw: &str) -> i64 {
    let trimmed = raw.trim();
    let body = strip_t_prefix(trimmed);
    let chars: Vec<char> = body.chars().collect();
    let n = chars.len();
    let mut total_ms: f64 = 0.0;
    let mut i = 0;
    let mut negative = false;

    if i < n && chars[i] == '-' {
        negative = true;
        i += 1;
    } else if i < n && chars[i] == '+' {
        i += 1;
    }

    while i < n {
        let start = i;
        while i < n && (chars[i].is_ascii_digit() || chars[i] == '.') {
            i += 1;
        }
        if i == start {
            // Not a digit run (stray separator like `_` or whitespace
            // between components) - skip one char and keep scanning.
            i += 1;
            continue;
        }
        let number: f64 = chars[start..i].iter().collect::<String>().parse().unwrap_or(0.0);

        let rest: String = chars[i..].iter().collect::<String>().to_lowercase();
        if rest.starts_with("ms") {
            total_ms += number;
            i += 2;
        } else if rest.starts_with('d') {
            total_ms += number * 86_400_000.0;
            i += 1;
        } else if rest.starts_with('h') {
            total_ms += number * 3_600_000.0;
            i += 1;
        } else if rest.starts_with('m') {
            total_ms += number * 60_000.0;
            i += 1;
        } else if rest.starts_with('s') {
            total_ms += number * 1_000.0;
            i += 1;
        }
        // Unrecognized unit: the number is dropped (best-effort skip), the
        // loop continues scanning from the next character.
    }

    let ms = total_ms.round() as i64;
    if negative {
        -ms
    } else {
        ms
    }
}

fn strip_t_prefix(s: &str) -> &str {
    if s.len() >= 2 {
        let prefix: String = s.chars().take(2).collect();
        if prefix.eq_ignore_ascii_case("t#") {
            return &s[2..];
        }
    }
    s
}
