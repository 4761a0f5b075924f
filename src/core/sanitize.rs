// src/core/sanitize.rs

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Filename-safe piece: ASCII alphanumerics, `-` and `_`; whitespace runs → one `_`.
/// Falls back to `fallback` when nothing survives.
pub fn sanitize_filename_part(name: &str, fallback: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_us = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() { out.push(ch); last_us = false; }
        else if ch.is_whitespace() { if !last_us { out.push('_'); last_us = true; } }
        else if ch=='-' || ch=='_' { if !(last_us && ch=='_') { out.push(ch); } last_us = ch=='_'; }
    }
    let out = out.trim_matches('_').to_string();
    if out.is_empty() { s!(fallback) } else { out }
}

/// `liked_pages` → `Liked Pages`
pub fn title_case(field: &str) -> String {
    normalize_ws(&field.replace('_', " "))
        .split(' ')
        .map(|w| {
            let mut cs = w.chars();
            match cs.next() {
                Some(f) => f.to_uppercase().chain(cs.flat_map(char::to_lowercase)).collect(),
                None => s!(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("followers", "followers")]
    #[case("liked pages", "liked_pages")]
    #[case("a  b\tc", "a_b_c")]
    #[case("../etc/passwd", "etcpasswd")]
    #[case("__x__", "x")]
    #[case("ümlaut", "mlaut")]
    #[case("!!!", "field")]
    fn filename_parts(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize_filename_part(input, "field"), expected);
    }

    #[rstest]
    #[case("user_data", "User Data")]
    #[case("liked_pages", "Liked Pages")]
    #[case("JOINED_groups", "Joined Groups")]
    #[case("x", "X")]
    fn titles(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(title_case(input), expected);
    }
}
