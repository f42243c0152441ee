/// Largest heading level with an HTML tag of its own.
pub const MAX_LEVEL: usize = 6;

/// Converts a single line of ATX-style Markdown into an HTML heading.
///
/// A line qualifies when it opens with one to six `#` characters followed by a
/// single space. The remainder becomes the heading body with any stray `#`
/// removed and surrounding whitespace trimmed. Anything else — no marker, a
/// marker longer than six, a marker with no trailing space, or a line that
/// ends inside the marker — comes back verbatim.
pub fn convert(line: &str) -> String {
    let level = line.bytes().take_while(|byte| *byte == b'#').count();
    if level == 0 || level > MAX_LEVEL {
        return line.to_string();
    }

    // The byte after the marker must exist and must be a plain space.
    if line.as_bytes().get(level) != Some(&b' ') {
        return line.to_string();
    }

    let body: String = line[level + 1..].chars().filter(|ch| *ch != '#').collect();
    format!("<h{level}>{}</h{level}>", body.trim())
}

/// True when [`convert`] would rewrite the line.
pub fn is_heading(line: &str) -> bool {
    let level = line.bytes().take_while(|byte| *byte == b'#').count();
    (1..=MAX_LEVEL).contains(&level) && line.as_bytes().get(level) == Some(&b' ')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_every_supported_level() {
        for level in 1..=6 {
            let line = format!("{} Release notes", "#".repeat(level));
            assert_eq!(
                convert(&line),
                format!("<h{level}>Release notes</h{level}>")
            );
        }
    }

    #[test]
    fn missing_space_after_marker_is_untouched() {
        assert_eq!(convert("##Invalid"), "##Invalid");
    }

    #[test]
    fn level_seven_is_untouched() {
        assert_eq!(convert("####### too many"), "####### too many");
    }

    #[test]
    fn plain_text_and_empty_lines_pass_through() {
        assert_eq!(convert(""), "");
        assert_eq!(convert("no header here"), "no header here");
    }

    #[test]
    fn line_ending_inside_the_marker_is_untouched() {
        assert_eq!(convert("#"), "#");
        assert_eq!(convert("##"), "##");
        assert_eq!(convert("######"), "######");
    }

    #[test]
    fn trailing_marker_and_padding_are_stripped() {
        assert_eq!(convert("# Getting started #"), "<h1>Getting started</h1>");
        assert_eq!(convert("##   padded   "), "<h2>padded</h2>");
    }

    #[test]
    fn interior_hashes_are_removed_from_the_body() {
        assert_eq!(convert("### And so on. ##"), "<h3>And so on.</h3>");
    }

    #[test]
    fn marker_followed_by_only_a_space_yields_an_empty_heading() {
        assert_eq!(convert("# "), "<h1></h1>");
    }

    #[test]
    fn multibyte_bodies_survive_conversion() {
        assert_eq!(convert("## Überschrift"), "<h2>Überschrift</h2>");
    }

    #[test]
    fn detects_headings_without_rewriting() {
        assert!(is_heading("# yes"));
        assert!(is_heading("###### yes"));
        assert!(!is_heading("#nope"));
        assert!(!is_heading("####### nope"));
        assert!(!is_heading("plain"));
        assert!(!is_heading("##"));
    }
}
