pub fn header(level: usize, text: &str) -> String {
    let level = level.clamp(1, 6);
    format!("{} {}", "#".repeat(level), text)
}

pub fn bold(label: &str, value: &str) -> String {
    format!("**{}:** {}", label, value)
}

pub fn bullet(text: &str) -> String {
    format!("• {}", text)
}

pub fn blank_line() -> String {
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_levels_are_clamped() {
        assert_eq!(header(0, "top"), "# top");
        assert_eq!(header(3, "mid"), "### mid");
        assert_eq!(header(9, "deep"), "###### deep");
    }

    #[test]
    fn bold_pairs_label_and_value() {
        assert_eq!(bold("Pages", "2"), "**Pages:** 2");
    }
}
