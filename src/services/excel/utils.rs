/// Drops a footnote reference: everything from the first backslash onward.
pub fn strip_footnote(label: &str) -> String {
    label
        .split('\\')
        .next()
        .unwrap_or_default()
        .trim_end()
        .to_string()
}

/// Block headings read like "Male:"; keep just the value.
pub fn clean_attribute(value: &str) -> String {
    value.trim().trim_end_matches(':').trim_end().to_string()
}

/// Year labels are integral; anything else is treated as missing.
pub fn coerce_year(value: Option<f64>) -> Option<i32> {
    value
        .filter(|y| y.fract() == 0.0 && *y >= i32::MIN as f64 && *y <= i32::MAX as f64)
        .map(|y| y as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn footnotes_are_removed() {
        assert_eq!(strip_footnote("25-34 years\\3"), "25-34 years");
        assert_eq!(strip_footnote("White \\4\\5"), "White");
        assert_eq!(strip_footnote("Under 15 years"), "Under 15 years");
        assert_eq!(strip_footnote("\\1"), "");
    }

    #[test]
    fn attribute_colons_are_removed() {
        assert_eq!(clean_attribute("Male:"), "Male");
        assert_eq!(clean_attribute(" Female : "), "Female");
        assert_eq!(clean_attribute("All persons"), "All persons");
    }

    #[test]
    fn years_must_be_integral() {
        assert_eq!(coerce_year(Some(1999.0)), Some(1999));
        assert_eq!(coerce_year(Some(1999.5)), None);
        assert_eq!(coerce_year(None), None);
    }
}
