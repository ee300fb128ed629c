/// テキスト正規化
/// Free-text fields are lowercased before feature extraction.
/// Structure is kept as is: no stemming and no stop-word removal here,
/// the tokenizer owns that.
///
/// # Arguments
/// * `text` - raw field value, `None` for an absent field
///
/// # Returns
/// * `String` - lowercased text, empty for absent or empty input
#[inline]
pub fn normalize(text: Option<&str>) -> String {
    match text {
        Some(t) if !t.is_empty() => t.to_lowercase(),
        _ => String::new(),
    }
}

/// Normalize a sequence of field values joined by a single space.
/// Absent fields contribute an empty string, so separators stay in place.
pub fn normalize_joined<'a, I>(fields: I) -> String
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let joined = fields
        .into_iter()
        .map(|f| f.unwrap_or(""))
        .collect::<Vec<&str>>()
        .join(" ");
    normalize(Some(&joined))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_and_empty_map_to_empty() {
        assert_eq!(normalize(None), "");
        assert_eq!(normalize(Some("")), "");
    }

    #[test]
    fn lowercases_without_touching_structure() {
        assert_eq!(normalize(Some("Python, SQL & Node.js")), "python, sql & node.js");
        assert_eq!(normalize(Some("  Spaced  Out ")), "  spaced  out ");
    }

    #[test]
    fn joined_defaults_missing_fields() {
        let text = normalize_joined([Some("Java"), None, Some("Spring BOOT")]);
        assert_eq!(text, "java  spring boot");
    }
}
