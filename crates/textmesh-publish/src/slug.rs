//! Artifact file naming

/// Longest slug kept in a filename
pub const MAX_SLUG_CHARS: usize = 40;

/// Filesystem- and URL-safe form of `text`.
///
/// Lowercases, collapses every run of non-ASCII-alphanumeric characters into
/// a single `-`, trims dashes from both ends and keeps at most
/// `MAX_SLUG_CHARS` characters.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug.truncate(MAX_SLUG_CHARS);
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// `label-<slug>-<8 hex>.glb`; the random suffix keeps repeated text from
/// colliding. An empty slug becomes `text`.
pub fn artifact_filename(text: &str) -> String {
    let mut slug = slugify(text);
    if slug.is_empty() {
        slug.push_str("text");
    }
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("label-{}-{}.glb", slug, &id[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("  --Hi!!  there--  "), "hi-there");
        assert_eq!(slugify("a/b\\c..d"), "a-b-c-d");
        assert_eq!(slugify("日本語"), "");
        assert_eq!(slugify("Grüße"), "gr-e");
    }

    #[test]
    fn test_truncation_does_not_leave_dash() {
        let text = format!("{} tail", "x".repeat(MAX_SLUG_CHARS - 1));
        assert_eq!(slugify(&text), "x".repeat(MAX_SLUG_CHARS - 1));
    }

    #[test]
    fn test_slug_is_truncated() {
        let slug = slugify(&"ab ".repeat(50));
        assert!(slug.len() <= MAX_SLUG_CHARS);
        assert!(slug.starts_with("ab-ab"));
    }

    #[test]
    fn test_filename_shape() {
        let name = artifact_filename("Hello, World");
        assert!(name.starts_with("label-hello-world-"));
        assert!(name.ends_with(".glb"));
        let suffix = &name["label-hello-world-".len()..name.len() - 4];
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_empty_slug_fallback() {
        assert!(artifact_filename("!!!").starts_with("label-text-"));
    }

    #[test]
    fn test_repeated_text_gets_distinct_names() {
        assert_ne!(artifact_filename("same"), artifact_filename("same"));
    }
}
