use crate::error::{Result, SyncError};
use serde_json::{Map, Value};
use std::path::Path;

/// A markdown note ready to be turned into an upsert payload.
#[derive(Debug, Clone, PartialEq)]
pub struct NotePayload {
    pub slug: String,
    pub locale: String,
    /// Every front-matter key, plus the resolved `slug`.
    pub attributes: Map<String, Value>,
    /// Trimmed body, never empty.
    pub markdown: String,
}

impl NotePayload {
    pub fn title(&self) -> &str {
        self.attributes
            .get("title")
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default()
    }
}

/// Splits `---` delimited YAML front matter from the body.
///
/// Input without an opening delimiter is all body. An opening delimiter
/// without a closing one is rejected, as is YAML that does not parse.
pub fn parse_front_matter(raw: &str) -> std::result::Result<(Map<String, Value>, &str), String> {
    let input = raw.trim_start_matches('\u{feff}');
    let Some(first_end) = input.find('\n') else {
        return Ok((Map::new(), input));
    };
    if input[..first_end].trim_end() != "---" {
        return Ok((Map::new(), input));
    }

    let rest = &input[first_end + 1..];
    let mut offset = 0;
    let mut closing = None;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            closing = Some((offset, offset + line.len()));
            break;
        }
        offset += line.len();
    }
    let Some((yaml_end, body_start)) = closing else {
        return Err("front matter is not closed with '---'".to_string());
    };

    let yaml = &rest[..yaml_end];
    let body = &rest[body_start..];
    if yaml.trim().is_empty() {
        return Ok((Map::new(), body));
    }

    let parsed: serde_yaml::Value =
        serde_yaml::from_str(yaml).map_err(|err| format!("invalid front matter: {err}"))?;
    match serde_json::to_value(parsed).map_err(|err| format!("invalid front matter: {err}"))? {
        Value::Object(map) => Ok((map, body)),
        Value::Null => Ok((Map::new(), body)),
        _ => Err("front matter must be a mapping".to_string()),
    }
}

/// File name with a trailing `.md`/`.mdx` removed, any case.
pub fn slug_from_file_name(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let lower = name.to_ascii_lowercase();
    for ext in [".mdx", ".md"] {
        if lower.ends_with(ext) {
            return name[..name.len() - ext.len()].to_string();
        }
    }
    name
}

pub async fn read_note(path: &Path, locale: &str) -> Result<NotePayload> {
    let raw = tokio::fs::read_to_string(path).await?;
    parse_note(path, &raw, locale)
}

fn parse_note(path: &Path, raw: &str, locale: &str) -> Result<NotePayload> {
    let (mut attributes, body) =
        parse_front_matter(raw).map_err(|message| SyncError::note(path, message))?;

    let slug = match attributes.get("slug") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::String(_)) | Some(Value::Null) | None => slug_from_file_name(path),
        Some(_) => return Err(SyncError::note(path, "front matter 'slug' must be a string")),
    };

    match attributes.get("title") {
        Some(Value::String(title)) if !title.trim().is_empty() => {}
        Some(Value::String(_)) | Some(Value::Null) | None => {
            return Err(SyncError::note(path, "Missing required frontmatter: title"));
        }
        Some(_) => return Err(SyncError::note(path, "front matter 'title' must be a string")),
    }

    let markdown = body.trim();
    if markdown.is_empty() {
        return Err(SyncError::note(path, "Missing required markdown content"));
    }

    attributes.insert("slug".to_string(), Value::String(slug.clone()));
    Ok(NotePayload {
        slug,
        locale: locale.to_string(),
        attributes,
        markdown: markdown.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::path::PathBuf;

    #[test]
    fn front_matter_is_split_from_body() {
        let raw = "---\ntitle: Hello\ntags:\n  - a\n  - b\n---\n# Body\n";
        let (fm, body) = parse_front_matter(raw).expect("front matter");
        assert_eq!(fm["title"], json!("Hello"));
        assert_eq!(fm["tags"], json!(["a", "b"]));
        assert_eq!(body, "# Body\n");
    }

    #[test]
    fn front_matter_handles_bom_crlf_and_absence() {
        let (fm, body) = parse_front_matter("\u{feff}---\r\ntitle: X\r\n---\r\nbody").expect("bom");
        assert_eq!(fm["title"], json!("X"));
        assert_eq!(body, "body");

        let (fm, body) = parse_front_matter("# just markdown").expect("plain");
        assert!(fm.is_empty());
        assert_eq!(body, "# just markdown");

        assert!(parse_front_matter("---\ntitle: X\nno close").is_err());
        assert!(parse_front_matter("---\n- a\n- b\n---\nbody").is_err());
    }

    #[test]
    fn slug_strips_markdown_extension_case_insensitively() {
        assert_eq!(slug_from_file_name(Path::new("a/b/hello.md")), "hello");
        assert_eq!(slug_from_file_name(Path::new("Hello.MDX")), "Hello");
        assert_eq!(slug_from_file_name(Path::new("notes.txt")), "notes.txt");
    }

    #[test]
    fn explicit_slug_wins_and_is_copied_into_attributes() {
        let path = PathBuf::from("dir/file-name.md");
        let note = parse_note(
            &path,
            "---\ntitle: Hello\nslug: ' custom '\nmood: calm\n---\n\n  text  \n",
            "ko",
        )
        .expect("note");
        assert_eq!(note.slug, "custom");
        assert_eq!(note.locale, "ko");
        assert_eq!(note.markdown, "text");
        assert_eq!(note.attributes["slug"], json!("custom"));
        assert_eq!(note.attributes["mood"], json!("calm"));
        assert_eq!(note.title(), "Hello");

        let note = parse_note(&path, "---\ntitle: Hello\n---\nbody", "en").expect("note");
        assert_eq!(note.slug, "file-name");
    }

    #[test]
    fn title_and_body_are_required() {
        let path = PathBuf::from("x.md");
        let err = parse_note(&path, "---\ntitle: '  '\n---\nbody", "en").expect_err("title");
        assert!(err.to_string().contains("title"), "{err}");

        let err = parse_note(&path, "---\ntitle: 42\n---\nbody", "en").expect_err("title type");
        assert!(err.to_string().contains("title"), "{err}");

        let err = parse_note(&path, "---\ntitle: Hi\n---\n \n\t\n", "en").expect_err("body");
        assert!(err.to_string().contains("markdown content"), "{err}");
        assert!(err.to_string().contains("x.md"), "{err}");
    }
}
