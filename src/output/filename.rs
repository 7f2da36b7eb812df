//! Output filename derivation from the backend's Content-Disposition header.

use uuid::Uuid;

/// Extension every written slice result carries.
pub const GCODE_EXTENSION: &str = ".gcode";

/// Extracts the filename from a raw Content-Disposition header value.
///
/// Finds the first `filename=` and takes the run of characters after an
/// optional opening quote, stopping at a quote, `;` or whitespace. This is
/// the same match as `filename="?([^";\s]+)"?`; `filename*=` is not
/// recognized.
pub fn parse_content_disposition_filename(header_value: &str) -> Option<&str> {
    const KEY: &str = "filename=";

    let mut rest = header_value;
    while let Some(pos) = rest.find(KEY) {
        let after = &rest[pos + KEY.len()..];
        let value = after.strip_prefix('"').unwrap_or(after);
        let end = value
            .find(|c: char| c == '"' || c == ';' || c.is_whitespace())
            .unwrap_or(value.len());
        if end > 0 {
            return Some(&value[..end]);
        }
        rest = &rest[pos + 1..];
    }
    None
}

/// Last path component of `candidate`, ignoring any directories.
///
/// Both `/` and `\` separate components. Returns `None` when nothing usable
/// remains (empty, `.` or `..`).
pub fn strip_directories(candidate: &str) -> Option<&str> {
    candidate
        .rsplit(['/', '\\'])
        .find(|part| !part.is_empty())
        .filter(|part| *part != "." && *part != "..")
}

/// Random fallback name, e.g. `slice_3f9a1c2e.gcode`.
pub fn generated_filename() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("slice_{}{}", &id[..8], GCODE_EXTENSION)
}

/// Decide the name of the file a slice result is written to.
///
/// Prefers the header's filename, strips directory components so the result
/// never leaves the output directory, and appends `.gcode` when missing.
/// Never fails: anything unusable falls back to a generated name.
pub fn resolve_output_filename(content_disposition: Option<&str>) -> String {
    let name = match content_disposition
        .and_then(parse_content_disposition_filename)
        .and_then(strip_directories)
    {
        Some(name) => name.to_string(),
        None => return generated_filename(),
    };

    if name.ends_with(GCODE_EXTENSION) {
        name
    } else {
        name + GCODE_EXTENSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quoted() {
        let r = parse_content_disposition_filename("attachment; filename=\"part.gcode\"");
        assert_eq!(r, Some("part.gcode"));
    }

    #[test]
    fn parse_token() {
        let r = parse_content_disposition_filename("attachment; filename=part.gcode; size=10");
        assert_eq!(r, Some("part.gcode"));
    }

    #[test]
    fn parse_stops_at_whitespace() {
        let r = parse_content_disposition_filename("attachment; filename=\"my part.gcode\"");
        assert_eq!(r, Some("my"));
    }

    #[test]
    fn parse_ignores_empty_value() {
        assert_eq!(parse_content_disposition_filename("attachment; filename=\"\""), None);
        assert_eq!(parse_content_disposition_filename("inline"), None);
        assert_eq!(
            parse_content_disposition_filename("attachment; filename*=UTF-8''a.gcode"),
            None
        );
    }

    #[test]
    fn strip_traversal() {
        assert_eq!(strip_directories("../../etc/passwd"), Some("passwd"));
        assert_eq!(strip_directories("..\\..\\boot.ini"), Some("boot.ini"));
        assert_eq!(strip_directories("gcodes/"), Some("gcodes"));
        assert_eq!(strip_directories(".."), None);
        assert_eq!(strip_directories("/"), None);
    }

    #[test]
    fn resolve_keeps_gcode_name() {
        assert_eq!(
            resolve_output_filename(Some("attachment; filename=\"part.gcode\"")),
            "part.gcode"
        );
    }

    #[test]
    fn resolve_appends_extension() {
        assert_eq!(
            resolve_output_filename(Some("attachment; filename=\"../../etc/passwd\"")),
            "passwd.gcode"
        );
        assert_eq!(
            resolve_output_filename(Some("attachment; filename=benchy.3mf")),
            "benchy.3mf.gcode"
        );
    }

    #[test]
    fn resolve_falls_back_to_generated() {
        for header in [None, Some("attachment"), Some("attachment; filename=\"..\"")] {
            let name = resolve_output_filename(header);
            assert!(name.starts_with("slice_"), "{name}");
            assert!(name.ends_with(GCODE_EXTENSION), "{name}");
            assert_eq!(name.len(), "slice_".len() + 8 + GCODE_EXTENSION.len());
        }
    }

    #[test]
    fn generated_names_differ() {
        assert_ne!(generated_filename(), generated_filename());
    }
}
