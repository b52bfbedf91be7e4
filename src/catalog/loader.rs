//! Catalog file loading, with a mojibake-repair pass for misdecoded accents.

use std::path::Path;

use super::model::Program;
use crate::error::CatalogError;

/// Loads and parses a program catalog from a JSON file on disk.
///
/// The catalog is a bare JSON array of program objects (see
/// `examples/original_source/airtime/src/loader.py::load_programs`); missing
/// optional fields default per [`Program`]'s `serde(default)` attributes.
/// Every string field that looks like UTF-8 text which was previously
/// mis-decoded as Latin-1/CP1252 (a common artifact of catalogs exported from
/// legacy traffic systems) is repaired in place.
pub fn load_catalog(path: &Path) -> Result<Vec<Program>, CatalogError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let mut programs: Vec<Program> = serde_json::from_str(&raw)?;
    for program in &mut programs {
        repair_program_encoding(program);
    }
    Ok(programs)
}

/// Repairs every human-readable text field of a program in place.
fn repair_program_encoding(program: &mut Program) {
    repair_field(&mut program.title);
    repair_field(&mut program.genre);
    repair_field(&mut program.subgenre);
    repair_field(&mut program.origin);
}

/// Re-decodes `s` if it looks like UTF-8 bytes that were mis-decoded as a
/// single-byte Western European encoding (CP1252/Latin-1) and re-encoded as
/// UTF-8 — the classic "Ã©" mojibake pattern. Strings that already decode
/// cleanly are left untouched.
fn repair_field(s: &mut String) {
    if let Some(repaired) = try_repair_mojibake(s) {
        *s = repaired;
    }
}

/// Attempts one round of mojibake repair: every character of `s` is assumed
/// to be a Latin-1 codepoint that was really meant to be read as a raw byte
/// (every Unicode scalar value below 0x100 maps 1:1 onto a Latin-1 byte), so
/// re-collecting those byte values and re-decoding them as UTF-8 recovers
/// the original text. Returns `None` when `s` shows no sign of mojibake, or
/// when the byte-reinterpretation doesn't produce valid UTF-8, so callers
/// can leave the string untouched.
fn try_repair_mojibake(s: &str) -> Option<String> {
    if !looks_like_mojibake(s) {
        return None;
    }
    let bytes: Option<Vec<u8>> = s.chars().map(|c| u8::try_from(c as u32).ok()).collect();
    let repaired = String::from_utf8(bytes?).ok()?;
    // Only accept the repair if it actually removed the telltale markers.
    if looks_like_mojibake(&repaired) {
        None
    } else {
        Some(repaired)
    }
}

/// Markers that show up when UTF-8-encoded accented French text is
/// misdecoded as Latin-1/CP1252 and then stored as if it were already UTF-8.
const MOJIBAKE_MARKERS: [&str; 6] = ["Ã©", "Ã¨", "Ã\u{a0}", "Ã´", "Ã®", "Â "];

fn looks_like_mojibake(s: &str) -> bool {
    MOJIBAKE_MARKERS.iter().any(|m| s.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_minimal_catalog() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id":"p1","title":"Le Film","genre":"Film","duration_minutes":90,"cost":1000,"base_audience":500000,"origin":"France"}}]"#
        )
        .unwrap();
        let programs = load_catalog(file.path()).unwrap();
        assert_eq!(programs.len(), 1);
        assert_eq!(programs[0].id, "p1");
        assert_eq!(programs[0].subgenre, "");
        assert!(!programs[0].in_production);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_catalog(Path::new("/nonexistent/catalog.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[test]
    fn invalid_json_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = load_catalog(file.path()).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidJson(_)));
    }

    #[test]
    fn mojibake_title_is_repaired() {
        // "Télé Matin" mis-decoded as Latin-1 then stored as UTF-8.
        let broken = "TÃ©lÃ© Matin";
        let mut s = broken.to_string();
        repair_field(&mut s);
        assert_eq!(s, "Télé Matin");
    }

    #[test]
    fn clean_text_is_left_untouched() {
        let mut s = "Télé Matin".to_string();
        repair_field(&mut s);
        assert_eq!(s, "Télé Matin");
    }
}
