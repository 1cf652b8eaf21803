use crate::model::Resume;
use crate::{DataError, DataResult};
use fodder_types::DataFormat;

const FORMAT: DataFormat = DataFormat::Yaml;

pub(super) fn encode(resume: &Resume) -> DataResult<Vec<u8>> {
    serde_yaml::to_string(resume)
        .map(String::into_bytes)
        .map_err(|e| DataError::serialization(FORMAT, e))
}

pub(super) fn decode(bytes: &[u8]) -> DataResult<Resume> {
    let text = std::str::from_utf8(bytes).map_err(|e| DataError::malformed(FORMAT, e))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let value: serde_yaml::Value =
        serde_yaml::from_str(text).map_err(|e| DataError::malformed(FORMAT, e))?;
    if !matches!(value, serde_yaml::Value::Mapping(_)) {
        return Err(DataError::mismatch(
            FORMAT,
            "",
            "document must be a YAML mapping",
        ));
    }

    serde_path_to_error::deserialize(value).map_err(|err| super::path_mismatch(FORMAT, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::test_support::sample_resume;

    #[test]
    fn test_encode_uses_camel_case_keys() {
        let text = String::from_utf8(encode(&sample_resume()).unwrap()).unwrap();
        assert!(text.starts_with("version: 1\n"));
        assert!(text.contains("postalCode: '55555'"));
    }

    #[test]
    fn test_hand_written_yaml() {
        let input = "\u{feff}version: 1\nbasics:\n  name: Peter Gibbons\n  highlights:\n    - Did nothing\nskills:\n";
        let resume = decode(input.as_bytes()).unwrap();
        assert_eq!(resume.basics.name, "Peter Gibbons");
        assert_eq!(resume.basics.highlights, vec!["Did nothing"]);
        assert!(resume.skills.is_empty());
    }

    #[test]
    fn test_syntax_error_is_malformed() {
        let err = decode(b"basics: [unclosed\n").unwrap_err();
        assert!(matches!(err, DataError::MalformedInput { format: DataFormat::Yaml, .. }));
    }

    #[test]
    fn test_non_mapping_document_is_schema_mismatch() {
        for input in ["- a\n- b\n", "just text\n"] {
            let err = decode(input.as_bytes()).unwrap_err();
            assert!(
                matches!(err, DataError::SchemaMismatch { ref path, .. } if path == "<root>"),
                "{input:?}: {err}"
            );
        }
    }

    #[test]
    fn test_mapping_where_list_expected_reports_path() {
        let err = decode(b"skills:\n  name: Rust\n").unwrap_err();
        match err {
            DataError::SchemaMismatch { path, .. } => assert_eq!(path, "skills"),
            other => panic!("expected schema mismatch, got {other}"),
        }
    }
}
