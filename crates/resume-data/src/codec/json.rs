use crate::model::Resume;
use crate::{DataError, DataResult};
use fodder_types::DataFormat;

const FORMAT: DataFormat = DataFormat::Json;

pub(super) fn encode(resume: &Resume) -> DataResult<Vec<u8>> {
    serde_json::to_vec_pretty(resume).map_err(|e| DataError::serialization(FORMAT, e))
}

pub(super) fn decode(bytes: &[u8]) -> DataResult<Resume> {
    let text = std::str::from_utf8(bytes).map_err(|e| DataError::malformed(FORMAT, e))?;
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| DataError::malformed(FORMAT, e))?;

    serde_path_to_error::deserialize(value).map_err(|err| super::path_mismatch(FORMAT, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::test_support::sample_resume;

    #[test]
    fn test_encode_is_pretty_and_camel_case() {
        let text = String::from_utf8(encode(&sample_resume()).unwrap()).unwrap();
        assert!(text.starts_with("{\n  \"version\": 1,"));
        assert!(text.contains("\"postalCode\": \"55555\""));
        assert!(text.contains("\"startDate\": \"1998-02-01\""));
    }

    #[test]
    fn test_syntax_error_is_malformed() {
        let err = decode(br#"{"version": 1, "basics": {"name": "x",}}"#).unwrap_err();
        assert!(matches!(err, DataError::MalformedInput { format: DataFormat::Json, .. }));
    }

    #[test]
    fn test_scalar_where_list_expected_reports_path() {
        let err = decode(br#"{"version": 1, "basics": {"highlights": "one"}}"#).unwrap_err();
        match err {
            DataError::SchemaMismatch { path, .. } => assert_eq!(path, "basics.highlights"),
            other => panic!("expected schema mismatch, got {other}"),
        }
    }

    #[test]
    fn test_wrong_group_count_is_schema_mismatch() {
        let err = decode(br#"{"work": [{"label": "only one"}]}"#).unwrap_err();
        assert!(
            matches!(err, DataError::SchemaMismatch { ref path, .. } if path.starts_with("work"))
        );
    }

    #[test]
    fn test_non_object_root_is_schema_mismatch() {
        let err = decode(br#""just a string""#).unwrap_err();
        assert!(matches!(err, DataError::SchemaMismatch { ref path, .. } if path == "<root>"));
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let resume = decode(br#"{"version": 1, "notes": "todo", "basics": {"name": "A"}}"#).unwrap();
        assert_eq!(resume.basics.name, "A");
    }
}
