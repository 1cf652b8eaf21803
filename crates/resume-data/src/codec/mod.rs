//! Encode/decode between [`Resume`] and serialized bytes.
//!
//! The caller picks the [`DataFormat`]; nothing here looks at file names.
//!
//! Decoding is two-stage for every format: first the bytes are parsed into the format's
//! generic tree (failures are [`DataError::MalformedInput`]), then the tree is mapped onto the
//! record schema (failures are [`DataError::SchemaMismatch`] carrying the offending field
//! path). A record is only returned once both stages succeed.

mod json;
mod xml;
mod yaml;

use crate::model::Resume;
use crate::{DataError, DataResult};
use fodder_types::DataFormat;

/// Serialize a record in the requested format.
///
/// Output is pretty-printed with two-space indentation. Text that a format cannot carry
/// literally is escaped using that format's own rules; nothing is dropped.
///
/// # Errors
///
/// Returns [`DataError::Serialization`] only if the underlying encoder fails, which does not
/// happen for in-memory buffers.
pub fn encode(resume: &Resume, format: DataFormat) -> DataResult<Vec<u8>> {
    let bytes = match format {
        DataFormat::Json => json::encode(resume)?,
        DataFormat::Xml => xml::encode(resume)?,
        DataFormat::Yaml => yaml::encode(resume)?,
    };
    tracing::debug!(%format, bytes = bytes.len(), "encoded resume");
    Ok(bytes)
}

/// Parse a record from bytes in the requested format.
///
/// # Errors
///
/// - [`DataError::MalformedInput`] if the bytes are not well-formed (truncated, syntax
///   errors, invalid UTF-8).
/// - [`DataError::SchemaMismatch`] if the document is well-formed but cannot be read as a
///   résumé (e.g. a scalar where a list is expected).
pub fn decode(bytes: &[u8], format: DataFormat) -> DataResult<Resume> {
    tracing::debug!(%format, bytes = bytes.len(), "decoding resume");
    match format {
        DataFormat::Json => json::decode(bytes),
        DataFormat::Xml => xml::decode(bytes),
        DataFormat::Yaml => yaml::decode(bytes),
    }
}

/// [`encode`] into a `String`.
pub fn to_string(resume: &Resume, format: DataFormat) -> DataResult<String> {
    let bytes = encode(resume, format)?;
    String::from_utf8(bytes).map_err(|e| DataError::serialization(format, e))
}

/// [`decode`] from a `str`.
pub fn from_str(text: &str, format: DataFormat) -> DataResult<Resume> {
    decode(text.as_bytes(), format)
}

/// Map a `serde_path_to_error` failure onto [`DataError::SchemaMismatch`].
fn path_mismatch<E: std::fmt::Display>(
    format: DataFormat,
    err: serde_path_to_error::Error<E>,
) -> DataError {
    let path = err.path().to_string();
    DataError::mismatch(format, path, err.into_inner())
}


#[cfg(test)]
mod tests {
    use super::test_support::sample_resume;
    use super::*;
    use crate::model::*;
    use proptest::prelude::*;

    #[test]
    fn test_round_trip_every_format() {
        let original = sample_resume();
        for format in DataFormat::ALL {
            let bytes = encode(&original, format).unwrap();
            let decoded = decode(&bytes, format).unwrap();
            assert_eq!(decoded, original, "{format} round trip changed the record");
        }
    }

    #[test]
    fn test_blank_record_round_trips() {
        for format in DataFormat::ALL {
            let text = to_string(&Resume::new(), format).unwrap();
            assert_eq!(from_str(&text, format).unwrap(), Resume::new(), "{format}");
        }
    }

    #[test]
    fn test_cross_format_conversion() {
        let original = sample_resume();
        for from in DataFormat::ALL {
            for to in DataFormat::ALL {
                let first = decode(&encode(&original, from).unwrap(), from).unwrap();
                let second = decode(&encode(&first, to).unwrap(), to).unwrap();
                assert_eq!(second, original, "{from} -> {to}");
            }
        }
    }

    #[test]
    fn test_version_is_written_and_preserved() {
        let mut resume = Resume::default();
        resume.version = 7;
        for format in DataFormat::ALL {
            let text = to_string(&resume, format).unwrap();
            assert!(text.contains('7'), "{format} output lacks version: {text}");
            assert_eq!(from_str(&text, format).unwrap().version, 7);
        }
    }

    #[test]
    fn test_truncated_input_is_malformed() {
        // A YAML document cut short is frequently still valid YAML, so only the
        // formats with mandatory closing syntax are checked here.
        let original = sample_resume();
        for format in [DataFormat::Json, DataFormat::Xml] {
            let bytes = encode(&original, format).unwrap();
            let truncated = &bytes[..bytes.len() / 2];
            let err = decode(truncated, format).expect_err("truncated input must fail");
            assert!(
                matches!(err, DataError::MalformedInput { format: f, .. } if f == format),
                "{format}: {err}"
            );
        }
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        for format in DataFormat::ALL {
            let err = decode(&[0xff, 0xfe, 0x00, 0x7b], format).unwrap_err();
            assert!(matches!(err, DataError::MalformedInput { .. }), "{format}: {err}");
        }
    }

    fn text() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(String::new()),
            "[ -~]{0,24}",
            "\\PC{0,24}",
            "[a-z \\n\\r\\t*_<>&\"'-]{0,32}",
        ]
    }

    fn texts() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(text(), 0..3)
    }

    prop_compose! {
        fn arb_work()(
            fields in prop::collection::vec(text(), 6),
            highlights in texts(),
        ) -> Work {
            Work {
                company: fields[0].clone(),
                position: fields[1].clone(),
                website: fields[2].clone(),
                start_date: fields[3].clone(),
                end_date: fields[4].clone(),
                summary: fields[5].clone(),
                highlights,
            }
        }
    }

    prop_compose! {
        fn arb_publication()(fields in prop::collection::vec(text(), 6)) -> Publication {
            Publication {
                name: fields[0].clone(),
                publisher: fields[1].clone(),
                release_date: fields[2].clone(),
                website: fields[3].clone(),
                summary: fields[4].clone(),
                isbn: fields[5].clone(),
            }
        }
    }

    prop_compose! {
        fn arb_resume()(
            version in 0u32..5,
            basics in prop::collection::vec(text(), 11),
            highlights in texts(),
            networks in prop::collection::vec((text(), text(), text()), 0..2),
            labels in prop::collection::vec(text(), 4),
            primary_work in prop::collection::vec(arb_work(), 0..2),
            extra_work in prop::collection::vec(arb_work(), 0..2),
            primary_pubs in prop::collection::vec(arb_publication(), 0..2),
            extra_pubs in prop::collection::vec(arb_publication(), 0..2),
            education in prop::collection::vec((prop::collection::vec(text(), 6), texts()), 0..2),
            skills in prop::collection::vec((text(), text(), texts()), 0..3),
        ) -> Resume {
            Resume {
                version,
                basics: Basics {
                    name: basics[0].clone(),
                    label: basics[1].clone(),
                    email: basics[2].clone(),
                    phone: basics[3].clone(),
                    website: basics[4].clone(),
                    summary: basics[5].clone(),
                    highlights,
                    location: Location {
                        address: basics[6].clone(),
                        postal_code: basics[7].clone(),
                        city: basics[8].clone(),
                        country_code: basics[9].clone(),
                        region: basics[10].clone(),
                    },
                    profiles: networks
                        .into_iter()
                        .map(|(network, username, url)| SocialProfile { network, username, url })
                        .collect(),
                },
                work: [
                    EntryGroup::new(labels[0].clone(), primary_work),
                    EntryGroup::new(labels[1].clone(), extra_work),
                ],
                education: education
                    .into_iter()
                    .map(|(f, courses)| Education {
                        institution: f[0].clone(),
                        area: f[1].clone(),
                        study_type: f[2].clone(),
                        start_date: f[3].clone(),
                        end_date: f[4].clone(),
                        gpa: f[5].clone(),
                        courses,
                    })
                    .collect(),
                publications: [
                    EntryGroup::new(labels[2].clone(), primary_pubs),
                    EntryGroup::new(labels[3].clone(), extra_pubs),
                ],
                skills: skills
                    .into_iter()
                    .map(|(name, level, keywords)| Skill { name, level, keywords })
                    .collect(),
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn test_prop_round_trip(resume in arb_resume()) {
            for format in DataFormat::ALL {
                let bytes = encode(&resume, format).unwrap();
                let decoded = decode(&bytes, format).unwrap();
                prop_assert_eq!(&decoded, &resume, "format {}", format);
            }
        }

        #[test]
        fn test_prop_cross_format_equivalence(resume in arb_resume()) {
            let via_json = decode(&encode(&resume, DataFormat::Json).unwrap(), DataFormat::Json).unwrap();
            let via_xml = decode(&encode(&resume, DataFormat::Xml).unwrap(), DataFormat::Xml).unwrap();
            prop_assert_eq!(via_json, via_xml);
        }
    }
}
