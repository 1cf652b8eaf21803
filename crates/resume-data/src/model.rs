//! Résumé record model.
//!
//! One in-memory shape, shared by every interchange format. Field names on the wire are the
//! camelCase forms of the Rust field names (`postal_code` → `postalCode`), in JSON and YAML
//! keys as well as XML element names.
//!
//! Every struct is `#[serde(default)]`: fields missing from the input decode as empty strings
//! and empty lists, so "absent" and "empty" collapse to the same value and encode identically.

use serde::{Deserialize, Deserializer, Serialize};

/// Schema version written by this build.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Root résumé record.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Resume {
    /// Schema version of the data. `0` means the input predates versioning.
    pub version: u32,
    pub basics: Basics,
    /// Primary and supplementary work experience.
    #[serde(deserialize_with = "nullable")]
    pub work: WorkGroups,
    #[serde(deserialize_with = "nullable")]
    pub education: Vec<Education>,
    /// Primary and supplementary publications.
    #[serde(deserialize_with = "nullable")]
    pub publications: PublicationGroups,
    #[serde(deserialize_with = "nullable")]
    pub skills: Vec<Skill>,
}

/// Profile: who the résumé is about.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Basics {
    pub name: String,
    pub label: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    /// Rich text.
    pub summary: String,
    /// Rich text, one entry per highlight.
    #[serde(deserialize_with = "nullable")]
    pub highlights: Vec<String>,
    pub location: Location,
    #[serde(deserialize_with = "nullable")]
    pub profiles: Vec<SocialProfile>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Location {
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub country_code: String,
    pub region: String,
}

/// A social network presence (LinkedIn, GitHub, ...).
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct SocialProfile {
    pub network: String,
    pub username: String,
    pub url: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Work {
    pub company: String,
    pub position: String,
    pub website: String,
    pub start_date: String,
    pub end_date: String,
    /// Rich text.
    pub summary: String,
    #[serde(deserialize_with = "nullable")]
    pub highlights: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Education {
    pub institution: String,
    pub area: String,
    pub study_type: String,
    pub start_date: String,
    pub end_date: String,
    pub gpa: String,
    #[serde(deserialize_with = "nullable")]
    pub courses: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Publication {
    pub name: String,
    pub publisher: String,
    pub release_date: String,
    pub website: String,
    /// Rich text.
    pub summary: String,
    /// ISBN or other identifier.
    pub isbn: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Skill {
    pub name: String,
    pub level: String,
    #[serde(deserialize_with = "nullable")]
    pub keywords: Vec<String>,
}

/// A labelled list of entries, e.g. "Professional Experience" and its jobs.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(
    default,
    rename_all = "camelCase",
    bound(deserialize = "T: Deserialize<'de> + Default")
)]
pub struct EntryGroup<T> {
    pub label: String,
    #[serde(deserialize_with = "nullable")]
    pub entries: Vec<T>,
}

/// Index of the primary group within a [`GroupPair`].
pub const PRIMARY: usize = 0;
/// Index of the supplementary group within a [`GroupPair`].
pub const SUPPLEMENTARY: usize = 1;

/// The primary and supplementary groups of one kind of entry.
pub type GroupPair<T> = [EntryGroup<T>; 2];
pub type WorkGroups = GroupPair<Work>;
pub type PublicationGroups = GroupPair<Publication>;

impl Resume {
    /// Creates a blank record for hand editing.
    ///
    /// Unlike [`Resume::default`], every list holds one zero-valued placeholder (and nested
    /// string lists hold one empty string), so an encoded blank record shows every field a
    /// user can fill in.
    pub fn new() -> Self {
        Self {
            version: CURRENT_SCHEMA_VERSION,
            basics: Basics {
                highlights: vec![String::new()],
                profiles: vec![SocialProfile::default()],
                ..Basics::default()
            },
            work: placeholder_groups(|| Work {
                highlights: vec![String::new()],
                ..Work::default()
            }),
            education: vec![Education {
                courses: vec![String::new()],
                ..Education::default()
            }],
            publications: placeholder_groups(Publication::default),
            skills: vec![Skill {
                keywords: vec![String::new()],
                ..Skill::default()
            }],
        }
    }

    /// Whether this build understands the record's schema version.
    pub fn is_supported_version(&self) -> bool {
        (1..=CURRENT_SCHEMA_VERSION).contains(&self.version)
    }

    pub fn primary_work(&self) -> &EntryGroup<Work> {
        &self.work[PRIMARY]
    }

    pub fn supplementary_work(&self) -> &EntryGroup<Work> {
        &self.work[SUPPLEMENTARY]
    }

    pub fn primary_publications(&self) -> &EntryGroup<Publication> {
        &self.publications[PRIMARY]
    }

    pub fn supplementary_publications(&self) -> &EntryGroup<Publication> {
        &self.publications[SUPPLEMENTARY]
    }
}

impl<T> EntryGroup<T> {
    pub fn new(label: impl Into<String>, entries: Vec<T>) -> Self {
        Self {
            label: label.into(),
            entries,
        }
    }
}

fn placeholder_groups<T>(entry: impl Fn() -> T) -> GroupPair<T> {
    [
        EntryGroup::new("", vec![entry()]),
        EntryGroup::new("", vec![entry()]),
    ]
}

/// Reads `null` as the type's default. Older files wrote empty lists as `null`.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
