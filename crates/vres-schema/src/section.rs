//! # Resume sections and their field tables
//!
//! Each [`SectionKind`] names one list section of the resume and carries a
//! fixed table of [`FieldSpec`]s. A spec ties together:
//!
//! - the editor field name (what the presentation layer reads and writes),
//! - the VC field name (what the signed document carries),
//! - legacy aliases accepted on input,
//! - the value kind, which decides the empty default.
//!
//! The same table drives normalization, both transform directions, and
//! import, so a rename is declared exactly once.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The value kind of a section field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text; defaults to `""`.
    Text,
    /// Boolean flag; defaults to `false`.
    Flag,
    /// List of strings; defaults to `[]`.
    List,
}

impl FieldKind {
    /// The value a missing field takes.
    pub fn default_value(self) -> Value {
        match self {
            Self::Text => Value::String(String::new()),
            Self::Flag => Value::Bool(false),
            Self::List => Value::Array(Vec::new()),
        }
    }
}

/// One row of a section's field table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub editor: &'static str,
    pub vc: &'static str,
    pub aliases: &'static [&'static str],
    pub kind: FieldKind,
}

const fn text(editor: &'static str, vc: &'static str) -> FieldSpec {
    FieldSpec {
        editor,
        vc,
        aliases: &[],
        kind: FieldKind::Text,
    }
}

const fn flag(editor: &'static str, vc: &'static str) -> FieldSpec {
    FieldSpec {
        editor,
        vc,
        aliases: &[],
        kind: FieldKind::Flag,
    }
}

const fn list(editor: &'static str, vc: &'static str) -> FieldSpec {
    FieldSpec {
        editor,
        vc,
        aliases: &[],
        kind: FieldKind::List,
    }
}

impl FieldSpec {
    const fn or(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }
}

// `title` and `position` collapse into `title`; `title` wins when both are set.
const EXPERIENCE: &[FieldSpec] = &[
    text("id", "id"),
    text("title", "title").or(&["position", "jobTitle", "role"]),
    text("company", "company").or(&["companyName", "employer", "organization"]),
    text("location", "location"),
    text("startDate", "startDate"),
    text("endDate", "endDate"),
    flag("currentlyEmployed", "stillEmployed").or(&["current"]),
    text("description", "description").or(&["responsibilities"]),
    text("duration", "duration"),
];

const EDUCATION: &[FieldSpec] = &[
    text("id", "id"),
    text("type", "degree").or(&["degreeType"]),
    text("programName", "fieldOfStudy").or(&["program", "major"]),
    text("institution", "institution").or(&["school", "institutionName"]),
    text("location", "location"),
    text("startDate", "startDate"),
    text("endDate", "endDate"),
    flag("currentlyEnrolled", "inProgress"),
    flag("awardEarned", "awardEarned"),
    text("description", "description"),
    text("duration", "duration"),
];

const SKILLS: &[FieldSpec] = &[
    text("id", "id"),
    text("name", "name").or(&["skill", "skills"]),
    text("description", "description"),
];

const CERTIFICATIONS: &[FieldSpec] = &[
    text("id", "id"),
    text("name", "name").or(&["title"]),
    text("issuer", "issuer").or(&["issuingOrganization"]),
    text("issueDate", "issueDate").or(&["date"]),
    text("expiryDate", "expirationDate"),
    text("credentialId", "credentialId"),
    text("url", "url"),
    flag("noExpiration", "noExpiration"),
];

const PROJECTS: &[FieldSpec] = &[
    text("id", "id"),
    text("name", "name").or(&["title"]),
    text("description", "description"),
    text("url", "url").or(&["link"]),
    list("technologies", "technologies"),
    text("startDate", "startDate"),
    text("endDate", "endDate"),
];

const AFFILIATIONS: &[FieldSpec] = &[
    text("id", "id"),
    text("name", "name").or(&["title"]),
    text("organization", "organization"),
    text("startDate", "startDate"),
    text("endDate", "endDate"),
    flag("activeAffiliation", "active"),
    text("duration", "duration"),
];

const VOLUNTEER: &[FieldSpec] = &[
    text("id", "id"),
    text("role", "role").or(&["title", "position"]),
    text("organization", "organization"),
    text("location", "location"),
    text("startDate", "startDate"),
    text("endDate", "endDate"),
    flag("currentlyVolunteering", "stillVolunteering"),
    text("description", "description"),
    text("duration", "duration"),
];

const HOBBIES: &[FieldSpec] = &[text("name", "name").or(&["hobby", "interest"])];

/// The list sections of a resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKind {
    Experience,
    Education,
    Skills,
    Certifications,
    Projects,
    ProfessionalAffiliations,
    VolunteerWork,
    HobbiesAndInterests,
}

impl SectionKind {
    /// Every section, in document order.
    pub const ALL: [SectionKind; 8] = [
        Self::Experience,
        Self::Education,
        Self::Skills,
        Self::Certifications,
        Self::Projects,
        Self::ProfessionalAffiliations,
        Self::VolunteerWork,
        Self::HobbiesAndInterests,
    ];

    /// Key of the section in the editor document and in evidence maps.
    pub fn editor_key(self) -> &'static str {
        match self {
            Self::Experience => "experience",
            Self::Education => "education",
            Self::Skills => "skills",
            Self::Certifications => "certifications",
            Self::Projects => "projects",
            Self::ProfessionalAffiliations => "professionalAffiliations",
            Self::VolunteerWork => "volunteerWork",
            Self::HobbiesAndInterests => "hobbiesAndInterests",
        }
    }

    /// Key of the section's array in `credentialSubject`.
    pub fn vc_key(self) -> &'static str {
        match self {
            Self::Experience => "employmentHistory",
            Self::Education => "educationAndLearning",
            Self::Skills => "skills",
            Self::Certifications => "certifications",
            Self::Projects => "projects",
            Self::ProfessionalAffiliations => "professionalAffiliations",
            Self::VolunteerWork => "volunteerWork",
            Self::HobbiesAndInterests => "hobbiesAndInterests",
        }
    }

    /// Look a section up by its editor key.
    pub fn from_editor_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.editor_key() == key)
    }

    /// The section's field table.
    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            Self::Experience => EXPERIENCE,
            Self::Education => EDUCATION,
            Self::Skills => SKILLS,
            Self::Certifications => CERTIFICATIONS,
            Self::Projects => PROJECTS,
            Self::ProfessionalAffiliations => AFFILIATIONS,
            Self::VolunteerWork => VOLUNTEER,
            Self::HobbiesAndInterests => HOBBIES,
        }
    }

    /// The field a plain-string or `{text}` item lands in.
    pub fn primary_field(self) -> &'static str {
        match self {
            Self::Experience => "title",
            Self::Education => "programName",
            Self::VolunteerWork => "role",
            _ => "name",
        }
    }

    /// Whether items carry a date range and a derived `duration`.
    pub fn has_duration(self) -> bool {
        matches!(
            self,
            Self::Experience | Self::Education | Self::ProfessionalAffiliations | Self::VolunteerWork
        )
    }

    /// The editor flag meaning "still ongoing", if the section has one.
    pub fn ongoing_field(self) -> Option<&'static str> {
        match self {
            Self::Experience => Some("currentlyEmployed"),
            Self::Education => Some("currentlyEnrolled"),
            Self::ProfessionalAffiliations => Some("activeAffiliation"),
            Self::VolunteerWork => Some("currentlyVolunteering"),
            _ => None,
        }
    }

    /// Whether a section stored as one string should be split into items.
    pub fn splits_plain_text(self) -> bool {
        matches!(self, Self::Skills | Self::HobbiesAndInterests)
    }

    /// True if `key` is an editor name, VC name, or alias in this section.
    pub fn knows_field(self, key: &str) -> bool {
        self.fields()
            .iter()
            .any(|f| f.editor == key || f.vc == key || f.aliases.contains(&key))
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.editor_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editor_keys_round_trip() {
        for kind in SectionKind::ALL {
            assert_eq!(SectionKind::from_editor_key(kind.editor_key()), Some(kind));
        }
        assert_eq!(SectionKind::from_editor_key("nope"), None);
    }

    #[test]
    fn education_renames() {
        let find = |editor: &str| {
            SectionKind::Education
                .fields()
                .iter()
                .find(|f| f.editor == editor)
                .map(|f| f.vc)
        };
        assert_eq!(find("type"), Some("degree"));
        assert_eq!(find("programName"), Some("fieldOfStudy"));
    }

    #[test]
    fn every_table_has_primary_field() {
        for kind in SectionKind::ALL {
            assert!(
                kind.fields().iter().any(|f| f.editor == kind.primary_field()),
                "{kind} lacks its primary field"
            );
        }
    }

    #[test]
    fn editor_and_vc_names_are_unique_per_section() {
        for kind in SectionKind::ALL {
            let mut editors: Vec<_> = kind.fields().iter().map(|f| f.editor).collect();
            let mut vcs: Vec<_> = kind.fields().iter().map(|f| f.vc).collect();
            let n = editors.len();
            editors.sort_unstable();
            editors.dedup();
            vcs.sort_unstable();
            vcs.dedup();
            assert_eq!(editors.len(), n, "{kind}");
            assert_eq!(vcs.len(), n, "{kind}");
        }
    }

    #[test]
    fn ongoing_flags_exist_in_tables() {
        for kind in SectionKind::ALL {
            if let Some(flag) = kind.ongoing_field() {
                assert!(kind.knows_field(flag));
                assert!(kind.has_duration());
            }
        }
    }
}
