//! The editor-side resume document.

use serde::{Deserialize, Serialize};

use vres_core::Timestamp;

use crate::item::SectionItem;
use crate::section::SectionKind;

/// Social profile links.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialLinks {
    pub linkedin: String,
    pub github: String,
    pub portfolio: String,
    pub twitter: String,
}

/// Contact block, shared by the editor document and `person.contact`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Contact {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub website: String,
    pub social_links: SocialLinks,
}

/// An ordered list of items.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub items: Vec<SectionItem>,
}

impl Section {
    pub fn new(items: Vec<SectionItem>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The resume as the editor holds it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeDocument {
    pub id: String,
    pub name: String,
    pub contact: Contact,
    pub summary: String,
    pub experience: Section,
    pub education: Section,
    pub skills: Section,
    pub certifications: Section,
    pub projects: Section,
    pub professional_affiliations: Section,
    pub volunteer_work: Section,
    pub hobbies_and_interests: Section,
    pub last_updated: String,
}

impl ResumeDocument {
    pub fn section(&self, kind: SectionKind) -> &Section {
        match kind {
            SectionKind::Experience => &self.experience,
            SectionKind::Education => &self.education,
            SectionKind::Skills => &self.skills,
            SectionKind::Certifications => &self.certifications,
            SectionKind::Projects => &self.projects,
            SectionKind::ProfessionalAffiliations => &self.professional_affiliations,
            SectionKind::VolunteerWork => &self.volunteer_work,
            SectionKind::HobbiesAndInterests => &self.hobbies_and_interests,
        }
    }

    pub(crate) fn section_mut(&mut self, kind: SectionKind) -> &mut Section {
        match kind {
            SectionKind::Experience => &mut self.experience,
            SectionKind::Education => &mut self.education,
            SectionKind::Skills => &mut self.skills,
            SectionKind::Certifications => &mut self.certifications,
            SectionKind::Projects => &mut self.projects,
            SectionKind::ProfessionalAffiliations => &mut self.professional_affiliations,
            SectionKind::VolunteerWork => &mut self.volunteer_work,
            SectionKind::HobbiesAndInterests => &mut self.hobbies_and_interests,
        }
    }

    /// A copy with item `index` of `kind` replaced. Out-of-range indexes
    /// leave the document unchanged.
    pub fn with_item(&self, kind: SectionKind, index: usize, item: SectionItem) -> Self {
        let mut next = self.clone();
        match next.section_mut(kind).items.get_mut(index) {
            Some(slot) => *slot = item,
            None => tracing::debug!(section = %kind, index, "item index out of range"),
        }
        next
    }

    /// A copy with `item` appended to `kind`.
    pub fn with_appended_item(&self, kind: SectionKind, item: SectionItem) -> Self {
        let mut next = self.clone();
        next.section_mut(kind).items.push(item);
        next
    }

    /// A copy stamped with `at` as its last update.
    pub fn touched(&self, at: &Timestamp) -> Self {
        Self {
            last_updated: at.to_iso8601(),
            ..self.clone()
        }
    }
}
