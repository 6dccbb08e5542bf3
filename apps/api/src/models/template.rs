use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::ProfileId;

/// The two template slots each profile owns. A new upload overwrites the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    Resume,
    CoverLetter,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 2] = [TemplateKind::Resume, TemplateKind::CoverLetter];

    /// Multipart field name and file-name suffix.
    pub fn slot(&self) -> &'static str {
        match self {
            TemplateKind::Resume => "resume",
            TemplateKind::CoverLetter => "cover_letter",
        }
    }

    /// Human-readable name used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            TemplateKind::Resume => "resume",
            TemplateKind::CoverLetter => "cover letter",
        }
    }

    pub fn from_slot(slot: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.slot() == slot)
    }

    pub fn pdf_file_name(&self, profile: &ProfileId) -> String {
        format!("{profile}_{}.pdf", self.slot())
    }

    pub fn text_file_name(&self, profile: &ProfileId) -> String {
        format!("{profile}_{}.txt", self.slot())
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names_are_keyed_by_profile() {
        let profile = ProfileId::parse("default_user").unwrap();
        assert_eq!(
            TemplateKind::Resume.pdf_file_name(&profile),
            "default_user_resume.pdf"
        );
        assert_eq!(
            TemplateKind::CoverLetter.text_file_name(&profile),
            "default_user_cover_letter.txt"
        );
    }

    #[test]
    fn test_from_slot_round_trips_field_names() {
        assert_eq!(TemplateKind::from_slot("resume"), Some(TemplateKind::Resume));
        assert_eq!(
            TemplateKind::from_slot("cover_letter"),
            Some(TemplateKind::CoverLetter)
        );
        assert_eq!(TemplateKind::from_slot("photo"), None);
    }
}
