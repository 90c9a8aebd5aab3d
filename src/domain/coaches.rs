//! Coach profile validation.

use branford_api_types::{Coach, CoachInput, CoachPatch};

use super::error::ValidationError;
use super::fields::{present, required};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoachDraft {
    pub name: String,
    pub role: String,
    pub bio: Vec<String>,
    pub certifications: Vec<String>,
    pub achievements: Vec<String>,
    pub image: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoachChanges {
    pub name: Option<String>,
    pub role: Option<String>,
    pub bio: Option<Vec<String>>,
    pub certifications: Option<Vec<String>>,
    pub achievements: Option<Vec<String>>,
    pub image: Option<String>,
}

pub fn validate_coach(input: CoachInput) -> Result<CoachDraft, ValidationError> {
    Ok(CoachDraft {
        name: required(input.name, "name")?,
        role: required(input.role, "role")?,
        bio: entries(input.bio.unwrap_or_default()),
        certifications: entries(input.certifications.unwrap_or_default()),
        achievements: entries(input.achievements.unwrap_or_default()),
        image: input.image.unwrap_or_default(),
    })
}

pub fn validate_coach_patch(patch: CoachPatch) -> Result<CoachChanges, ValidationError> {
    Ok(CoachChanges {
        name: present(patch.name, "name")?,
        role: present(patch.role, "role")?,
        bio: patch.bio.map(entries),
        certifications: patch.certifications.map(entries),
        achievements: patch.achievements.map(entries),
        image: patch.image.map(Option::unwrap_or_default),
    })
}

/// Trimmed entries in their given order; blank lines left over from editing are dropped.
fn entries(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect()
}

impl CoachChanges {
    pub fn apply(self, coach: &mut Coach) {
        if let Some(name) = self.name {
            coach.name = name;
        }
        if let Some(role) = self.role {
            coach.role = role;
        }
        if let Some(bio) = self.bio {
            coach.bio = bio;
        }
        if let Some(certifications) = self.certifications {
            coach.certifications = certifications;
        }
        if let Some(achievements) = self.achievements {
            coach.achievements = achievements;
        }
        if let Some(image) = self.image {
            coach.image = image;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_paragraphs_are_dropped_in_order() {
        let draft = validate_coach(CoachInput {
            name: Some(" Riley ".into()),
            role: Some("Head Coach".into()),
            bio: Some(vec![
                "Coached since 2012.".into(),
                "   ".into(),
                " Loves barbell cycling. ".into(),
            ]),
            certifications: None,
            achievements: Some(vec![String::new()]),
            image: None,
        })
        .expect("valid coach");

        assert_eq!(draft.name, "Riley");
        assert_eq!(
            draft.bio,
            vec!["Coached since 2012.", "Loves barbell cycling."]
        );
        assert!(draft.certifications.is_empty());
        assert!(draft.achievements.is_empty());
        assert_eq!(draft.image, "");
    }

    #[test]
    fn role_is_required() {
        let err = validate_coach(CoachInput {
            name: Some("Riley".into()),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err, ValidationError::MissingField("role"));
    }

    #[test]
    fn patches_replace_lists_and_keep_the_rest() {
        let changes = validate_coach_patch(CoachPatch {
            certifications: Some(vec!["CF-L2".into(), " ".into()]),
            image: Some(None),
            ..Default::default()
        })
        .expect("valid patch");

        let mut coach = Coach {
            id: uuid::Uuid::nil(),
            name: "Riley".into(),
            role: "Coach".into(),
            bio: vec!["Hi".into()],
            certifications: vec!["CF-L1".into()],
            achievements: vec!["Regionals 2019".into()],
            image: "/uploads/riley.jpg".into(),
            created_at: time::OffsetDateTime::UNIX_EPOCH,
            updated_at: time::OffsetDateTime::UNIX_EPOCH,
        };
        changes.apply(&mut coach);

        assert_eq!(coach.certifications, vec!["CF-L2"]);
        assert_eq!(coach.bio, vec!["Hi"]);
        assert_eq!(coach.achievements, vec!["Regionals 2019"]);
        assert_eq!(coach.image, "");
    }

    #[test]
    fn blank_names_cannot_be_patched_in() {
        let err = validate_coach_patch(CoachPatch {
            name: Some("  ".into()),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err, ValidationError::MissingField("name"));
    }
}
