//! Member spotlight validation.

use branford_api_types::{MemberSpotlight, MemberSpotlightInput, MemberSpotlightPatch};

use super::error::ValidationError;
use super::fields::{present, required};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotlightDraft {
    pub name: String,
    /// Free text such as "2019" or "January 2022"; never parsed as a date.
    pub member_since: String,
    pub quote: String,
    pub recent_achievement: String,
    pub image: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpotlightChanges {
    pub name: Option<String>,
    pub member_since: Option<String>,
    pub quote: Option<String>,
    pub recent_achievement: Option<String>,
    pub image: Option<String>,
}

pub fn validate_spotlight(input: MemberSpotlightInput) -> Result<SpotlightDraft, ValidationError> {
    Ok(SpotlightDraft {
        name: required(input.name, "name")?,
        member_since: required(input.member_since, "memberSince")?,
        quote: required(input.quote, "quote")?,
        recent_achievement: required(input.recent_achievement, "recentAchievement")?,
        image: input.image.unwrap_or_default(),
    })
}

pub fn validate_spotlight_patch(
    patch: MemberSpotlightPatch,
) -> Result<SpotlightChanges, ValidationError> {
    Ok(SpotlightChanges {
        name: present(patch.name, "name")?,
        member_since: present(patch.member_since, "memberSince")?,
        quote: present(patch.quote, "quote")?,
        recent_achievement: present(patch.recent_achievement, "recentAchievement")?,
        image: patch.image.map(Option::unwrap_or_default),
    })
}

impl SpotlightChanges {
    pub fn apply(self, spotlight: &mut MemberSpotlight) {
        if let Some(name) = self.name {
            spotlight.name = name;
        }
        if let Some(member_since) = self.member_since {
            spotlight.member_since = member_since;
        }
        if let Some(quote) = self.quote {
            spotlight.quote = quote;
        }
        if let Some(achievement) = self.recent_achievement {
            spotlight.recent_achievement = achievement;
        }
        if let Some(image) = self.image {
            spotlight.image = image;
        }
    }
}
