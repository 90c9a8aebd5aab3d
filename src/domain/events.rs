//! Event validation and partial-update rules.

use branford_api_types::{Event, EventInput, EventPatch};
use time::Date;

use super::dates::{parse_calendar_date, storage_timestamp};
use super::error::ValidationError;
use super::fields::{optional, present, required};

/// A validated event ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub date: Date,
    pub time: String,
    pub location: String,
    pub cost: String,
    pub who: String,
    pub description: String,
    pub image: Option<String>,
    pub registration_link: Option<String>,
    pub promo_code: Option<String>,
}

/// Validated partial update. `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventChanges {
    pub title: Option<String>,
    pub date: Option<Date>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub cost: Option<String>,
    pub who: Option<String>,
    pub description: Option<String>,
    pub image: Option<Option<String>>,
    pub registration_link: Option<Option<String>>,
    pub promo_code: Option<Option<String>>,
}

pub fn validate_event(input: EventInput) -> Result<EventDraft, ValidationError> {
    let title = required(input.title, "title")?;
    let date = match input.date {
        Some(raw) if !raw.trim().is_empty() => parse_calendar_date(&raw)?,
        _ => return Err(ValidationError::MissingField("date")),
    };

    Ok(EventDraft {
        title,
        date,
        time: required(input.time, "time")?,
        location: required(input.location, "location")?,
        cost: required(input.cost, "cost")?,
        who: required(input.who, "who")?,
        description: required(input.description, "description")?,
        image: optional(input.image),
        registration_link: optional(input.registration_link),
        promo_code: optional(input.promo_code),
    })
}

pub fn validate_event_patch(patch: EventPatch) -> Result<EventChanges, ValidationError> {
    Ok(EventChanges {
        title: present(patch.title, "title")?,
        date: patch
            .date
            .map(|raw| parse_calendar_date(&raw))
            .transpose()?,
        time: present(patch.time, "time")?,
        location: present(patch.location, "location")?,
        cost: present(patch.cost, "cost")?,
        who: present(patch.who, "who")?,
        description: present(patch.description, "description")?,
        image: patch.image.map(optional),
        registration_link: patch.registration_link.map(optional),
        promo_code: patch.promo_code.map(optional),
    })
}

impl EventChanges {
    pub fn apply(self, event: &mut Event) {
        if let Some(title) = self.title {
            event.title = title;
        }
        if let Some(date) = self.date {
            event.date = storage_timestamp(date);
        }
        if let Some(time) = self.time {
            event.time = time;
        }
        if let Some(location) = self.location {
            event.location = location;
        }
        if let Some(cost) = self.cost {
            event.cost = cost;
        }
        if let Some(who) = self.who {
            event.who = who;
        }
        if let Some(description) = self.description {
            event.description = description;
        }
        if let Some(image) = self.image {
            event.image = image;
        }
        if let Some(link) = self.registration_link {
            event.registration_link = link;
        }
        if let Some(code) = self.promo_code {
            event.promo_code = code;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};
    use uuid::Uuid;

    fn open_house() -> EventInput {
        EventInput {
            title: Some("Open House".into()),
            date: Some("2024-06-01".into()),
            time: Some("10am-2pm".into()),
            location: Some("Gym".into()),
            cost: Some("Free".into()),
            who: Some("Everyone".into()),
            description: Some("Tour the box and meet the coaches.".into()),
            ..Default::default()
        }
    }

    fn stored_event() -> Event {
        Event {
            id: Uuid::new_v4(),
            title: "Open House".into(),
            date: datetime!(2024-06-01 00:00 UTC),
            time: "10am-2pm".into(),
            location: "Gym".into(),
            cost: "Free".into(),
            who: "Everyone".into(),
            description: "Tour".into(),
            image: Some("/uploads/2024-05/a.jpg".into()),
            registration_link: None,
            promo_code: Some("OPEN".into()),
            created_at: datetime!(2024-05-01 08:00 UTC),
            updated_at: datetime!(2024-05-01 08:00 UTC),
        }
    }

    #[test]
    fn validate_event_accepts_complete_input() {
        let draft = validate_event(open_house()).expect("valid event");
        assert_eq!(draft.title, "Open House");
        assert_eq!(draft.date, date!(2024-06-01));
        assert_eq!(draft.image, None);
        assert_eq!(draft.promo_code, None);
    }

    #[test]
    fn validate_event_reports_first_missing_field() {
        let mut input = open_house();
        input.location = Some("   ".into());
        assert_eq!(
            validate_event(input),
            Err(ValidationError::MissingField("location"))
        );

        let mut input = open_house();
        input.date = None;
        assert_eq!(
            validate_event(input),
            Err(ValidationError::MissingField("date"))
        );
    }

    #[test]
    fn validate_event_rejects_unparseable_date() {
        let mut input = open_house();
        input.date = Some("next friday".into());
        assert_eq!(
            validate_event(input),
            Err(ValidationError::InvalidDate("next friday".into()))
        );
    }

    #[test]
    fn optional_fields_store_no_value_instead_of_empty_string() {
        let mut input = open_house();
        input.registration_link = Some(String::new());
        input.promo_code = Some("SUMMER".into());
        let draft = validate_event(input).expect("valid event");
        assert_eq!(draft.registration_link, None);
        assert_eq!(draft.promo_code.as_deref(), Some("SUMMER"));
    }

    #[test]
    fn patch_changes_only_supplied_fields() {
        let before = stored_event();
        let mut after = before.clone();

        let changes = validate_event_patch(EventPatch {
            cost: Some("$10".into()),
            ..Default::default()
        })
        .expect("valid patch");
        changes.apply(&mut after);

        assert_eq!(after.cost, "$10");
        assert_eq!(
            Event {
                cost: before.cost.clone(),
                ..after
            },
            before
        );
    }

    #[test]
    fn patch_normalizes_and_validates_dates() {
        let mut event = stored_event();
        validate_event_patch(EventPatch {
            date: Some("2024-07-04T18:00".into()),
            ..Default::default()
        })
        .expect("valid patch")
        .apply(&mut event);
        assert_eq!(event.date, datetime!(2024-07-04 00:00 UTC));

        assert_eq!(
            validate_event_patch(EventPatch {
                date: Some("not a date".into()),
                ..Default::default()
            }),
            Err(ValidationError::InvalidDate("not a date".into()))
        );
    }

    #[test]
    fn patch_refuses_to_blank_required_fields() {
        assert_eq!(
            validate_event_patch(EventPatch {
                title: Some(" ".into()),
                ..Default::default()
            }),
            Err(ValidationError::MissingField("title"))
        );
    }

    #[test]
    fn patch_clears_optional_fields_with_null_or_empty() {
        let mut event = stored_event();
        validate_event_patch(EventPatch {
            image: Some(None),
            promo_code: Some(Some(String::new())),
            ..Default::default()
        })
        .expect("valid patch")
        .apply(&mut event);

        assert_eq!(event.image, None);
        assert_eq!(event.promo_code, None);
    }
}
