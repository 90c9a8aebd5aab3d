//! First-run sample content. Only empty collections are filled.

use serde::Serialize;
use time::{Date, Duration};

use crate::application::repos::{CoachesRepo, EventsRepo, GalleryRepo, RepoError, SpotlightsRepo};
use crate::domain::coaches::CoachDraft;
use crate::domain::events::EventDraft;
use crate::domain::gallery::GalleryDraft;
use crate::domain::spotlights::SpotlightDraft;

const PLACEHOLDER_IMAGE: &str = "/images/placeholder.jpg";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub events: usize,
    pub member_spotlights: usize,
    pub gallery_images: usize,
    pub coaches: usize,
}

pub async fn seed_sample_content(
    events: &dyn EventsRepo,
    spotlights: &dyn SpotlightsRepo,
    gallery: &dyn GalleryRepo,
    coaches: &dyn CoachesRepo,
    today: Date,
) -> Result<SeedReport, RepoError> {
    let mut report = SeedReport::default();

    if events.list_events().await?.is_empty() {
        for draft in sample_events(today) {
            events.create_event(draft).await?;
            report.events += 1;
        }
    }

    if spotlights.list_spotlights().await?.is_empty() {
        spotlights.create_spotlight(sample_spotlight()).await?;
        report.member_spotlights += 1;
    }

    if gallery.list_gallery_images().await?.is_empty() {
        gallery
            .create_gallery_image(GalleryDraft {
                url: PLACEHOLDER_IMAGE.to_string(),
                caption: Some("Saturday community workout".to_string()),
            })
            .await?;
        report.gallery_images += 1;
    }

    if coaches.list_coaches().await?.is_empty() {
        coaches.create_coach(sample_coach()).await?;
        report.coaches += 1;
    }

    Ok(report)
}

fn sample_events(today: Date) -> Vec<EventDraft> {
    vec![
        EventDraft {
            title: "In-House CrossFit Competition".to_string(),
            date: today,
            time: "9:00 AM - 1:00 PM".to_string(),
            location: "Branford CrossFit".to_string(),
            cost: "$25".to_string(),
            who: "All members".to_string(),
            description: "Three workouts, scaled and Rx divisions, potluck afterwards."
                .to_string(),
            image: Some(PLACEHOLDER_IMAGE.to_string()),
            registration_link: None,
            promo_code: None,
        },
        EventDraft {
            title: "Olympic Lifting Workshop".to_string(),
            date: today + Duration::days(7),
            time: "10:00 AM - 12:00 PM".to_string(),
            location: "Branford CrossFit".to_string(),
            cost: "$15".to_string(),
            who: "Beginners".to_string(),
            description: "Snatch and clean & jerk fundamentals with our coaching staff."
                .to_string(),
            image: Some(PLACEHOLDER_IMAGE.to_string()),
            registration_link: None,
            promo_code: None,
        },
    ]
}

fn sample_spotlight() -> SpotlightDraft {
    SpotlightDraft {
        name: "John Doe".to_string(),
        member_since: "January 2022".to_string(),
        quote: "CrossFit changed my life!".to_string(),
        recent_achievement: "First muscle-up".to_string(),
        image: PLACEHOLDER_IMAGE.to_string(),
    }
}

fn sample_coach() -> CoachDraft {
    CoachDraft {
        name: "Coach Name".to_string(),
        role: "Head Coach".to_string(),
        bio: vec![
            "Coaching group classes and one-on-one sessions since the box opened.".to_string(),
        ],
        certifications: vec!["CrossFit Level 1".to_string(), "CrossFit Level 2".to_string()],
        achievements: vec!["Masters division podium".to_string()],
        image: PLACEHOLDER_IMAGE.to_string(),
    }
}
