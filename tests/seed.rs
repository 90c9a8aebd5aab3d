mod support;

use branford::application::repos::{CoachesRepo, EventsRepo, GalleryRepo, SpotlightsRepo};
use branford::application::seed::{SeedReport, seed_sample_content};
use branford::domain::gallery::GalleryDraft;
use time::macros::{date, datetime};

use support::MemoryRepositories;

#[tokio::test]
async fn empty_collections_receive_sample_content() {
    let repos = MemoryRepositories::default();
    let today = date!(2024 - 06 - 01);

    let report = seed_sample_content(&repos, &repos, &repos, &repos, today)
        .await
        .expect("seeded");

    assert_eq!(
        report,
        SeedReport {
            events: 2,
            member_spotlights: 1,
            gallery_images: 1,
            coaches: 1,
        }
    );

    let events = repos.list_events().await.expect("events");
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].date, datetime!(2024-06-01 00:00 UTC));
    assert_eq!(events[1].date, datetime!(2024-06-08 00:00 UTC));
    assert_eq!(repos.list_spotlights().await.expect("spotlights").len(), 1);
    assert_eq!(repos.list_gallery_images().await.expect("gallery").len(), 1);

    let coaches = repos.list_coaches().await.expect("coaches");
    assert_eq!(coaches.len(), 1);
    assert_eq!(coaches[0].role, "Head Coach");
}

#[tokio::test]
async fn seeding_twice_adds_nothing() {
    let repos = MemoryRepositories::default();
    let today = date!(2024 - 06 - 01);
    seed_sample_content(&repos, &repos, &repos, &repos, today)
        .await
        .expect("first run");

    let report = seed_sample_content(&repos, &repos, &repos, &repos, today)
        .await
        .expect("second run");

    assert_eq!(report, SeedReport::default());
    assert_eq!(repos.list_events().await.expect("events").len(), 2);
}

#[tokio::test]
async fn collections_with_content_are_left_alone() {
    let repos = MemoryRepositories::default();
    let existing = repos
        .create_gallery_image(GalleryDraft {
            url: "/uploads/2024-05/box.jpg".to_string(),
            caption: None,
        })
        .await
        .expect("created");

    let report = seed_sample_content(&repos, &repos, &repos, &repos, date!(2024 - 06 - 01))
        .await
        .expect("seeded");

    assert_eq!(report.gallery_images, 0);
    assert_eq!(report.events, 2);
    assert_eq!(
        repos.list_gallery_images().await.expect("gallery"),
        vec![existing]
    );
}
