//! Seed issues for demos and tests. Timestamps are relative to `now`.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::types::*;

fn hours(n: i64) -> Duration {
    Duration::hours(n)
}

fn entry(status: IssueStatus, at: DateTime<Utc>, note: &str) -> TimelineEntry {
    TimelineEntry {
        status,
        timestamp: at,
        note: note.to_string(),
        photo_url: None,
    }
}

pub fn mock_issues(now: DateTime<Utc>) -> Vec<CivicIssue> {
    vec![
        CivicIssue {
            id: Uuid::from_u128(1),
            category: IssueCategory::Roads,
            description: "Major pothole near Connaught Place metro gate 2.".to_string(),
            location: Location {
                lat: 28.6315,
                lng: 77.2167,
                address: "Connaught Place, New Delhi".to_string(),
            },
            reporter: Reporter::named("Amit Sharma"),
            timestamp: now - hours(48),
            priority_score: 7.5,
            status: IssueStatus::WorkInProgress,
            upvotes: 124,
            image_url: None,
            progress: 45,
            timeline: vec![
                entry(IssueStatus::Reported, now - hours(48), "Citizen reported via Mobile App."),
                entry(
                    IssueStatus::Acknowledged,
                    now - hours(36),
                    "PWD Department has assigned a supervisor.",
                ),
                entry(
                    IssueStatus::WorkInProgress,
                    now - hours(12),
                    "Contractor has arrived on site. Material filling in progress.",
                ),
            ],
        },
        CivicIssue {
            id: Uuid::from_u128(2),
            category: IssueCategory::Water,
            description: "Severe waterlogging at Rohini Sector 7 intersection after light rain."
                .to_string(),
            location: Location {
                lat: 28.715,
                lng: 77.115,
                address: "Rohini, Delhi".to_string(),
            },
            reporter: Reporter::anonymous(),
            timestamp: now - hours(5),
            priority_score: 8.9,
            status: IssueStatus::Reported,
            upvotes: 45,
            image_url: None,
            progress: 0,
            timeline: vec![entry(
                IssueStatus::Reported,
                now - hours(5),
                "Reported with GPS coordinates.",
            )],
        },
        CivicIssue {
            id: Uuid::from_u128(3),
            category: IssueCategory::Garbage,
            description: "Overflowing garbage bin near main market entrance.".to_string(),
            location: Location {
                lat: 19.076,
                lng: 72.877,
                address: "Bandra, Mumbai".to_string(),
            },
            reporter: Reporter::named("Sriya Patel"),
            timestamp: now - hours(48),
            priority_score: 5.2,
            status: IssueStatus::Resolved,
            upvotes: 89,
            image_url: None,
            progress: 100,
            timeline: vec![
                entry(IssueStatus::Reported, now - hours(48), "Garbage hotspot identified."),
                entry(
                    IssueStatus::Acknowledged,
                    now - hours(46),
                    "BMC Waste Management notified.",
                ),
                entry(
                    IssueStatus::Resolved,
                    now - hours(2),
                    "Cleanup completed. Post-work photo verified.",
                ),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_issues_are_consistent() {
        let now = Utc::now();
        let issues = mock_issues(now);
        assert_eq!(issues.len(), 3);

        for issue in &issues {
            let last = issue.timeline.last().unwrap();
            assert_eq!(last.status, issue.status);
            assert!(issue.timestamp <= now);
        }
    }
}
