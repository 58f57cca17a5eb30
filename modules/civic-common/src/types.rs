use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CivicError;

// --- Categories ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueCategory {
    #[serde(rename = "Broken Roads")]
    Roads,
    #[serde(rename = "Waterlogging")]
    Water,
    #[serde(rename = "Garbage Hotspot")]
    Garbage,
    #[serde(rename = "Unsafe Zone")]
    Safety,
    #[serde(rename = "Electricity/Lighting")]
    Electric,
    #[serde(rename = "Emergency/Disaster")]
    Emergency,
}

impl IssueCategory {
    pub const ALL: [IssueCategory; 6] = [
        IssueCategory::Roads,
        IssueCategory::Water,
        IssueCategory::Garbage,
        IssueCategory::Safety,
        IssueCategory::Electric,
        IssueCategory::Emergency,
    ];

    /// Human-readable label, also the wire value.
    pub fn label(self) -> &'static str {
        match self {
            IssueCategory::Roads => "Broken Roads",
            IssueCategory::Water => "Waterlogging",
            IssueCategory::Garbage => "Garbage Hotspot",
            IssueCategory::Safety => "Unsafe Zone",
            IssueCategory::Electric => "Electricity/Lighting",
            IssueCategory::Emergency => "Emergency/Disaster",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            IssueCategory::Roads => "roads",
            IssueCategory::Water => "water",
            IssueCategory::Garbage => "garbage",
            IssueCategory::Safety => "safety",
            IssueCategory::Electric => "electric",
            IssueCategory::Emergency => "emergency",
        }
    }
}

impl std::fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for IssueCategory {
    type Err = CivicError;

    /// Accepts either the label ("Broken Roads") or the slug ("roads"), ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        IssueCategory::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(needle) || c.slug().eq_ignore_ascii_case(needle))
            .ok_or_else(|| CivicError::Validation(format!("unknown issue category: {s}")))
    }
}

// --- Status ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueStatus {
    #[serde(rename = "Reported")]
    Reported,
    #[serde(rename = "Acknowledged")]
    Acknowledged,
    #[serde(rename = "Work in Progress")]
    WorkInProgress,
    #[serde(rename = "Resolved")]
    Resolved,
}

impl std::fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueStatus::Reported => write!(f, "Reported"),
            IssueStatus::Acknowledged => write!(f, "Acknowledged"),
            IssueStatus::WorkInProgress => write!(f, "Work in Progress"),
            IssueStatus::Resolved => write!(f, "Resolved"),
        }
    }
}

// --- Priority ---

/// Display band for a 1–10 priority score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityBand {
    /// Above 8.
    Critical,
    /// Above 5, up to 8.
    Elevated,
    Standard,
}

impl PriorityBand {
    pub fn from_score(score: f64) -> Self {
        if score > 8.0 {
            PriorityBand::Critical
        } else if score > 5.0 {
            PriorityBand::Elevated
        } else {
            PriorityBand::Standard
        }
    }
}

impl std::fmt::Display for PriorityBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriorityBand::Critical => write!(f, "critical"),
            PriorityBand::Elevated => write!(f, "elevated"),
            PriorityBand::Standard => write!(f, "standard"),
        }
    }
}

// --- Issues ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reporter {
    pub name: String,
    pub is_anonymous: bool,
}

impl Reporter {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_anonymous: false,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            name: "Anonymous".to_string(),
            is_anonymous: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub status: IssueStatus,
    pub timestamp: DateTime<Utc>,
    pub note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CivicIssue {
    pub id: Uuid,
    pub category: IssueCategory,
    pub description: String,
    pub location: Location,
    pub reporter: Reporter,
    pub timestamp: DateTime<Utc>,
    pub priority_score: f64,
    pub status: IssueStatus,
    pub upvotes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Completion percentage, 0–100.
    pub progress: u8,
    pub timeline: Vec<TimelineEntry>,
}

impl CivicIssue {
    pub fn priority_band(&self) -> PriorityBand {
        PriorityBand::from_score(self.priority_score)
    }
}
