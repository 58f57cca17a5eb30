//! Local, in-memory issue collection. Nothing here is persisted or shared.

use chrono::Utc;
use civic_common::{
    CivicError, CivicIssue, IssueCategory, IssueStatus, Location, Reporter, TimelineEntry,
};
use tracing::info;
use uuid::Uuid;

use crate::analysis::{AnalysisResult, AssessmentSource, ReportAnalyzer};

const FILED_NOTE: &str = "Reported via JanSeva WebApp";

/// A citizen's report before it has been analyzed and filed.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDraft {
    pub category: IssueCategory,
    pub description: String,
    pub location: Location,
    pub reporter: Reporter,
    pub image_url: Option<String>,
}

impl ReportDraft {
    pub fn new(category: IssueCategory, description: impl Into<String>) -> Self {
        Self {
            category,
            description: description.into(),
            location: Location {
                lat: 28.7041,
                lng: 77.1025,
                address: "Location unavailable".to_string(),
            },
            reporter: Reporter::anonymous(),
            image_url: None,
        }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    pub fn with_reporter(mut self, reporter: Reporter) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn validate(&self) -> Result<(), CivicError> {
        if self.description.trim().is_empty() {
            return Err(CivicError::Validation(
                "report description must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Issues ordered newest first.
#[derive(Debug, Clone, Default)]
pub struct IssueBoard {
    issues: Vec<CivicIssue>,
}

impl IssueBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_issues(issues: Vec<CivicIssue>) -> Self {
        Self { issues }
    }

    pub fn issues(&self) -> &[CivicIssue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&CivicIssue> {
        self.issues.iter().find(|i| i.id == id)
    }

    /// Validate, analyze once, and file the draft.
    pub async fn submit(
        &mut self,
        analyzer: &dyn ReportAnalyzer,
        draft: ReportDraft,
    ) -> Result<(&CivicIssue, AssessmentSource), CivicError> {
        draft.validate()?;

        let assessment = analyzer
            .assess(&draft.description, draft.category.label())
            .await;

        let issue = self.file(draft, &assessment.result);
        Ok((issue, assessment.source))
    }

    /// File a confirmed report with its analysis.
    pub fn file(&mut self, draft: ReportDraft, analysis: &AnalysisResult) -> &CivicIssue {
        let now = Utc::now();
        let issue = CivicIssue {
            id: Uuid::new_v4(),
            category: draft.category,
            description: draft.description,
            location: draft.location,
            reporter: draft.reporter,
            timestamp: now,
            priority_score: analysis.priority_score,
            status: IssueStatus::Reported,
            upvotes: 1,
            image_url: draft.image_url,
            progress: 0,
            timeline: vec![TimelineEntry {
                status: IssueStatus::Reported,
                timestamp: now,
                note: FILED_NOTE.to_string(),
                photo_url: None,
            }],
        };

        info!(
            id = %issue.id,
            category = issue.category.label(),
            priority_score = issue.priority_score,
            "Filed civic issue"
        );

        self.issues.insert(0, issue);
        &self.issues[0]
    }

    /// Add one upvote and return the new count.
    pub fn upvote(&mut self, id: Uuid) -> Result<u32, CivicError> {
        let issue = self
            .issues
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| CivicError::NotFound(id.to_string()))?;
        issue.upvotes = issue.upvotes.saturating_add(1);
        Ok(issue.upvotes)
    }

    /// Issues by priority score, highest first. Ties keep board order.
    pub fn ranked(&self) -> Vec<&CivicIssue> {
        let mut ranked: Vec<&CivicIssue> = self.issues.iter().collect();
        ranked.sort_by(|a, b| b.priority_score.total_cmp(&a.priority_score));
        ranked
    }
}
