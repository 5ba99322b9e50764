use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_DESCRIPTION: &str = "Test case description";
pub const DEFAULT_DATE: &str = "Not set";
pub const DEFAULT_MODULE: &str = "General";
pub const DEFAULT_PRIORITY: &str = "Medium";
pub const DEFAULT_STATUS: &str = "Pending";
pub const DEFAULT_PROJECT: &str = "QA Project";
pub const DEFAULT_EXPECTED_RESULT: &str = "Expected result of the case";
pub const DEFAULT_COMMENTS: &str = "No additional comments";
pub const DEFAULT_STEPS: [&str; 2] = ["Step 1: Execute action", "Step 2: Verify result"];

/// Fields of a [`CaseRecord`] that can fall back to a default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaseField {
    Description,
    Date,
    Module,
    Priority,
    Status,
    Project,
    ExpectedResult,
    Comments,
    Steps,
}

impl fmt::Display for CaseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Description => "description",
            Self::Date => "date",
            Self::Module => "module",
            Self::Priority => "priority",
            Self::Status => "status",
            Self::Project => "project",
            Self::ExpectedResult => "expected result",
            Self::Comments => "comments",
            Self::Steps => "steps",
        };
        f.write_str(name)
    }
}

/// Test case scraped from generated text. Not authoritative: every field the
/// scraper could not find holds a fixed default, listed in `defaulted`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    pub module: String,
    pub priority: String,
    pub status: String,
    pub project: String,
    pub expected_result: String,
    pub comments: String,
    pub steps: Vec<String>,
    #[serde(skip)]
    pub defaulted: Vec<CaseField>,
}

impl CaseRecord {
    /// Record with the given id and title and every other field defaulted
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: DEFAULT_DESCRIPTION.to_string(),
            date: DEFAULT_DATE.to_string(),
            number: None,
            module: DEFAULT_MODULE.to_string(),
            priority: DEFAULT_PRIORITY.to_string(),
            status: DEFAULT_STATUS.to_string(),
            project: DEFAULT_PROJECT.to_string(),
            expected_result: DEFAULT_EXPECTED_RESULT.to_string(),
            comments: DEFAULT_COMMENTS.to_string(),
            steps: DEFAULT_STEPS.iter().map(|s| s.to_string()).collect(),
            defaulted: vec![
                CaseField::Description,
                CaseField::Date,
                CaseField::Module,
                CaseField::Priority,
                CaseField::Status,
                CaseField::Project,
                CaseField::ExpectedResult,
                CaseField::Comments,
                CaseField::Steps,
            ],
        }
    }

    /// Overwrite a field with a scraped value and clear its default marker
    pub fn set(&mut self, field: CaseField, value: String) {
        match field {
            CaseField::Description => self.description = value,
            CaseField::Date => self.date = value,
            CaseField::Module => self.module = value,
            CaseField::Priority => self.priority = value,
            CaseField::Status => self.status = value,
            CaseField::Project => self.project = value,
            CaseField::ExpectedResult => self.expected_result = value,
            CaseField::Comments => self.comments = value,
            CaseField::Steps => return,
        }
        self.defaulted.retain(|f| *f != field);
    }

    pub fn set_steps(&mut self, steps: Vec<String>) {
        if steps.is_empty() {
            return;
        }
        self.steps = steps;
        self.defaulted.retain(|f| *f != CaseField::Steps);
    }

    pub fn is_complete(&self) -> bool {
        self.defaulted.is_empty()
    }
}
