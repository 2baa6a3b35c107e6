//! Link check requests and findings.

use serde::{Deserialize, Serialize};

use super::Project;

/// A URL to probe, tagged with the project it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRequest {
    pub id: String,
    pub url: String,
}

/// A reachability finding for one project URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub id: String,
    pub url: String,
    pub reason: String,
}

/// A loaded project with the link check result attached.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckedProject {
    pub project: Project,
    pub problem: Option<Problem>,
}

impl CheckedProject {
    pub fn has_problem(&self) -> bool {
        self.problem.is_some()
    }
}
