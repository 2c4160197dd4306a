//! Static cost table and ledger limits.

use serde::{Deserialize, Serialize};

/// Credits granted to a freshly created account.
pub const SIGNUP_BONUS: i64 = 50;

/// Maximum credits spendable per local calendar day.
pub const DAILY_LIMIT: i64 = 200;

/// Maximum credits spendable per local calendar month.
pub const MONTHLY_LIMIT: i64 = 2000;

/// A metered operation, each with a fixed credit cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// Analysis of a recorded interview.
    InterviewAnalysis,
    /// Transcription of an audio recording.
    AudioTranscription,
    /// Generation of answer/followup suggestions.
    SuggestionGeneration,
    /// Structured parsing of a job posting.
    JobPostingParsing,
    /// Structured parsing of a resume.
    ResumeParsing,
    /// Structured parsing of an inbound email.
    EmailParsing,
}

impl OperationKind {
    /// All operation kinds, for iteration in reports and tests.
    pub const ALL: [Self; 6] = [
        Self::InterviewAnalysis,
        Self::AudioTranscription,
        Self::SuggestionGeneration,
        Self::JobPostingParsing,
        Self::ResumeParsing,
        Self::EmailParsing,
    ];

    /// Returns the fixed credit cost of this operation.
    #[must_use]
    pub const fn cost(self) -> i64 {
        match self {
            Self::InterviewAnalysis => 10,
            Self::AudioTranscription => 5,
            Self::SuggestionGeneration => 2,
            Self::JobPostingParsing | Self::ResumeParsing | Self::EmailParsing => 3,
        }
    }

    /// Returns the wire name of this operation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InterviewAnalysis => "interview_analysis",
            Self::AudioTranscription => "audio_transcription",
            Self::SuggestionGeneration => "suggestion_generation",
            Self::JobPostingParsing => "job_posting_parsing",
            Self::ResumeParsing => "resume_parsing",
            Self::EmailParsing => "email_parsing",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_cost_is_positive_and_within_limits() {
        for kind in OperationKind::ALL {
            assert!(kind.cost() > 0, "{kind} must have a positive cost");
            assert!(kind.cost() <= DAILY_LIMIT);
            assert!(kind.cost() <= MONTHLY_LIMIT);
        }
    }

    #[test]
    fn test_limits_are_ordered() {
        assert!(DAILY_LIMIT <= MONTHLY_LIMIT);
        assert!(SIGNUP_BONUS > 0);
    }

    #[test]
    fn test_wire_names_round_trip() {
        for kind in OperationKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            let back: OperationKind = serde_json::from_str(&json).unwrap();
            assert_eq!(back, kind);
        }
    }
}
