use proptest::prelude::*;
use sdk::errors::{ReportError, ReportErrorExt};
use sdk::types::SourceCategory;

// Hints are static strings and never echo the raw error payload.
proptest! {
    #[test]
    fn test_error_user_hint_completeness(error_str in "[a-zA-Z0-9 _/:.-]{8,64}") {
        let errs = vec![
            ReportError::Config(error_str.clone()),
            ReportError::MissingSecret(error_str.clone()),
            ReportError::MasterPrompt(error_str.clone()),
            ReportError::Network(error_str.clone()),
            ReportError::CompletionService(error_str.clone()),
            ReportError::ContentValidation(error_str.clone()),
            ReportError::SourceUnavailable {
                category: SourceCategory::Notes,
                reason: error_str.clone(),
            },
        ];

        for err in errs {
            let hint = err.user_hint();
            prop_assert!(!hint.is_empty());
            prop_assert!(!hint.contains(&error_str));
        }
    }
}

proptest! {
    #[test]
    fn test_only_source_errors_are_recoverable(reason in "\\PC*") {
        for category in SourceCategory::ALL {
            let err = ReportError::SourceUnavailable { category, reason: reason.clone() };
            prop_assert!(err.is_recoverable());
        }
        prop_assert!(!ReportError::Config(reason.clone()).is_recoverable());
        prop_assert!(!ReportError::CompletionService(reason).is_recoverable());
    }
}
