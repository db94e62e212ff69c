use std::any::Any;

use thiserror::Error;

use crate::signals::capability::SourceId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriberError {
    #[error("Dependent panicked while refreshing. source: {source_id}, cause: {cause}")]
    RefreshPanicked { source_id: SourceId, cause: String },
    #[error("Observer panicked in on_next. source: {source_id}, cause: {cause}")]
    NextPanicked { source_id: SourceId, cause: String },
    #[error("Observer panicked in on_completed. cause: {cause}")]
    CompletedPanicked { cause: String },
}

impl SubscriberError {
    pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
        if let Some(message) = payload.downcast_ref::<&str>() {
            message.to_string()
        } else if let Some(message) = payload.downcast_ref::<String>() {
            message.clone()
        } else {
            "<non-string panic payload>".to_string()
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("The global signal manager has already been initialized")]
    GlobalAlreadyInitialized,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Box::new("boom"), "boom")]
    #[case(Box::new(String::from("kaboom")), "kaboom")]
    #[case(Box::new(42_u32), "<non-string panic payload>")]
    fn panic_message(#[case] payload: Box<dyn Any + Send>, #[case] expected: &str) {
        assert_eq!(SubscriberError::panic_message(payload.as_ref()), expected);
    }

    #[test]
    fn display() {
        // given
        let error = SubscriberError::CompletedPanicked {
            cause: "boom".to_string(),
        };

        // expect
        assert_eq!(error.to_string(), "Observer panicked in on_completed. cause: boom");
    }
}
