//! Mapping of pipeline errors onto the application error type

use fz152_common::privacy::patterns::PiiError;
use fz152_common::CommonError;
use fz152_domain::Fz152Error;

/// Convert a pipeline error, keeping its message.
pub fn from_pii(err: PiiError) -> Fz152Error {
    let message = err.to_string();
    match err {
        PiiError::NerModel(_) => Fz152Error::Model(message),
        PiiError::PatternCompilation { .. } | PiiError::UnsupportedLanguage { .. } => {
            Fz152Error::Config(message)
        }
        PiiError::Common(CommonError::Config { .. } | CommonError::Validation { .. }) => {
            Fz152Error::Config(message)
        }
        PiiError::InvalidSpan(_) => Fz152Error::InvalidInput(message),
        PiiError::Anonymization(_) => Fz152Error::Anonymization(message),
        PiiError::Recognizer { .. } | PiiError::RegexError(_) => Fz152Error::Analysis(message),
        PiiError::Common(_) => Fz152Error::Internal(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping() {
        assert!(matches!(from_pii(PiiError::NerModel("gone".into())), Fz152Error::Model(_)));
        assert!(matches!(
            from_pii(PiiError::UnsupportedLanguage { requested: "en".into(), supported: "ru".into() }),
            Fz152Error::Config(ref msg) if msg.contains("'en'")
        ));
        assert!(matches!(from_pii(PiiError::invalid_span("span 0")), Fz152Error::InvalidInput(_)));
        assert!(matches!(
            from_pii(PiiError::recognizer("phone", "boom")),
            Fz152Error::Analysis(ref msg) if msg.contains("phone")
        ));
    }
}
