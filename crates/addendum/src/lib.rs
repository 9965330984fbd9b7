// src/lib.rs
//
// Marking addendum pipeline: reference document -> clause map -> styled
// output document.

pub mod clauses;
pub mod document;
pub mod error;
pub mod locale;
pub mod params;
pub mod render;

#[cfg(feature = "docx")]
pub mod docx;

pub use clauses::{extract_clauses, ClauseKey, ClauseMap, ClauseSource, ReferenceDocument};
pub use document::{
    Alignment, DocumentDefaults, OutputDocument, ParagraphKind, ParagraphSpec, ParagraphStyle,
    TabAlignment, TabStop,
};
pub use error::{AddendumError, AddendumResult, ErrorKind};
pub use locale::{agreement_label, format_ru_date, format_ru_date_short, AgreementLabel, RuDate};
pub use params::{AgentParty, AgreementKind, ParameterSet};
pub use render::{paragraph_specs, render, split_bullets};

/// Verifies that the DOCX backend was compiled in.
///
/// Call before reading any input so a crippled build fails with guidance
/// instead of halfway through a run.
pub fn check_backend() -> AddendumResult<()> {
    if cfg!(feature = "docx") {
        Ok(())
    } else {
        Err(AddendumError::MissingCapability {
            hint: "the `addendum` crate was built without the `docx` feature.\n\
                   Rebuild with default features enabled:\n  \
                   cargo install --path crates/addendum-cli"
                .to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "docx")]
    #[test]
    fn test_backend_compiled_in() {
        assert!(check_backend().is_ok());
    }

    #[cfg(not(feature = "docx"))]
    #[test]
    fn test_backend_missing() {
        let err = check_backend().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingCapability);
        let message = err.to_string();
        assert!(message.contains("without the `docx` feature"), "{message}");
        assert!(message.contains("cargo install --path crates/addendum-cli"));
    }
}
