// crates/addendum/tests/pipeline.rs
#![cfg(feature = "docx")]

mod common;

use addendum::clauses::{clean, slot, ClauseSource};
use addendum::{
    check_backend, extract_clauses, render, AgentParty, AgreementKind, ClauseKey,
    ReferenceDocument,
};
use common::*;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[test]
fn test_backend_available() {
    assert!(check_backend().is_ok());
}

#[test]
fn test_canonical_reference_from_docx() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let path = write_reference(temp.path(), "template.docx", &canonical_reference_paragraphs());

    let reference = ReferenceDocument::open(&path)?;
    assert_eq!(reference.len(), 22);

    let clauses = extract_clauses(&reference);
    assert!(clauses.fallback_keys().is_empty());
    for key in ClauseKey::ALL {
        let expected = reference_text(key)
            .replace('\u{a0}', " ")
            .replace('\u{2028}', "\n");
        assert_eq!(clauses.get(key), expected, "clause {key}");
        assert_eq!(clauses.source(key), ClauseSource::Reference);
    }
    Ok(())
}

#[test]
fn test_short_reference_from_docx() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let paragraphs: Vec<String> = canonical_reference_paragraphs().into_iter().take(5).collect();
    let path = write_reference(temp.path(), "old.docx", &paragraphs);

    let clauses = extract_clauses(&ReferenceDocument::open(&path)?);
    for key in ClauseKey::ALL {
        assert_eq!(clauses.get(key), slot(key).fallback);
        assert!(!clauses.get(key).is_empty());
    }
    Ok(())
}

#[test]
fn test_end_to_end_document() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let path = write_reference(temp.path(), "template.docx", &canonical_reference_paragraphs());
    let clauses = extract_clauses(&ReferenceDocument::open(&path)?);
    let params = params(AgreementKind::Agent);

    let doc = render(&clauses, &params, &AgentParty::default());

    // title, subtitle, city/date, intro; 15 heading/body paragraphs;
    // 3 bullets; 5 signature rows
    assert_eq!(doc.paragraphs().len(), 4 + 15 + 3 + 5);
    assert_eq!(doc.paragraphs()[0].text, "Дополнительное соглашение № 7");

    // Serialize and read back: what a word processor would see. Reading
    // trims, so the empty agent position leaves no trailing tab.
    let bytes = addendum::docx::to_bytes(&doc)?;
    let written = ReferenceDocument::from_docx_bytes(&bytes)?;
    let expected: Vec<String> = doc.texts().map(clean).collect();
    assert_eq!(written.paragraphs(), expected.as_slice());

    assert_eq!(written.paragraphs()[2], "г. Пермь\t«15» марта 2024 года");
    assert!(
        written.paragraphs()[3]
            .contains("Сидоровой Анны Петровны, действующей на основании Устава")
    );
    assert_eq!(written.paragraphs()[7], "• первый пункт;");
    assert_eq!(written.paragraphs()[9], "• третий пункт.");
    Ok(())
}

#[test]
fn test_contract_kind_end_to_end() {
    let clauses = extract_clauses(&ReferenceDocument::default());
    let doc = render(&clauses, &params(AgreementKind::Contract), &AgentParty::default());
    let texts: Vec<&str> = doc.texts().collect();

    assert_eq!(texts.len(), 4 + 15 + 4 + 5);
    assert_eq!(texts[1], "к договору № AG-092023-1880 от 01.09.2023.");
    assert!(
        texts[5].contains("в рамках договора №\u{202f}AG-092023-1880 от «01» сентября 2023 г.")
    );
}
