// crates/addendum/tests/common/mod.rs
#![allow(dead_code)]

use addendum::clauses::{slot, CANONICAL_PARAGRAPHS, SLOTS};
use addendum::{
    AgreementKind, ClauseKey, OutputDocument, ParagraphKind, ParagraphSpec, ParagraphStyle,
    ParameterSet,
};
use std::fs;
use std::path::{Path, PathBuf};

/// Reference wording placed at every clause slot; other positions carry
/// filler the extractor must ignore.
pub fn reference_text(key: ClauseKey) -> String {
    match key {
        ClauseKey::Bullets => {
            "— первый пункт;\u{2028}— второй пункт;\u{2028}— третий пункт.".into()
        }
        _ => format!("{}\u{a0}(эталон)", slot(key).fallback),
    }
}

pub fn canonical_reference_paragraphs() -> Vec<String> {
    (0..CANONICAL_PARAGRAPHS)
        .map(|i| match SLOTS.iter().find(|s| s.paragraph == i) {
            Some(s) => reference_text(s.key),
            None if i == 0 => "Дополнительное соглашение № 1".to_string(),
            None => format!("Абзац шаблона {i}"),
        })
        .collect()
}

/// Builds a `.docx` reference document from plain paragraph texts.
pub fn reference_docx_bytes(paragraphs: &[String]) -> Vec<u8> {
    let mut doc = OutputDocument::default();
    for text in paragraphs {
        doc.append(ParagraphSpec::new(
            ParagraphKind::Body,
            text.as_str(),
            ParagraphStyle::default(),
        ));
    }
    addendum::docx::to_bytes(&doc).unwrap()
}

pub fn write_reference(dir: &Path, name: &str, paragraphs: &[String]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, reference_docx_bytes(paragraphs)).unwrap();
    path
}

pub fn params(kind: AgreementKind) -> ParameterSet {
    ParameterSet {
        ds_no: "7".into(),
        agreement_no: "AG-092023-1880".into(),
        agreement_date: "01.09.2023".parse().unwrap(),
        sign_date: "15.03.2024".parse().unwrap(),
        city: "г. Пермь".into(),
        agreement_kind: kind,
        principal_full: "ООО «Вектор»".into(),
        principal_short: "ООО «Вектор»".into(),
        principal_position_intro: "Генерального директора".into(),
        principal_position_sign: "Генеральный директор".into(),
        principal_signer_full: "Сидоровой Анны Петровны".into(),
        principal_signer_short: "Сидорова А.П.".into(),
        acting_word: "действующей".into(),
    }
}
