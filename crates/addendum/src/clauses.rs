// src/clauses.rs
//
// Clause extraction from the reference document.
//
// The reference document is expected to follow the canonical addendum layout:
// every clause sits at a fixed paragraph index. A document with inserted or
// removed paragraphs yields shifted clauses, not an error. Slots beyond the end
// of a shorter document fall back to the built-in wording and are logged.

use log::{debug, warn};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Identifies one extracted clause of the canonical layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClauseKey {
    H1,
    P12,
    Bullets,
    H2,
    P21,
    P22,
    P23,
    H3,
    P31,
    P32,
    H4,
    P41,
    P42,
    P43,
    H5,
}

impl ClauseKey {
    pub const COUNT: usize = 15;

    pub const ALL: [ClauseKey; ClauseKey::COUNT] = [
        ClauseKey::H1,
        ClauseKey::P12,
        ClauseKey::Bullets,
        ClauseKey::H2,
        ClauseKey::P21,
        ClauseKey::P22,
        ClauseKey::P23,
        ClauseKey::H3,
        ClauseKey::P31,
        ClauseKey::P32,
        ClauseKey::H4,
        ClauseKey::P41,
        ClauseKey::P42,
        ClauseKey::P43,
        ClauseKey::H5,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ClauseKey::H1 => "h1",
            ClauseKey::P12 => "p12",
            ClauseKey::Bullets => "bullets",
            ClauseKey::H2 => "h2",
            ClauseKey::P21 => "p21",
            ClauseKey::P22 => "p22",
            ClauseKey::P23 => "p23",
            ClauseKey::H3 => "h3",
            ClauseKey::P31 => "p31",
            ClauseKey::P32 => "p32",
            ClauseKey::H4 => "h4",
            ClauseKey::P41 => "p41",
            ClauseKey::P42 => "p42",
            ClauseKey::P43 => "p43",
            ClauseKey::H5 => "h5",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ClauseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binds a clause key to its paragraph position and built-in wording.
#[derive(Debug, Clone, Copy)]
pub struct Slot {
    pub key: ClauseKey,
    pub paragraph: usize,
    pub fallback: &'static str,
}

pub const FALLBACK_BULLETS: &str = "\
     — администрирование размещений, подлежащих обязательной маркировке;\n\
     — взаимодействие с рекламной платформой;\n\
     — контроль корректности передачи данных;\n\
     — формирование и сверку отчётности по маркируемой рекламе.";

/// The canonical layout, in document order. Indices 0..=5 hold the title
/// block and introduction and index 7 holds clause 1.1; those are composed
/// from parameters and never extracted.
pub const SLOTS: [Slot; ClauseKey::COUNT] = [
    Slot {
        key: ClauseKey::H1,
        paragraph: 6,
        fallback: "1. Предмет соглашения",
    },
    Slot {
        key: ClauseKey::P12,
        paragraph: 8,
        fallback: "1.2. Услуги по сопровождению обязательной маркировки рекламы включают:",
    },
    Slot {
        key: ClauseKey::Bullets,
        paragraph: 9,
        fallback: FALLBACK_BULLETS,
    },
    Slot {
        key: ClauseKey::H2,
        paragraph: 10,
        fallback: "2. Стоимость услуг и порядок расчётов",
    },
    Slot {
        key: ClauseKey::P21,
        paragraph: 11,
        fallback: "2.1. Стоимость Услуг маркировки составляет 3% от объёма размещений, \
                   подлежащих обязательной маркировке (за исключением поисковых размещений), \
                   согласно официальным данным рекламной платформы.",
    },
    Slot {
        key: ClauseKey::P22,
        paragraph: 12,
        fallback: "2.2. Расчёт стоимости производится на основании отчёта платформы, \
                   формируемого в месяце, следующем за отчётным.",
    },
    Slot {
        key: ClauseKey::P23,
        paragraph: 13,
        fallback: "2.3. В случае корректировок платформы перерасчёт стоимости производится \
                   в следующем отчётном периоде.",
    },
    Slot {
        key: ClauseKey::H3,
        paragraph: 14,
        fallback: "3. Сроки оплаты",
    },
    Slot {
        key: ClauseKey::P31,
        paragraph: 15,
        fallback: "3.1. Принципал обязуется оплатить сумму, рассчитанную по п.2.2, в течение \
                   10 календарных дней с момента выставления Агентом счёта на оплату.",
    },
    Slot {
        key: ClauseKey::P32,
        paragraph: 16,
        fallback: "3.2. Оплата производится на расчётный счёт Агента, указанный в Договоре, \
                   с обязательной ссылкой на номер и дату настоящего Дополнительного соглашения.",
    },
    Slot {
        key: ClauseKey::H4,
        paragraph: 17,
        fallback: "4. Прочие условия",
    },
    Slot {
        key: ClauseKey::P41,
        paragraph: 18,
        fallback: "4.1. Настоящее Дополнительное соглашение является неотъемлемой частью Договора.",
    },
    Slot {
        key: ClauseKey::P42,
        paragraph: 19,
        fallback: "4.2. Все остальные условия Договора остаются без изменений и сохраняют силу.",
    },
    Slot {
        key: ClauseKey::P43,
        paragraph: 20,
        fallback: "4.3. Настоящее Дополнительное соглашение вступает в силу с момента подписания \
                   обеими сторонами.",
    },
    Slot {
        key: ClauseKey::H5,
        paragraph: 21,
        fallback: "5. Подписи сторон",
    },
];

/// Number of paragraphs a reference document needs for every slot to be
/// filled from it.
pub const CANONICAL_PARAGRAPHS: usize = 22;

pub fn slot(key: ClauseKey) -> &'static Slot {
    &SLOTS[key.index()]
}

/// Normalizes paragraph text: line separators become newlines, non-breaking
/// spaces become plain spaces, surrounding whitespace is trimmed.
pub fn clean(text: &str) -> String {
    text.replace('\u{2028}', "\n")
        .replace('\u{a0}', " ")
        .trim()
        .to_string()
}

/// Paragraph texts of a reference document, already cleaned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceDocument {
    paragraphs: Vec<String>,
}

impl ReferenceDocument {
    pub fn from_paragraphs<I, S>(paragraphs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            paragraphs: paragraphs.into_iter().map(|p| clean(p.as_ref())).collect(),
        }
    }

    pub fn paragraphs(&self) -> &[String] {
        &self.paragraphs
    }

    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }
}

/// Where a clause's text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClauseSource {
    Reference,
    Fallback,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClauseEntry {
    pub text: String,
    pub source: ClauseSource,
}

/// Resolved text for every clause key. Lookups are total.
#[derive(Debug, Clone)]
pub struct ClauseMap {
    entries: [ClauseEntry; ClauseKey::COUNT],
}

impl ClauseMap {
    /// Every slot filled with its built-in wording.
    pub fn fallback() -> Self {
        Self {
            entries: SLOTS.map(|slot| ClauseEntry {
                text: slot.fallback.to_string(),
                source: ClauseSource::Fallback,
            }),
        }
    }

    pub fn get(&self, key: ClauseKey) -> &str {
        &self.entries[key.index()].text
    }

    pub fn source(&self, key: ClauseKey) -> ClauseSource {
        self.entries[key.index()].source
    }

    pub fn iter(&self) -> impl Iterator<Item = (ClauseKey, &ClauseEntry)> {
        ClauseKey::ALL.into_iter().zip(self.entries.iter())
    }

    /// Keys whose text was not taken from the reference document.
    pub fn fallback_keys(&self) -> Vec<ClauseKey> {
        self.iter()
            .filter(|(_, entry)| entry.source == ClauseSource::Fallback)
            .map(|(key, _)| key)
            .collect()
    }

    /// Keyed view for serialization, in key order.
    pub fn to_map(&self) -> BTreeMap<&'static str, &ClauseEntry> {
        self.iter().map(|(key, entry)| (key.as_str(), entry)).collect()
    }
}

/// Resolves every slot against the reference document.
pub fn extract_clauses(reference: &ReferenceDocument) -> ClauseMap {
    let paragraphs = reference.paragraphs();
    debug!(
        "extracting {} clauses from {} reference paragraphs",
        ClauseKey::COUNT,
        paragraphs.len()
    );

    let entries = SLOTS.map(|slot| match paragraphs.get(slot.paragraph) {
        Some(text) if !text.is_empty() => ClauseEntry {
            text: text.clone(),
            source: ClauseSource::Reference,
        },
        Some(_) => {
            warn!(
                "reference paragraph {} for clause '{}' is empty; using built-in text",
                slot.paragraph, slot.key
            );
            ClauseEntry {
                text: slot.fallback.to_string(),
                source: ClauseSource::Fallback,
            }
        }
        None => {
            warn!(
                "reference document has {} paragraphs, clause '{}' expects index {}; \
                 using built-in text",
                paragraphs.len(),
                slot.key,
                slot.paragraph
            );
            ClauseEntry {
                text: slot.fallback.to_string(),
                source: ClauseSource::Fallback,
            }
        }
    });

    ClauseMap { entries }
}
