// src/locale.rs
//
// Russian calendar phrases and case-inflected agreement labels.

use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;

use crate::error::AddendumError;
use crate::params::AgreementKind;

/// Month names in the genitive case, indexed by month number - 1.
const MONTHS_GENITIVE: [&str; 12] = [
    "января",
    "февраля",
    "марта",
    "апреля",
    "мая",
    "июня",
    "июля",
    "августа",
    "сентября",
    "октября",
    "ноября",
    "декабря",
];

/// A calendar date written as `DD.MM.YYYY`.
///
/// The day and year are kept exactly as written so that phrases reproduce the
/// caller's input (`05.03.2024` stays `«05»`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuDate {
    raw: String,
    day: String,
    year: String,
    date: NaiveDate,
}

impl RuDate {
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn day(&self) -> &str {
        &self.day
    }

    pub fn year(&self) -> &str {
        &self.year
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Genitive month name; total because parsing rejects months outside 1..=12.
    pub fn month_genitive(&self) -> &'static str {
        MONTHS_GENITIVE[self.date.month0() as usize]
    }
}

impl FromStr for RuDate {
    type Err = AddendumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| AddendumError::InvalidDate {
            value: s.to_string(),
            reason: reason.to_string(),
        };

        let raw = s.trim();
        let parts: Vec<&str> = raw.split('.').collect();
        let [day, month, year] = parts[..] else {
            return Err(invalid("expected three dot-separated fields"));
        };

        let well_formed = |field: &str, len: usize| {
            field.len() == len && field.bytes().all(|b| b.is_ascii_digit())
        };
        if !well_formed(day, 2) || !well_formed(month, 2) || !well_formed(year, 4) {
            return Err(invalid("fields must be two-digit day, two-digit month, four-digit year"));
        }

        let month_no: u32 = month.parse().map_err(|_| invalid("month is not a number"))?;
        if !(1..=12).contains(&month_no) {
            return Err(invalid("month code outside 01-12"));
        }
        let day_no: u32 = day.parse().map_err(|_| invalid("day is not a number"))?;
        let year_no: i32 = year.parse().map_err(|_| invalid("year is not a number"))?;

        let date = NaiveDate::from_ymd_opt(year_no, month_no, day_no)
            .ok_or_else(|| invalid("no such calendar day"))?;

        Ok(RuDate {
            raw: raw.to_string(),
            day: day.to_string(),
            year: year.to_string(),
            date,
        })
    }
}

impl fmt::Display for RuDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// `«15» марта 2024 года`
pub fn format_ru_date(date: &RuDate) -> String {
    format!("«{}» {} {} года", date.day, date.month_genitive(), date.year)
}

/// `«15» марта 2024 г.`, the abbreviated form used inside clause text.
pub fn format_ru_date_short(date: &RuDate) -> String {
    format!("«{}» {} {} г.", date.day, date.month_genitive(), date.year)
}

/// Parses `DD.MM.YYYY` and formats it with [`format_ru_date`].
pub fn format_ru_date_str(input: &str) -> Result<String, AddendumError> {
    Ok(format_ru_date(&input.parse()?))
}

/// Agreement name inflected for the two cases the addendum needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgreementLabel {
    /// "к ... договору" in the subtitle
    pub dative: &'static str,
    /// "в рамках ... договора" in clause 1.1
    pub genitive: &'static str,
}

pub fn agreement_label(kind: AgreementKind) -> AgreementLabel {
    match kind {
        AgreementKind::Agent => AgreementLabel {
            dative: "агентскому договору",
            genitive: "агентского договора",
        },
        AgreementKind::Contract => AgreementLabel {
            dative: "договору",
            genitive: "договора",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_every_month_code() {
        for (i, name) in MONTHS_GENITIVE.iter().enumerate() {
            let input = format!("15.{:02}.2024", i + 1);
            let phrase = format_ru_date_str(&input).unwrap();
            assert_eq!(phrase, format!("«15» {} 2024 года", name));
        }
    }

    #[test]
    fn test_documented_example() {
        assert_eq!(format_ru_date_str("15.03.2024").unwrap(), "«15» марта 2024 года");
    }

    #[test]
    fn test_day_kept_verbatim() {
        let date: RuDate = "05.09.2023".parse().unwrap();
        assert_eq!(format_ru_date(&date), "«05» сентября 2023 года");
        assert_eq!(format_ru_date_short(&date), "«05» сентября 2023 г.");
        assert_eq!(date.to_string(), "05.09.2023");
    }

    #[test]
    fn test_month_out_of_range() {
        for bad in ["15.13.2024", "15.00.2024"] {
            match bad.parse::<RuDate>() {
                Err(AddendumError::InvalidDate { reason, .. }) => {
                    assert!(reason.contains("01-12"), "unexpected reason: {reason}")
                }
                other => panic!("expected InvalidDate for {bad}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_malformed_dates() {
        for bad in ["1-1-2024", "2024.03.15", "15.03", "", "aa.03.2024", "31.02.2024"] {
            assert!(bad.parse::<RuDate>().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_impossible_calendar_day() {
        assert!("29.02.2024".parse::<RuDate>().is_ok());
        for bad in ["29.02.2023", "31.04.2024", "00.05.2024"] {
            match bad.parse::<RuDate>() {
                Err(AddendumError::InvalidDate { reason, .. }) => {
                    assert_eq!(reason, "no such calendar day")
                }
                other => panic!("expected InvalidDate for {bad}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_agreement_labels() {
        let agent = agreement_label(AgreementKind::Agent);
        let contract = agreement_label(AgreementKind::Contract);

        assert_eq!(agent.dative, "агентскому договору");
        assert_eq!(agent.genitive, "агентского договора");
        assert_eq!(contract.dative, "договору");
        assert_eq!(contract.genitive, "договора");

        assert_ne!(agent, contract);
        assert_ne!(agent.dative, contract.dative);
        assert_ne!(agent.genitive, contract.genitive);
    }
}
