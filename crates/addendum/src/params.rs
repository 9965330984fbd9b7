// src/params.rs

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::document::unencodable_char;
use crate::error::AddendumError;
use crate::locale::RuDate;

pub const DEFAULT_CITY: &str = "г. Пермь";
pub const DEFAULT_ACTING_WORD: &str = "действующего";

/// Which agreement the addendum amends. Drives the case-inflected labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgreementKind {
    #[default]
    Agent,
    Contract,
}

impl FromStr for AgreementKind {
    type Err = AddendumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "agent" => Ok(AgreementKind::Agent),
            "contract" => Ok(AgreementKind::Contract),
            _ => Err(AddendumError::InvalidAgreementKind(s.to_string())),
        }
    }
}

impl fmt::Display for AgreementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgreementKind::Agent => f.write_str("agent"),
            AgreementKind::Contract => f.write_str("contract"),
        }
    }
}

/// The first party of every addendum.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AgentParty {
    /// Full identification used in the introductory paragraph.
    pub intro_name: String,
    /// Participle agreeing with the agent's gender: "именуемый" / "именуемая".
    pub named_word: String,
    /// Name line in the signature block.
    pub sign_name: String,
    /// Position line in the signature block; empty for sole proprietors.
    pub sign_position: String,
    /// Surname and initials under the signature line.
    pub signer_short: String,
}

impl Default for AgentParty {
    fn default() -> Self {
        Self {
            intro_name: "Индивидуальный предприниматель Замятин Николай Григорьевич \
                         (ОГРНИП 313590433900045)"
                .to_string(),
            named_word: "именуемый".to_string(),
            sign_name: "ИП Замятин Николай Григорьевич".to_string(),
            sign_position: String::new(),
            signer_short: "Замятин Н.Г.".to_string(),
        }
    }
}

/// Everything the caller knows about the addendum being generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSet {
    /// Addendum number ("ДС №").
    pub ds_no: String,
    pub agreement_no: String,
    pub agreement_date: RuDate,
    pub sign_date: RuDate,
    pub city: String,
    pub agreement_kind: AgreementKind,
    /// Principal's full legal name as it appears in the introduction.
    pub principal_full: String,
    /// Principal's short name for the signature block.
    pub principal_short: String,
    /// Signatory position in the genitive case ("Генерального директора").
    pub principal_position_intro: String,
    /// Signatory position in the nominative case ("Генеральный директор").
    pub principal_position_sign: String,
    /// Signatory full name in the genitive case.
    pub principal_signer_full: String,
    /// Signatory surname and initials.
    pub principal_signer_short: String,
    /// "действующего" / "действующей".
    pub acting_word: String,
}

impl ParameterSet {
    /// Rejects required text fields that are blank or hold characters a DOCX
    /// file cannot store. The wording itself is the caller's responsibility.
    pub fn validate(&self) -> Result<(), AddendumError> {
        let required = [
            ("ds-no", &self.ds_no),
            ("agreement-no", &self.agreement_no),
            ("city", &self.city),
            ("principal-full", &self.principal_full),
            ("principal-short", &self.principal_short),
            ("principal-position-intro", &self.principal_position_intro),
            ("principal-position-sign", &self.principal_position_sign),
            ("principal-signer-full", &self.principal_signer_full),
            ("principal-signer-short", &self.principal_signer_short),
            ("acting-word", &self.acting_word),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(AddendumError::MissingParameter(name));
            }
            if let Some(c) = unencodable_char(value) {
                return Err(AddendumError::UnencodableChar {
                    location: format!("parameter '{name}'"),
                    code: c.into(),
                });
            }
        }
        Ok(())
    }
}
