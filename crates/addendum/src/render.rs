// src/render.rs
//
// Builds the addendum as a declarative list of paragraph specs, then appends
// them to a fresh document in order.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::clauses::{ClauseKey, ClauseMap};
use crate::document::{
    Alignment, DocumentDefaults, OutputDocument, ParagraphKind, ParagraphSpec, ParagraphStyle,
    TabStop,
};
use crate::locale::{agreement_label, format_ru_date, format_ru_date_short};
use crate::params::{AgentParty, ParameterSet};

lazy_static! {
    static ref LINE_BREAKS: Regex = Regex::new(r"[\n\r]+").expect("Invalid line break pattern");
}

pub const TITLE_PREFIX: &str = "Дополнительное соглашение № ";
pub const SIGNATURE_PLACEHOLDER: &str = "____________ М.П.";

/// Right tab stop for the date on the city line, near the right margin.
const CITY_DATE_TAB_CM: f32 = 16.5;
/// Left edge of the agent column in the signature block.
const SIGNATURE_COLUMN_CM: f32 = 8.8;

/// Splits the bullets clause into items: one per non-blank line, with dash
/// markers and surrounding whitespace removed.
pub fn split_bullets(text: &str) -> Vec<String> {
    LINE_BREAKS
        .split(text)
        .map(|line| line.trim_matches(|c| matches!(c, ' ' | '-' | '—' | '\t')))
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn title(text: String, size: f32, after: f32, bold: bool) -> ParagraphSpec {
    ParagraphSpec::new(
        if bold {
            ParagraphKind::Title
        } else {
            ParagraphKind::Subtitle
        },
        text,
        ParagraphStyle::default()
            .align(Alignment::Center)
            .bold(bold)
            .size(size)
            .after(after)
            .no_indent(),
    )
}

fn heading(text: &str) -> ParagraphSpec {
    ParagraphSpec::new(
        ParagraphKind::Heading,
        text,
        ParagraphStyle::default()
            .align(Alignment::Left)
            .bold(true)
            .before(8.0)
            .after(4.0)
            .no_indent(),
    )
}

fn body(text: impl Into<String>, after: f32) -> ParagraphSpec {
    ParagraphSpec::new(
        ParagraphKind::Body,
        text,
        ParagraphStyle::default().after(after).no_indent(),
    )
}

fn bullet(item: &str) -> ParagraphSpec {
    ParagraphSpec::new(
        ParagraphKind::Bullet,
        format!("• {item}"),
        ParagraphStyle::default().after(2.0).no_indent(),
    )
}

fn signature_row(left: &str, right: &str, bold: bool, after: f32) -> ParagraphSpec {
    ParagraphSpec::new(
        ParagraphKind::SignatureRow,
        format!("{left}\t{right}"),
        ParagraphStyle::default()
            .align(Alignment::Left)
            .bold(bold)
            .after(after)
            .no_indent()
            .tab(TabStop::left(SIGNATURE_COLUMN_CM)),
    )
}

fn intro(params: &ParameterSet, agent: &AgentParty) -> String {
    format!(
        "{agent_name}, {named} в дальнейшем «Агент», с одной стороны, \
         и {full}, в лице {position} {signer}, {acting} на основании Устава, \
         именуемое, в дальнейшем «Принципал», с другой стороны, совместно именуемые \
         «Стороны», заключили настоящее Дополнительное соглашение №{ds_no} \
         (далее - Соглашение) о нижеследующем:",
        agent_name = agent.intro_name,
        named = agent.named_word,
        full = params.principal_full,
        position = params.principal_position_intro,
        signer = params.principal_signer_full,
        acting = params.acting_word,
        ds_no = params.ds_no,
    )
}

/// Clause 1.1 names the amended agreement, so it is composed rather than
/// taken from the reference document.
fn subject_clause(params: &ParameterSet) -> String {
    format!(
        "1.1. Настоящее Дополнительное соглашение регулирует порядок расчётов и оказания \
         услуг по сопровождению обязательной маркировки рекламы (далее — «Услуги \
         маркировки») в рамках {genitive} №\u{202f}{number} от {date} (далее — «Договор»).",
        genitive = agreement_label(params.agreement_kind).genitive,
        number = params.agreement_no,
        date = format_ru_date_short(&params.agreement_date),
    )
}

/// The full paragraph sequence of the addendum, in document order.
pub fn paragraph_specs(
    clauses: &ClauseMap,
    params: &ParameterSet,
    agent: &AgentParty,
) -> Vec<ParagraphSpec> {
    let label = agreement_label(params.agreement_kind);
    let mut specs = vec![
        title(format!("{TITLE_PREFIX}{}", params.ds_no), 14.0, 6.0, true),
        title(
            format!(
                "к {} № {} от {}.",
                label.dative, params.agreement_no, params.agreement_date
            ),
            12.0,
            10.0,
            false,
        ),
        ParagraphSpec::new(
            ParagraphKind::CityDate,
            format!("{}\t{}", params.city, format_ru_date(&params.sign_date)),
            ParagraphStyle::default()
                .align(Alignment::Left)
                .after(8.0)
                .no_indent()
                .tab(TabStop::right(CITY_DATE_TAB_CM)),
        ),
        ParagraphSpec::new(
            ParagraphKind::Body,
            intro(params, agent),
            ParagraphStyle::default().after(8.0),
        ),
        heading(clauses.get(ClauseKey::H1)),
        body(subject_clause(params), 4.0),
        body(clauses.get(ClauseKey::P12), 3.0),
    ];

    specs.extend(
        split_bullets(clauses.get(ClauseKey::Bullets))
            .iter()
            .map(|item| bullet(item)),
    );

    specs.extend([
        heading(clauses.get(ClauseKey::H2)),
        body(clauses.get(ClauseKey::P21), 3.0),
        body(clauses.get(ClauseKey::P22), 3.0),
        body(clauses.get(ClauseKey::P23), 6.0),
        heading(clauses.get(ClauseKey::H3)),
        body(clauses.get(ClauseKey::P31), 3.0),
        body(clauses.get(ClauseKey::P32), 6.0),
        heading(clauses.get(ClauseKey::H4)),
        body(clauses.get(ClauseKey::P41), 3.0),
        body(clauses.get(ClauseKey::P42), 3.0),
        body(clauses.get(ClauseKey::P43), 8.0),
        heading(clauses.get(ClauseKey::H5)),
        signature_row("Принципал", "Агент", true, 4.0),
        signature_row(&params.principal_short, &agent.sign_name, false, 2.0),
        signature_row(
            &params.principal_position_sign,
            &agent.sign_position,
            false,
            8.0,
        ),
        signature_row(SIGNATURE_PLACEHOLDER, SIGNATURE_PLACEHOLDER, false, 2.0),
        signature_row(
            &params.principal_signer_short,
            &agent.signer_short,
            false,
            0.0,
        ),
    ]);

    specs
}

/// Renders the addendum into a new document with the standard page setup.
pub fn render(clauses: &ClauseMap, params: &ParameterSet, agent: &AgentParty) -> OutputDocument {
    let mut doc = OutputDocument::new(DocumentDefaults::default());
    doc.extend(paragraph_specs(clauses, params, agent));
    debug!("rendered {} paragraphs", doc.paragraphs().len());
    doc
}
