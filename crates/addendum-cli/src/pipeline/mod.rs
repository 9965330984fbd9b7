// crates/addendum-cli/src/pipeline/mod.rs
use crate::config::{AddendumConfig, ConfigError};
use crate::{try_core, try_mkdir, try_write};
use addendum::params::{DEFAULT_ACTING_WORD, DEFAULT_CITY};
use addendum::{
    check_backend, extract_clauses, render, AddendumError, OutputDocument,
    ParameterSet, ReferenceDocument, RuDate,
};
use clap::Parser;
use log::{info, warn};
use std::backtrace::Backtrace;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

#[macro_use]
mod error_macros;

#[cfg(test)]
mod tests;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("{source}")]
    Addendum {
        source: AddendumError,
        backtrace: Backtrace,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to create directory {path:?}: {source}")]
    CreateDirError {
        path: PathBuf,
        source: std::io::Error,
        backtrace: Backtrace,
    },

    #[error("Failed to write file {path:?}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
        backtrace: Backtrace,
    },

    #[error("Failed to encode clause map: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// The underlying library error, if the failure came from the pipeline core.
    pub fn addendum(&self) -> Option<&AddendumError> {
        match self {
            CliError::Addendum { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// What a successful run produced.
#[derive(Debug, PartialEq)]
pub enum Outcome {
    /// The addendum was saved at this path.
    Written(PathBuf),
    /// `--dump-clauses`: the clause map as pretty JSON.
    Dumped(String),
}

#[derive(Parser, Debug, Default)]
#[command(
    name = "addendum",
    version,
    about = "Generate a marking addendum DOCX from a reference template and client metadata"
)]
pub struct Args {
    /// Reference document with the canonical clause wording
    #[arg(long, help = "Path to template .docx (or `template` in addendum.toml)")]
    pub template: Option<PathBuf>,

    /// Where to save the generated document
    #[arg(long, help = "Output .docx path; parent directories are created")]
    pub output: Option<PathBuf>,

    #[arg(long = "ds-no", help = "Addendum number, e.g. 1, 2")]
    pub ds_no: Option<String>,

    #[arg(
        long = "agreement-kind",
        value_parser = ["agent", "contract"],
        help = "Kind of the amended agreement [default: agent]"
    )]
    pub agreement_kind: Option<String>,

    #[arg(long = "agreement-no", help = "Agreement number, e.g. AG-092023-1880")]
    pub agreement_no: Option<String>,

    #[arg(long = "agreement-date", help = "Agreement date, DD.MM.YYYY")]
    pub agreement_date: Option<String>,

    #[arg(long = "sign-date", help = "Addendum signing date, DD.MM.YYYY")]
    pub sign_date: Option<String>,

    #[arg(long, help = "City on the date line [default: г. Пермь]")]
    pub city: Option<String>,

    #[arg(long = "principal-full", help = "Full legal name in the introduction")]
    pub principal_full: Option<String>,

    #[arg(long = "principal-short", help = "Short name for the signature block")]
    pub principal_short: Option<String>,

    #[arg(
        long = "principal-position-intro",
        help = "Position in genitive case for the introduction, e.g. 'Генерального директора'"
    )]
    pub principal_position_intro: Option<String>,

    #[arg(
        long = "principal-position-sign",
        help = "Position for the signature block, e.g. 'Генеральный директор'"
    )]
    pub principal_position_sign: Option<String>,

    #[arg(long = "principal-signer-full", help = "Signer full name in genitive case")]
    pub principal_signer_full: Option<String>,

    #[arg(long = "principal-signer-short", help = "Signer short name, e.g. Иванов И.И.")]
    pub principal_signer_short: Option<String>,

    #[arg(
        long = "acting-word",
        help = "Word in the introduction: действующего / действующей [default: действующего]"
    )]
    pub acting_word: Option<String>,

    /// Config file path
    #[arg(long, help = "Path to config file (default: ./addendum.toml if present)")]
    pub config: Option<PathBuf>,

    /// Print the extracted clauses as JSON and exit
    #[arg(
        long = "dump-clauses",
        help = "Print extracted clauses as JSON instead of writing a document",
        action = clap::ArgAction::SetTrue
    )]
    pub dump_clauses: bool,
}

fn required(value: &Option<String>, name: &'static str) -> Result<String, AddendumError> {
    value.clone().ok_or(AddendumError::MissingParameter(name))
}

fn required_date(value: &Option<String>, name: &'static str) -> Result<RuDate, AddendumError> {
    required(value, name)?.parse()
}

/// Builds the parameter set: command line first, then the config file, then
/// built-in defaults.
pub fn resolve_params(
    args: &Args,
    config: &AddendumConfig,
) -> Result<ParameterSet, AddendumError> {
    let agreement_kind = match &args.agreement_kind {
        Some(kind) => kind.parse()?,
        None => config.agreement_kind.unwrap_or_default(),
    };

    let params = ParameterSet {
        ds_no: required(&args.ds_no, "ds-no")?,
        agreement_no: required(&args.agreement_no, "agreement-no")?,
        agreement_date: required_date(&args.agreement_date, "agreement-date")?,
        sign_date: required_date(&args.sign_date, "sign-date")?,
        city: args
            .city
            .clone()
            .or_else(|| config.city.clone())
            .unwrap_or_else(|| DEFAULT_CITY.into()),
        agreement_kind,
        principal_full: required(&args.principal_full, "principal-full")?,
        principal_short: required(&args.principal_short, "principal-short")?,
        principal_position_intro: required(
            &args.principal_position_intro,
            "principal-position-intro",
        )?,
        principal_position_sign: required(
            &args.principal_position_sign,
            "principal-position-sign",
        )?,
        principal_signer_full: required(&args.principal_signer_full, "principal-signer-full")?,
        principal_signer_short: required(&args.principal_signer_short, "principal-signer-short")?,
        acting_word: args
            .acting_word
            .clone()
            .or_else(|| config.acting_word.clone())
            .unwrap_or_else(|| DEFAULT_ACTING_WORD.into()),
    };
    params.validate()?;
    Ok(params)
}

pub fn load_config(args: &Args) -> Result<AddendumConfig, ConfigError> {
    match &args.config {
        Some(path) => AddendumConfig::from_required(path),
        None => AddendumConfig::from_nearest(),
    }
}

/// Temporary file next to `output` that ends up with the permissions a plain
/// `File::create` would give: 0666 minus the umask for a new file, the
/// current mode when replacing an existing one.
fn output_tempfile(parent: &Path, output: &Path) -> std::io::Result<NamedTempFile> {
    #[cfg_attr(not(unix), allow(unused_mut))]
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let tmp = builder.tempfile_in(parent)?;
    if let Ok(existing) = fs::metadata(output) {
        tmp.as_file().set_permissions(existing.permissions())?;
    }
    Ok(tmp)
}

/// Saves the document in one step: the package is written to a temporary
/// file next to the target and renamed over it, so a failed run leaves no
/// partial file behind.
pub fn save_document(doc: &OutputDocument, output: &Path) -> Result<(), CliError> {
    let bytes = try_core!(addendum::docx::to_bytes(doc))?;

    let parent = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    try_mkdir!(&parent)?;

    let mut tmp = try_write!(output, output_tempfile(&parent, output))?;
    try_write!(output, tmp.write_all(&bytes))?;
    try_write!(output, tmp.persist(output).map_err(|e| e.error))?;
    Ok(())
}

pub fn run_pipeline(args: Args) -> Result<Outcome, CliError> {
    try_core!(check_backend())?;

    let config = load_config(&args)?;

    let template = try_core!(
        args.template
            .clone()
            .or_else(|| config.template.clone())
            .ok_or(AddendumError::MissingParameter("template"))
    )?;

    if args.dump_clauses {
        let reference = try_core!(ReferenceDocument::open(&template))?;
        let clauses = extract_clauses(&reference);
        return Ok(Outcome::Dumped(serde_json::to_string_pretty(&clauses.to_map())?));
    }

    let params = try_core!(resolve_params(&args, &config))?;
    let output = try_core!(args
        .output
        .clone()
        .ok_or(AddendumError::MissingParameter("output")))?;
    let agent = config.agent.clone().unwrap_or_default();

    info!("reading reference document {:?}", template);
    let reference = try_core!(ReferenceDocument::open(&template))?;
    let clauses = extract_clauses(&reference);
    let fallbacks = clauses.fallback_keys();
    if !fallbacks.is_empty() {
        warn!(
            "{} of {} clauses use built-in text; check that {:?} follows the canonical layout",
            fallbacks.len(),
            addendum::ClauseKey::COUNT,
            template
        );
    }

    let doc = render(&clauses, &params, &agent);
    info!(
        "rendered addendum № {} ({} agreement), {} paragraphs",
        params.ds_no,
        params.agreement_kind,
        doc.paragraphs().len()
    );

    save_document(&doc, &output)?;
    info!("saved {:?}", output);
    Ok(Outcome::Written(output))
}
