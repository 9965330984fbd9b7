#[cfg(test)]
mod tests {
    use crate::config::AddendumConfig;
    use crate::pipeline::{resolve_params, run_pipeline, save_document, Args, CliError, Outcome};
    use addendum::{
        AddendumError, AgreementKind, ErrorKind, OutputDocument, ParagraphKind, ParagraphSpec,
        ParagraphStyle, ReferenceDocument,
    };
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Create a new temporary directory for each test
    fn setup_test_dir() -> TempDir {
        TempDir::new().unwrap()
    }

    /// A reference `.docx` with `count` paragraphs of filler text.
    fn write_reference(dir: &Path, count: usize) -> PathBuf {
        let mut doc = OutputDocument::default();
        for i in 0..count {
            doc.append(ParagraphSpec::new(
                ParagraphKind::Body,
                format!("Абзац {i}"),
                ParagraphStyle::default(),
            ));
        }
        let path = dir.join("template.docx");
        fs::write(&path, addendum::docx::to_bytes(&doc).unwrap()).unwrap();
        path
    }

    fn full_args(template: PathBuf, output: PathBuf) -> Args {
        Args {
            template: Some(template),
            output: Some(output),
            ds_no: Some("2".into()),
            agreement_no: Some("AG-1".into()),
            agreement_date: Some("01.02.2023".into()),
            sign_date: Some("10.03.2024".into()),
            principal_full: Some("ООО «Луч»".into()),
            principal_short: Some("ООО «Луч»".into()),
            principal_position_intro: Some("Директора".into()),
            principal_position_sign: Some("Директор".into()),
            principal_signer_full: Some("Кузнецова Олега Ивановича".into()),
            principal_signer_short: Some("Кузнецов О.И.".into()),
            // keep tests independent of any addendum.toml in the working dir
            config: None,
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_applied() {
        let args = full_args("t.docx".into(), "o.docx".into());
        let params = resolve_params(&args, &AddendumConfig::default()).unwrap();
        assert_eq!(params.city, "г. Пермь");
        assert_eq!(params.agreement_kind, AgreementKind::Agent);
        assert_eq!(params.acting_word, "действующего");
    }

    #[test]
    fn test_args_override_config() {
        let config = AddendumConfig {
            city: Some("г. Самара".into()),
            agreement_kind: Some(AgreementKind::Contract),
            acting_word: Some("действующей".into()),
            ..Default::default()
        };

        let mut args = full_args("t.docx".into(), "o.docx".into());
        let params = resolve_params(&args, &config).unwrap();
        assert_eq!(params.city, "г. Самара");
        assert_eq!(params.agreement_kind, AgreementKind::Contract);
        assert_eq!(params.acting_word, "действующей");

        args.city = Some("г. Пермь".into());
        args.agreement_kind = Some("agent".into());
        let params = resolve_params(&args, &config).unwrap();
        assert_eq!(params.city, "г. Пермь");
        assert_eq!(params.agreement_kind, AgreementKind::Agent);
    }

    #[test]
    fn test_missing_parameter() {
        let mut args = full_args("t.docx".into(), "o.docx".into());
        args.principal_signer_short = None;
        match resolve_params(&args, &AddendumConfig::default()) {
            Err(AddendumError::MissingParameter(name)) => {
                assert_eq!(name, "principal-signer-short")
            }
            other => panic!("Expected MissingParameter, got: {:?}", other),
        }
    }

    #[test]
    fn test_bad_date_is_malformed_input() {
        let mut args = full_args("t.docx".into(), "o.docx".into());
        args.sign_date = Some("10.13.2024".into());
        let err = resolve_params(&args, &AddendumConfig::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn test_full_pipeline() -> Result<(), Box<dyn std::error::Error>> {
        let temp = setup_test_dir();
        let template = write_reference(temp.path(), 22);
        // nested directories must be created by the pipeline
        let output = temp.path().join("out/clients/ds2.docx");

        let outcome = run_pipeline(full_args(template, output.clone()))?;
        assert_eq!(outcome, Outcome::Written(output.clone()));

        let written = ReferenceDocument::open(&output)?;
        assert_eq!(written.paragraphs()[0], "Дополнительное соглашение № 2");
        assert_eq!(written.paragraphs()[4], "Абзац 6");
        assert_eq!(
            written.paragraphs()[1],
            "к агентскому договору № AG-1 от 01.02.2023."
        );
        Ok(())
    }

    #[test]
    fn test_output_without_parent_component() -> Result<(), Box<dyn std::error::Error>> {
        let temp = setup_test_dir();
        let template = write_reference(temp.path(), 0);
        let output = temp.path().join("ds.docx");

        run_pipeline(full_args(template, output.clone()))?;
        assert!(output.is_file());

        // no temporary files left next to the output
        let entries: Vec<_> = fs::read_dir(temp.path())?.collect::<Result<_, _>>()?;
        assert_eq!(entries.len(), 2);
        Ok(())
    }

    #[test]
    fn test_missing_template_file() {
        let temp = setup_test_dir();
        let output = temp.path().join("ds.docx");
        let args = full_args(temp.path().join("nope.docx"), output.clone());

        match run_pipeline(args) {
            Err(e @ CliError::Addendum { .. }) => {
                assert!(matches!(
                    e.addendum(),
                    Some(AddendumError::ReferenceOpen { .. })
                ));
            }
            other => panic!("Expected reference open error, got: {:?}", other),
        }
        assert!(!output.exists());
    }

    #[test]
    fn test_missing_template_argument() {
        let temp = setup_test_dir();
        let mut args = full_args("unused".into(), temp.path().join("ds.docx"));
        args.template = None;
        args.config = Some(write_config(temp.path(), "city = \"г. Уфа\"\n"));

        match run_pipeline(args) {
            Err(e) => assert!(matches!(
                e.addendum(),
                Some(AddendumError::MissingParameter("template"))
            )),
            Ok(outcome) => panic!("Expected failure, got: {:?}", outcome),
        }
    }

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("addendum.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_template_from_config() -> Result<(), Box<dyn std::error::Error>> {
        let temp = setup_test_dir();
        let template = write_reference(temp.path(), 22);
        let config = write_config(
            temp.path(),
            &format!(
                "template = {:?}\ncity = \"г. Уфа\"\n\n\
                 [agent]\nsigner_short = \"Петров П.П.\"\n",
                template.to_string_lossy()
            ),
        );

        let mut args = full_args("unused".into(), temp.path().join("ds.docx"));
        args.template = None;
        args.config = Some(config);
        run_pipeline(args)?;

        let written = ReferenceDocument::open(temp.path().join("ds.docx"))?;
        assert!(written.paragraphs()[2].starts_with("г. Уфа\t"));
        assert_eq!(
            written.paragraphs().last().map(String::as_str),
            Some("Кузнецов О.И.\tПетров П.П.")
        );
        Ok(())
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let temp = setup_test_dir();
        let mut args = full_args("t.docx".into(), temp.path().join("ds.docx"));
        args.config = Some(temp.path().join("missing.toml"));
        assert!(matches!(run_pipeline(args), Err(CliError::Config(_))));
    }

    #[test]
    fn test_dump_clauses() -> Result<(), Box<dyn std::error::Error>> {
        let temp = setup_test_dir();
        let template = write_reference(temp.path(), 10);
        let args = Args {
            template: Some(template),
            dump_clauses: true,
            ..Default::default()
        };

        let Outcome::Dumped(json) = run_pipeline(args)? else {
            panic!("expected a clause dump");
        };
        let value: serde_json::Value = serde_json::from_str(&json)?;
        assert_eq!(value["h1"]["text"], "Абзац 6");
        assert_eq!(value["h1"]["source"], "reference");
        assert_eq!(value["h2"]["source"], "fallback");
        assert_eq!(value.as_object().map(|o| o.len()), Some(15));
        Ok(())
    }

    #[cfg(unix)]
    fn mode(path: &Path) -> u32 {
        use std::os::unix::fs::PermissionsExt;
        fs::metadata(path).unwrap().permissions().mode() & 0o777
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_file_has_regular_permissions() -> Result<(), Box<dyn std::error::Error>> {
        let temp = setup_test_dir();
        let output = temp.path().join("ds.docx");
        save_document(&OutputDocument::default(), &output)?;

        let plain = temp.path().join("plain.bin");
        fs::write(&plain, b"plain")?;

        assert_eq!(mode(&output), mode(&plain));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_overwrite_keeps_existing_permissions() -> Result<(), Box<dyn std::error::Error>> {
        use std::os::unix::fs::PermissionsExt;

        let temp = setup_test_dir();
        let output = temp.path().join("ds.docx");
        fs::write(&output, b"previous version")?;
        fs::set_permissions(&output, fs::Permissions::from_mode(0o640))?;

        save_document(&OutputDocument::default(), &output)?;

        assert_eq!(mode(&output), 0o640);
        assert!(ReferenceDocument::open(&output)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_unencodable_parameter_rejected() {
        let temp = setup_test_dir();
        let template = write_reference(temp.path(), 22);
        let output = temp.path().join("ds.docx");
        let mut args = full_args(template, output.clone());
        args.principal_full = Some("ООО\u{b}«Луч»".into());

        match run_pipeline(args) {
            Err(e) => assert!(matches!(
                e.addendum(),
                Some(AddendumError::UnencodableChar { code: 0x0B, .. })
            )),
            Ok(outcome) => panic!("Expected failure, got: {:?}", outcome),
        }
        assert!(!output.exists());
    }
}
