use anyhow::Result;
use scopedoc::io::ExitCode;
use scopedoc::parsing::default_registry;
use scopedoc::{DocExtractor, ExtractError, ParseOptions, Settings, parse_files};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const WIDGETS: &str = r#"/**
 * Widget helpers.
 * @module
 */

/** Makes a widget. */
function make() {}
"#;

#[test]
fn test_parse_file_uses_file_name_as_id() -> Result<()> {
    println!("\n=== TEST: parse_file names the module after the file ===");

    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("widgets.js");
    fs::write(&path, WIDGETS)?;

    let mut extractor = DocExtractor::new()?;
    let output = extractor.parse_file(&path, &ParseOptions::default())?;

    assert_eq!(output.tree.id.as_deref(), Some("widgets.js"));
    assert_eq!(output.tree.name.as_deref(), Some("widgets"));
    assert_eq!(output.tree.document.doc, "Widget helpers.");
    assert!(output.tree.child("make").is_some());

    // An explicit id wins over the file name
    let output = extractor.parse_file(&path, &ParseOptions::default().with_id("gadgets"))?;
    assert_eq!(output.tree.name.as_deref(), Some("gadgets"));

    Ok(())
}

#[test]
fn test_parse_file_rejects_unknown_extension() -> Result<()> {
    println!("\n=== TEST: Unsupported extensions ===");

    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("notes.txt");
    fs::write(&path, "/** Not code. */\nvar a;")?;

    let mut extractor = DocExtractor::new()?;
    let err = extractor
        .parse_file(&path, &ParseOptions::default())
        .expect_err("txt is not a JavaScript extension");

    assert!(matches!(err, ExtractError::UnsupportedFileType { ref extension, .. } if extension == "txt"));
    assert_eq!(ExitCode::from_error(&err), ExitCode::UnsupportedOperation);

    // No configured extensions accepts any file
    let permissive = ParseOptions {
        extensions: Vec::new(),
        ..ParseOptions::default()
    };
    let output = extractor.parse_file(&path, &permissive)?;
    assert!(output.tree.child("a").is_some());

    Ok(())
}

#[test]
fn test_parse_files_isolates_failures() -> Result<()> {
    println!("\n=== TEST: Batch extraction ===");

    let temp_dir = TempDir::new()?;
    let widgets = temp_dir.path().join("widgets.js");
    let gadgets = temp_dir.path().join("gadgets.js");
    let missing = temp_dir.path().join("missing.js");
    fs::write(&widgets, WIDGETS)?;
    fs::write(&gadgets, "/** Gadget. */\nvar gadget = {};\n")?;

    let paths: Vec<PathBuf> = vec![widgets.clone(), missing.clone(), gadgets.clone()];
    let results = parse_files(&paths, &ParseOptions::default().with_id("ignored"), default_registry());

    assert_eq!(results.len(), 3);
    let returned: Vec<&PathBuf> = results.iter().map(|(path, _)| path).collect();
    assert_eq!(returned, vec![&widgets, &missing, &gadgets]);

    let widgets_tree = &results[0].1.as_ref().expect("widgets extracts").tree;
    assert_eq!(widgets_tree.name.as_deref(), Some("widgets"));
    assert!(widgets_tree.child("make").is_some());
    assert!(widgets_tree.child("gadget").is_none());

    let err = results[1].1.as_ref().expect_err("missing file fails");
    assert!(matches!(err, ExtractError::FileRead { .. }));
    assert_eq!(ExitCode::from_error(err), ExitCode::NotFound);

    let gadgets_tree = &results[2].1.as_ref().expect("gadgets extracts").tree;
    assert_eq!(gadgets_tree.id.as_deref(), Some("gadgets.js"));
    assert_eq!(gadgets_tree.child("gadget").unwrap().document.doc, "Gadget.");

    Ok(())
}

#[test]
fn test_settings_drive_parse_options() -> Result<()> {
    println!("\n=== TEST: Settings feed ParseOptions ===");

    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("settings.toml");
    fs::write(
        &config_path,
        "tab_width = 2\nextensions = [\"js\"]\n\n[parsing]\nreport_orphans = false\n",
    )?;

    let settings = Settings::load_from(&config_path).map_err(|e| anyhow::anyhow!("{e}"))?;
    let options = ParseOptions::from_settings(&settings);
    assert_eq!(options.tab_width, 2);
    assert_eq!(options.extensions, vec!["js".to_string()]);
    assert!(!options.report_orphans);

    // Tab width 2: a tab counts as two spaces of margin
    let code = "/** leader\n\t   - hi\n*/\nvar a;\n/** Orphan. */\n";
    let output = DocExtractor::new()?.parse_module(code, &options)?;
    assert_eq!(output.tree.child("a").unwrap().document.doc, "leader\n - hi");
    assert!(output.tree.document.errors.is_empty());

    Ok(())
}

#[test]
fn test_syntax_errors_are_recovered_unless_strict() -> Result<()> {
    println!("\n=== TEST: Syntax error handling ===");

    let code = "/** Kept. */\nvar kept = 1;\n%%%;\n";

    let output = DocExtractor::new()?.parse_module(code, &ParseOptions::default())?;
    assert!(output.tree.child("kept").is_some());
    assert!(!output.diagnostics.is_empty());

    let strict = ParseOptions {
        strict_syntax: true,
        ..ParseOptions::default()
    };
    assert!(DocExtractor::new()?.parse_module(code, &strict).is_err());

    Ok(())
}
