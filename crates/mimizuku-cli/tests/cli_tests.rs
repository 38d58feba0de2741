//! Tests for the cli crate

use clap::Parser;
use mimizuku_cli::commands::{Cli, CommandExecutor, Commands, OutputFormat};
use std::fs;
use std::path::PathBuf;
use tempfile::NamedTempFile;

const SHOP_MODEL: &str = r#"{
    "package": "shop",
    "classes": [
        {
            "name": "Order",
            "attributes": [{ "name": "total", "type": "EDouble", "lower_bound": 1, "upper_bound": 1 }],
            "references": [{ "name": "items", "target": "Item", "opposite": "order", "lower_bound": 0, "upper_bound": -1 }],
            "annotations": [{
                "source": "http://www.eclipse.org/emf/2002/Ecore/OCL/Pivot",
                "details": [{ "key": "hasItems", "value": "self.items->notEmpty()" }]
            }]
        },
        {
            "name": "Item",
            "references": [{ "name": "order", "target": "Order", "opposite": "items", "lower_bound": 1, "upper_bound": 1 }]
        }
    ]
}"#;

fn temp_file(content: &str) -> NamedTempFile {
    let file = NamedTempFile::new().unwrap();
    fs::write(&file, content).unwrap();
    file
}

#[test]
fn test_cli_parsing_compile() {
    let args = vec!["mimizuku", "compile", "model.json", "--extend", "objects.json", "--format", "json-pretty", "--short"];
    let cli = Cli::try_parse_from(args).unwrap();

    assert!(!cli.verbose);
    match cli.command {
        Commands::Compile {
            model,
            extend,
            config,
            format,
            short,
            output,
        } => {
            assert_eq!(model, PathBuf::from("model.json"));
            assert_eq!(extend, Some(PathBuf::from("objects.json")));
            assert_eq!(config, None);
            assert_eq!(format, OutputFormat::JsonPretty);
            assert!(short);
            assert_eq!(output, None);
        }
        _ => panic!("Expected Compile command"),
    }
}

#[test]
fn test_cli_parsing_check_with_verbose() {
    let args = vec!["mimizuku", "check", "model.json", "--verbose"];
    let cli = Cli::try_parse_from(args).unwrap();

    assert!(cli.verbose);
    match cli.command {
        Commands::Check { model, format } => {
            assert_eq!(model, PathBuf::from("model.json"));
            assert_eq!(format, OutputFormat::Text); // Default
        }
        _ => panic!("Expected Check command"),
    }
}

#[test]
fn test_cli_parsing_normalize() {
    let args = vec!["mimizuku", "normalize", "self.items->isEmpty()", "--max-iterations", "4"];
    let cli = Cli::try_parse_from(args).unwrap();

    match cli.command {
        Commands::Normalize {
            expression,
            max_iterations,
        } => {
            assert_eq!(expression, "self.items->isEmpty()");
            assert_eq!(max_iterations, 4);
        }
        _ => panic!("Expected Normalize command"),
    }
}

#[test]
fn test_cli_parsing_explain_config() {
    let cli = Cli::try_parse_from(vec!["mimizuku", "explain-config"]).unwrap();
    assert!(matches!(cli.command, Commands::ExplainConfig));
}

#[test]
fn test_cli_parsing_rejects_unknown_format() {
    let args = vec!["mimizuku", "compile", "model.json", "--format", "xml"];
    assert!(Cli::try_parse_from(args).is_err());
}

#[test]
fn test_cli_parsing_requires_model() {
    assert!(Cli::try_parse_from(vec!["mimizuku", "compile"]).is_err());
}

#[test]
fn test_compile_writes_text_output() {
    let model = temp_file(SHOP_MODEL);
    let output = NamedTempFile::new().unwrap();

    let result = CommandExecutor::new()
        .execute(Commands::Compile {
            model: model.path().to_path_buf(),
            extend: None,
            config: None,
            format: OutputFormat::Text,
            short: true,
            output: Some(output.path().to_path_buf()),
        })
        .unwrap();

    assert!(result.success);
    let text = fs::read_to_string(output.path()).unwrap();
    assert!(text.starts_with("Ontology urn:mimizuku:ontology"));
    assert!(text.contains("Order::hasItems emitted"));
    let axioms = text.split("Axioms:").nth(1).unwrap();
    assert!(!axioms.is_empty());
    assert!(!axioms.contains("urn:mimizuku:ontology#"));
    assert_eq!(result.data.unwrap()["skipped_constraints"], 0);
}

#[test]
fn test_compile_json_with_instances_and_config() {
    let model = temp_file(SHOP_MODEL);
    let config = temp_file(r#"{ "ontology_iri": "urn:shop", "inheritance": "disjoint_covering" }"#);
    let instances = temp_file(
        r#"{
            "objects": [{ "id": "o1", "class": "Order" }, { "id": "i1", "class": "Item" }],
            "links": [{ "source": "o1", "reference": "items", "targets": ["i1"] }]
        }"#,
    );
    let output = NamedTempFile::new().unwrap();

    let result = CommandExecutor::new()
        .execute(Commands::Compile {
            model: model.path().to_path_buf(),
            extend: Some(instances.path().to_path_buf()),
            config: Some(config.path().to_path_buf()),
            format: OutputFormat::Json,
            short: false,
            output: Some(output.path().to_path_buf()),
        })
        .unwrap();

    assert!(result.success);
    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(output.path()).unwrap()).unwrap();
    assert_eq!(json["ontology"], "urn:shop");
    assert_eq!(json["constraints"][0]["outcome"]["status"], "emitted");
    let axioms = json["axioms"].as_array().unwrap();
    assert!(axioms.iter().any(|a| a.as_str().unwrap().contains("urn:shop#shopo1object")));
}

#[test]
fn test_compile_fails_on_fatal_model_error() {
    let model = temp_file(&SHOP_MODEL.replace(r#""opposite": "order", "#, ""));

    let result = CommandExecutor::new().execute(Commands::Compile {
        model: model.path().to_path_buf(),
        extend: None,
        config: None,
        format: OutputFormat::Text,
        short: false,
        output: None,
    });

    let error = result.err().unwrap();
    assert!(format!("{:#}", error).contains("has no opposite"));
}

#[test]
fn test_compile_missing_file_is_an_error() {
    let result = CommandExecutor::new().execute(Commands::Compile {
        model: PathBuf::from("/nonexistent/model.json"),
        extend: None,
        config: None,
        format: OutputFormat::Json,
        short: false,
        output: None,
    });
    assert!(result.is_err());
}

#[test]
fn test_check_reports_repairs() {
    let model = temp_file(&SHOP_MODEL.replace(r#""name": "total""#, r#""name": null"#));

    let result = CommandExecutor::new()
        .execute(Commands::Check {
            model: model.path().to_path_buf(),
            format: OutputFormat::Text,
        })
        .unwrap();

    assert!(result.success);
    let diagnostics = result.data.unwrap()["diagnostics"].clone();
    assert_eq!(
        diagnostics[0],
        "There was a nameless Attribute, the name attribute_0 was assigned to this execution"
    );
}

#[test]
fn test_normalize_reports_rounds() {
    let result = CommandExecutor::new()
        .execute(Commands::Normalize {
            expression: "self.children->forAll(c | c.active)".to_string(),
            max_iterations: 16,
        })
        .unwrap();

    let data = result.data.unwrap();
    assert_eq!(data["text"], "self.children->select(c | not c.active)->isEmpty()");
    assert_eq!(data["rounds"], 1);
}

#[test]
fn test_normalize_parse_error() {
    let result = CommandExecutor::new().execute(Commands::Normalize {
        expression: "self.children->".to_string(),
        max_iterations: 16,
    });
    assert!(result.is_err());
}

#[test]
fn test_explain_config_matches_defaults() {
    let result = CommandExecutor::new().execute(Commands::ExplainConfig).unwrap();
    let data = result.data.unwrap();

    assert_eq!(data["ontology_iri"], "urn:mimizuku:ontology");
    assert_eq!(data["inheritance"], "plain");
    assert_eq!(data["max_fixpoint_iterations"], 16);
}
