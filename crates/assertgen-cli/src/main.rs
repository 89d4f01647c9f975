//! Assertion class generator CLI.
//!
//! Provides the `assertgen` binary. The `generate` subcommand loads a JSON
//! type catalog, selects types from it and writes their assertion classes
//! and entry points through `assertgen_codegen::generate()`.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use assertgen_codegen::{EntryPointMode, GenError, GenerationOptions, TemplateError};
use assertgen_core::{CoreError, InMemoryCatalog};

/// Assertion class generator.
#[derive(Parser)]
#[command(name = "assertgen", about = "Generates assertion classes from a type catalog")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Generate assertion classes for types of a catalog.
    Generate {
        /// Path to the JSON type catalog.
        #[arg(short, long)]
        catalog: PathBuf,

        /// Qualified type or package name (repeatable; default: every public type).
        #[arg(short = 't', long = "type")]
        types: Vec<String>,

        /// Root directory of the generated sources.
        #[arg(
            short,
            long,
            env = "ASSERTGEN_OUTPUT_DIR",
            default_value = "./generated-assertions/"
        )]
        output_dir: PathBuf,

        /// Package for every generated class (default: the subject's package).
        #[arg(short, long)]
        package: Option<String>,

        /// Generate abstract/concrete class pairs.
        #[arg(long)]
        hierarchical: bool,

        /// Entry point to generate: standard, bdd, soft, junit-soft,
        /// auto-closeable-soft, bdd-soft, junit-bdd-soft, auto-closeable-bdd-soft.
        #[arg(short, long = "entry-point", default_value = "standard")]
        entry_points: Vec<EntryPointMode>,

        /// Directory of template files overriding the built-in ones.
        #[arg(long, env = "ASSERTGEN_TEMPLATES")]
        templates: Option<PathBuf>,

        /// Marker opting members into generation regardless of their name.
        #[arg(short, long)]
        marker: Option<String>,

        /// Also assert on non-public fields.
        #[arg(long)]
        include_non_public_fields: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            catalog,
            types,
            output_dir,
            package,
            hierarchical,
            entry_points,
            templates,
            marker,
            include_non_public_fields,
        } => {
            let options = GenerationOptions {
                types,
                output_dir,
                package,
                hierarchical,
                entry_points,
                templates_dir: templates,
                marker,
                include_non_public_fields,
            };
            let exit_code = run_generate(&catalog, &options);
            process::exit(exit_code);
        }
    }
}

/// Execute the generate subcommand.
///
/// Returns exit code: 0 = success, 1 = generation error,
/// 2 = invalid input, 3 = I/O error.
fn run_generate(catalog_path: &Path, options: &GenerationOptions) -> i32 {
    let json = match std::fs::read_to_string(catalog_path) {
        Ok(json) => json,
        Err(e) => {
            eprintln!(
                "Error: failed to read catalog '{}': {}",
                catalog_path.display(),
                e
            );
            return 3;
        }
    };

    let catalog = match InMemoryCatalog::from_json(&json) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 2;
        }
    };
    tracing::debug!(types = catalog.len(), "loaded catalog");

    match assertgen_codegen::generate(&catalog, options) {
        Ok(report) => {
            let json = serde_json::to_string_pretty(&report).unwrap_or_else(|e| {
                format!("{{\"error\": \"failed to serialize report: {}\"}}", e)
            });
            println!("{}", json);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            exit_code(&e)
        }
    }
}

fn exit_code(error: &GenError) -> i32 {
    match error {
        e if e.is_io() => 3,
        GenError::Core(_) | GenError::Template(TemplateError::InvalidRole { .. }) => 2,
        GenError::Template(TemplateError::NotFound { .. })
        | GenError::Template(TemplateError::IsDirectory { .. }) => 3,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assertgen_codegen::TemplateRole;
    use assertgen_core::{MethodShape, TypeName, TypeRef, TypeShape};
    use clap::CommandFactory;

    fn write_catalog(dir: &Path) -> PathBuf {
        let catalog = InMemoryCatalog::new().with(
            TypeShape::class(TypeName::new("com.acme", "Player"))
                .with_method(MethodShape::accessor("getName", TypeRef::parse("java.lang.String").unwrap())),
        );
        let path = dir.join("catalog.json");
        std::fs::write(&path, catalog.to_json().unwrap()).unwrap();
        path
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_repeated_types_and_entry_points() {
        let cli = Cli::try_parse_from([
            "assertgen",
            "generate",
            "--catalog",
            "types.json",
            "--type",
            "com.acme.Player",
            "--type",
            "com.acme.team",
            "--entry-point",
            "bdd",
            "--entry-point",
            "junit-soft",
            "--hierarchical",
        ])
        .unwrap();
        let Commands::Generate {
            types,
            entry_points,
            hierarchical,
            ..
        } = cli.command;
        assert_eq!(types, vec!["com.acme.Player", "com.acme.team"]);
        assert_eq!(
            entry_points,
            vec![EntryPointMode::Bdd, EntryPointMode::JUnitSoft]
        );
        assert!(hierarchical);
    }

    #[test]
    fn rejects_unknown_entry_point() {
        assert!(Cli::try_parse_from([
            "assertgen",
            "generate",
            "--catalog",
            "types.json",
            "--entry-point",
            "loud",
        ])
        .is_err());
    }

    #[test]
    fn generate_writes_files_and_succeeds() {
        let tmp = tempfile::tempdir().unwrap();
        let catalog = write_catalog(tmp.path());
        let options = GenerationOptions {
            output_dir: tmp.path().join("out"),
            ..GenerationOptions::default()
        };
        assert_eq!(run_generate(&catalog, &options), 0);
        assert!(tmp.path().join("out/com/acme/PlayerAssert.java").is_file());
        assert!(tmp.path().join("out/com/acme/Assertions.java").is_file());
    }

    #[test]
    fn missing_catalog_is_an_io_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let options = GenerationOptions::default();
        assert_eq!(run_generate(&tmp.path().join("absent.json"), &options), 3);
    }

    #[test]
    fn malformed_catalog_and_unknown_type_are_invalid_input() {
        let tmp = tempfile::tempdir().unwrap();
        let bad = tmp.path().join("bad.json");
        std::fs::write(&bad, "{ not json").unwrap();
        assert_eq!(run_generate(&bad, &GenerationOptions::default()), 2);

        let catalog = write_catalog(tmp.path());
        let options = GenerationOptions {
            output_dir: tmp.path().join("out"),
            types: vec!["com.acme.Missing".to_string()],
            ..GenerationOptions::default()
        };
        assert_eq!(run_generate(&catalog, &options), 2);
    }

    #[test]
    fn exit_codes_by_error_kind() {
        let missing = GenError::MissingTemplate {
            role: TemplateRole::Has,
        };
        assert_eq!(exit_code(&missing), 1);

        let role = GenError::Template(TemplateError::InvalidRole {
            name: "BOGUS".to_string(),
        });
        assert_eq!(exit_code(&role), 2);

        let not_found = GenError::Template(TemplateError::NotFound {
            path: PathBuf::from("/nope"),
        });
        assert_eq!(exit_code(&not_found), 3);

        let core = GenError::Core(CoreError::ClassNotFound {
            name: "com.acme.Missing".to_string(),
        });
        assert_eq!(exit_code(&core), 2);
    }
}
