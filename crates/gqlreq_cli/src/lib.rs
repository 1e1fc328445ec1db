//! Command-line interface for gqlreq.
//!
//! # Usage
//!
//! ```bash
//! # Generate an SDK from operation documents
//! gqlreq generate src/**/*.graphql -o src/sdk.ts
//!
//! # Reuse graphql-codegen style options from a JSON file
//! gqlreq generate operations.graphql --config sdk.json
//!
//! # Check documents without writing anything
//! gqlreq check operations.graphql
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use gqlreq_codegen::{CodegenError, DocumentMode, SdkConfig, TracingSink};
use gqlreq_core::{Diagnostic, DiagnosticBag, Interner};
use miette::{IntoDiagnostic, WrapErr};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "gqlreq")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DocumentModeArg {
    /// `gql` tagged template literals
    GraphqlTag,
    /// Pre-parsed `DocumentNode` objects
    DocumentNode,
    /// Plain strings
    String,
    /// Documents imported from another module
    External,
}

impl From<DocumentModeArg> for DocumentMode {
    fn from(arg: DocumentModeArg) -> Self {
        match arg {
            DocumentModeArg::GraphqlTag => Self::GraphQLTag,
            DocumentModeArg::DocumentNode => Self::DocumentNode,
            DocumentModeArg::String => Self::String,
            DocumentModeArg::External => Self::External,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a TypeScript SDK from GraphQL operations
    Generate {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// How compiled documents are emitted
        #[arg(long, value_enum)]
        document_mode: Option<DocumentModeArg>,

        /// Use `import type` for type-only imports
        #[arg(long)]
        use_type_imports: bool,

        /// Module exporting the documents in external mode
        #[arg(long)]
        external_from: Option<String>,
    },

    /// Check GraphQL operation files for errors
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
}

pub fn run(cli: Cli) -> miette::Result<i32> {
    match cli.command {
        Commands::Generate {
            files,
            output,
            config,
            document_mode,
            use_type_imports,
            external_from,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(mode) = document_mode {
                config.document_mode = mode.into();
            }
            if use_type_imports {
                config.use_type_imports = true;
            }
            if external_from.is_some() {
                config.import_document_node_externally_from = external_from;
            }
            generate_sdk(&files, output.as_deref(), &config)
        }
        Commands::Check {
            files,
            config,
            strict,
        } => {
            let config = load_config(config.as_deref())?;
            check_files(&files, &config, strict, cli.verbose)
        }
    }
}

/// Loads a JSON config file, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> miette::Result<SdkConfig> {
    let Some(path) = path else {
        return Ok(SdkConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read config {}", path.display()))?;
    SdkConfig::from_json_str(&json)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to load config {}", path.display()))
}

fn read_sources(files: &[PathBuf]) -> miette::Result<Vec<(String, String)>> {
    files
        .iter()
        .map(|file| {
            std::fs::read_to_string(file)
                .into_diagnostic()
                .wrap_err_with(|| format!("failed to read {}", file.display()))
                .map(|source| (file.display().to_string(), source))
        })
        .collect()
}

fn render(diagnostic: &Diagnostic, name: &str, source: &str) {
    let report = miette::Report::new(diagnostic.to_report(name, source));
    eprintln!("{report:?}");
}

/// Joins all inputs so fragments can be shared across files. Diagnostics
/// are named after the file when there is only one.
fn combine(sources: &[(String, String)]) -> (String, String) {
    let combined = sources
        .iter()
        .map(|(_, source)| source.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    let name = match sources {
        [(name, _)] => name.clone(),
        _ => "<combined input>".to_string(),
    };
    (name, combined)
}

fn generate_sdk(files: &[PathBuf], output: Option<&Path>, config: &SdkConfig) -> miette::Result<i32> {
    let sources = read_sources(files)?;
    let (name, combined) = combine(&sources);

    let module = match gqlreq_codegen::generate(&combined, config, &mut TracingSink) {
        Ok(module) => module,
        Err(CodegenError::Syntax { diagnostics }) => {
            eprintln!("{} Parse errors in {}", "Error:".red().bold(), name);
            for diagnostic in diagnostics.errors() {
                render(diagnostic, &name, &combined);
            }
            return Ok(1);
        }
        Err(err) => return Err(err).into_diagnostic(),
    };

    let code = module.to_source();
    match output {
        Some(path) => {
            std::fs::write(path, &code)
                .into_diagnostic()
                .wrap_err_with(|| format!("failed to write {}", path.display()))?;
            println!("{} {}", "Generated".green(), path.display());
        }
        None => print!("{code}"),
    }
    Ok(0)
}

fn check_files(
    files: &[PathBuf],
    config: &SdkConfig,
    strict: bool,
    verbose: bool,
) -> miette::Result<i32> {
    let sources = read_sources(files)?;
    let mut has_errors = false;

    // Syntax errors are reported per file so they point at the right source.
    for (name, source) in &sources {
        if verbose {
            println!("{} {}", "Checking".blue(), name);
        }

        let interner = Interner::new();
        let result = gqlreq_syntax::parse(source, &interner);
        for diagnostic in result.diagnostics.errors() {
            render(diagnostic, name, source);
        }
        if result.diagnostics.has_errors() {
            has_errors = true;
            eprintln!("{} {}", "Error".red().bold(), name);
        }
    }
    if has_errors {
        return Ok(1);
    }

    let (name, combined) = combine(&sources);
    let mut warnings = DiagnosticBag::new();
    if let Err(err) = gqlreq_codegen::generate(&combined, config, &mut warnings) {
        eprintln!("{} {}: {err}", "Error".red().bold(), name);
        return Ok(1);
    }
    for diagnostic in warnings.iter() {
        render(diagnostic, &name, &combined);
    }
    if strict && !warnings.is_empty() {
        eprintln!("{} {} (warnings denied)", "Error".red().bold(), name);
        return Ok(1);
    }
    if verbose {
        println!("{} {}", "OK".green(), name);
    }

    println!(
        "{} {} file(s) checked",
        "Success:".green().bold(),
        files.len()
    );
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::tempdir;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_cli_parse() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_generate_flags() {
        let cli = Cli::try_parse_from([
            "gqlreq",
            "generate",
            "a.graphql",
            "b.graphql",
            "--document-mode",
            "external",
            "--external-from",
            "./ops",
            "-o",
            "sdk.ts",
        ])
        .unwrap();

        match cli.command {
            Commands::Generate {
                files,
                output,
                document_mode,
                external_from,
                use_type_imports,
                ..
            } => {
                assert_eq!(files.len(), 2);
                assert_eq!(output, Some(PathBuf::from("sdk.ts")));
                assert_eq!(document_mode, Some(DocumentModeArg::External));
                assert_eq!(external_from.as_deref(), Some("./ops"));
                assert!(!use_type_imports);
            }
            Commands::Check { .. } => panic!("expected generate"),
        }
    }

    #[test]
    fn test_document_mode_arg_mapping() {
        assert_eq!(
            DocumentMode::from(DocumentModeArg::GraphqlTag),
            DocumentMode::GraphQLTag
        );
        assert_eq!(
            DocumentMode::from(DocumentModeArg::DocumentNode),
            DocumentMode::DocumentNode
        );
    }

    #[test]
    fn test_load_default_config() {
        assert_eq!(load_config(None).unwrap(), SdkConfig::default());
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["gqlreq", "-v", "-q", "check", "a.graphql"]).is_err());
    }

    #[test]
    fn test_fragment_shared_across_files() {
        let dir = tempdir().unwrap();
        let files = vec![
            write(dir.path(), "a.graphql", "query GetUser { user { ...UserFields } }"),
            write(dir.path(), "b.graphql", "fragment UserFields on User { id }"),
        ];
        let config = SdkConfig::default();

        let output = dir.path().join("sdk.ts");
        assert_eq!(generate_sdk(&files, Some(&output), &config).unwrap(), 0);
        assert_eq!(check_files(&files, &config, false, false).unwrap(), 0);
        assert_eq!(check_files(&files, &config, true, true).unwrap(), 0);
    }

    #[test]
    fn test_syntax_error_exits_with_one() {
        let dir = tempdir().unwrap();
        let files = vec![
            write(dir.path(), "ok.graphql", "query A { a }"),
            write(dir.path(), "broken.graphql", "query B { b"),
        ];
        let config = SdkConfig::default();

        assert_eq!(check_files(&files, &config, false, false).unwrap(), 1);
        let output = dir.path().join("sdk.ts");
        assert_eq!(generate_sdk(&files, Some(&output), &config).unwrap(), 1);
        assert!(!output.exists());
    }

    #[test]
    fn test_strict_denies_anonymous_operation_warning() {
        let dir = tempdir().unwrap();
        let files = vec![write(
            dir.path(),
            "ops.graphql",
            "query Named { a } { viewer { id } }",
        )];
        let config = SdkConfig::default();

        assert_eq!(check_files(&files, &config, false, false).unwrap(), 0);
        assert_eq!(check_files(&files, &config, true, false).unwrap(), 1);
    }

    #[test]
    fn test_output_file_is_written() {
        let dir = tempdir().unwrap();
        let files = vec![write(dir.path(), "ops.graphql", "query GetUser { user { id } }")];
        let output = dir.path().join("sdk.ts");

        let code = generate_sdk(&files, Some(&output), &SdkConfig::default()).unwrap();
        assert_eq!(code, 0);
        let sdk = std::fs::read_to_string(&output).unwrap();
        assert!(sdk.contains("export function getSdk"));
        assert!(sdk.contains("GetUser(variables?: GetUserQueryVariables"));
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempdir().unwrap();
        let ops = write(dir.path(), "ops.graphql", "query GetUser { user { id } }");
        let config = write(dir.path(), "sdk.json", r#"{ "documentMode": "string" }"#);
        let output = dir.path().join("sdk.ts");
        let args = |extra: &[&str]| {
            let mut args = vec![
                "gqlreq".to_string(),
                "generate".to_string(),
                ops.display().to_string(),
                "--config".to_string(),
                config.display().to_string(),
                "-o".to_string(),
                output.display().to_string(),
            ];
            args.extend(extra.iter().map(|arg| arg.to_string()));
            Cli::try_parse_from(args).unwrap()
        };

        assert_eq!(run(args(&[])).unwrap(), 0);
        let sdk = std::fs::read_to_string(&output).unwrap();
        assert!(sdk.contains("export const GetUserDocument = `"));

        let cli = args(&["--document-mode", "external", "--external-from", "./ops"]);
        assert_eq!(run(cli).unwrap(), 0);
        let sdk = std::fs::read_to_string(&output).unwrap();
        assert!(sdk.contains("import * as Operations from './ops';"));
        assert!(sdk.contains("request<GetUserQuery>(Operations.GetUserDocument, variables,"));
        assert!(!sdk.contains("export const GetUserDocument = `"));
    }
}
