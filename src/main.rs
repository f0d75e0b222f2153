use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use dbogen::{build_query_bundles, generate_ddl, Diagnostic, GenerateOptions};

#[derive(Parser)]
#[command(name = "dbogen")]
#[command(author, version, about = "Schema-driven DDL and data-access-object generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate creation DDL for the most recent schema version
    Ddl {
        /// Root directory holding one subdirectory per schema version
        #[arg(short, long)]
        schema: PathBuf,

        /// Directory the generated scripts are written to
        #[arg(short, long)]
        output: PathBuf,

        /// Target SQL platform
        #[arg(short, long, default_value = "mysql")]
        platform: String,

        /// Package name the schemas are registered under
        #[arg(long, default_value = "default")]
        package: String,

        /// Overwrite existing output files
        #[arg(long)]
        overwrite: bool,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },
    /// Build and print the query IR for the most recent schema version
    Queries {
        /// Root directory holding one subdirectory per schema version
        #[arg(short, long)]
        schema: PathBuf,

        /// Target SQL platform
        #[arg(short, long, default_value = "mysql")]
        platform: String,

        /// Target object language for generated code fragments
        #[arg(short, long, default_value = "php")]
        language: String,

        /// Package name the schemas are registered under
        #[arg(long, default_value = "default")]
        package: String,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn report_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        eprintln!("{diagnostic}");
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ddl {
            schema,
            output,
            platform,
            package,
            overwrite,
            verbose,
        } => {
            let options = GenerateOptions {
                schema_dir: schema,
                output_dir: output,
                platform,
                package,
                overwrite,
                verbose,
            };
            let outcome = generate_ddl(&options)?;
            report_diagnostics(&outcome.diagnostics);
            println!("Generated {} file(s)", outcome.files.len());
        }
        Commands::Queries {
            schema,
            platform,
            language,
            package,
            verbose,
        } => {
            let options = GenerateOptions {
                schema_dir: schema,
                output_dir: PathBuf::new(),
                platform,
                package,
                overwrite: false,
                verbose,
            };
            let outcome = build_query_bundles(&options, &language)?;
            report_diagnostics(&outcome.diagnostics);
            for bundle in &outcome.bundles {
                println!("-- {}", bundle.schema_name);
                if let Some(text) = bundle.read.sql.text() {
                    println!("read: {text}");
                }
                for read_by in &bundle.read.read_by {
                    if let Some(text) = read_by.sql.text() {
                        println!("read_by[{}]: {text}", read_by.name);
                    }
                }
                if let Some(create) = &bundle.create {
                    if let Some(text) = create.sql.text() {
                        println!("create: {text}");
                    }
                    if let Some(upsert) = &create.upsert_sql {
                        if let Some(text) = upsert.text() {
                            println!("upsert: {text}");
                        }
                    }
                }
                if let Some(update) = &bundle.update {
                    if let Some(text) = update.sql.text() {
                        println!("update: {text}");
                    }
                }
                if let Some(delete) = &bundle.delete {
                    if let Some(text) = delete.sql.text() {
                        println!("delete: {text}");
                    }
                }
            }
        }
    }

    Ok(())
}
