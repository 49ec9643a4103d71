//! Command-line arguments and subcommand dispatch.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use classforge::{Compiler, sink_for_path};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Compile JSON Schema documents to JVM record class files.
#[derive(Parser, Debug)]
#[command(name = "classforge", version, about)]
pub struct Cli {
    /// Log at debug level (`RUST_LOG` takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile a schema into a class directory or a jar
    Compile(CompileArgs),
    /// Print a summary of a compiled class file
    Inspect(InspectArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CompileArgs {
    /// Schema file; `-` or omitted reads standard input
    pub schema: Option<PathBuf>,

    /// Dotted package prepended to every generated type
    #[arg(short, long)]
    pub package_name: Option<String>,

    /// Output directory, or a `.jar` file
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Do not annotate fields and parameters with their original keys
    #[arg(long)]
    pub no_original_keys: bool,

    /// Annotation descriptor used for original keys (e.g. `Lcom/example/Key;`)
    #[arg(long, value_name = "DESCRIPTOR")]
    pub annotation: Option<String>,

    /// Map integer, number and boolean to `int`, `double` and `boolean`
    #[arg(long)]
    pub primitive_values: bool,
}

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Class file to inspect
    pub class_file: PathBuf,
}

impl Cli {
    /// Runs the selected subcommand.
    ///
    /// # Errors
    /// Returns the first failure with context for the user.
    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Compile(args) => args.run(),
            Command::Inspect(args) => args.run(),
        }
    }
}

impl CompileArgs {
    /// Builds a compiler from the flags.
    ///
    /// # Errors
    /// Returns an error for an invalid package name or annotation.
    pub fn compiler(&self) -> anyhow::Result<Compiler> {
        let mut builder = Compiler::builder()
            .original_keys(!self.no_original_keys)
            .primitive_values(self.primitive_values);
        if let Some(package) = &self.package_name {
            builder = builder.package_name(package);
        }
        if let Some(descriptor) = &self.annotation {
            builder = builder.annotation(descriptor);
        }
        builder.build().context("invalid compiler settings")
    }

    /// Returns the schema path, or `None` for standard input.
    #[must_use]
    pub fn schema_path(&self) -> Option<&Path> {
        self.schema.as_deref().filter(|p| *p != Path::new("-"))
    }

    fn run(&self) -> anyhow::Result<()> {
        let compiler = self.compiler()?;
        let mut sink = sink_for_path(&self.output);

        let names = match self.schema_path() {
            Some(path) => compiler
                .compile_file(path, &mut sink)
                .with_context(|| format!("failed to compile {}", path.display()))?,
            None => {
                let mut json = String::new();
                std::io::stdin()
                    .read_to_string(&mut json)
                    .context("failed to read schema from standard input")?;
                compiler
                    .compile_str(&json, &mut sink)
                    .context("failed to compile schema from standard input")?
            }
        };

        tracing::info!(output = %self.output.display(), classes = names.len(), "classes written");
        for name in names {
            println!("{name}");
        }
        Ok(())
    }
}

impl InspectArgs {
    fn run(&self) -> anyhow::Result<()> {
        let bytes = std::fs::read(&self.class_file)
            .with_context(|| format!("failed to read {}", self.class_file.display()))?;
        let summary = crate::inspect::summarize(&bytes)
            .with_context(|| format!("failed to inspect {}", self.class_file.display()))?;
        print!("{summary}");
        Ok(())
    }
}
