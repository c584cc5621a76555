use std::{fs, process::ExitCode};

use clap::Parser;

use compiler_frontend::{
    compiler::{
        compiler::{compile_bundle, Bundle, CodeGenerator},
        module::{parse_input, Module, SourceInput},
    },
    diagnostics::{
        collector::Collector,
        render::{render_error, render_issue},
    },
    errors::errors::Error,
    logger::{self, LogLevel},
};

/// Checks source files as one module and links them.
#[derive(Parser, Debug)]
#[command(name = "frontc", version)]
struct Cli {
    /// Source files of the module
    #[arg(required = true)]
    files: Vec<String>,

    /// Name of the module
    #[arg(short, long, default_value = "main")]
    module: String,

    /// Print debug events to stderr
    #[arg(short, long)]
    verbose: bool,
}

/// Prints the link table in place of a real back end.
struct LinkReport;

impl CodeGenerator for LinkReport {
    fn generate(&mut self, bundle: &Bundle) -> Result<(), Error> {
        for (mangled_name, target) in &bundle.link_table {
            let module = &bundle.modules[target.module];
            let decl = module.arena.get(target.decl);
            println!("{:<32} {} ({})", mangled_name, decl.name, decl.code_ref);
        }
        for external in &bundle.externals {
            println!("{:<32} <extern>", external);
        }
        Ok(())
    }
}

fn report_error(error: &Error, module: &Module) {
    let path = error.get_position().file.as_str();
    let source = module
        .source_of(path)
        .map(str::to_string)
        .or_else(|| fs::read_to_string(path).ok());

    eprintln!("{}", render_error(error, source.as_deref()));
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init_with_level(if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Warn
    });

    let mut module = Module::new(&cli.module);
    let mut collector = Collector::new();
    let inputs = cli
        .files
        .iter()
        .map(|path| SourceInput::from_path(path))
        .collect();

    if let Err(error) = parse_input(inputs, &mut module, &mut collector) {
        report_error(&error, &module);
        return ExitCode::FAILURE;
    }

    for issue in collector.issues() {
        let source = module.source_of(issue.code_ref.file.as_str());
        eprintln!("{}", render_issue(issue, source));
    }

    let modules = [module];
    match compile_bundle(&modules, &collector, &mut LinkReport) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            report_error(&error, &modules[0]);
            ExitCode::FAILURE
        }
    }
}
