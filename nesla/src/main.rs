use clap::{ArgAction, Parser};
use nesla::asm::{assemble, version, Context, DiagnosticPrinter, Error};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::exit;
use tracing::Level;

#[derive(clap::Parser, Debug)]
#[command(author, version, about, long_about = None, disable_version_flag = true)]
struct Args {
    /// Source file to assemble
    #[arg(required_unless_present = "version")]
    file: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Show version information
    #[arg(short = 'v', long)]
    version: bool,

    /// Log more details to stderr; repeat for even more
    #[arg(long, action = ArgAction::Count)]
    verbose: u8,
}

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn report(file: &Path, err: &Error) {
    eprintln!("\x1b[91mnesla: {err}\x1b[0m");
    if err.position().is_none() {
        return;
    }
    let content = fs::read_to_string(file).unwrap_or_default();
    let errors = std::slice::from_ref(err);
    eprint!("{}", DiagnosticPrinter::new(errors, &content));
}

fn main() {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(log_level(args.verbose))
        .init();

    let Some(input) = args.file.filter(|_| !args.version) else {
        println!("{}", version());
        return;
    };
    let context = Context {
        input,
        output: args.output,
    };
    if let Err(err) = assemble(&context) {
        report(&context.input, &err);
        exit(1);
    }
}
