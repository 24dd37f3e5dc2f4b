// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use vcd_grammar::{parse_vcd, parse_vcd_streaming, Header, ScopeIdx, Validator};

#[derive(Parser)]
#[command(version, about = "Parse a VCD file and summarize what it declares")]
struct Cli {
    /// The path to the file to read
    path: PathBuf,
    /// Read the value changes one step at a time instead of all at once
    #[arg(long)]
    stream: bool,
    /// Report semantic warnings such as undeclared identifiers
    #[arg(long)]
    check: bool,
    /// Print the parsed file back out in canonical form
    #[arg(long)]
    emit: bool,
}

fn indented_print(indent: u8, name: &str) {
    for _ in 0..indent {
        print!("  |");
    }
    print!("---");
    println!("{name}");
}

fn print_scope_tree(header: &Header, scope_idx: ScopeIdx, indent: u8) {
    let scope = header.scope(scope_idx);
    indented_print(indent, scope.name());
    for signal_idx in scope.child_signals() {
        let signal = header.signal(*signal_idx);
        indented_print(indent + 1, &format!("{} ({} bits)", signal.name(), signal.width()));
    }
    for child_scope_idx in scope.child_scopes() {
        print_scope_tree(header, *child_scope_idx, indent + 1);
    }
}

fn print_summary(header: &Header) {
    if let Some(timescale) = header.timescale() {
        println!("timescale: {timescale}");
    }
    if let Some(version) = header.version() {
        println!("version: {version}");
    }
    if let Some(date) = header.date() {
        println!("date: {date}");
    }
    for root_scope_idx in header.root_scopes() {
        print_scope_tree(header, *root_scope_idx, 0);
    }
    let orphans = header.signals().iter().filter(|s| s.scope().is_none()).count();
    if orphans > 0 {
        println!("{orphans} signals declared outside of any scope");
    }
}

fn run(args: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let now = Instant::now();
    let file = File::open(&args.path)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.stream {
        let (header, steps) = parse_vcd_streaming(file)?;
        if args.emit {
            write!(out, "{header}")?;
        } else {
            print_summary(&header);
        }
        if args.check {
            for warning in Validator::check_header(&header) {
                eprintln!("warning: {warning}");
            }
        }

        let mut validator = Validator::new(&header);
        let (mut num_steps, mut num_values) = (0usize, 0usize);
        for step in steps {
            let step = step?;
            num_steps += 1;
            num_values += step.values.len();
            if args.check {
                for warning in validator.check_step(&step) {
                    eprintln!("warning: {warning}");
                }
            }
            if args.emit {
                write!(out, "{step}")?;
            }
        }
        if !args.emit {
            println!("{num_steps} steps, {num_values} value changes");
        }
    } else {
        let vcd = parse_vcd(file)?;
        if args.emit {
            vcd.write_to(&mut out)?;
        } else {
            print_summary(vcd.header());
            let num_values: usize = vcd.steps().iter().map(|step| step.values.len()).sum();
            println!("{} steps, {num_values} value changes", vcd.steps().len());
        }
        if args.check {
            for warning in vcd.semantic_warnings() {
                eprintln!("warning: {warning}");
            }
        }
    }

    let elapsed = now.elapsed();
    eprintln!("Parsed VCD file {} : {:.2?}", args.path.display(), elapsed);

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Cli::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
