use crate::engine::{FancyEngine, Flags, ProcessRequest};
use crate::render::{DEFAULT_SCALE, MAX_SCALE, MIN_SCALE};
use crate::{cheatsheet, outline, svg, Visualization};
use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "regexviz", version, about = "Explain a regular expression and draw it as a railroad diagram")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Draw the diagram of a pattern
    Show {
        pattern: String,
        /// Zoom in percent
        #[arg(long, default_value_t = DEFAULT_SCALE,
              value_parser = clap::value_parser!(u32).range(i64::from(MIN_SCALE)..=i64::from(MAX_SCALE)))]
        scale: u32,
        #[arg(long, value_enum, default_value_t = Format::Outline)]
        format: Format,
    },
    /// Run a pattern against text read from a file or stdin
    Test {
        pattern: String,
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Replacement template, `$1` style group references
        #[arg(short, long, default_value = "")]
        replace: String,
        #[arg(short, long)]
        global: bool,
        #[arg(short, long)]
        ignore_case: bool,
        #[arg(short, long)]
        multiline: bool,
        #[arg(long)]
        json: bool,
    },
    /// Print the syntax cheat sheet
    Cheatsheet {
        /// Also list common ready-made patterns
        #[arg(long)]
        patterns: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Outline,
    Svg,
    Json,
    Ast,
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Show { pattern, scale, format } => show(&pattern, scale, format),
        Command::Test { pattern, file, replace, global, ignore_case, multiline, json } => {
            let subject = read_input(file)?;
            let flags = Flags { global, ignore_case, multiline };
            test_pattern(&pattern, &subject, &replace, flags, json)
        }
        Command::Cheatsheet { patterns } => {
            print!("{}", cheatsheet::render(patterns));
            Ok(())
        }
    }
}

fn show(pattern: &str, scale: u32, format: Format) -> anyhow::Result<()> {
    log::debug!("Pattern string: {:?}", pattern);
    if format == Format::Ast {
        let ast = crate::analyze(pattern)?;
        println!("{}", serde_json::to_string_pretty(&ast)?);
        return Ok(());
    }

    match crate::visualize(pattern, scale) {
        Visualization::Placeholder(message) => println!("{}", message),
        Visualization::Failed(message) => bail!(message),
        Visualization::Diagram(tree) => match format {
            Format::Outline => print!("{}", outline::paint(&tree)),
            Format::Svg => print!("{}", svg::paint(&tree)),
            Format::Json | Format::Ast => println!("{}", serde_json::to_string_pretty(&tree)?),
        },
    }
    Ok(())
}

fn read_input(file: Option<PathBuf>) -> anyhow::Result<String> {
    let mut input = match file {
        Some(path) => fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input)?;
            input
        }
    };
    // Remove trailing newline if present
    if input.ends_with('\n') {
        input.pop();
        if input.ends_with('\r') {
            input.pop();
        }
    }
    log::debug!("Input: {:?}", input);
    Ok(input)
}

fn test_pattern(pattern: &str, subject: &str, replacement: &str, flags: Flags, json: bool) -> anyhow::Result<()> {
    let request = ProcessRequest { pattern, subject, replacement, flags };
    let outcome = FancyEngine.process(&request)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    if outcome.matches.is_empty() {
        println!("No matches.");
    }
    for (n, m) in outcome.matches.iter().enumerate() {
        println!("Match {} at {}: {:?}", n + 1, m.index, m.groups[0]);
        for (i, group) in m.groups.iter().enumerate().skip(1) {
            println!("  ${} = {:?}", i, group);
        }
    }
    println!("Replaced: {}", outcome.replaced);
    Ok(())
}
