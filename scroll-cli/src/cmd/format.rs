use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use scroll_core::FormatMode;
use std::io::Read;

pub fn make_subcommand() -> Command {
    Command::new("format")
        .about("Format a single text file and print the HTML")
        .arg(
            Arg::new("file")
                .value_name("FILE")
                .help("Text file to format, or - for stdin")
                .required(true),
        )
        .arg(
            Arg::new("mode")
                .short('m')
                .long("mode")
                .value_name("MODE")
                .help("Formatter to use; picked from the filename when omitted")
                .value_parser(["annotated", "translation", "tabular"]),
        )
}

pub fn execute(args: &ArgMatches) -> Result<()> {
    let file = args
        .get_one::<String>("file")
        .context("missing FILE argument")?;

    let text = if file == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(file).with_context(|| format!("failed to read {file}"))?
    };

    let mode = match args.get_one::<String>("mode") {
        Some(mode) => mode.parse::<FormatMode>()?,
        None => FormatMode::from_filename(file),
    };
    tracing::debug!(%mode, file = %file, "formatting");

    println!("{}", scroll_core::format(&text, mode));

    Ok(())
}
