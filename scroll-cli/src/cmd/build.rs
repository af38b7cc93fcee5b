use anyhow::Result;
use clap::{Arg, ArgMatches, Command};
use scroll_core::build_site;
use std::path::Path;
use tracing::info;

use crate::config::ScrollConfig;

pub fn add_build_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("source")
                .short('s')
                .long("source")
                .value_name("DIR")
                .help("Source directory containing the library and pages")
                .default_value("./src"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("DIR")
                .help("Output directory for generated site")
                .default_value("./_site"),
        )
        .arg(
            Arg::new("theme")
                .short('t')
                .long("theme")
                .value_name("DIR")
                .help("Theme directory")
                .default_value("./theme"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file")
                .default_value("./scroll.toml"),
        )
}

pub fn make_subcommand() -> Command {
    add_build_args(Command::new("build"))
        .about("Build the reading site from a library of text files")
}

pub fn execute(args: &ArgMatches) -> Result<()> {
    // Load cascading configuration
    let scroll_config = ScrollConfig::load(args)?;
    let build_config = scroll_config.build_config();

    let source_dir = Path::new(&build_config.source);
    let output_dir = Path::new(&build_config.output);
    let theme_dir = Path::new(&build_config.theme);

    let site = build_site(scroll_config.site_config(), source_dir, output_dir, theme_dir)?;

    info!(
        books = site.library().books.len(),
        lines = site.library().lines.len(),
        "site built in {}",
        output_dir.display()
    );

    Ok(())
}
