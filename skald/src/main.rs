// skald - convert CommonMark from stdin to stdout

mod logger;

use std::io::Read;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum RendererKind {
    /// HTML output
    Html,
    /// The parsed tree as JSON
    Ast,
}

#[derive(Parser)]
#[command(name = "skald", version, about = "Convert CommonMark from stdin to stdout")]
struct Cli {
    /// Output renderer
    #[arg(short, long, value_enum, default_value = "html")]
    renderer: RendererKind,

    /// Increase log verbosity on stderr (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(cli.verbose)?;

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("reading stdin")?;

    let markdown = skald_core::Markdown::new();
    match cli.renderer {
        RendererKind::Html => print!("{}", markdown.convert(&input)),
        RendererKind::Ast => {
            let document = markdown.parse(&input);
            println!(
                "{}",
                serde_json::to_string_pretty(&document).context("serializing tree")?
            );
        }
    }
    Ok(())
}
