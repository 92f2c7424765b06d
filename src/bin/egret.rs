use clap::Parser;

/// Generates regex test strings intended to probe boundary conditions,
/// backreferences, and quantifier edge cases.
#[derive(Debug, Parser)]
#[command(name = "egret", version, about)]
struct Cli {
    /// The regular expression to analyze.
    regex: String,

    /// An alphabetic run of at least two characters spliced into
    /// generated strings in place of unconstrained character classes.
    base_substring: String,

    /// Print diagnostic information about the pipeline's intermediate
    /// stages.
    #[arg(short, long)]
    debug: bool,

    /// Print state/transition/path counts alongside the generated strings.
    #[arg(short, long)]
    stat: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let lines = egret::run_engine(&cli.regex, &cli.base_substring, cli.debug, cli.stat);

    let failed = lines.first().map(|l| l.starts_with("ERROR: ")).unwrap_or(false);
    for line in &lines {
        println!("{line}");
    }

    if failed {
        std::process::exit(1);
    }
    Ok(())
}
