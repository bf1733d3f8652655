use anyhow::{bail, Context};
use quiltkit::{default_config_path, generate_to_file, init_logging, nest_pattern, Config};
use std::path::PathBuf;
use tracing::info;

const USAGE: &str = "usage: quiltkit [--random-seed] [--nest] [CONFIG] [OUTPUT]";

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    output: Option<PathBuf>,
    random_seed: bool,
    nest: bool,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args::default();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--random-seed" => args.random_seed = true,
            "--nest" => args.nest = true,
            "-h" | "--help" => {
                println!("{}", USAGE);
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("quiltkit {} ({})", quiltkit::VERSION, quiltkit::BUILD_DATE);
                std::process::exit(0);
            }
            flag if flag.starts_with('-') => bail!("unknown option {}\n{}", flag, USAGE),
            _ if args.config.is_none() => args.config = Some(PathBuf::from(arg)),
            _ if args.output.is_none() => args.output = Some(PathBuf::from(arg)),
            _ => bail!("too many arguments\n{}", USAGE),
        }
    }
    Ok(args)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;
    let args = parse_args()?;

    let config_path = args.config.unwrap_or_else(default_config_path);
    let mut config = Config::load_or_default(&config_path)
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;
    if args.random_seed {
        config.pattern = config.pattern.with_random_seed();
    }

    let output = args
        .output
        .unwrap_or_else(|| config.output.default_path());
    let file = generate_to_file(&config, &output)?;
    println!(
        "{}: {} pieces, seed {}",
        output.display(),
        file.pieces.len(),
        file.params.seed
    );

    if args.nest {
        let outcome = nest_pattern(&file.clone().into_pattern(), config.sheet).await?;
        for group in &outcome.groups {
            let label = group
                .color
                .map(|c| c.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "color {}: {} pieces on {} sheet(s)",
                label, group.placed, group.sheets
            );
        }
        if !outcome.unplaced.is_empty() {
            println!("too large for the sheet: {}", outcome.unplaced.join(", "));
        }
    }

    info!("Done");
    Ok(())
}
