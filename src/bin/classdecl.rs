use clap::{Parser, Subcommand};
use classdecl::{
    config::ScanConfig,
    diagram::class_diagram,
    driver::{collect_source_files, parse_file, parse_files},
    render_with, Error,
};
use std::{fs, path::PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the class definitions found in a source file
    List(ListArgs),

    /// Write a Graphviz class diagram for a file or source tree
    Diagram(DiagramArgs),
}

#[derive(Parser)]
struct ListArgs {
    /// Source file to search
    file: PathBuf,

    /// Print the whole parse result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct DiagramArgs {
    /// Single file or directory holding the sources
    root: PathBuf,

    /// File the dot graph is written to
    #[arg(short, long, default_value = "out.dot")]
    output: PathBuf,
}

fn load_config(cli: &Cli) -> Result<ScanConfig, Error> {
    let config = match &cli.config {
        Some(path) => ScanConfig::from_file(path)?,
        None => ScanConfig::default(),
    };
    debug!("config: {:?}", config);
    Ok(config)
}

fn list(args: &ListArgs, config: &ScanConfig) -> Result<(), Error> {
    let parsed = parse_file(&args.file, config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&parsed.unit)?);
        return Ok(());
    }

    let classes = &parsed.unit.type_definitions;
    println!("found {} classes:", classes.len());
    for (i, class) in classes.iter().enumerate() {
        println!("-------------------");
        println!("--- {:2} ------------", i);
        println!("-------------------");
        println!("{}", render_with(class, &config.formatter));
    }
    for diagnostic in &parsed.unit.diagnostics {
        eprintln!("{}: {}", args.file.display(), diagnostic);
    }
    Ok(())
}

async fn diagram(args: &DiagramArgs, config: &ScanConfig) -> Result<(), Error> {
    let files = collect_source_files(&args.root, config)?;
    let parsed = parse_files(files, config).await;
    let dot = class_diagram(&args.root, &parsed, config);
    fs::write(&args.output, dot)?;
    info!("Wrote {}", args.output.display());
    Ok(())
}

async fn run(cli: &Cli) -> Result<(), Error> {
    let config = load_config(cli)?;
    match &cli.command {
        Commands::List(args) => list(args, &config),
        Commands::Diagram(args) => diagram(args, &config).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(&cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
