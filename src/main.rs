use clap::Parser;
use std::path::PathBuf;
use webgen::{Generator, GeneratorConfig, WebGenError, save_artifacts_to_dir};

/// Generates static web pages from a wiki-style specification.
#[derive(Parser, Debug)]
#[command(name = "webgen", version, about)]
struct Cli {
    /// Specification file (`== Page` headings and `{type title|params}` lines)
    specification: PathBuf,

    /// Data dictionary describing input fields
    #[arg(short, long)]
    dictionary: Option<PathBuf>,

    /// XML data bound to tables, lists and selects
    #[arg(long)]
    data: Option<PathBuf>,

    /// Directory whose templates override the bundled ones
    #[arg(short, long)]
    templates: Option<PathBuf>,

    /// Value of the page `lang` attribute
    #[arg(short, long)]
    lang: Option<String>,

    /// JSON configuration file; flags take precedence over it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Skip the report page
    #[arg(long)]
    no_report: bool,
}

fn main() -> Result<(), WebGenError> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    };
    if let Some(lang) = cli.lang {
        config.language = lang;
    }
    if let Some(dir) = cli.templates {
        config.templates_dir = Some(dir);
    }
    if let Some(dir) = cli.out {
        config.output_dir = Some(dir);
    }

    let mut builder = config.apply(Generator::builder().with_specification_file(&cli.specification)?);
    if let Some(path) = &cli.dictionary {
        builder = builder.with_data_dictionary_file(path)?;
    }
    if let Some(path) = &cli.data {
        builder = builder.with_data_file(path)?;
    }
    let generator = builder.build()?;

    let out = config.output_dir.unwrap_or_else(|| PathBuf::from("."));
    if cli.no_report {
        let artifacts = generator.generate_artifacts()?;
        save_artifacts_to_dir(&artifacts, &out)?;
        log::info!("Generated {} pages in '{}'", artifacts.len(), out.display());
    } else {
        let generation = generator.generate()?;
        generation.save_artifacts_to_dir(&out)?;
        generation.save_reports_to_dir(&out)?;
        log::info!(
            "Generated {} pages and {} reports in '{}'",
            generation.artifacts.len(),
            generation.reports.len(),
            out.display()
        );
    }
    Ok(())
}
