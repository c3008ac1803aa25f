use clap::Parser;
use etic::utils::logger;
use etic::{
    AbbreviationStore, Abbreviator, CliConfig, Configuration, DoiFetcher, EticError,
    LocalStorage, Normalizer, Resolver, TomlConfig,
};

fn load_configuration(cli: &CliConfig) -> Result<Configuration, EticError> {
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => etic::config::config_path().ok_or_else(|| EticError::ConfigError {
            message: "Could not determine the user config directory".to_string(),
        })?,
    };
    tracing::debug!("Loading configuration from {}", path.display());
    TomlConfig::from_file(&path)?.into_configuration()
}

fn exit_with(e: EticError) -> ! {
    tracing::debug!(
        "{} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::debug!("Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("{}", e.user_friendly_message());
    std::process::exit(e.exit_code());
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();
    logger::init_cli_logger(cli.verbose);

    let config = load_configuration(&cli).unwrap_or_else(|e| exit_with(e));

    let storage = match &cli.data_dir {
        Some(dir) => LocalStorage::new(dir.clone()),
        None => LocalStorage::data_home().unwrap_or_else(|e| exit_with(e)),
    };

    let normalizer = Normalizer::new(
        AbbreviationStore::new(storage),
        Abbreviator::from_config(&config),
    );
    let resolver = Resolver::new(DoiFetcher::new(&config), normalizer);

    match resolver.resolve(&cli.doi, &config).await {
        Ok(resolved) => {
            for warning in &resolved.warnings {
                eprintln!("{}", warning);
            }
            println!("{}", resolved.bibtex);
        }
        Err(e) => exit_with(e),
    }
}
