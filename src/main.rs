use clap::Parser;
use promex::cli::Cli;
use promex::interactive;
use promex::logging::app_config;
use promex::prom::MetricScraper;
use regex::Regex;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // initialize the logger
    log4rs::init_config(app_config("log.out", cli.loglevel)).unwrap();
    log::info!("Starting the application!");

    let regex = Regex::new(":(\\d{2,5})/").unwrap();
    let endpoint = match cli.port {
        Some(port) => regex
            .replace(&cli.endpoint, format!(":{port}/"))
            .to_string(),
        None => cli.endpoint,
    };
    log::info!("Reading metrics from endpoint: {}", endpoint);

    // start the menu loop
    interactive::run(MetricScraper::new(endpoint))?;
    Ok(())
}
