use clap::Parser;
use clap::ValueHint;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Prometheus endpoint to explore
    ///
    /// The endpoint whose exposition text is fetched and indexed.
    #[arg(short, long, env="PROM_ENDPOINT", value_hint=ValueHint::Url, default_value="http://localhost:9100/metrics")]
    pub endpoint: String,

    /// Prometheus endpoint's port number
    ///
    /// The port number used in the default prometheus endpoint. Example: http://localhost:<PORT>/metrics
    #[arg(short, long, env="PROM_PORT", value_hint=ValueHint::Other)]
    pub port: Option<u16>,

    /// Set the logging level
    ///
    /// Set the logging level to use when logging to the log.out file
    #[arg(short, long, env="LOG_LEVEL", value_hint=ValueHint::Other, default_value="INFO")]
    pub loglevel: log::LevelFilter,
}
