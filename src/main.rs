use clap::Parser;
use crop_recommender::run;
use crop_recommender::state::ServerConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "crop-recommender")]
#[command(about = "Crop recommendation web service")]
#[command(long_about = r#"
Crop recommendation web service

Serves a form that takes soil and weather measurements (nitrogen, phosphorus,
potassium, temperature, humidity, pH, rainfall) and recommends a crop using
the classifier and scalers found in the artifact directory:

  model.json  standscaler.json  minmaxscaler.json

Examples:
  crop-recommender --artifact-dir ./artifacts
  crop-recommender --host 0.0.0.0 --port 8080 --workers 4
"#)]
struct CliArgs {
    /// Host address to bind the server
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server
    #[arg(long, default_value_t = 5000)]
    port: u16,

    /// Directory holding the model and scaler artifacts
    #[arg(long, default_value = ".")]
    artifact_dir: PathBuf,

    /// Number of HTTP workers (defaults to the number of CPUs)
    #[arg(long, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    workers: Option<usize>,

    /// Log level
    #[arg(long, default_value = "info", value_parser = ["debug", "info", "warn", "error"])]
    log_level: String,
}

impl CliArgs {
    fn to_server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.host.clone(),
            port: self.port,
            artifact_dir: self.artifact_dir.clone(),
            workers: self.workers,
            log_level: self.log_level.parse().unwrap_or(log::LevelFilter::Info),
        }
    }
}

fn main() {
    let args = CliArgs::parse();
    if let Err(e) = run(args.to_server_config()) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CliArgs::parse_from(["crop-recommender"]).to_server_config();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 5000);
        assert_eq!(config.artifact_dir, PathBuf::from("."));
        assert_eq!(config.workers, None);
        assert_eq!(config.log_level, log::LevelFilter::Info);
    }

    #[test]
    fn test_overrides() {
        let config = CliArgs::parse_from([
            "crop-recommender",
            "--port",
            "8080",
            "--artifact-dir",
            "/srv/crops",
            "--workers",
            "2",
            "--log-level",
            "debug",
        ])
        .to_server_config();
        assert_eq!(config.port, 8080);
        assert_eq!(config.artifact_dir, PathBuf::from("/srv/crops"));
        assert_eq!(config.workers, Some(2));
        assert_eq!(config.log_level, log::LevelFilter::Debug);
    }

    #[test]
    fn test_rejects_zero_workers() {
        assert!(CliArgs::try_parse_from(["crop-recommender", "--workers", "0"]).is_err());
        let config = CliArgs::parse_from(["crop-recommender", "--workers", "1"]).to_server_config();
        assert_eq!(config.workers, Some(1));
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        assert!(CliArgs::try_parse_from(["crop-recommender", "--log-level", "loud"]).is_err());
    }
}
