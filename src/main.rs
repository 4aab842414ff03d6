use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fail2ban_analysis_tools::commands;
use fail2ban_analysis_tools::commands::analyse::{parse_num_logs, AnalyseOptions, GeoSource};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fail2ban-analyse")]
#[command(about = "Fail2ban log analysis tools", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse rotated fail2ban logs and geolocate the attackers
    ///
    /// Writes event, unique-IP and subnet tables, per-country breakdowns,
    /// a summary and bar charts to the output directory.
    Analyse {
        /// Directory holding fail2ban.log* files (default /var/log/)
        directory: Option<String>,

        /// Number of newest logs to analyse, or "all"
        num_logs: Option<String>,

        /// Raw lookup response file to replay, or "nolookup" to skip geolocation
        geo_source: Option<String>,

        /// Directory the output files are written to
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        /// File of invalid-login usernames, one per line
        #[arg(long, default_value = "usernames.txt")]
        usernames: PathBuf,

        /// Geolocation service base URL (overrides IPINFO_URL)
        #[arg(long)]
        lookup_url: Option<String>,

        /// Geolocation service token (overrides IPINFO_TOKEN)
        #[arg(long)]
        lookup_token: Option<String>,
    },

    /// Convert a located unique-IP CSV to a GeoJSON map overlay
    Convert {
        /// Unique-IP CSV with Country, Latitude and Longitude columns
        input: String,

        /// Output JavaScript file (default attacks-geojson.js)
        output: Option<String>,
    },

    /// Generate shell completion scripts
    GenerateCompletion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyse {
            directory,
            num_logs,
            geo_source,
            output_dir,
            usernames,
            lookup_url,
            lookup_token,
        } => {
            let options = AnalyseOptions {
                directory,
                num_logs: parse_num_logs(num_logs.as_deref()),
                geo_source: GeoSource::from_arg(geo_source.as_deref()),
                output_dir,
                usernames,
                lookup_url,
                lookup_token,
            };
            commands::analyse::run(&options).await
        }
        Commands::Convert { input, output } => commands::convert::run(&input, output.as_deref()),
        Commands::GenerateCompletion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "fail2ban-analyse", &mut std::io::stdout());
            Ok(())
        }
    }
}
