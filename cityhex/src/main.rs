use cityhex::{app::score, EngineError};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct CityHexArguments {
    #[command(subcommand)]
    app: App,
}

#[derive(Subcommand)]
pub enum App {
    /// scores a city over a hexagonal grid and writes one CSV row per cell
    Score {
        #[arg(long, help = "path to .toml or .json file with run parameters and input layers")]
        configuration_file: String,
        #[arg(long, help = "output path for the score table CSV")]
        output_file: String,
    },
}

pub fn run(app: &App) -> Result<(), EngineError> {
    env_logger::init();
    log::info!("starting cityhex at {}", chrono::Local::now().to_rfc3339());
    match app {
        App::Score {
            configuration_file,
            output_file,
        } => {
            score::run(configuration_file, output_file)?;
            eprintln!("finished.");
            Ok(())
        }
    }
}

fn main() {
    let args = CityHexArguments::parse();
    if let Err(e) = run(&args.app) {
        log::error!("cityhex failed: {e}");
        eprintln!("{e}");
        std::process::exit(1);
    }
}
