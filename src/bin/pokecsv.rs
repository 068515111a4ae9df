use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use pokeapi_csv::api::DEFAULT_BASE_URL;
use pokeapi_csv::endpoints::{self, ENDPOINTS, EndpointConfig};
use pokeapi_csv::{Client, FetchOptions};
use pokeapi_csv::{images, pipeline, viz};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "pokecsv",
    version,
    about = "Fetch PokeAPI resources into CSV files, derive image URLs & chart the Pokémon table"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the API's endpoint directory.
    Endpoints {
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        base_url: String,
    },
    /// Fetch endpoints into `pokeapi_<endpoint>.csv` files.
    Fetch(FetchArgs),
    /// Derive `pokemon_images.csv` from the Pokémon CSV.
    Images(ImagesArgs),
    /// Render the charts from the Pokémon CSV.
    Viz(VizArgs),
    /// Fetch every endpoint, then derive images and render charts.
    All(FetchArgs),
}

#[derive(Args, Debug)]
struct FetchArgs {
    /// Endpoint to fetch; repeat for several. Defaults to all of them.
    #[arg(short, long = "endpoint")]
    endpoints: Vec<String>,
    /// Directory the CSV files are written to.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,
    /// References requested per index page.
    #[arg(long, default_value_t = 1000)]
    page_size: u32,
    /// Pause before every request, in milliseconds.
    #[arg(long, default_value_t = 100)]
    delay_ms: u64,
}

#[derive(Args, Debug)]
struct ImagesArgs {
    #[arg(long, default_value = "pokeapi_pokemon.csv")]
    input: PathBuf,
    #[arg(long, default_value = "pokemon_images.csv")]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct VizArgs {
    #[arg(long, default_value = "pokeapi_pokemon.csv")]
    input: PathBuf,
    /// Directory the charts are written to.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Endpoints { base_url } => cmd_endpoints(&base_url),
        Command::Fetch(args) => cmd_fetch(&args),
        Command::Images(args) => cmd_images(&args),
        Command::Viz(args) => cmd_viz(&args),
        Command::All(args) => cmd_all(&args),
    }
}

/// Resolve endpoint names up front so a typo fails before any request goes out.
fn select_endpoints(names: &[String]) -> Result<Vec<&'static EndpointConfig>> {
    if names.is_empty() {
        return Ok(ENDPOINTS.iter().collect());
    }
    names
        .iter()
        .map(|n| {
            endpoints::lookup(n).ok_or_else(|| {
                anyhow::anyhow!(
                    "unknown endpoint '{}', expected one of: {}",
                    n,
                    endpoints::names().collect::<Vec<_>>().join(", ")
                )
            })
        })
        .collect()
}

fn options(args: &FetchArgs) -> FetchOptions {
    FetchOptions {
        base_url: args.base_url.clone(),
        page_size: args.page_size,
        delay: Duration::from_millis(args.delay_ms),
        out_dir: args.out_dir.clone(),
    }
}

fn cmd_endpoints(base_url: &str) -> Result<()> {
    let client = Client::with_base_url(base_url);
    for (name, url) in client.list_endpoints()? {
        println!("{:24} {}", name, url);
    }
    Ok(())
}

fn cmd_fetch(args: &FetchArgs) -> Result<()> {
    let selected = select_endpoints(&args.endpoints)?;
    let opts = options(args);
    std::fs::create_dir_all(&opts.out_dir)?;
    let client = Client::with_base_url(&opts.base_url);
    let reports = pipeline::run_all(&client, selected, &opts)?;
    for r in &reports {
        match &r.path {
            Some(p) => eprintln!(
                "{:10} {:>6} rows, {:>4} skipped -> {}",
                r.endpoint,
                r.written,
                r.failed,
                p.display()
            ),
            None => eprintln!("{:10} no data written ({} listed)", r.endpoint, r.listed),
        }
    }
    Ok(())
}

fn cmd_images(args: &ImagesArgs) -> Result<()> {
    let n = images::create_images_csv(&args.input, &args.output)?;
    eprintln!("Saved {} image rows to {}", n, args.output.display());
    Ok(())
}

fn cmd_viz(args: &VizArgs) -> Result<()> {
    let written = viz::render_all(&args.input, &args.out_dir)?;
    eprintln!("Wrote {} charts to {}", written.len(), args.out_dir.display());
    Ok(())
}

fn cmd_all(args: &FetchArgs) -> Result<()> {
    cmd_fetch(args)?;
    let pokemon_csv = args.out_dir.join(pokemon_config_file());
    if !pokemon_csv.exists() {
        anyhow::bail!("{} was not written, skipping images and charts", pokemon_csv.display());
    }
    cmd_images(&ImagesArgs {
        input: pokemon_csv.clone(),
        output: args.out_dir.join(images::IMAGES_FILE),
    })?;
    cmd_viz(&VizArgs {
        input: pokemon_csv,
        out_dir: args.out_dir.clone(),
    })
}

fn pokemon_config_file() -> String {
    endpoints::lookup("pokemon")
        .map(EndpointConfig::file_name)
        .unwrap_or_else(|| "pokeapi_pokemon.csv".into())
}
