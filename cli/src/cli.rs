use std::path::PathBuf;

/// UV irradiance choropleth CLI
#[derive(clap::Parser, Debug)]
#[command(name = "uvmap", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Join measurements to boundaries and print the map styling and ranking as JSON
    Render(RenderArgs),

    /// Print the legend of a bucket table
    Legend(LegendArgs),
}

#[derive(clap::Args, Debug)]
pub struct RenderArgs {
    /// Measurement file (County,CountyFIPS,value unless --format is given)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub records: PathBuf,

    /// County boundaries as a GeoJSON FeatureCollection
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub counties: PathBuf,

    /// State boundaries as a GeoJSON FeatureCollection, defaults to the built-in state table
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub states: Option<PathBuf>,

    /// Dashboard config (JSON)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Record format (JSON), defaults to the County/CountyFIPS/value CSV layout
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub format: Option<PathBuf>,

    /// Select a unit by its FIPS code before rendering, e.g. 06037
    #[arg(long)]
    pub select: Option<String>,

    /// Rank highest first
    #[arg(long)]
    pub sorted: bool,

    /// Also write the styled map as GeoJSON
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Also write the aggregated units behind the ranking as CSV (feature order, mW/m²)
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub csv: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct LegendArgs {
    /// Built-in table version: irradiance-2017, uv-index-who or county-chart
    #[arg(conflicts_with = "config")]
    pub table: Option<String>,

    /// Print the map and ranking legends of a dashboard config instead
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,
}
