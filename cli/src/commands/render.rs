use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::json;
use uvmap::{
    io::{self, FeatureProps}, normalize_rows, Boundaries, CsvLayout, Dashboard, DashboardConfig,
    FeatureLayer, GeoLevel, RecordFormat, RegionKey,
};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::RenderArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => DashboardConfig::from_path(path)?,
        None => DashboardConfig::default(),
    };
    let format = match &args.format {
        Some(path) => read_format(path)?,
        None => RecordFormat::Csv(CsvLayout::county_fips()),
    };

    let props = FeatureProps::default();
    eprintln!("[render] loading boundaries from {}", args.counties.display());
    let counties = io::read_features(&args.counties, GeoLevel::County, &props)?;
    let boundaries = match &args.states {
        Some(path) => Boundaries::new(io::read_features(path, GeoLevel::State, &props)?, counties),
        None => Boundaries::from_counties(counties),
    };

    eprintln!("[render] reading measurements from {}", args.records.display());
    let parsed = io::read_records(&args.records, &format)?;
    let normalized = normalize_rows(&parsed.rows, &boundaries.states);
    if let Some(first) = normalized.first_rejection() {
        bail!(
            "[render] {} row(s) carry ambiguous keys, first at row {}: {}",
            normalized.rejected.len(), first.row, first.error,
        );
    }
    if cli.verbose > 0 {
        eprintln!(
            "[render] {} record(s), {} skipped row(s), {} unmatched name(s)",
            normalized.records.len(), parsed.skipped.len(), normalized.unmatched_names.len(),
        );
    }

    let mut dashboard = Dashboard::new(config);
    let mut snapshot = dashboard.load(normalized.records, boundaries);

    if let Some(code) = &args.select {
        let key = RegionKey::from_geoid(code).with_context(|| format!("[render] invalid --select code {code:?}"))?;
        snapshot = dashboard.on_unit_clicked(&key)?;
    }
    if args.sorted {
        snapshot = dashboard.on_toggle_sort()?;
    }

    if let Some(out_path) = &args.output {
        eprintln!("[render] writing styled map to {}", out_path.display());
        let map_layer = dashboard.map_layer().context("[render] dashboard has no boundaries loaded")?;
        write_geojson(map_layer, snapshot.map_styles(), out_path)?;
    }

    if let Some(csv_path) = &args.csv {
        eprintln!("[render] writing aggregated units to {}", csv_path.display());
        io::write_units_csv(snapshot.secondary().units(), csv_path)?;
    }

    let out = json!({
        "map": snapshot.map_styles(),
        "ranking": snapshot.ranked(),
        "measure": dashboard.config().ranking_measure,
        "selected": snapshot.selection().selected(),
        "selected_name": dashboard.selected_name(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);

    Ok(())
}

fn read_format(path: &Path) -> Result<RecordFormat> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("[render] Failed to read record format: {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("[render] Invalid record format in {}", path.display()))
}

fn write_geojson(layer: &FeatureLayer, styles: &[uvmap::UnitStyle], path: &Path) -> Result<()> {
    let geojson = io::styles_to_geojson(layer, styles);
    let file = std::fs::File::create(path)
        .with_context(|| format!("[render] Failed to create output file: {}", path.display()))?;
    serde_json::to_writer(std::io::BufWriter::new(file), &geojson)
        .with_context(|| format!("[render] Failed to write GeoJSON to {}", path.display()))
}
