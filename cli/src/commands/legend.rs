use anyhow::{anyhow, Result};
use uvmap::{BucketTable, DashboardConfig};

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::LegendArgs) -> Result<()> {
    if let Some(path) = &args.config {
        let config = DashboardConfig::from_path(path)?;
        print_table("map", &config.map_table);
        print_table("ranking", &config.ranking_table);
        print_table("siblings", &config.sibling_table);
        return Ok(());
    }

    let version = args.table.as_deref().unwrap_or(BucketTable::IRRADIANCE_2017);
    let table = BucketTable::builtin(version).ok_or_else(|| anyhow!(
        "Unknown table {:?}. Expected one of: {}, {}, {}",
        version, BucketTable::IRRADIANCE_2017, BucketTable::UV_INDEX_WHO, BucketTable::COUNTY_CHART,
    ))?;
    print_table("table", &table);
    Ok(())
}

fn print_table(title: &str, table: &BucketTable) {
    println!("{title}: {}", table.version());
    for entry in table.legend() {
        println!("  {}  {}", entry.color, entry.label);
    }
}
