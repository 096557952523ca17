use uvmap::{
    io::{self, FeatureProps}, AggregateQuery, Boundaries, BucketTable, Class, CsvLayout, Dashboard,
    DashboardConfig, DashboardError, FeatureLayer, GeoFeature, GeoLevel, Grouping, KeySpec, Layout,
    RecordFormat, RegionKey, SelectionState, SortOrder,
};

const COUNTIES: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {"type": "Feature", "properties": {"STATE": "06", "COUNTY": "037", "NAME": "Los Angeles"},
         "geometry": {"type": "Polygon", "coordinates": [[[-118.9, 33.7], [-117.6, 33.7], [-117.6, 34.8], [-118.9, 34.8]]]}},
        {"type": "Feature", "properties": {"STATE": "06", "COUNTY": "073", "NAME": "San Diego"},
         "geometry": {"type": "Polygon", "coordinates": [[[-117.6, 32.5], [-116.1, 32.5], [-116.1, 33.5], [-117.6, 33.5]]]}},
        {"type": "Feature", "properties": {"STATE": "06", "COUNTY": "059", "NAME": "Orange"},
         "geometry": null},
        {"type": "Feature", "properties": {"STATE": "48", "COUNTY": "201", "NAME": "Harris"},
         "geometry": null}
    ]
}"#;

const RECORDS: &str = "\
County,CountyFIPS,value
Los Angeles,06037,150
Los Angeles,06037,170
San Diego,06073,80
Harris,48201,200
Cook,17031,120
";

fn key(geoid: &str) -> RegionKey { RegionKey::from_geoid(geoid).unwrap() }

fn boundaries() -> Boundaries {
    let counties = io::read_features_bytes(COUNTIES.as_bytes(), GeoLevel::County, &FeatureProps::default()).unwrap();
    Boundaries::from_counties(counties)
}

fn csv_format() -> RecordFormat { RecordFormat::Csv(CsvLayout::county_fips()) }

fn loaded() -> Dashboard {
    let mut dashboard = Dashboard::new(DashboardConfig::default());
    dashboard.load_text(RECORDS, &csv_format(), boundaries()).unwrap();
    dashboard
}

#[test]
fn county_averages_from_csv_text() {
    let dashboard = loaded();
    let snapshot = dashboard.snapshot();
    let map = snapshot.map();

    let la = map.get(&key("06037")).unwrap();
    assert_eq!(la.aggregate_value, 160.0);
    assert_eq!(la.contributing_count, 2);
    assert_eq!(la.display_name, "Los Angeles");

    let sd = map.get(&key("06073")).unwrap();
    assert_eq!(sd.aggregate_value, 80.0);
    assert_eq!(sd.contributing_count, 1);

    assert!(map.get(&key("06059")).is_none());
    assert_eq!(map.unjoined(), &[key("06059")]);
    assert_eq!(map.orphaned(), 1); // Cook County has no boundary feature
}

#[test]
fn every_kept_record_is_counted_exactly_once() {
    let dashboard = loaded();
    let snapshot = dashboard.snapshot();
    let map = snapshot.map();

    assert_eq!(map.contributing_total() + map.orphaned() + map.filtered_out(), 5);
}

#[test]
fn no_data_is_styled_apart_from_measured_values() {
    let dashboard = loaded();
    let table = BucketTable::irradiance_2017();
    let styles = dashboard.map_styles();

    let orange = styles.iter().find(|s| s.key == key("06059")).unwrap();
    assert_eq!(orange.value, None);
    assert_eq!(orange.color, table.no_data_color());

    let la = styles.iter().find(|s| s.key == key("06037")).unwrap();
    assert_eq!(table.classify(la.value), Class::Bucket(1));
    assert_ne!(la.color, table.no_data_color());
}

#[test]
fn bucket_bounds_are_inclusive_upper() {
    let table = BucketTable::irradiance_2017();

    assert_eq!(table.classify(Some(73.9)), Class::Floor);
    assert_eq!(table.classify(Some(74.0)), Class::Bucket(0));
    assert_eq!(table.classify(Some(131.0)), Class::Bucket(0));
    assert_eq!(table.classify(Some(131.01)), Class::Bucket(1));
    assert_eq!(table.classify(Some(247.0)), Class::Bucket(4));
    assert_eq!(table.classify(Some(400.0)), Class::Bucket(4));
    assert_eq!(table.classify(None), Class::NoData);
}

#[test]
fn selection_round_trip() {
    let mut dashboard = loaded();
    let rollup: Vec<_> = dashboard.ranking().into_iter().map(|e| e.display_name).collect();
    assert_eq!(rollup, vec!["California", "Illinois", "Texas"]);

    let snapshot = dashboard.on_unit_clicked(&key("06037")).unwrap();
    let siblings: Vec<_> = snapshot.ranked().iter().map(|e| e.display_name.clone()).collect();
    assert_eq!(siblings, vec!["Los Angeles", "San Diego"]);
    // county bars stay in mW/m²
    assert_eq!(snapshot.ranked()[0].value, 160.0);
    assert_eq!(snapshot.ranked()[0].color, BucketTable::county_chart().color(Some(160.0)));

    let snapshot = dashboard.on_reset_selection().unwrap();
    assert_eq!(snapshot.selection(), &SelectionState::Unselected);
    let restored = dashboard.ranking();
    let names: Vec<_> = restored.iter().map(|e| e.display_name.clone()).collect();
    assert_eq!(names, rollup);
    // state bars are UV index: Texas 200 mW/m²
    assert!((restored[2].value - 8.0).abs() < 1e-9);
}

#[test]
fn sort_toggle_restores_original_order() {
    let mut dashboard = loaded();
    let natural = dashboard.ranking();

    let snapshot = dashboard.on_toggle_sort().unwrap();
    assert_eq!(snapshot.ranking().order(), SortOrder::Descending);
    let names: Vec<_> = snapshot.ranked().iter().map(|e| e.display_name.clone()).collect();
    assert_eq!(names, vec!["Texas", "California", "Illinois"]);

    dashboard.on_toggle_sort().unwrap();
    assert_eq!(dashboard.ranking(), natural);
}

#[test]
fn recomputation_is_deterministic() {
    let a = loaded();
    let b = loaded();

    assert_eq!(a.map_styles(), b.map_styles());
    assert_eq!(a.snapshot().map().units(), b.snapshot().map().units());
    assert_eq!(a.ranking(), b.ranking());
}

#[test]
fn unpadded_codes_refuse_the_load() {
    let mut dashboard = Dashboard::new(DashboardConfig::default());
    let input = "County,CountyFIPS,value\nAutauga,1001,150\n";
    let err = dashboard.load_text(input, &csv_format(), boundaries()).unwrap_err();

    assert!(matches!(err, DashboardError::AmbiguousKeys { count: 1, .. }));
    assert!(!dashboard.is_ready());
}

#[test]
fn state_names_in_whitespace_rows() {
    let format = RecordFormat::Delimited {
        layout: Layout { name: 0, key: KeySpec::StateName, value: 1 },
        delimiter: Some('\t'),
    };
    let input = "# state\tmean\nCalifornia\t150\nTexas\t210\nAtlantis\t99\n";
    let parsed = uvmap::parse_records(input, &format);
    let normalized = uvmap::normalize_rows(&parsed.rows, &FeatureLayer::from_state_names());

    assert_eq!(normalized.records.len(), 2);
    assert_eq!(normalized.records[0].key, key("06"));
    assert_eq!(normalized.unmatched_names, vec![(4, "Atlantis".to_string())]);

    let states = FeatureLayer::from_state_names();
    let agg = AggregateQuery::new(&normalized.records, &states).group_by(Grouping::Unit).run();
    assert_eq!(agg.value_of(&key("48")), Some(210.0));
}

#[test]
fn hand_built_layer_matches_geojson_layer() {
    let layer = FeatureLayer::from_features(GeoLevel::County, [
        GeoFeature::new(key("06037"), "Los Angeles"),
        GeoFeature::new(key("06073"), "San Diego"),
        GeoFeature::new(key("06059"), "Orange"),
        GeoFeature::new(key("48201"), "Harris"),
    ]).unwrap();
    let parsed = boundaries();

    let keys = |l: &FeatureLayer| l.features().iter().map(|f| f.key.clone()).collect::<Vec<_>>();
    assert_eq!(keys(&layer), keys(&parsed.counties));
}

#[test]
fn styled_geojson_and_csv_export() {
    let dashboard = loaded();
    let layer = dashboard.map_layer().unwrap();
    let geojson = io::styles_to_geojson(layer, &dashboard.map_styles());

    let features = geojson["features"].as_array().unwrap();
    assert_eq!(features.len(), 4);
    assert_eq!(features[0]["properties"]["key"], "06037");
    assert_eq!(features[0]["geometry"]["type"], "MultiPolygon");

    let csv = io::units_to_csv_string(dashboard.snapshot().map().units()).unwrap();
    assert!(csv.lines().any(|line| line.starts_with("06073,San Diego,80")));
}
