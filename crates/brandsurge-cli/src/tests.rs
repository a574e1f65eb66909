use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["brandsurge-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_brands_command() {
    let cli = Cli::try_parse_from(["brandsurge-cli", "brands"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Brands)));
}

#[test]
fn metrics_defaults_to_all_brands_and_default_window() {
    let cli = Cli::try_parse_from(["brandsurge-cli", "metrics"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Metrics {
            brand: None,
            window: WindowArgs {
                from: None,
                to: None,
                all_dates: false
            },
            json: false
        })
    ));
}

#[test]
fn metrics_with_brand_dates_and_json() {
    let cli = Cli::try_parse_from([
        "brandsurge-cli",
        "metrics",
        "--brand",
        "Acme",
        "--from",
        "2024-10-01",
        "--to",
        "2024-10-31",
        "--json",
    ])
    .unwrap();
    let Some(Commands::Metrics {
        brand,
        window,
        json,
    }) = cli.command
    else {
        panic!("expected metrics command");
    };
    assert_eq!(brand.as_deref(), Some("Acme"));
    assert_eq!(window.from, NaiveDate::from_ymd_opt(2024, 10, 1));
    assert_eq!(window.to, NaiveDate::from_ymd_opt(2024, 10, 31));
    assert!(json);
}

#[test]
fn all_dates_conflicts_with_explicit_bounds() {
    let result = Cli::try_parse_from([
        "brandsurge-cli",
        "metrics",
        "--all-dates",
        "--from",
        "2024-10-01",
    ]);
    assert!(result.is_err());
}

#[test]
fn rejects_malformed_date() {
    let result = Cli::try_parse_from(["brandsurge-cli", "metrics", "--from", "10/01/2024"]);
    assert!(result.is_err());
}

#[test]
fn breakdown_defaults_to_mentions() {
    let cli = Cli::try_parse_from(["brandsurge-cli", "breakdown"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Breakdown {
            metric: ChannelMetric::Mentions,
            ..
        })
    ));
}

#[test]
fn breakdown_accepts_estimated_views_metric() {
    let cli = Cli::try_parse_from([
        "brandsurge-cli",
        "breakdown",
        "--metric",
        "Estimated Views",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Breakdown {
            metric: ChannelMetric::EstimatedViews,
            ..
        })
    ));
}

#[test]
fn breakdown_rejects_unknown_metric() {
    let result = Cli::try_parse_from(["brandsurge-cli", "breakdown", "--metric", "likes"]);
    assert!(result.is_err());
}

#[test]
fn parses_report_with_brand() {
    let cli = Cli::try_parse_from(["brandsurge-cli", "report", "--brand", "Globex"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Report { brand: Some(ref b), .. }) if b == "Globex"
    ));
}

#[test]
fn parses_validate_command() {
    let cli = Cli::try_parse_from(["brandsurge-cli", "validate"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Validate)));
}

#[test]
fn select_rejects_unknown_brand() {
    let table = brandsurge_core::Table::from_records(vec![[(
        brandsurge_core::columns::BRAND,
        brandsurge_core::Cell::text("Acme"),
    )]
    .into_iter()
    .collect()]);
    assert!(load::select(&table, Some("Acme"), None).is_ok());
    assert!(load::select(&table, Some("Globex"), None).is_err());
    assert!(load::select(&table, Some(brandsurge_metrics::NO_BRANDS_FOUND), None).is_err());
}

#[test]
fn all_dates_disables_window() {
    let args = WindowArgs {
        all_dates: true,
        ..WindowArgs::default()
    };
    assert!(load::resolve_window(&args).is_none());
    assert!(load::resolve_window(&WindowArgs::default()).is_some());
}
