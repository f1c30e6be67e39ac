use super::*;

#[test]
fn parses_person_command() {
    let cli = Cli::try_parse_from(["brokermap", "person", "jane-doe"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Person { ref slug, out: None } if slug == "jane-doe"
    ));
}

#[test]
fn parses_person_command_with_output() {
    let cli = Cli::try_parse_from(["brokermap", "person", "jane-doe", "--out", "map.geojson"])
        .expect("expected valid cli args");
    let Commands::Person { out, .. } = cli.command else {
        panic!("expected person command");
    };
    assert_eq!(out, Some(PathBuf::from("map.geojson")));
}

#[test]
fn plot_requires_deals_file() {
    assert!(Cli::try_parse_from(["brokermap", "plot"]).is_err());
}

#[test]
fn parses_plot_command() {
    let cli = Cli::try_parse_from([
        "brokermap",
        "plot",
        "--deals",
        "deals.json",
        "--subject",
        "Jane Doe",
    ])
    .expect("expected valid cli args");
    let Commands::Plot {
        deals,
        subject,
        out,
    } = cli.command
    else {
        panic!("expected plot command");
    };
    assert_eq!(deals, PathBuf::from("deals.json"));
    assert_eq!(subject.as_deref(), Some("Jane Doe"));
    assert!(out.is_none());
}

#[test]
fn parses_geocode_command() {
    let cli = Cli::try_parse_from(["brokermap", "geocode", "1 Vanderbilt Ave, New York, NY"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Geocode { ref address } if address == "1 Vanderbilt Ave, New York, NY"
    ));
}

#[test]
fn missing_command_is_an_error() {
    assert!(Cli::try_parse_from(["brokermap"]).is_err());
}
