use super::*;

#[test]
fn parses_search_command() {
    let cli = Cli::try_parse_from([
        "mapassist-cli",
        "search",
        "quiet cafe with wifi",
        "--lat",
        "49.84",
        "--lon",
        "24.03",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Search {
            ref query,
            radius: None,
            ..
        } if query == "quiet cafe with wifi"
    ));
}

#[test]
fn search_accepts_negative_coordinates_and_radius() {
    let cli = Cli::try_parse_from([
        "mapassist-cli",
        "search",
        "tacos",
        "--lat",
        "-34.6",
        "--lon",
        "-58.38",
        "--radius",
        "800",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Commands::Search {
            lat, lon, radius, ..
        } => {
            assert!((lat + 34.6).abs() < f64::EPSILON);
            assert!((lon + 58.38).abs() < f64::EPSILON);
            assert_eq!(radius, Some(800));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn search_requires_coordinates() {
    assert!(Cli::try_parse_from(["mapassist-cli", "search", "tacos"]).is_err());
}

#[test]
fn parses_intent_command() {
    let cli = Cli::try_parse_from(["mapassist-cli", "intent", "24h pharmacy"])
        .expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Intent { ref query } if query == "24h pharmacy"));
}

#[test]
fn details_keywords_split_on_commas() {
    let cli = Cli::try_parse_from([
        "mapassist-cli",
        "details",
        "51a2b3",
        "--keywords",
        "wifi,quiet",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Details { ref place_id, ref keywords }
            if place_id == "51a2b3" && keywords == &["wifi".to_string(), "quiet".to_string()]
    ));
}

#[test]
fn details_without_keywords_is_empty() {
    let cli = Cli::try_parse_from(["mapassist-cli", "details", "51a2b3"])
        .expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Details { ref keywords, .. } if keywords.is_empty()));
}

#[test]
fn missing_subcommand_is_an_error() {
    assert!(Cli::try_parse_from(["mapassist-cli"]).is_err());
}

#[test]
fn origin_validation_rejects_out_of_range() {
    assert!(commands::parse_origin(49.84, 24.03).is_ok());
    assert!(commands::parse_origin(120.0, 24.03).is_err());
    assert!(commands::parse_origin(49.84, f64::NAN).is_err());
}
