use super::*;

#[test]
fn parses_db_ping_command() {
    let cli =
        Cli::try_parse_from(["placetrack-cli", "db", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Ping
        })
    ));
}

#[test]
fn parses_db_migrate_command() {
    let cli =
        Cli::try_parse_from(["placetrack-cli", "db", "migrate"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Migrate
        })
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["placetrack-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_place_add_with_listing_id() {
    let cli = Cli::try_parse_from([
        "placetrack-cli",
        "place",
        "add",
        "--name",
        "Cafe One",
        "--external-id",
        "np-1",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Place {
            command: PlaceCommands::Add {
                ref name,
                external_id: Some(ref id),
            }
        }) if name == "Cafe One" && id == "np-1"
    ));
}

#[test]
fn parses_keyword_track_with_region() {
    let cli = Cli::try_parse_from([
        "placetrack-cli",
        "keyword",
        "track",
        "--place-id",
        "7",
        "--keyword",
        "coffee",
        "--region",
        "Seoul",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Keyword {
            command: KeywordCommands::Track {
                place_id: 7,
                ref keyword,
                region: Some(ref region),
            }
        }) if keyword == "coffee" && region == "Seoul"
    ));
}

#[test]
fn parses_keyword_deactivate() {
    let cli =
        Cli::try_parse_from(["placetrack-cli", "keyword", "deactivate", "--id", "3"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Keyword {
            command: KeywordCommands::Deactivate { id: 3 }
        })
    ));
}

#[test]
fn scrape_defaults_to_http_browser() {
    let cli = Cli::try_parse_from(["placetrack-cli", "scrape", "ranking", "--keyword-id", "5"])
        .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Scrape {
            browser: BrowserKind::Http,
            command: ScrapeCommands::Ranking { keyword_id: 5 }
        })
    ));
}

#[test]
fn scrape_reviews_limit_is_optional() {
    let cli = Cli::try_parse_from(["placetrack-cli", "scrape", "reviews", "--place-id", "2"])
        .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Scrape {
            command: ScrapeCommands::Reviews {
                place_id: 2,
                limit: None
            },
            ..
        })
    ));

    let cli = Cli::try_parse_from([
        "placetrack-cli",
        "scrape",
        "--browser",
        "chrome",
        "reviews",
        "--place-id",
        "2",
        "--limit",
        "0",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Scrape {
            browser: BrowserKind::Chrome,
            command: ScrapeCommands::Reviews {
                place_id: 2,
                limit: Some(0)
            }
        })
    ));
}

#[test]
fn parses_scrape_all() {
    let cli = Cli::try_parse_from(["placetrack-cli", "scrape", "all"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Scrape {
            command: ScrapeCommands::All,
            ..
        })
    ));
}

#[test]
fn history_limit_defaults_to_twenty() {
    let cli = Cli::try_parse_from([
        "placetrack-cli",
        "history",
        "rankings",
        "--keyword-id",
        "9",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::History {
            command: HistoryCommands::Rankings {
                keyword_id: 9,
                limit: 20
            }
        })
    ));
}

#[test]
fn scrape_requires_a_target() {
    assert!(Cli::try_parse_from(["placetrack-cli", "scrape", "ranking"]).is_err());
    assert!(Cli::try_parse_from(["placetrack-cli", "scrape", "reviews"]).is_err());
}

#[test]
fn rejects_unknown_browser() {
    assert!(
        Cli::try_parse_from(["placetrack-cli", "schedule", "--browser", "firefox"]).is_err()
    );
}
