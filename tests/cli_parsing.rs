use std::path::PathBuf;

use clap::Parser;
use fleetcheck::cli::{Cli, Commands};

#[test]
fn parse_simulate_defaults() {
    let cli = Cli::try_parse_from(["fleetcheck", "simulate"]).unwrap();

    match cli.command {
        Commands::Simulate(args) => {
            assert_eq!(args.initial, None);
            assert_eq!(args.step, 1);
            assert!(!args.freeze);
        }
        Commands::Config => panic!("wrong top-level command"),
    }
    assert!(cli.config.is_none());
    assert!(!cli.json);
}

#[test]
fn parse_simulate_with_fleet_shape() {
    let cli = Cli::try_parse_from([
        "fleetcheck",
        "simulate",
        "--initial",
        "6",
        "--step",
        "2",
        "--freeze",
    ])
    .unwrap();

    match cli.command {
        Commands::Simulate(args) => {
            assert_eq!(args.initial, Some(6));
            assert_eq!(args.step, 2);
            assert!(args.freeze);
        }
        Commands::Config => panic!("wrong top-level command"),
    }
}

#[test]
fn global_flags_work_after_the_subcommand() {
    let cli = Cli::try_parse_from([
        "fleetcheck",
        "config",
        "--json",
        "--config",
        "custom.yaml",
    ])
    .unwrap();

    assert!(matches!(cli.command, Commands::Config));
    assert!(cli.json);
    assert_eq!(cli.config, Some(PathBuf::from("custom.yaml")));
}

#[test]
fn unknown_subcommands_are_rejected() {
    assert!(Cli::try_parse_from(["fleetcheck", "teleport"]).is_err());
    assert!(Cli::try_parse_from(["fleetcheck"]).is_err());
}

#[test]
fn non_numeric_step_is_rejected() {
    assert!(Cli::try_parse_from(["fleetcheck", "simulate", "--step", "two"]).is_err());
}
