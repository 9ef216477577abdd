use clap::{Parser, Subcommand};

use self::{play::PlayArg, simulate::SimulateArg};

mod play;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in (defaults to `play`)
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play in the terminal
    Play(#[clap(flatten)] PlayArg),
    /// Run headless games driven by random input and report the results as JSON
    Simulate(#[clap(flatten)] SimulateArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Simulate(arg) => simulate::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_definition() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_defaults_to_play() {
        let args = CommandArgs::try_parse_from(["blockfall"]).unwrap();
        assert!(args.mode.is_none());
    }

    #[test]
    fn test_parse_play_args() {
        let args = CommandArgs::try_parse_from([
            "blockfall",
            "play",
            "--seed",
            "0123456789abcdef0123456789abcdef",
            "--tick-rate",
            "10",
            "--width",
            "12",
        ])
        .unwrap();
        let Some(Mode::Play(arg)) = args.mode else {
            panic!("expected play mode");
        };
        assert_eq!(
            arg.seed.map(|seed| seed.to_string()).as_deref(),
            Some("0123456789abcdef0123456789abcdef")
        );
        assert!((arg.tick_rate - 10.0).abs() < f64::EPSILON);
        assert_eq!((arg.width, arg.height), (12, 20));
    }

    #[test]
    fn test_rejects_bad_seed() {
        let result = CommandArgs::try_parse_from(["blockfall", "simulate", "--seed", "xyz"]);
        assert!(result.is_err());
    }
}
