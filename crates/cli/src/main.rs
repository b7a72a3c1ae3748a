use std::process::ExitCode;

use clap::Parser;

mod commands;
mod printer;

use commands::Command;
use secutils_runtime::logging;

#[derive(Debug, Parser)]
#[command(
    name = "secutils",
    version,
    about = "Forensic triage utilities: file fingerprints and IOC extraction",
    propagate_version = true
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    logging::init_with_verbosity(cli.verbose).ok();

    match cli.command {
        Command::Info(args) => commands::info::run(args),
        Command::Ioc(args) => commands::ioc::run(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::path::Path;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn info_path_is_optional() {
        let cli = Cli::try_parse_from(["secutils", "info"]).expect("parse");
        match cli.command {
            Command::Info(args) => {
                assert!(args.path.is_none());
                assert!(!args.recursive);
                assert!(args.threads >= 1);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn info_flags_parse() {
        let cli = Cli::try_parse_from([
            "secutils", "-vv", "info", "-r", "-j", "3", "--json", "-o", "out.json", "/tmp",
        ])
        .expect("parse");

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Info(args) => {
                assert_eq!(args.path.as_deref(), Some(Path::new("/tmp")));
                assert!(args.recursive);
                assert_eq!(args.threads, 3);
                assert!(args.output_opts.json);
                assert_eq!(args.output.as_deref(), Some(Path::new("out.json")));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn ioc_accepts_a_path() {
        let cli = Cli::try_parse_from(["secutils", "ioc", "mail.eml", "--color", "never"])
            .expect("parse");
        match cli.command {
            Command::Ioc(args) => {
                assert_eq!(args.path.as_deref(), Some(Path::new("mail.eml")));
                assert_eq!(args.output_opts.color, "never");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["secutils", "index"]).is_err());
    }
}
