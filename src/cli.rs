/// command line: `analyze`, `edit` and `init-config` subcommands, logger setup
pub mod cli_main;
