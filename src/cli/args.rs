// args.rs - Command line arguments definition

use argh::FromArgs;

#[derive(FromArgs)]
/// parambind - Bind a command line against a declarative parameter description
pub struct Args {
    /// path to the TOML command description
    #[argh(option)]
    pub command: Option<String>,

    /// reference time for relative dates such as "last week" (default: now)
    #[argh(option)]
    pub now: Option<String>,

    /// append the database connection flags to the command
    #[argh(switch)]
    pub connection: bool,

    /// generate sample command description and exit
    #[argh(switch)]
    pub generate_config: bool,

    /// enable debug logging
    #[argh(switch)]
    pub verbose: bool,

    /// command line handed to the described command (put it after --)
    #[argh(positional)]
    pub command_line: Vec<String>,
}
