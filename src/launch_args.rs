use std::ffi::OsString;

use clap::{CommandFactory, Parser};

/// Command-line switches understood by the shell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Parser)]
#[command(name = "ghost-desktop", about = "Ghost desktop shell")]
pub(crate) struct LaunchOptions {
    /// Open the developer tools once the main window exists.
    #[arg(long)]
    pub(crate) devtools: bool,

    /// Forget the remembered window size and position.
    #[arg(long)]
    pub(crate) reset_window_state: bool,
}

fn known_flags() -> Vec<String> {
    LaunchOptions::command()
        .get_arguments()
        .filter_map(|arg| arg.get_long())
        .map(|long| format!("--{long}"))
        .collect()
}

/// Parsing never fails: installers and platform launchers append their own
/// arguments, so anything the shell does not know is dropped first.
pub(crate) fn parse_launch_args<I, T>(args: I) -> LaunchOptions
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let known = known_flags();
    let mut args = args.into_iter().map(Into::<OsString>::into);
    let program = args.next();
    let flags = args.filter(|arg| {
        arg.to_str()
            .is_some_and(|flag| known.iter().any(|known_flag| known_flag == flag))
    });

    LaunchOptions::try_parse_from(program.into_iter().chain(flags)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_launch_args_defaults_without_flags() {
        assert_eq!(parse_launch_args(["ghost-desktop"]), LaunchOptions::default());
    }

    #[test]
    fn parse_launch_args_reads_known_flags() {
        assert_eq!(
            parse_launch_args(["ghost-desktop", "--devtools", "--reset-window-state"]),
            LaunchOptions {
                devtools: true,
                reset_window_state: true,
            }
        );
    }

    #[test]
    fn parse_launch_args_tolerates_launcher_arguments() {
        let options = parse_launch_args([
            "ghost-desktop",
            "-psn_0_4242",
            "--devtools",
            "--squirrel-firstrun",
        ]);
        assert!(options.devtools);
        assert!(!options.reset_window_state);
        assert_eq!(parse_launch_args(["ghost-desktop", "--help"]), LaunchOptions::default());
    }
}
