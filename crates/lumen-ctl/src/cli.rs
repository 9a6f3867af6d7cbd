use std::path::PathBuf;

static HELP_STR_SOCKET: &str = "
    Path of the shell daemon's control socket. Without this flag the \
                                socket is looked up at \
                                $XDG_RUNTIME_DIR/lumen-shell.sock. Example \
                                value: \"/run/user/1000/lumen-shell.sock\"
";

#[derive(clap::Parser, Debug)]
#[command(
    name = "lumenctl",
    version,
    about = "Control CLI for the Lumen shell",
    long_about = "Sends one-shot control requests (show/hide/toggle shell \
                  components, volume, brightness, theme) to a running Lumen \
                  shell daemon over its local control socket"
)]
pub struct Args {
    #[arg(long, short = 's', value_name = "SOCKET_PATH", help = HELP_STR_SOCKET)]
    pub socket: Option<PathBuf>,

    #[arg(
        long,
        short = 't',
        value_name = "SECONDS",
        help = "Seconds to wait for the daemon's reply before giving up",
        default_value_t = 5
    )]
    pub timeout: u64,

    #[arg(
        long,
        short = 'l',
        value_name = "LOG_PATH",
        help = "Optional log path value. If not provided, logs go to stderr \
                filtered by RUST_LOG"
    )]
    pub log_path: Option<PathBuf>,

    /// Command words, e.g. `volume set 0.7` or `app-switcher toggle`.
    /// Run with no words for the command overview.
    #[arg(value_name = "COMMAND", trailing_var_arg = true)]
    pub command: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn command_words_pass_through_untouched() {
        let args = Args::parse_from(["lumenctl", "volume", "set", "0.7"]);
        assert_eq!(args.command, ["volume", "set", "0.7"]);
        assert_eq!(args.timeout, 5);
        assert!(args.socket.is_none());
    }

    #[test]
    fn options_are_stripped_before_the_command() {
        let args = Args::parse_from([
            "lumenctl",
            "--socket",
            "/tmp/x.sock",
            "--timeout",
            "2",
            "theme",
            "dark",
        ]);
        assert_eq!(args.socket.as_deref(), Some(std::path::Path::new("/tmp/x.sock")));
        assert_eq!(args.timeout, 2);
        assert_eq!(args.command, ["theme", "dark"]);
    }

    #[test]
    fn no_command_words_is_valid() {
        let args = Args::parse_from(["lumenctl"]);
        assert!(args.command.is_empty());
    }
}
