//! Command line configuration types.

use std::time::Duration;

/// Timeout applied by [`crate::Executable::execute`] unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(600_000);

/// Shell used to interpret command strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shell {
    /// Shell program
    pub program: String,
    /// Arguments placed before the command string
    pub args: Vec<String>,
}

impl Shell {
    /// `cmd /c` on Windows hosts, `bash -c` everywhere else.
    pub fn detect() -> Self {
        if cfg!(windows) {
            Self::cmd()
        } else {
            Self::bash()
        }
    }

    pub fn bash() -> Self {
        Self::new("bash", ["-c"])
    }

    pub fn cmd() -> Self {
        Self::new("cmd", ["/c"])
    }

    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Full argument vector for running `command`.
    pub fn argv(&self, command: &str) -> Vec<String> {
        let mut argv = self.args.clone();
        argv.push(command.to_string());
        argv
    }

    /// Whether this is the Windows command interpreter.
    pub fn is_cmd(&self) -> bool {
        self.program.eq_ignore_ascii_case("cmd") || self.program.eq_ignore_ascii_case("cmd.exe")
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::detect()
    }
}

/// Options for a [`crate::CommandLine`].
#[derive(Debug, Clone)]
pub struct CommandLineOptions {
    /// Timeout used when the caller does not pass one
    pub default_timeout: Duration,
    /// Dry-run mode (log commands without executing)
    pub dry_run: bool,
    /// Shell the command string is handed to
    pub shell: Shell,
}

impl Default for CommandLineOptions {
    fn default() -> Self {
        Self {
            default_timeout: DEFAULT_TIMEOUT,
            dry_run: false,
            shell: Shell::detect(),
        }
    }
}

impl CommandLineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    pub fn shell(mut self, shell: Shell) -> Self {
        self.shell = shell;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = CommandLineOptions::default();

        assert_eq!(options.default_timeout, Duration::from_millis(600_000));
        assert!(!options.dry_run);
        assert_eq!(options.shell, Shell::detect());
    }

    #[test]
    fn test_options_builder() {
        let options = CommandLineOptions::new()
            .default_timeout(Duration::from_secs(5))
            .dry_run()
            .shell(Shell::new("sh", ["-c"]));

        assert_eq!(options.default_timeout, Duration::from_secs(5));
        assert!(options.dry_run);
        assert_eq!(options.shell.program, "sh");
    }

    #[test]
    fn test_shell_argv_keeps_command_whole() {
        let argv = Shell::bash().argv("terraform plan -var 'a=b c'");
        assert_eq!(argv, vec!["-c".to_string(), "terraform plan -var 'a=b c'".to_string()]);

        let argv = Shell::cmd().argv("terraform init");
        assert_eq!(argv, vec!["/c".to_string(), "terraform init".to_string()]);
        assert!(Shell::cmd().is_cmd());
        assert!(!Shell::bash().is_cmd());
    }

    #[cfg(unix)]
    #[test]
    fn test_detect_on_unix_is_bash() {
        assert_eq!(Shell::detect(), Shell::bash());
    }
}
