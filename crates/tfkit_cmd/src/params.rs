//! Parameter tables and the flag rendering engine.
//!
//! Every operation declares an ordered table of [`ParamSpec`] entries. The
//! table order is the order flags appear on the command line, so it is part
//! of each operation's observable behavior.

use std::fmt::Write as _;
use std::time::Duration;

use tfkit_runner::Executable;
use tracing::debug;

use crate::config::Configuration;
use crate::error::{TerraformError, TerraformResult};

/// Configuration key holding the execution timeout in milliseconds.
pub const TIMEOUT_KEY: &str = "timeout";

/// How a configuration entry turns into command-line tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderKind {
    /// `-flag`, only when the value is truthy
    Bare,
    /// `-flag=value`
    Assign,
    /// `-flag 'value'`
    QuotedAssign,
    /// `-flag=part` per comma-separated part
    RepeatAssign,
    /// `-flag 'part'` per comma-separated part
    RepeatQuoted,
    /// `-flag="part"` per comma-separated part
    RepeatDoubleQuoted,
    /// Consumed by the operation itself, never rendered
    Excluded,
}

/// Maps one configuration key to a flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub key: &'static str,
    pub flag: &'static str,
    pub kind: RenderKind,
}

impl ParamSpec {
    pub const fn new(key: &'static str, flag: &'static str, kind: RenderKind) -> Self {
        Self { key, flag, kind }
    }

    pub const fn bare(key: &'static str, flag: &'static str) -> Self {
        Self::new(key, flag, RenderKind::Bare)
    }

    pub const fn assign(key: &'static str, flag: &'static str) -> Self {
        Self::new(key, flag, RenderKind::Assign)
    }

    pub const fn quoted(key: &'static str, flag: &'static str) -> Self {
        Self::new(key, flag, RenderKind::QuotedAssign)
    }

    pub const fn repeat(key: &'static str, flag: &'static str) -> Self {
        Self::new(key, flag, RenderKind::RepeatAssign)
    }

    pub const fn repeat_quoted(key: &'static str, flag: &'static str) -> Self {
        Self::new(key, flag, RenderKind::RepeatQuoted)
    }

    pub const fn repeat_double_quoted(key: &'static str, flag: &'static str) -> Self {
        Self::new(key, flag, RenderKind::RepeatDoubleQuoted)
    }

    pub const fn excluded(key: &'static str) -> Self {
        Self::new(key, key, RenderKind::Excluded)
    }

    /// Append this entry's tokens for `value` to `out`, each followed by a space.
    pub fn render_into(&self, value: &str, out: &mut String) {
        let flag = self.flag;
        // Writing to a String cannot fail
        let _ = match self.kind {
            RenderKind::Bare if crate::config::is_truthy(value) => write!(out, "-{} ", flag),
            RenderKind::Bare | RenderKind::Excluded => Ok(()),
            RenderKind::Assign => write!(out, "-{}={} ", flag, value),
            RenderKind::QuotedAssign => write!(out, "-{} {} ", flag, single_quote(value)),
            RenderKind::RepeatAssign => split_list(value)
                .try_for_each(|part| write!(out, "-{}={} ", flag, part)),
            RenderKind::RepeatQuoted => split_list(value)
                .try_for_each(|part| write!(out, "-{} {} ", flag, single_quote(part))),
            RenderKind::RepeatDoubleQuoted => split_list(value)
                .try_for_each(|part| write!(out, "-{}={} ", flag, double_quote(part))),
        };
    }
}

/// Split a comma-delimited list, trimming parts and dropping empty ones.
pub fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|part| !part.is_empty())
}

/// Wrap in single quotes; embedded single quotes are closed, escaped and reopened.
fn single_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Wrap in double quotes, escaping the characters bash still expands there.
fn double_quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if matches!(c, '\\' | '"' | '$' | '`') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Render every entry of `specs` present in `config`, in table order.
pub fn render_options(specs: &[ParamSpec], config: &Configuration) -> String {
    let mut out = String::new();
    for spec in specs {
        if let Some(value) = config.get(spec.key) {
            spec.render_into(value, &mut out);
        }
    }
    out
}

/// The explicit timeout from `config`, if any.
pub fn resolve_timeout(config: &Configuration) -> TerraformResult<Option<Duration>> {
    config
        .get(TIMEOUT_KEY)
        .map(|value| {
            value
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|e| TerraformError::configuration(TIMEOUT_KEY, value, e))
        })
        .transpose()
}

/// A rendered option string plus the timeout it should run with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub options: String,
    pub timeout: Option<Duration>,
}

impl CommandInvocation {
    /// Resolve the timeout and render `specs` against `config`.
    pub fn render(specs: &[ParamSpec], config: &Configuration) -> TerraformResult<Self> {
        let timeout = resolve_timeout(config)?;
        Ok(Self {
            options: render_options(specs, config),
            timeout,
        })
    }

    /// Append a fixed `-flag `.
    pub fn push_flag(&mut self, flag: &str) {
        let _ = write!(self.options, "-{} ", flag);
    }

    /// Append a positional argument; nothing may follow it.
    pub fn push_positional(&mut self, value: &str) {
        self.options.push_str(value);
    }

    /// Run through `executor`: with the explicit timeout when one was
    /// configured, with the executor's default otherwise.
    pub fn execute<E: Executable>(&self, executor: &E) -> TerraformResult<String> {
        debug!("Rendered options: {:?} (timeout: {:?})", self.options, self.timeout);
        let output = match self.timeout {
            Some(timeout) => executor.execute_with_timeout(&self.options, timeout)?,
            None => executor.execute(&self.options)?,
        };
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tfkit_runner::{CapturedCall, MockExecutable};

    const SPECS: &[ParamSpec] = &[
        ParamSpec::repeat_quoted("tfVars", "var"),
        ParamSpec::repeat("varFiles", "var_file"),
        ParamSpec::assign("lockTimeout", "lock-timeout"),
        ParamSpec::quoted("message", "msg"),
        ParamSpec::repeat_double_quoted("backendConfig", "backend-config"),
        ParamSpec::bare("noColor", "no-color"),
        ParamSpec::excluded(TIMEOUT_KEY),
    ];

    #[test]
    fn test_empty_configuration_renders_nothing() {
        assert_eq!(render_options(SPECS, &Configuration::new()), "");
    }

    #[test]
    fn test_table_order_wins_over_insertion_order() {
        let config = Configuration::new()
            .with("noColor", "true")
            .with("lockTimeout", "1000")
            .with("tfVars", "a=1");

        assert_eq!(
            render_options(SPECS, &config),
            "-var 'a=1' -lock-timeout=1000 -no-color "
        );
    }

    #[test]
    fn test_repeat_kinds_split_and_trim() {
        let config = Configuration::new()
            .with("varFiles", " test1.txt,  test2.txt ,")
            .with("backendConfig", "bucket=state, key=app.tfstate");

        assert_eq!(
            render_options(SPECS, &config),
            "-var_file=test1.txt -var_file=test2.txt \
             -backend-config=\"bucket=state\" -backend-config=\"key=app.tfstate\" "
        );
    }

    #[test]
    fn test_single_quotes_are_escaped() {
        let config = Configuration::new()
            .with("message", "it's here")
            .with("tfVars", "name=o'brien");

        assert_eq!(
            render_options(SPECS, &config),
            r"-var 'name=o'\''brien' -msg 'it'\''s here' "
        );
    }

    #[test]
    fn test_double_quoted_values_escape_shell_expansion() {
        let config = Configuration::new().with("backendConfig", r#"token=a$b, path=C:\tf, note="x"`id`"#);

        assert_eq!(
            render_options(SPECS, &config),
            r#"-backend-config="token=a\$b" -backend-config="path=C:\\tf" -backend-config="note=\"x\"\`id\`" "#
        );
    }

    #[test]
    fn test_bare_flag_respects_falsy_values() {
        let off = Configuration::new().with("noColor", "false");
        assert_eq!(render_options(SPECS, &off), "");

        let on = Configuration::new().with("noColor", "");
        assert_eq!(render_options(SPECS, &on), "-no-color ");
    }

    #[test]
    fn test_timeout_is_never_rendered() {
        let config = Configuration::new().with(TIMEOUT_KEY, "1111");
        let invocation = CommandInvocation::render(SPECS, &config).unwrap();

        assert_eq!(invocation.options, "");
        assert_eq!(invocation.timeout, Some(Duration::from_millis(1111)));
    }

    #[test]
    fn test_non_numeric_timeout_is_rejected() {
        let config = Configuration::new().with(TIMEOUT_KEY, "ten minutes");
        let err = CommandInvocation::render(SPECS, &config).unwrap_err();

        match err {
            TerraformError::Configuration { key, value, .. } => {
                assert_eq!(key, "timeout");
                assert_eq!(value, "ten minutes");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_execute_picks_call_shape_from_timeout() {
        let mock = MockExecutable::new();

        let mut invocation =
            CommandInvocation::render(SPECS, &Configuration::new().with("noColor", "true")).unwrap();
        invocation.push_flag("auto-approve");
        invocation.push_positional("out.tfplan");
        invocation.execute(&mock).unwrap();

        let timed = CommandInvocation::render(SPECS, &Configuration::new().with(TIMEOUT_KEY, "5"))
            .unwrap();
        timed.execute(&mock).unwrap();

        assert_eq!(
            mock.get_calls(),
            vec![
                CapturedCall {
                    command: "-no-color -auto-approve out.tfplan".to_string(),
                    timeout: None,
                },
                CapturedCall {
                    command: String::new(),
                    timeout: Some(Duration::from_millis(5)),
                },
            ]
        );
    }
}
