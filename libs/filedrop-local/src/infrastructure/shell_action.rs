//! Shell command processing action
//!
//! The post-processing step is a command line handed to a shell. Which shell
//! is used depends on the platform: Windows runs the executable named by
//! `APP_WIND` with `/C`, every other platform the one named by `APP_DEMO`
//! with `-c`. The choice is made once, when the action is built.

use std::future::Future;
use std::process::Stdio;

use filedrop_domain::{
    ingestion::{CommandResult, FileId, ProcessingError},
    ports::ProcessingAction,
};
use tokio::process::Command;
use tracing::{debug, warn};

/// Command line run for every upload; `{name}` is replaced by the identifier
pub const DEFAULT_COMMAND_TEMPLATE: &str = "echo Processing completed for {name}";

const UNIX_VARIABLE: &str = "APP_DEMO";
const WINDOWS_VARIABLE: &str = "APP_WIND";

/// Settings for building a [`ShellAction`]
#[derive(Debug, Clone)]
pub struct ShellActionConfig {
    /// Shell used on non-Windows platforms (`APP_DEMO`)
    pub unix_program: Option<String>,
    /// Shell used on Windows (`APP_WIND`)
    pub windows_program: Option<String>,
    /// Command line template, see [`DEFAULT_COMMAND_TEMPLATE`]
    pub command_template: String,
}

impl Default for ShellActionConfig {
    fn default() -> Self {
        Self {
            unix_program: None,
            windows_program: None,
            command_template: DEFAULT_COMMAND_TEMPLATE.to_string(),
        }
    }
}

/// Runs the configured command line through the platform shell
///
/// The identifier is substituted into the command line as is. Shell
/// metacharacters in file names are interpreted by the shell.
#[derive(Debug, Clone)]
pub struct ShellAction {
    program: Option<String>,
    variable: &'static str,
    flag: &'static str,
    template: String,
}

impl ShellAction {
    /// Select the shell for the platform this binary was built for
    ///
    /// A missing or empty program is not an error here; it makes every
    /// invocation fail with `ProcessingError::MissingExecutable`.
    pub fn for_current_platform(config: &ShellActionConfig) -> Self {
        let (program, variable, flag) = if cfg!(windows) {
            (&config.windows_program, WINDOWS_VARIABLE, "/C")
        } else {
            (&config.unix_program, UNIX_VARIABLE, "-c")
        };

        let program = program.as_ref().filter(|p| !p.trim().is_empty()).cloned();
        if program.is_none() {
            warn!(variable, "No processing executable configured");
        }

        Self {
            program,
            variable,
            flag,
            template: config.command_template.clone(),
        }
    }

    /// Executable this action launches, if configured
    pub fn program(&self) -> Option<&str> {
        self.program.as_deref()
    }

    /// Command line passed to the shell for `file_id`
    pub fn command_line(&self, file_id: &FileId) -> String {
        self.template.replace("{name}", file_id.as_str())
    }
}

impl ProcessingAction for ShellAction {
    fn invoke(
        &self,
        file_id: &FileId,
    ) -> impl Future<Output = Result<CommandResult, ProcessingError>> + Send {
        let program = self.program.clone();
        let variable = self.variable;
        let flag = self.flag;
        let command_line = self.command_line(file_id);

        async move {
            let Some(program) = program else {
                return Err(ProcessingError::MissingExecutable {
                    variable: variable.to_string(),
                });
            };

            debug!(program = %program, command = %command_line, "Launching action");

            let output = Command::new(&program)
                .arg(flag)
                .arg(&command_line)
                .stdin(Stdio::null())
                .output()
                .await
                .map_err(|source| ProcessingError::Launch {
                    program: program.clone(),
                    source,
                })?;

            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));

            if output.status.success() {
                Ok(CommandResult {
                    program,
                    exit_code: output.status.code(),
                    output: combined,
                })
            } else {
                Err(ProcessingError::NonZeroExit {
                    program,
                    code: output.status.code(),
                    output: combined,
                })
            }
        }
    }
}
