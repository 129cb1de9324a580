use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModrunError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to read config file {path}: {source}")]
    ConfigReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Custom command '{name}' uses a reserved word (reserved: {reserved})")]
    ReservedNameError { name: String, reserved: String },

    #[error("Duplicate {kind} name in config: '{name}'")]
    DuplicateNameError { kind: &'static str, name: String },

    #[error("No modules or custom commands configured")]
    EmptyConfigError,

    #[error("No module specified as second argument for '{command}'")]
    MissingModuleArgument { command: String },

    #[error("Requested module does not exist in config: '{0}'")]
    ModuleNotFound(String),

    #[error("Requested custom command does not exist in config: '{0}'")]
    CustomCommandNotFound(String),

    #[error("Can't find deployment directory (is version correct?): {}", .0.display())]
    DeploymentDirMissing(PathBuf),

    #[error("RUNNING_PID file exists but couldn't be deleted: {}: {source}", path.display())]
    MarkerNotDeletable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Can't deploy '{module}': archive {} not found. Run compile first", path.display())]
    ArchiveMissing { module: String, path: PathBuf },

    #[error("Archive {} is unreadable: {source}", path.display())]
    ArchiveUnreadable {
        path: PathBuf,
        source: zip::result::ZipError,
    },

    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("Command exited with code {code}: {command}")]
    CommandFailed { command: String, code: i32 },

    #[error("Failed to launch at port {port} (exit code {code})")]
    PortLaunchFailed { port: u16, code: i32 },

    #[error("Couldn't execute '{command}': {source}")]
    SpawnFailed {
        command: String,
        source: std::io::Error,
    },

    #[error("Process interrupted while running '{command}': {source}")]
    WaitFailed {
        command: String,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Lookup,
    Filesystem,
    Subprocess,
}

impl ModrunError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ModrunError::ConfigReadError { .. }
            | ModrunError::ConfigParseError { .. }
            | ModrunError::MissingConfigError { .. }
            | ModrunError::InvalidConfigValueError { .. }
            | ModrunError::ReservedNameError { .. }
            | ModrunError::DuplicateNameError { .. }
            | ModrunError::EmptyConfigError => ErrorCategory::Configuration,
            ModrunError::MissingModuleArgument { .. }
            | ModrunError::ModuleNotFound(_)
            | ModrunError::CustomCommandNotFound(_) => ErrorCategory::Lookup,
            ModrunError::IoError(_)
            | ModrunError::DeploymentDirMissing(_)
            | ModrunError::MarkerNotDeletable { .. }
            | ModrunError::ArchiveMissing { .. }
            | ModrunError::ArchiveUnreadable { .. }
            | ModrunError::NotADirectory(_) => ErrorCategory::Filesystem,
            ModrunError::CommandFailed { .. }
            | ModrunError::PortLaunchFailed { .. }
            | ModrunError::SpawnFailed { .. }
            | ModrunError::WaitFailed { .. } => ErrorCategory::Subprocess,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ModrunError::ConfigReadError { .. } => {
                "Create a config file or point --config at an existing one"
            }
            ModrunError::ConfigParseError { .. } => "Check the config file syntax",
            ModrunError::ReservedNameError { .. } => {
                "Rename the custom command, it must not be run, multirun, deploy, compile or print"
            }
            ModrunError::MissingModuleArgument { .. } => {
                "Pass the module name as the second argument"
            }
            ModrunError::ModuleNotFound(_) | ModrunError::CustomCommandNotFound(_) => {
                "Run 'print' to list configured modules and custom commands"
            }
            ModrunError::DeploymentDirMissing(_) => {
                "Check the module version in the config or run deploy first"
            }
            ModrunError::ArchiveMissing { .. } => "Run compile for the module first",
            ModrunError::MarkerNotDeletable { .. } => {
                "Check permissions on the deployment directory"
            }
            ModrunError::PortLaunchFailed { .. } | ModrunError::CommandFailed { .. } => {
                "See the command output above"
            }
            ModrunError::SpawnFailed { .. } => "Check the 'shell' path in the config",
            _ => match self.category() {
                ErrorCategory::Configuration => "Fix the config file and try again",
                _ => "Check the message above and try again",
            },
        }
    }

    pub fn user_friendly_message(&self) -> String {
        let prefix = match self.category() {
            ErrorCategory::Configuration => "Configuration error",
            ErrorCategory::Lookup => "Lookup error",
            ErrorCategory::Filesystem => "Filesystem error",
            ErrorCategory::Subprocess => "Command error",
        };
        format!("{}: {}", prefix, self)
    }

    /// Process exit status for this error. A failed subprocess passes its own code through.
    pub fn exit_code(&self) -> i32 {
        match self {
            ModrunError::CommandFailed { code, .. } | ModrunError::PortLaunchFailed { code, .. }
                if *code > 0 && *code < 256 =>
            {
                *code
            }
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, ModrunError>;
