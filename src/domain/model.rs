use crate::utils::error::{ModrunError, Result};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Marker file left behind by a running service inside its deployment directory.
pub const RUNNING_PID: &str = "RUNNING_PID";

pub const DEFAULT_TERMINAL: &str = "gnome-terminal -e";
pub const DEFAULT_COMPILE_COMMAND: &str = "sbt {module}/dist";

/// A named, versioned build artifact with one deployment instance per port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub name: String,
    pub version: String,
    pub build_output_dir: PathBuf,
    pub deploy_dir: PathBuf,
    pub ports: Vec<u16>,
}

impl Module {
    /// `{name}-{version}`, shared by the archive and the extracted directory.
    pub fn artifact_name(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }

    pub fn deployment_dir(&self) -> PathBuf {
        self.deploy_dir.join(self.artifact_name())
    }

    pub fn archive_path(&self) -> PathBuf {
        self.deploy_dir.join(format!("{}.zip", self.artifact_name()))
    }

    pub fn marker_path(&self) -> PathBuf {
        self.deployment_dir().join(RUNNING_PID)
    }

    pub fn executable_path(&self) -> PathBuf {
        self.deployment_dir().join("bin").join(&self.name)
    }

    /// `Configuration::new` rejects modules without ports.
    pub fn primary_port(&self) -> u16 {
        self.ports[0]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomCommand {
    pub name: String,
    pub command: String,
}

/// What a command name on the command line resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run,
    Multirun,
    Deploy,
    Compile,
    Print,
    Custom(String),
}

impl Command {
    pub const RESERVED: [&'static str; 5] = ["run", "multirun", "deploy", "compile", "print"];

    /// Reserved verbs match exactly and case-sensitively; anything else is a custom command.
    pub fn parse(name: &str) -> Self {
        match name {
            "run" => Command::Run,
            "multirun" => Command::Multirun,
            "deploy" => Command::Deploy,
            "compile" => Command::Compile,
            "print" => Command::Print,
            other => Command::Custom(other.to_string()),
        }
    }

    pub fn is_reserved(name: &str) -> bool {
        Self::RESERVED.contains(&name)
    }

    pub fn name(&self) -> &str {
        match self {
            Command::Run => "run",
            Command::Multirun => "multirun",
            Command::Deploy => "deploy",
            Command::Compile => "compile",
            Command::Print => "print",
            Command::Custom(name) => name,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Validated, read-only configuration for one invocation.
#[derive(Debug, Clone)]
pub struct Configuration {
    shell: PathBuf,
    project_root: PathBuf,
    terminal: String,
    compile_command: String,
    modules: Vec<Module>,
    custom_commands: Vec<CustomCommand>,
    module_index: HashMap<String, usize>,
    custom_command_index: HashMap<String, usize>,
}

impl Configuration {
    /// Enforces the cross-entry invariants: at least one entry, no reserved
    /// custom command names, unique names. Per-field checks belong to the loader.
    pub fn new(
        shell: impl Into<PathBuf>,
        project_root: impl Into<PathBuf>,
        modules: Vec<Module>,
        custom_commands: Vec<CustomCommand>,
    ) -> Result<Self> {
        if modules.is_empty() && custom_commands.is_empty() {
            return Err(ModrunError::EmptyConfigError);
        }

        if let Some(module) = modules.iter().find(|m| m.ports.is_empty()) {
            return Err(ModrunError::InvalidConfigValueError {
                field: format!("{}.ports", module.name),
                value: "[]".to_string(),
                reason: "A module needs at least one port".to_string(),
            });
        }

        for custom in &custom_commands {
            if Command::is_reserved(&custom.name) {
                return Err(ModrunError::ReservedNameError {
                    name: custom.name.clone(),
                    reserved: Command::RESERVED.join(", "),
                });
            }
        }

        let module_index = build_index("module", modules.iter().map(|m| m.name.as_str()))?;
        let custom_command_index = build_index(
            "custom command",
            custom_commands.iter().map(|c| c.name.as_str()),
        )?;

        Ok(Self {
            shell: shell.into(),
            project_root: project_root.into(),
            terminal: DEFAULT_TERMINAL.to_string(),
            compile_command: DEFAULT_COMPILE_COMMAND.to_string(),
            modules,
            custom_commands,
            module_index,
            custom_command_index,
        })
    }

    pub fn with_terminal(mut self, terminal: impl Into<String>) -> Self {
        self.terminal = terminal.into();
        self
    }

    pub fn with_compile_command(mut self, compile_command: impl Into<String>) -> Self {
        self.compile_command = compile_command.into();
        self
    }

    pub fn shell(&self) -> &Path {
        &self.shell
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn terminal(&self) -> &str {
        &self.terminal
    }

    pub fn compile_command(&self) -> &str {
        &self.compile_command
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn custom_commands(&self) -> &[CustomCommand] {
        &self.custom_commands
    }

    pub fn module(&self, name: &str) -> Option<&Module> {
        self.module_index.get(name).map(|&i| &self.modules[i])
    }

    pub fn custom_command(&self, name: &str) -> Option<&CustomCommand> {
        self.custom_command_index
            .get(name)
            .map(|&i| &self.custom_commands[i])
    }
}

fn build_index<'a>(
    kind: &'static str,
    names: impl Iterator<Item = &'a str>,
) -> Result<HashMap<String, usize>> {
    let mut index = HashMap::new();
    for (i, name) in names.enumerate() {
        if index.insert(name.to_string(), i).is_some() {
            return Err(ModrunError::DuplicateNameError {
                kind,
                name: name.to_string(),
            });
        }
    }
    Ok(index)
}
