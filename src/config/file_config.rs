use crate::core::{Configuration, CustomCommand, Module};
use crate::utils::error::{ModrunError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// The config file as written on disk, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    pub project_root: Option<String>,
    pub shell: Option<String>,
    pub terminal: Option<String>,
    pub compile_command: Option<String>,
    #[serde(default)]
    pub modules: Vec<ModuleEntry>,
    #[serde(default)]
    pub custom_commands: Vec<CustomCommandEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleEntry {
    pub name: Option<String>,
    pub build_zip_can_be_found_in_folder: Option<String>,
    pub zip_shall_be_extracted_to_folder: Option<String>,
    pub version: Option<String>,
    pub ports: Option<Vec<u32>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomCommandEntry {
    pub name: Option<String>,
    pub command: Option<String>,
}

impl ConfigFile {
    /// Loads JSON, or TOML when the file name ends in `.toml`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ModrunError::ConfigReadError {
            path: path.to_path_buf(),
            source,
        })?;

        let is_toml = path.extension().and_then(|e| e.to_str()) == Some("toml");
        let parsed: std::result::Result<Self, String> = if is_toml {
            toml::from_str(&content).map_err(|e| e.to_string())
        } else {
            serde_json::from_str(&content).map_err(|e| e.to_string())
        };

        parsed
            .map_err(|message| ModrunError::ConfigParseError {
                path: path.to_path_buf(),
                message,
            })?
            .expand_env_vars()
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str::<Self>(content)
            .map_err(|e| ModrunError::ConfigParseError {
                path: PathBuf::from("<json>"),
                message: e.to_string(),
            })?
            .expand_env_vars()
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| ModrunError::ConfigParseError {
                path: PathBuf::from("<toml>"),
                message: e.to_string(),
            })?
            .expand_env_vars()
    }

    /// Expands `${VAR}` inside every parsed string value, so variable contents
    /// never have to be escaped for the file format.
    fn expand_env_vars(mut self) -> Result<Self> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ModrunError::InvalidConfigValueError {
            field: "env_substitution".to_string(),
            value: String::new(),
            reason: e.to_string(),
        })?;

        let fields = [
            &mut self.project_root,
            &mut self.shell,
            &mut self.terminal,
            &mut self.compile_command,
        ];
        for value in fields.into_iter().flatten() {
            *value = substitute_env_vars(&re, value);
        }

        for module in &mut self.modules {
            let fields = [
                &mut module.name,
                &mut module.version,
                &mut module.build_zip_can_be_found_in_folder,
                &mut module.zip_shall_be_extracted_to_folder,
            ];
            for value in fields.into_iter().flatten() {
                *value = substitute_env_vars(&re, value);
            }
        }

        for custom in &mut self.custom_commands {
            for value in [&mut custom.name, &mut custom.command].into_iter().flatten() {
                *value = substitute_env_vars(&re, value);
            }
        }

        Ok(self)
    }

    /// Validates every field and builds the immutable configuration.
    pub fn into_configuration(self) -> Result<Configuration> {
        self.validate()?;

        let modules = self
            .modules
            .iter()
            .enumerate()
            .map(|(i, entry)| entry.to_module(i))
            .collect::<Result<Vec<_>>>()?;

        let custom_commands = self
            .custom_commands
            .iter()
            .enumerate()
            .map(|(i, entry)| entry.to_custom_command(i))
            .collect::<Result<Vec<_>>>()?;

        let project_root = validation::validate_required_string("projectRoot", &self.project_root)?;
        let shell = validation::validate_required_string("shell", &self.shell)?;

        let mut config = Configuration::new(shell, project_root, modules, custom_commands)?;
        if let Some(terminal) = self.terminal.filter(|t| !t.trim().is_empty()) {
            config = config.with_terminal(terminal);
        }
        if let Some(compile) = self.compile_command.filter(|c| !c.trim().is_empty()) {
            config = config.with_compile_command(compile);
        }
        Ok(config)
    }
}

/// Replaces `${VAR}` with the environment value; unknown variables stay as written.
fn substitute_env_vars(re: &Regex, value: &str) -> String {
    re.replace_all(value, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    })
    .into_owned()
}

impl ModuleEntry {
    fn to_module(&self, index: usize) -> Result<Module> {
        let field = |name: &str| format!("modules[{}].{}", index, name);

        let name = validation::validate_required_string(&field("name"), &self.name)?;
        let version = validation::validate_required_string(&field("version"), &self.version)?;

        let build_dir_field = field("buildZipCanBeFoundInFolder");
        let build_dir = validation::validate_required_string(
            &build_dir_field,
            &self.build_zip_can_be_found_in_folder,
        )?;
        validation::validate_directory(&build_dir_field, build_dir)?;

        let deploy_dir_field = field("zipShallBeExtractedToFolder");
        let deploy_dir = validation::validate_required_string(
            &deploy_dir_field,
            &self.zip_shall_be_extracted_to_folder,
        )?;
        validation::validate_directory(&deploy_dir_field, deploy_dir)?;

        let ports_field = field("ports");
        let raw_ports = validation::validate_required_field(&ports_field, &self.ports)?;
        validation::validate_non_empty_list(&ports_field, raw_ports)?;
        let ports = raw_ports
            .iter()
            .map(|&port| validation::validate_port(&ports_field, port))
            .collect::<Result<Vec<_>>>()?;

        Ok(Module {
            name: name.to_string(),
            version: version.to_string(),
            build_output_dir: PathBuf::from(build_dir),
            deploy_dir: PathBuf::from(deploy_dir),
            ports,
        })
    }
}

impl CustomCommandEntry {
    fn to_custom_command(&self, index: usize) -> Result<CustomCommand> {
        let name = validation::validate_required_string(
            &format!("customCommands[{}].name", index),
            &self.name,
        )?;
        let command = validation::validate_required_string(
            &format!("customCommands[{}].command", index),
            &self.command,
        )?;

        Ok(CustomCommand {
            name: name.to_string(),
            command: command.to_string(),
        })
    }
}

impl Validate for ConfigFile {
    /// Top-level fields only; entries are checked while they are converted.
    fn validate(&self) -> Result<()> {
        if self.modules.is_empty() && self.custom_commands.is_empty() {
            return Err(ModrunError::EmptyConfigError);
        }

        let project_root = validation::validate_required_string("projectRoot", &self.project_root)?;
        validation::validate_directory("projectRoot", project_root)?;

        let shell = validation::validate_required_string("shell", &self.shell)?;
        validation::validate_existing_file("shell", shell)?;

        Ok(())
    }
}
