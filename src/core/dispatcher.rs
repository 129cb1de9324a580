use crate::core::lifecycle::{LifecycleManager, SETTLE_DELAY};
use crate::core::printer::print_config;
use crate::core::{Command, Configuration, Executor, Module};
use crate::utils::error::{ModrunError, Result};
use std::time::Duration;

/// Single entry point: resolves a command name and runs the matching operation.
pub struct Dispatcher<E: Executor> {
    config: Configuration,
    executor: E,
    settle_delay: Duration,
}

impl<E: Executor> Dispatcher<E> {
    pub fn new(config: Configuration, executor: E) -> Self {
        Self {
            config,
            executor,
            settle_delay: SETTLE_DELAY,
        }
    }

    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Returns the exit code of the operation. Every failure comes back as an
    /// error; the caller decides how to terminate.
    pub async fn dispatch(&self, command_name: &str, module_arg: Option<&str>) -> Result<i32> {
        let command = Command::parse(command_name);
        tracing::debug!("Dispatching '{}' (module: {:?})", command, module_arg);

        match &command {
            Command::Print => {
                let stdout = std::io::stdout();
                print_config(&self.config, &mut stdout.lock())?;
                Ok(0)
            }
            Command::Custom(name) => self.run_custom_command(name).await,
            Command::Run => {
                let module = self.resolve_module(&command, module_arg)?;
                self.lifecycle().run(module).await
            }
            Command::Multirun => {
                let module = self.resolve_module(&command, module_arg)?;
                self.lifecycle().multirun(module).await
            }
            Command::Deploy => {
                let module = self.resolve_module(&command, module_arg)?;
                self.lifecycle().deploy(module).await
            }
            Command::Compile => {
                let module = self.resolve_module(&command, module_arg)?;
                self.lifecycle().compile(module).await
            }
        }
    }

    fn lifecycle(&self) -> LifecycleManager<'_, E> {
        LifecycleManager::new(&self.config, &self.executor).with_settle_delay(self.settle_delay)
    }

    fn resolve_module(&self, command: &Command, module_arg: Option<&str>) -> Result<&Module> {
        let name = module_arg.ok_or_else(|| ModrunError::MissingModuleArgument {
            command: command.to_string(),
        })?;
        self.config
            .module(name)
            .ok_or_else(|| ModrunError::ModuleNotFound(name.to_string()))
    }

    async fn run_custom_command(&self, name: &str) -> Result<i32> {
        let custom = self
            .config
            .custom_command(name)
            .ok_or_else(|| ModrunError::CustomCommandNotFound(name.to_string()))?;

        tracing::info!("+ running custom command '{}'", custom.name);
        let code = self.executor.execute(&custom.command).await?;
        if code != 0 {
            return Err(ModrunError::CommandFailed {
                command: custom.command.clone(),
                code,
            });
        }
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::RecordingExecutor;
    use crate::core::CustomCommand;
    use std::path::Path;
    use tempfile::TempDir;
    use tokio_test::{assert_err, assert_ok};

    fn config(deploy_dir: &Path) -> Configuration {
        Configuration::new(
            "/bin/sh",
            "/work/project",
            vec![Module {
                name: "api".to_string(),
                version: "2.0".to_string(),
                build_output_dir: deploy_dir.to_path_buf(),
                deploy_dir: deploy_dir.to_path_buf(),
                ports: vec![9000],
            }],
            vec![CustomCommand {
                name: "es".to_string(),
                command: "./elasticsearch".to_string(),
            }],
        )
        .unwrap()
    }

    fn dispatcher(dir: &TempDir, executor: RecordingExecutor) -> Dispatcher<RecordingExecutor> {
        Dispatcher::new(config(dir.path()), executor).with_settle_delay(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_print_returns_zero_without_side_effects() {
        let dir = TempDir::new().unwrap();
        let d = dispatcher(&dir, RecordingExecutor::succeeding());

        assert_eq!(assert_ok!(d.dispatch("print", None).await), 0);
        assert_eq!(assert_ok!(d.dispatch("print", Some("whatever")).await), 0);
        assert!(d.executor().lines().is_empty());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_lifecycle_verb_requires_module_argument() {
        let dir = TempDir::new().unwrap();
        let d = dispatcher(&dir, RecordingExecutor::succeeding());

        for verb in ["run", "multirun", "deploy", "compile"] {
            let err = assert_err!(d.dispatch(verb, None).await);
            assert!(matches!(err, ModrunError::MissingModuleArgument { ref command } if command == verb));
        }
        assert!(d.executor().lines().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_module_is_lookup_error() {
        let dir = TempDir::new().unwrap();
        let d = dispatcher(&dir, RecordingExecutor::succeeding());

        let err = assert_err!(d.dispatch("run", Some("missing-module")).await);
        assert!(matches!(err, ModrunError::ModuleNotFound(ref name) if name == "missing-module"));
        assert!(d.executor().lines().is_empty());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_custom_command_runs_body() {
        let dir = TempDir::new().unwrap();
        let d = dispatcher(&dir, RecordingExecutor::succeeding());

        assert_eq!(assert_ok!(d.dispatch("es", None).await), 0);
        assert_eq!(d.executor().lines(), vec!["./elasticsearch".to_string()]);
    }

    #[tokio::test]
    async fn test_custom_command_lookup_is_case_sensitive() {
        let dir = TempDir::new().unwrap();
        let d = dispatcher(&dir, RecordingExecutor::succeeding());

        let err = assert_err!(d.dispatch("ES", None).await);
        assert!(matches!(err, ModrunError::CustomCommandNotFound(ref name) if name == "ES"));
        assert!(d.executor().lines().is_empty());
    }

    #[tokio::test]
    async fn test_custom_command_nonzero_exit_is_fatal() {
        let dir = TempDir::new().unwrap();
        let d = dispatcher(&dir, RecordingExecutor::with_responder(|_| 4));

        let err = assert_err!(d.dispatch("es", None).await);
        assert_eq!(err.exit_code(), 4);
    }

    #[tokio::test]
    async fn test_compile_routes_to_lifecycle() {
        let dir = TempDir::new().unwrap();
        let d = dispatcher(&dir, RecordingExecutor::succeeding());

        assert_eq!(assert_ok!(d.dispatch("compile", Some("api")).await), 0);
        assert_eq!(
            d.executor().lines(),
            vec!["(cd '/work/project' && exec sbt api/dist)".to_string()]
        );
    }

    #[tokio::test]
    async fn test_run_routes_to_lifecycle() {
        let dir = TempDir::new().unwrap();
        let d = dispatcher(&dir, RecordingExecutor::succeeding());

        let err = assert_err!(d.dispatch("run", Some("api")).await);
        assert!(matches!(err, ModrunError::DeploymentDirMissing(_)));

        std::fs::create_dir_all(dir.path().join("api-2.0")).unwrap();
        assert_eq!(assert_ok!(d.dispatch("run", Some("api")).await), 0);
        assert_eq!(d.executor().lines().len(), 1);
    }
}
