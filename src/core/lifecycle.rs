use crate::core::{Configuration, Executor, Module};
use crate::utils::error::{ModrunError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;
use uuid::Uuid;

/// Pause between consecutive launches of a multirun.
pub const SETTLE_DELAY: Duration = Duration::from_millis(1000);

/// Deployment-directory housekeeping and launch sequencing for modules.
///
/// Launches are fire-and-forget: a launch call returns once the terminal
/// launcher command has returned, not once the service is ready.
pub struct LifecycleManager<'a, E: Executor> {
    config: &'a Configuration,
    executor: &'a E,
    settle_delay: Duration,
}

impl<'a, E: Executor> LifecycleManager<'a, E> {
    pub fn new(config: &'a Configuration, executor: &'a E) -> Self {
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

    /// Clears the stale marker and launches the module on its first port.
    pub async fn run(&self, module: &Module) -> Result<i32> {
        require_deployment_dir(module)?;
        delete_marker(module)?;

        tracing::info!("+ launching {} on port {}", module.name, module.primary_port());
        self.execute_checked(&self.launch_command(module, module.primary_port()))
            .await
    }

    /// Launches one instance per configured port, in order, stopping at the first failure.
    pub async fn multirun(&self, module: &Module) -> Result<i32> {
        require_deployment_dir(module)?;
        delete_marker(module)?;

        let mut last_exit_code = 0;
        for &port in &module.ports {
            tracing::info!("+ trying to run {} on port: {}", module.name, port);
            delete_marker(module)?;

            last_exit_code = self
                .executor
                .execute(&self.launch_command(module, port))
                .await?;

            tokio::time::sleep(self.settle_delay).await;
            delete_marker(module)?;

            if last_exit_code != 0 {
                return Err(ModrunError::PortLaunchFailed {
                    port,
                    code: last_exit_code,
                });
            }
        }

        Ok(last_exit_code)
    }

    /// Replaces the deployment directory with a fresh extraction of the archive, then runs it.
    pub async fn deploy(&self, module: &Module) -> Result<i32> {
        let deployment_dir = module.deployment_dir();
        let archive_path = module.archive_path();

        if !archive_path.is_file() {
            return Err(ModrunError::ArchiveMissing {
                module: module.name.clone(),
                path: archive_path,
            });
        }
        inspect_archive(module, &archive_path)?;

        if deployment_dir.exists() {
            if !deployment_dir.is_dir() {
                return Err(ModrunError::NotADirectory(deployment_dir));
            }
            tracing::info!("+ deleting {}", deployment_dir.display());
            self.execute_checked(&format!("rm -r {}", quote(&deployment_dir)))
                .await?;
        }

        tracing::info!("+ unzipping {}", archive_path.display());
        self.execute_checked(&format!(
            "unzip {} -d {}",
            quote(&archive_path),
            quote(&module.deploy_dir)
        ))
        .await?;

        tracing::info!("+ trying to run {}", module.name);
        self.run(module).await
    }

    /// Runs the configured build invocation inside the project root.
    pub async fn compile(&self, module: &Module) -> Result<i32> {
        let build = self.config.compile_command().replace("{module}", &module.name);
        let line = format!(
            "(cd {} && exec {})",
            quote(self.config.project_root()),
            build
        );

        tracing::info!("+ compiling {}", module.name);
        self.execute_checked(&line).await
    }

    /// Shell line that opens a terminal running the module's executable with a
    /// fresh secret and the given port.
    pub fn launch_command(&self, module: &Module, port: u16) -> String {
        format!(
            "{} \"{} -Dplay.http.secret.key='{}' -Dhttp.port={}\"",
            self.config.terminal(),
            module.executable_path().display(),
            Uuid::new_v4(),
            port
        )
    }

    async fn execute_checked(&self, line: &str) -> Result<i32> {
        let code = self.executor.execute(line).await?;
        if code != 0 {
            return Err(ModrunError::CommandFailed {
                command: line.to_string(),
                code,
            });
        }
        Ok(code)
    }
}

fn require_deployment_dir(module: &Module) -> Result<()> {
    let deployment_dir = module.deployment_dir();
    if !deployment_dir.is_dir() {
        return Err(ModrunError::DeploymentDirMissing(deployment_dir));
    }
    Ok(())
}

/// Removes `RUNNING_PID` if present. Absence is not an error.
pub fn delete_marker(module: &Module) -> Result<()> {
    let path = module.marker_path();
    match fs::remove_file(&path) {
        Ok(()) => {
            tracing::debug!("Deleted stale marker {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(source) => Err(ModrunError::MarkerNotDeletable { path, source }),
    }
}

/// Opens the archive before anything is deleted, so a corrupt build never
/// costs the current deployment.
fn inspect_archive(module: &Module, archive_path: &Path) -> Result<()> {
    let unreadable = |source| ModrunError::ArchiveUnreadable {
        path: archive_path.to_path_buf(),
        source,
    };

    let file = fs::File::open(archive_path)?;
    let archive = zip::ZipArchive::new(file).map_err(unreadable)?;

    let prefix = format!("{}/", module.artifact_name());
    if !archive.file_names().any(|name| name.starts_with(&prefix)) {
        tracing::warn!(
            "{} has no top-level {} entry, extraction may not produce the expected directory",
            archive_path.display(),
            prefix
        );
    }
    tracing::debug!("{} holds {} entries", archive_path.display(), archive.len());
    Ok(())
}

fn quote(path: &Path) -> String {
    format!("'{}'", path.display().to_string().replace('\'', r"'\''"))
}
