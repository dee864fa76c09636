//! dockhand deploy - Upload a file to the server and optionally place it in a container.
//!
//! The file always lands in `/tmp/<basename>` first. With a container path it
//! is then `docker cp`'d into the configured container and the compose
//! service is restarted.

use std::path::{Path, PathBuf};

use console::style;

use crate::config::AppConfig;
use crate::connector::ssh::{self, RemoteSession, SessionGuard};
use crate::error::{DockhandError, Result};

/// Remote directory used as the upload target.
pub const STAGING_DIR: &str = "/tmp";

/// Everything needed to run one deployment, resolved before connecting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployPlan {
    pub local_path: PathBuf,
    pub staging_path: String,
    pub container: String,
    pub container_path: Option<String>,
}

impl DeployPlan {
    pub fn new(
        config: &AppConfig,
        local_path: impl Into<PathBuf>,
        container_path: Option<String>,
    ) -> Result<Self> {
        let local_path = local_path.into();
        let staging_path = staging_path(&local_path)?;

        Ok(Self {
            local_path,
            staging_path,
            container: config.container.clone(),
            container_path: container_path.filter(|p| !p.is_empty()),
        })
    }

    /// Commands to run after the upload, in order.
    pub fn container_commands(&self) -> Vec<String> {
        match &self.container_path {
            Some(path) => vec![
                copy_command(&self.staging_path, &self.container, path),
                restart_command(&self.container),
            ],
            None => Vec::new(),
        }
    }
}

/// `/tmp/` joined with the local file's base name.
pub fn staging_path(local_path: &Path) -> Result<String> {
    let name = local_path.file_name().ok_or_else(|| {
        DockhandError::Transfer(format!(
            "Cannot determine a file name for {}",
            local_path.display()
        ))
    })?;

    Ok(format!("{}/{}", STAGING_DIR, name.to_string_lossy()))
}

pub fn copy_command(staged: &str, container: &str, container_path: &str) -> String {
    format!("docker cp {} {}:{}", staged, container, container_path)
}

pub fn restart_command(container: &str) -> String {
    format!("docker compose restart {}", container)
}

/// Execute the deploy command.
pub async fn execute(
    config: &AppConfig,
    local_file: PathBuf,
    container_path: Option<String>,
) -> Result<()> {
    config.validate()?;
    let plan = DeployPlan::new(config, local_file, container_path)?;
    tracing::debug!(commands = ?plan.container_commands(), "deploy plan ready");

    println!(
        "{} Connecting to {}...",
        style("→").cyan().bold(),
        style(&config.host).white().bold()
    );
    let client = ssh::connect(config).await?;
    println!("{} Connected", style("✓").green().bold());

    let guard = SessionGuard::new(client);
    let outcome = run(guard.session(), &plan).await;
    guard.finish(outcome).await?;

    println!();
    println!("{}", style("Deployment successful!").green().bold());
    Ok(())
}

/// Upload, then run the container commands if any.
///
/// Command output is drained but not inspected. A failing `docker cp` or
/// restart still counts as success here.
pub async fn run<S: RemoteSession + ?Sized>(session: &S, plan: &DeployPlan) -> Result<()> {
    println!(
        "{} Uploading {} to {}...",
        style("→").cyan().bold(),
        plan.local_path.display(),
        plan.staging_path
    );
    session.upload(&plan.local_path, &plan.staging_path).await?;
    println!("{} Upload complete", style("✓").green().bold());

    let Some(container_path) = &plan.container_path else {
        return Ok(());
    };

    println!(
        "{} Copying to Docker container {}...",
        style("→").cyan().bold(),
        style(&plan.container).white().bold()
    );
    let output = session
        .exec(&copy_command(&plan.staging_path, &plan.container, container_path))
        .await?;
    tracing::debug!(stderr = %output.stderr, "docker cp finished");
    println!("{} Copied to container", style("✓").green().bold());

    println!(
        "{} Restarting container {}...",
        style("→").cyan().bold(),
        style(&plan.container).white().bold()
    );
    let output = session.exec(&restart_command(&plan.container)).await?;
    tracing::debug!(stderr = %output.stderr, "docker compose restart finished");
    println!("{} Container restarted", style("✓").green().bold());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::fake::{Call, FakeSession};

    fn config() -> AppConfig {
        AppConfig {
            host: "example.com".to_string(),
            password: "pw".to_string(),
            container: "web_container".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_staging_path_uses_base_name_only() {
        assert_eq!(staging_path(Path::new("app.py")).unwrap(), "/tmp/app.py");
        assert_eq!(
            staging_path(Path::new("/home/me/project/src/app.py")).unwrap(),
            "/tmp/app.py"
        );
        assert_eq!(
            staging_path(Path::new("../build/bundle.tar.gz")).unwrap(),
            "/tmp/bundle.tar.gz"
        );
    }

    #[test]
    fn test_staging_path_without_file_name() {
        let err = staging_path(Path::new("..")).unwrap_err();
        assert!(matches!(err, DockhandError::Transfer(_)));
    }

    #[test]
    fn test_command_strings() {
        assert_eq!(
            copy_command("/tmp/app.py", "web_container", "/app/app.py"),
            "docker cp /tmp/app.py web_container:/app/app.py"
        );
        assert_eq!(
            restart_command("web_container"),
            "docker compose restart web_container"
        );
    }

    #[test]
    fn test_plan_treats_empty_container_path_as_absent() {
        let plan = DeployPlan::new(&config(), "app.py", Some(String::new())).unwrap();
        assert_eq!(plan.container_path, None);
        assert!(plan.container_commands().is_empty());
    }

    #[tokio::test]
    async fn test_upload_only_issues_no_commands() {
        let plan = DeployPlan::new(&config(), "dist/app.py", None).unwrap();
        let session = FakeSession::new();

        run(&session, &plan).await.unwrap();

        assert_eq!(
            session.calls(),
            vec![Call::Upload(
                PathBuf::from("dist/app.py"),
                "/tmp/app.py".to_string()
            )]
        );
        assert!(session.exec_commands().is_empty());
    }

    #[tokio::test]
    async fn test_container_path_issues_copy_then_restart() {
        let plan =
            DeployPlan::new(&config(), "dist/app.py", Some("/app/app.py".to_string())).unwrap();
        let session = FakeSession::new();

        run(&session, &plan).await.unwrap();

        assert_eq!(
            session.exec_commands(),
            vec![
                "docker cp /tmp/app.py web_container:/app/app.py".to_string(),
                "docker compose restart web_container".to_string(),
            ]
        );
        assert!(matches!(session.calls()[0], Call::Upload(_, _)));
        assert_eq!(plan.container_commands(), session.exec_commands());
    }

    #[tokio::test]
    async fn test_failed_commands_are_not_inspected() {
        let mut failed = crate::ssh::CommandOutput::new("", "Error: No such container");
        failed.exit_status = Some(1);
        let plan =
            DeployPlan::new(&config(), "app.py", Some("/app/app.py".to_string())).unwrap();
        let session = FakeSession::new()
            .with_output(failed.clone())
            .with_output(failed);

        assert!(run(&session, &plan).await.is_ok());
        assert_eq!(session.exec_commands().len(), 2);
    }

    #[tokio::test]
    async fn test_upload_failure_stops_before_commands() {
        let plan =
            DeployPlan::new(&config(), "app.py", Some("/app/app.py".to_string())).unwrap();
        let session = FakeSession::new().fail_upload();

        let err = run(&session, &plan).await.unwrap_err();

        assert!(matches!(err, DockhandError::Transfer(_)));
        assert!(session.exec_commands().is_empty());
    }

    #[tokio::test]
    async fn test_exec_failure_leaves_staged_file() {
        let plan =
            DeployPlan::new(&config(), "app.py", Some("/app/app.py".to_string())).unwrap();
        let session = FakeSession::new().fail_exec();

        let err = run(&session, &plan).await.unwrap_err();

        assert!(matches!(err, DockhandError::Command(_)));
        // Only the copy was attempted; nothing removes the upload.
        assert_eq!(session.exec_commands().len(), 1);
        assert_eq!(session.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_guarded_flow_closes_after_failure() {
        let plan = DeployPlan::new(&config(), "app.py", None).unwrap();
        let session = FakeSession::new().fail_upload();
        let calls = session.calls_handle();

        let guard = SessionGuard::new(session);
        let outcome = run(guard.session(), &plan).await;
        assert!(guard.finish(outcome).await.is_err());

        assert_eq!(calls.lock().unwrap().last(), Some(&Call::Close));
    }

    #[tokio::test]
    async fn test_execute_rejects_missing_config_before_connecting() {
        for (host, password) in [("", ""), ("example.com", ""), ("", "pw")] {
            let config = AppConfig {
                host: host.to_string(),
                password: password.to_string(),
                ..Default::default()
            };

            let err = execute(&config, PathBuf::from("app.py"), None)
                .await
                .unwrap_err();
            assert!(matches!(err, DockhandError::Config(_)));
        }
    }
}
