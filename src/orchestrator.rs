//! Launch orchestration
//!
//! Runs the launcher stages strictly in order:
//!
//! 1. required tools on PATH
//! 2. backend env file defines the database key
//! 3. dependency installation
//! 4. optional restart (kill listeners on the known ports)
//! 5. backend launch, skipped if its port is live
//! 6. frontend launch, skipped if its port is live
//! 7. optional tunnel launch and public URL discovery
//! 8. backend health wait
//! 9. database status
//! 10. optional credential verification
//! 11. optional webhook configuration
//! 12. frontend reachability
//! 13. summary links
//!
//! Stages 1-3 and 8 are fatal. Everything after the health wait only
//! affects the report. The human-readable report goes to the writer handed
//! to [`Orchestrator::new`].

use crate::config::{self, mask, Credentials, LaunchConfig};
use crate::error::{Error, Result};
use crate::health::{self, DatabaseStatus};
use crate::http::HttpClient;
use crate::launcher::{self, LaunchOutcome, ProcessLauncher};
use crate::net;
use crate::platform::{Capabilities, LaunchedProcess};
use crate::provider::{self, ProviderOutcome};
use crate::tunnel;
use std::collections::BTreeSet;
use std::io::Write;
use std::net::IpAddr;
use std::path::Path;
use std::time::Duration;

/// Pause after killing listeners so the OS releases the ports
pub const RESTART_SETTLE: Duration = Duration::from_secs(1);

/// Timeout for the frontend reachability check
pub const FRONTEND_CHECK_TIMEOUT: Duration = Duration::from_secs(3);

/// Provider name as shown in the report
const PROVIDER_LABEL: &str = "Twilio";

/// What a completed run did and observed
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub lan_ip: IpAddr,
    /// PIDs targeted by a restart
    pub killed: BTreeSet<u32>,
    pub backend: LaunchOutcome,
    pub frontend: LaunchOutcome,
    pub tunnel: Option<LaunchedProcess>,
    pub tunnel_url: Option<String>,
    pub database: DatabaseStatus,
    pub verification: Option<ProviderOutcome>,
    pub webhooks: Option<ProviderOutcome>,
    pub frontend_status: Option<u16>,
}

impl RunSummary {
    pub fn frontend_link(&self, config: &LaunchConfig) -> String {
        format!("http://{}:{}/", self.lan_ip, config.frontend_port())
    }

    pub fn health_link(&self, config: &LaunchConfig) -> String {
        format!(
            "http://{}:{}{}",
            self.lan_ip,
            config.backend_port(),
            config.settings.health.path
        )
    }
}

/// Sequences one launcher run
pub struct Orchestrator<W: Write> {
    config: LaunchConfig,
    credentials: Credentials,
    caps: Capabilities,
    client: HttpClient,
    out: W,
}

impl<W: Write> Orchestrator<W> {
    pub fn new(config: LaunchConfig, credentials: Credentials, caps: Capabilities, out: W) -> Self {
        Self {
            config,
            credentials,
            caps,
            client: HttpClient::new(),
            out,
        }
    }

    /// Give back the report writer
    pub fn into_output(self) -> W {
        self.out
    }

    /// Run every stage in order
    pub async fn run(&mut self) -> Result<RunSummary> {
        info!(root = %self.config.root.display(), "starting launcher run");
        debug!(credentials = ?self.credentials, "credentials from environment");

        launcher::require_tools(
            self.caps.filesystem.as_ref(),
            &self.config.settings.required_tools,
        )?;
        self.validate_env_file()?;
        self.install_dependencies().await?;

        let lan_ip = net::find_lan_ip();

        let killed = if self.config.restart {
            self.restart().await?
        } else {
            BTreeSet::new()
        };

        let backend = self.start_backend().await?;
        let frontend = self.start_frontend().await?;
        let (tunnel, tunnel_url) = self.start_tunnel().await?;

        writeln!(self.out, "Waiting for backend health...")?;
        let report = health::wait_for_health(
            &self.client,
            &self.config.health_url(),
            self.config.health_timeout(),
        )
        .await?;

        let database = report.database_status();
        match &database {
            DatabaseStatus::Connected => writeln!(self.out, "MongoDB: connected")?,
            DatabaseStatus::Degraded(value) => writeln!(
                self.out,
                "WARNING: backend is up but MongoDB reports: {}",
                value
            )?,
        }

        let verification = self.verify_credentials().await?;
        let webhooks = self.configure_webhooks(tunnel_url.as_deref()).await?;
        let frontend_status = self.check_frontend().await?;

        let summary = RunSummary {
            lan_ip,
            killed,
            backend,
            frontend,
            tunnel,
            tunnel_url,
            database,
            verification,
            webhooks,
            frontend_status,
        };
        self.print_links(&summary)?;

        info!("launcher run complete");
        Ok(summary)
    }

    fn validate_env_file(&self) -> Result<()> {
        let path = self.config.env_file_path();
        let key = &self.config.settings.database_key;
        let env = config::load_env_file(&path)?;

        match env.get(key) {
            Some(value) if !value.is_empty() => {
                debug!("{} defines {}", path.display(), key);
                Ok(())
            }
            _ => Err(Error::MissingConfigKey {
                path: display_path(&self.config.root, &path),
                key: key.clone(),
            }),
        }
    }

    async fn install_dependencies(&mut self) -> Result<()> {
        let install = self.config.settings.install.clone();
        let targets = [
            ("frontend", self.config.frontend_dir()),
            ("backend", self.config.backend_dir()),
        ];

        for (label, dir) in targets {
            if dir.join(&install.marker).exists() {
                continue;
            }
            writeln!(self.out, "Installing {} dependencies...", label)?;
            self.out.flush()?;
            launcher::ensure_installed(&dir, &install.marker, &install.command).await?;
        }
        Ok(())
    }

    async fn restart(&mut self) -> Result<BTreeSet<u32>> {
        writeln!(self.out, "Restart enabled: stopping existing listeners...")?;
        let killed = launcher::kill_port_listeners(
            self.caps.ports.as_ref(),
            self.caps.process_tree.as_ref(),
            &self.config.restart_ports(),
        );
        if !killed.is_empty() {
            info!(count = killed.len(), "stopped existing listeners");
        }
        tokio::time::sleep(RESTART_SETTLE).await;
        Ok(killed)
    }

    async fn start_backend(&mut self) -> Result<LaunchOutcome> {
        let outcome = ProcessLauncher::new(self.caps.console.as_ref())
            .launch_if_idle(
                "backend",
                &self.config.backend_command(),
                &self.config.backend_dir(),
                self.config.backend_port(),
            )
            .await?;
        self.report_launch("Backend", &outcome)?;
        Ok(outcome)
    }

    async fn start_frontend(&mut self) -> Result<LaunchOutcome> {
        let outcome = ProcessLauncher::new(self.caps.console.as_ref())
            .launch_if_idle(
                "frontend",
                &self.config.frontend_command(),
                &self.config.frontend_dir(),
                self.config.frontend_port(),
            )
            .await?;
        self.report_launch("Frontend", &outcome)?;
        Ok(outcome)
    }

    fn report_launch(&mut self, label: &str, outcome: &LaunchOutcome) -> Result<()> {
        match outcome {
            LaunchOutcome::AlreadyListening { port } => {
                writeln!(self.out, "{} already listening on :{} (skipping start)", label, port)?
            }
            LaunchOutcome::Started(process) => writeln!(
                self.out,
                "Started {} in a new console (pid {})",
                label.to_lowercase(),
                process.pid
            )?,
        }
        Ok(())
    }

    async fn start_tunnel(&mut self) -> Result<(Option<LaunchedProcess>, Option<String>)> {
        if !self.config.tunnel_enabled {
            debug!("tunnel disabled");
            return Ok((None, None));
        }

        let tool = self.config.settings.tunnel.tool.clone();
        if self.caps.filesystem.find_command(&tool).is_none() {
            writeln!(
                self.out,
                "{} not found in PATH; skipping {}. (Install {} and run again)",
                tool, tool, tool
            )?;
            return Ok((None, None));
        }

        writeln!(self.out, "Starting {} (new console)...", tool)?;
        let process = ProcessLauncher::new(self.caps.console.as_ref()).launch(
            &tool,
            &self.config.tunnel_command(),
            &self.config.root,
        )?;

        let url = tunnel::discover_public_url(
            &self.client,
            &self.config.settings.tunnel.api_url,
            self.config.tunnel_discovery_timeout(),
        )
        .await;
        if url.is_none() {
            writeln!(self.out, "{}: no public URL found (link omitted)", tool)?;
        }

        Ok((Some(process), url))
    }

    async fn verify_credentials(&mut self) -> Result<Option<ProviderOutcome>> {
        if !self.credentials.can_verify() {
            writeln!(
                self.out,
                "{}: skipped (set {} and {} env vars to auto-verify)",
                PROVIDER_LABEL,
                config::credentials::ACCOUNT_SID_VAR,
                config::credentials::AUTH_TOKEN_VAR
            )?;
            return Ok(None);
        }

        let sid = self.credentials.account_sid.as_deref().unwrap_or_default();
        writeln!(self.out, "Checking {} credentials (SID {})...", PROVIDER_LABEL, mask(sid))?;

        let outcome =
            provider::verify_credentials(&self.client, &self.config.api_base(), &self.credentials)
                .await;

        if let Some(outcome) = &outcome {
            match outcome {
                ProviderOutcome::Accepted => writeln!(self.out, "{}: verified", PROVIDER_LABEL)?,
                ProviderOutcome::Rejected { message } => writeln!(
                    self.out,
                    "{}: not verified ({})",
                    PROVIDER_LABEL,
                    message.as_deref().unwrap_or("no message")
                )?,
                ProviderOutcome::HttpStatus { status, body } => writeln!(
                    self.out,
                    "{} verify failed (HTTP {}). {}",
                    PROVIDER_LABEL, status, body
                )?,
                ProviderOutcome::Failed { error } => {
                    writeln!(self.out, "{} verify failed: {}", PROVIDER_LABEL, error)?
                }
            }
        }
        Ok(outcome)
    }

    async fn configure_webhooks(&mut self, tunnel_url: Option<&str>) -> Result<Option<ProviderOutcome>> {
        let Some(base_url) = tunnel_url else {
            return Ok(None);
        };
        if !self.credentials.can_configure_webhooks() {
            debug!("webhook configuration needs SID, token and phone number");
            return Ok(None);
        }

        let phone = self.credentials.phone_number.as_deref().unwrap_or_default();
        writeln!(
            self.out,
            "Configuring {} webhooks for {} -> {} ...",
            PROVIDER_LABEL,
            mask(phone),
            base_url
        )?;

        let outcome = provider::configure_webhooks(
            &self.client,
            &self.config.api_base(),
            &self.credentials,
            base_url,
        )
        .await;

        if let Some(outcome) = &outcome {
            match outcome {
                ProviderOutcome::Accepted => {
                    writeln!(self.out, "{} webhooks: configured", PROVIDER_LABEL)?
                }
                ProviderOutcome::Rejected { message } => writeln!(
                    self.out,
                    "{} webhooks: failed ({})",
                    PROVIDER_LABEL,
                    message.as_deref().unwrap_or("no message")
                )?,
                ProviderOutcome::HttpStatus { status, body } => writeln!(
                    self.out,
                    "{} webhooks failed (HTTP {}). {}",
                    PROVIDER_LABEL, status, body
                )?,
                ProviderOutcome::Failed { error } => {
                    writeln!(self.out, "{} webhooks failed: {}", PROVIDER_LABEL, error)?
                }
            }
        }
        Ok(outcome)
    }

    async fn check_frontend(&mut self) -> Result<Option<u16>> {
        let url = format!("http://127.0.0.1:{}/", self.config.frontend_port());
        match self.client.get_status(&url, FRONTEND_CHECK_TIMEOUT).await {
            Ok(code) => {
                writeln!(self.out, "Frontend: HTTP {}", code)?;
                Ok(Some(code))
            }
            Err(e) => {
                writeln!(self.out, "WARNING: Frontend check failed: {}", e)?;
                Ok(None)
            }
        }
    }

    fn print_links(&mut self, summary: &RunSummary) -> Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "Links:")?;
        writeln!(self.out, "- Frontend (LAN):  {}", summary.frontend_link(&self.config))?;
        writeln!(self.out, "- Backend health:  {}", summary.health_link(&self.config))?;
        if let Some(url) = &summary.tunnel_url {
            writeln!(
                self.out,
                "- Frontend ({}): {}",
                self.config.settings.tunnel.tool, url
            )?;
        }
        self.out.flush()?;
        Ok(())
    }
}

/// Path relative to the project root when possible, for messages
fn display_path(root: &Path, path: &Path) -> std::path::PathBuf {
    path.strip_prefix(root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}
