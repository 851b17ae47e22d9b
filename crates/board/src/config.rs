use anyhow::{Context, Result};
use grid::engine::{jobspec, JobSpec};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BoardConfig {
    pub server: ServerConfig,
    pub scheduler: SchedulerConfig,
    pub engine: EngineConfig,
    pub gpu: GpuConfig,
    pub job_logs: JobLogConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
    pub job_specs: Vec<JobSpec>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    pub request_timeout_secs: u64,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    /// Markdown document served on the help endpoint.
    pub help_path: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub qstat_bin: String,
    pub qsub_bin: String,
    pub qdel_bin: String,
    /// Directory job scripts are submitted from.
    pub script_dir: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Docker socket path; empty means the platform default.
    pub docker_socket: String,
    /// Label namespace tracked images carry (must keep its trailing
    /// separator, e.g. `io.gridboard.`).
    pub label_ns: String,
    pub app_prefix: String,
    /// Container build context passed to the image build job.
    pub container_dir: String,
    /// Script the image build job runs.
    pub build_script: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GpuConfig {
    pub smi_bin: String,
    /// Idle window after which cached process handles are dropped.
    pub process_idle_eviction_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct JobLogConfig {
    /// Directory holding one `<job_number>.log` per job.
    pub dir: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Access PIN required on the API; `None` disables the gate.
    pub pin: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    pub output: LogOutput,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    Stdout,
    File { path: String },
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            scheduler: SchedulerConfig::default(),
            engine: EngineConfig::default(),
            gpu: GpuConfig::default(),
            job_logs: JobLogConfig::default(),
            auth: AuthConfig::default(),
            logging: LoggingConfig::default(),
            job_specs: jobspec::default_specs(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
            enable_cors: false,
            cors_origins: Vec::new(),
            help_path: "markdown/info.md".to_string(),
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            qstat_bin: "qstat".to_string(),
            qsub_bin: "qsub".to_string(),
            qdel_bin: "qdel".to_string(),
            script_dir: "scripts".to_string(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            docker_socket: "".to_string(),
            label_ns: "io.gridboard.".to_string(),
            app_prefix: "gridboard".to_string(),
            container_dir: "docker".to_string(),
            build_script: "build-containers.sh".to_string(),
        }
    }
}

impl Default for GpuConfig {
    fn default() -> Self {
        Self {
            smi_bin: "nvidia-smi".to_string(),
            process_idle_eviction_secs: 600,
        }
    }
}

impl Default for JobLogConfig {
    fn default() -> Self {
        Self {
            dir: "logs".to_string(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { pin: None }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            output: LogOutput::Stdout,
        }
    }
}

impl BoardConfig {
    /// Load configuration from board.toml and environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        // Start with compile-time defaults as the foundation so a key
        // missing from files/env falls back to the default
        let defaults = config::Config::try_from(&BoardConfig::default())
            .context("Failed to serialize default configuration")?;

        let mut builder = config::Config::builder().add_source(defaults);

        // Layer config files (overrides defaults). Locations in order:
        // 1. /etc/gridboard/board.toml (production)
        // 2. config/board.toml (local development)
        let config_paths = ["/etc/gridboard/board", "config/board"];
        for path in config_paths {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        // Environment variables override everything:
        // BOARD_SERVER__BIND_ADDRESS, BOARD_AUTH__PIN, ...
        builder = builder.add_source(
            config::Environment::with_prefix("BOARD")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        Ok(config)
    }

    /// Validate configuration values before the server starts.
    pub fn validate(&self) -> Result<(), String> {
        if self.server.bind_address.is_empty() {
            return Err("server.bind_address must not be empty".to_string());
        }
        if self.server.request_timeout_secs == 0 {
            return Err("server.request_timeout_secs must be > 0".to_string());
        }
        if self.job_logs.dir.is_empty() {
            return Err("job_logs.dir must not be empty".to_string());
        }
        if self.engine.label_ns.is_empty() {
            return Err("engine.label_ns must not be empty".to_string());
        }
        if self.job_specs.is_empty() {
            return Err("job_specs must not be empty".to_string());
        }
        if let Some(pin) = &self.auth.pin {
            if pin.is_empty() {
                return Err("auth.pin must not be empty when set".to_string());
            }
        }
        {
            let mut ids: Vec<_> = self.job_specs.iter().map(|s| s.id.as_str()).collect();
            ids.sort_unstable();
            ids.dedup();
            if ids.len() != self.job_specs.len() {
                return Err("job_specs ids must be unique".to_string());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Defaults ─────────────────────────────────────────────────

    #[test]
    fn test_default_config_is_valid() {
        let cfg = BoardConfig::default();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_default_scheduler_binaries() {
        let cfg = BoardConfig::default();
        assert_eq!(cfg.scheduler.qstat_bin, "qstat");
        assert_eq!(cfg.scheduler.qsub_bin, "qsub");
        assert_eq!(cfg.scheduler.qdel_bin, "qdel");
    }

    #[test]
    fn test_default_gate_is_disabled() {
        assert!(BoardConfig::default().auth.pin.is_none());
    }

    // ── Validation ───────────────────────────────────────────────

    #[test]
    fn test_empty_bind_address_rejected() {
        let mut cfg = BoardConfig::default();
        cfg.server.bind_address.clear();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_empty_pin_rejected() {
        let mut cfg = BoardConfig::default();
        cfg.auth.pin = Some(String::new());
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_duplicate_spec_ids_rejected() {
        let mut cfg = BoardConfig::default();
        let duplicate = cfg.job_specs[0].clone();
        cfg.job_specs.push(duplicate);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut cfg = BoardConfig::default();
        cfg.server.request_timeout_secs = 0;
        assert!(cfg.validate().is_err());
    }

    // ── Parsing ──────────────────────────────────────────────────

    #[test]
    fn test_partial_file_keeps_defaults() {
        let defaults = config::Config::try_from(&BoardConfig::default()).unwrap();
        let cfg: BoardConfig = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::from_str(
                "[auth]\npin = \"1234\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(cfg.auth.pin.as_deref(), Some("1234"));
        assert_eq!(cfg.server.bind_address, "0.0.0.0:8080");
    }
}
