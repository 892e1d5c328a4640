use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::client::{ApiClient, ArtifactClient, TopologyClient, UserClient};
use crate::commands;
use crate::config::{parse_base_url, Config, Credentials, DEFAULT_PROFILE};
use crate::display::Format;

#[derive(Parser)]
#[command(name = "lab1918")]
#[command(about = "A CLI client for the lab1918 topology, artifact and user API", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = Format::Table)]
    pub format: Format,

    /// Config profile to read the API key from
    #[arg(long, global = true, env = "LAB1918_PROFILE", default_value = DEFAULT_PROFILE)]
    pub profile: String,

    /// API base URL (overrides https://<api_server>)
    #[arg(long, global = true, env = "LAB1918_API_URL")]
    pub api_url: Option<String>,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage topologies
    #[command(subcommand)]
    Topology(TopologyCommands),

    /// Manage artifacts
    #[command(subcommand)]
    Artifact(ArtifactCommands),

    /// Show or change the current user's settings
    #[command(subcommand)]
    User(UserCommands),

    /// Configuration commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Args, Debug, Clone)]
pub struct TopologyIdArg {
    /// Topology ID
    #[arg(long)]
    pub topology_id: String,
}

#[derive(Subcommand, Debug)]
pub enum TopologyCommands {
    /// Create a topology
    Create {
        /// Topology name
        #[arg(long)]
        topology_name: String,
    },

    /// List all topologies, or one by ID
    List {
        /// Topology ID
        #[arg(long)]
        topology_id: Option<String>,

        /// Only display topology config
        #[arg(long, group = "view")]
        config: bool,

        /// Only display topology status
        #[arg(long, group = "view")]
        status: bool,

        /// Only display reservations
        #[arg(long, group = "view")]
        reservation: bool,

        /// Only display workflow history
        #[arg(long, group = "view")]
        workflow: bool,
    },

    /// Delete a topology
    Delete(TopologyIdArg),

    /// Replace a topology's config
    Update {
        #[command(flatten)]
        id: TopologyIdArg,

        /// Topology config file (JSON or YAML)
        #[arg(long, alias = "topology-file", value_name = "FILE")]
        topology_json: Option<PathBuf>,
    },

    /// Reserve resources for a topology
    Reserve {
        #[command(flatten)]
        id: TopologyIdArg,

        /// Host selection as a JSON (or YAML) string
        #[arg(long, default_value = "{}")]
        host_json: String,
    },

    /// Release a topology's reservation
    Release {
        #[command(flatten)]
        id: TopologyIdArg,

        /// Reservation ID
        #[arg(long)]
        reservation_id: Option<String>,
    },

    /// Deploy a topology
    Deploy {
        #[command(flatten)]
        id: TopologyIdArg,

        /// Dry run deployment
        #[arg(long)]
        dry_run: bool,
    },

    /// Undeploy a topology
    Undeploy {
        #[command(flatten)]
        id: TopologyIdArg,

        /// Dry run undeployment
        #[arg(long)]
        dry_run: bool,
    },

    /// Check that a deployed topology is reachable
    Ping(TopologyIdArg),

    /// Run the bootstrap workflow for a topology
    Bootstrap {
        #[command(flatten)]
        id: TopologyIdArg,

        /// Workflow input as a JSON (or YAML) string
        #[arg(long, default_value = "{}")]
        params: String,
    },
}

/// Narrowed views of `topology list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListView {
    Records,
    Config,
    Status,
    Reservation,
    Workflow,
}

impl ListView {
    pub fn from_flags(config: bool, status: bool, reservation: bool, workflow: bool) -> Self {
        if config {
            Self::Config
        } else if status {
            Self::Status
        } else if reservation {
            Self::Reservation
        } else if workflow {
            Self::Workflow
        } else {
            Self::Records
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Vendor {
    Arista,
    Cisco,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ArtifactType {
    Qcow,
    Vmdk,
    Container,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Storage {
    S3,
    Docker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Architecture {
    #[value(name = "x86_64")]
    X86_64,
    Arm64,
}

/// The name a value is spelled with on the command line and on the wire.
pub fn value_name<T: ValueEnum>(value: T) -> String {
    value
        .to_possible_value()
        .map(|possible| possible.get_name().to_string())
        .unwrap_or_default()
}

#[derive(Subcommand, Debug)]
pub enum ArtifactCommands {
    /// List all artifacts, or one by ID
    List {
        /// Artifact ID
        #[arg(long)]
        artifact_id: Option<String>,
    },

    /// Register an artifact
    Create {
        /// File name
        #[arg(long)]
        file_name: String,

        /// File version
        #[arg(long)]
        file_version: String,

        /// Vendor
        #[arg(long, value_enum)]
        vendor: Vendor,

        /// Artifact type
        #[arg(long, value_enum, default_value_t = ArtifactType::Container)]
        artifact_type: ArtifactType,

        /// Storage backend
        #[arg(long, value_enum, default_value_t = Storage::S3)]
        storage: Storage,

        /// CPU architecture
        #[arg(long, value_enum, default_value_t = Architecture::X86_64)]
        architecture: Architecture,
    },

    /// Delete an artifact
    Delete {
        /// Artifact ID
        #[arg(long)]
        artifact_id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Show the current user's settings
    List,

    /// Change the current user's settings
    Update {
        /// AWS region
        #[arg(long)]
        region: Option<String>,

        /// AMI ID used for lab hosts
        #[arg(long)]
        ami_id: Option<String>,

        /// Instance size used for lab hosts
        #[arg(long)]
        instance_size: Option<String>,

        /// Number of hosts to reserve
        #[arg(long)]
        reservation_size: Option<u32>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Create the config file if missing and show where it lives
    Init,
    /// Set a configuration value in the selected profile
    Set {
        /// Configuration key (e.g., api_key)
        key: String,
        /// Configuration value
        value: String,
    },
    /// Get a configuration value from the selected profile
    Get {
        /// Configuration key
        key: String,
    },
    /// Store an API key in the selected profile
    Login {
        /// API key (prompted for when omitted)
        #[arg(long)]
        api_key: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let mut stdout = io::stdout().lock();
        self.execute(&mut stdout).await
    }

    pub async fn execute<W: Write>(self, out: &mut W) -> Result<()> {
        let Cli {
            command,
            format,
            profile,
            api_url,
            ..
        } = self;
        let config = Config::load()?;

        match command {
            Commands::Config(cmd) => commands::config::handle(&config, &profile, cmd, out),
            Commands::Topology(cmd) => {
                let api = connect(&config, &profile, api_url.as_deref())?;
                let client = TopologyClient::new(api);
                commands::topology::handle(&client, cmd, format, out).await
            }
            Commands::Artifact(cmd) => {
                let api = connect(&config, &profile, api_url.as_deref())?;
                let client = ArtifactClient::new(api);
                commands::artifact::handle(&client, cmd, format, out).await
            }
            Commands::User(cmd) => {
                let api = connect(&config, &profile, api_url.as_deref())?;
                let client = UserClient::new(api);
                commands::user::handle(&client, cmd, format, out).await
            }
        }
    }
}

/// Validates the profile's credentials and opens the API session; fails before any request.
fn connect(config: &Config, profile: &str, api_url: Option<&str>) -> Result<ApiClient> {
    let settings = config.get_config(profile)?;
    let mut credentials = Credentials::from_profile(profile, &settings, &config.config_file())?;
    if let Some(url) = api_url {
        credentials = credentials.with_base_url(parse_base_url(url)?);
    }
    tracing::debug!(profile, base_url = %credentials.base_url, "using api server");
    Ok(ApiClient::from_credentials(&credentials)?)
}
