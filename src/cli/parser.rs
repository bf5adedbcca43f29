use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::core::host::HostField;

#[derive(Parser)]
#[command(name = "npmctl")]
#[command(about = "Manage Nginx Proxy Manager proxy hosts from template hosts")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Default, Clone)]
pub struct GlobalArgs {
    /// Log requests and responses to stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Path to the configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// The NPM server host
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// The NPM server username
    #[arg(long, global = true)]
    pub username: Option<String>,

    /// The NPM server password
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// The port to connect to
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Read host, username and password from an info file
    #[arg(long, short = 'i', global = true, value_name = "PATH")]
    pub info_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a base64 info file holding host, username and password
    CreateInfoFile(CreateInfoFileArgs),
    /// Create, remove or update proxy hosts
    Host(HostArgs),
    /// Show or reset configuration
    Config(ConfigArgs),
    /// Generate shell completion script
    Completion(CompletionArgs),
}

#[derive(Args, Debug)]
pub struct CreateInfoFileArgs {
    /// Where to write the info file
    pub path: PathBuf,

    /// Server host, either bare or with scheme and port
    #[arg(value_name = "HOST")]
    pub npm_host: String,

    #[arg(value_name = "USERNAME")]
    pub npm_username: String,

    /// Prompted for when omitted
    #[arg(value_name = "PASSWORD")]
    pub npm_password: Option<String>,
}

#[derive(Args, Debug)]
pub struct HostArgs {
    #[command(subcommand)]
    pub command: HostCommands,
}

#[derive(Subcommand, Debug)]
pub enum HostCommands {
    /// Create a host from the template host
    Create(HostCreateArgs),
    /// Remove a domain, deleting its host when it is the last one
    Remove(HostRemoveArgs),
    /// Copy one field from the update template onto every host matching the search template
    Update(HostUpdateArgs),
}

#[derive(Args, Debug)]
#[command(after_help = "EXAMPLES:
    npmctl -i npm.info host create 10.0.0.5 3000 app.example.com www.example.com
    npmctl -i npm.info host create 10.0.0.5 3000 \"app.example.com, www.example.com\"
    npmctl --host npm.local --username admin --password secret host create --template base 10.0.0.5 80 app.example.com")]
pub struct HostCreateArgs {
    /// The host to forward to
    pub forward_host: String,

    /// The port to forward to
    pub forward_port: u16,

    /// The domains to forward (space or comma separated)
    #[arg(required = true, num_args = 1..)]
    pub domains: Vec<String>,

    /// The template's domain name
    #[arg(long, short)]
    pub template: Option<String>,

    /// Create the host even if a domain already has an entry
    #[arg(long)]
    pub no_conflict_check: bool,
}

impl HostCreateArgs {
    pub fn domain_names(&self) -> Vec<String> {
        self.domains
            .iter()
            .flat_map(|arg| arg.split(','))
            .map(|domain| domain.trim().to_string())
            .filter(|domain| !domain.is_empty())
            .collect()
    }
}

#[derive(Args, Debug)]
pub struct HostRemoveArgs {
    /// The domain to remove
    pub domain: String,
}

#[derive(Args, Debug)]
pub struct HostUpdateArgs {
    /// The field to update
    #[arg(value_enum)]
    pub field: HostField,

    /// Fields that must equal the search template's (repeatable)
    #[arg(long = "search-field", value_enum, value_name = "FIELD")]
    pub search_fields: Vec<HostField>,

    /// Domain name of the host supplying the new value
    #[arg(long)]
    pub update_template: Option<String>,

    /// Domain name of the host describing which hosts to update
    #[arg(long)]
    pub search_template: Option<String>,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: Option<ConfigCommands>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Print the configuration file path
    Path,
    /// Reset configuration to defaults
    Reset,
}

#[derive(Args, Debug)]
pub struct CompletionArgs {
    /// Shell to generate completion for
    #[arg(value_enum)]
    pub shell: Shell,
}
