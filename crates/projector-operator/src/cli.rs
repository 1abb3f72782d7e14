use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "projector")]
#[command(about = "Projector: reconcile managed projects into Argo CD AppProjects")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the controller against the current cluster
    Run(RunArgs),
    /// Render a managed project file to AppProject YAML without a cluster
    Render(RenderArgs),
    /// List the built-in templates
    Templates,
}

#[derive(clap::Args)]
pub struct RunArgs {
    /// Config file path (overrides PROJECTOR_CONFIG)
    #[arg(short, long)]
    pub config: Option<String>,
    /// Only watch this namespace (overrides controller.namespace)
    #[arg(short, long)]
    pub namespace: Option<String>,
}

#[derive(clap::Args)]
pub struct RenderArgs {
    /// Managed project manifest (YAML or JSON)
    #[arg(short, long)]
    pub file: PathBuf,
    /// Namespace for the rendered AppProject (defaults to the manifest's)
    #[arg(short, long)]
    pub namespace: Option<String>,
}
