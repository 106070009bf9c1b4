use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use k8s_manifest_provider::{diagnostics, manager::Manager, provider::Provider, server, Error};
use serde_json::Value;

/// Terraform provider rendering Kubernetes custom resources as YAML manifests
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Prefix of every resource type name
    #[clap(long, env = "K8S_PROVIDER_NAME", default_value = "k8s", global = true)]
    provider_name: String,

    /// tracing filter directives
    #[clap(long, env = "RUST_LOG", default_value = "info", global = true)]
    log_filter: String,

    #[clap(subcommand)]
    mode: Mode,
}

#[derive(clap::Subcommand, Debug)]
enum Mode {
    /// Serve the resource operations over HTTP
    Serve {
        #[clap(long, env = "K8S_PROVIDER_BIND", default_value = "0.0.0.0:8080")]
        bind: String,
    },
    /// Print the provider schema, or a single resource schema, as JSON
    Schema {
        #[clap(long)]
        type_name: Option<String>,
    },
    /// List the resource type names
    List,
    /// Render a JSON plan read from a file or stdin as YAML
    Render {
        type_name: String,
        #[clap(long)]
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    server::init_tracing(&args.log_filter)?;
    let provider = Provider::new(args.provider_name);

    match args.mode {
        Mode::Serve { bind } => {
            let manager = Manager::new(provider)?;
            server::run(manager, &bind).await?;
        }
        Mode::Schema { type_name } => {
            let schema = match type_name {
                Some(type_name) => {
                    serde_json::to_string_pretty(&provider.resource(&type_name)?.schema())?
                }
                None => serde_json::to_string_pretty(&provider.schema())?,
            };
            println!("{schema}");
        }
        Mode::List => {
            for type_name in provider.type_names() {
                println!("{type_name}");
            }
        }
        Mode::Render { type_name, file } => {
            let input = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?,
                None => {
                    let mut input = String::new();
                    std::io::stdin().read_to_string(&mut input)?;
                    input
                }
            };
            let plan: Value = serde_json::from_str(&input).context("plan is not valid JSON")?;
            let state = match provider.resource(&type_name)?.create(plan) {
                Ok(state) => state,
                Err(Error::InvalidConfiguration(found)) => bail!(diagnostics::join(&found)),
                Err(e) => return Err(e.into()),
            };
            print!("{}", state["yaml"].as_str().unwrap_or_default());
        }
    }

    Ok(())
}
