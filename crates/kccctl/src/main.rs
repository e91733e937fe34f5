//! kccctl - CLI client for kccd.
//!
//! Drives the Config Connector migration assistant daemon over its local
//! HTTP API.

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

mod client;
mod render;

use clap::{Parser, Subcommand};
use client::{Client, ClientError};
use kcc_core::types::{FieldSpec, FieldType};

/// CLI client for the kccd migration assistant daemon.
#[derive(Parser)]
#[command(name = "kccctl")]
#[command(about = "Control plane for the Config Connector migration assistant")]
#[command(version)]
struct Cli {
    /// Daemon address (default: http://127.0.0.1:7800)
    #[arg(long, global = true, env = "KCCD_ADDR")]
    addr: Option<String>,

    /// Auth token for daemon API
    #[arg(long, global = true, env = "KCCD_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Locate a resource's files in the repository
    Find {
        /// Resource kind (e.g. SpannerInstance)
        resource: String,

        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },

    /// Classify a resource's controller implementation
    Detect {
        /// Resource kind
        resource: String,

        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },

    /// Show phase-by-phase migration progress
    Status {
        /// Resource kind
        resource: String,

        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },

    /// Produce the full migration plan for a legacy resource
    Plan {
        /// Resource kind
        resource: String,

        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },

    /// Add a field to an existing types file
    #[command(name = "add-field")]
    AddField {
        /// Resource kind owning the field
        resource: String,

        /// Field name (Go style, e.g. DisplayName)
        field_name: String,

        /// Field type: string, int64, bool, object, or array
        #[arg(long = "type", value_parser = parse_field_type)]
        field_type: FieldType,

        /// Proto field path for the annotation (e.g. google.cloud.x.v1.Y.display_name)
        #[arg(long)]
        proto_path: String,

        /// Repo-relative types file (defaults to the located one)
        #[arg(long)]
        types_file: Option<String>,

        /// Parent struct to insert into (defaults to <Resource>Spec)
        #[arg(long)]
        parent: Option<String>,

        /// Doc comment for the field
        #[arg(long)]
        description: Option<String>,

        /// JSON tag name (defaults to the field name, lower-cased first char)
        #[arg(long)]
        json_name: Option<String>,
    },

    /// Scaffold the KRM types file for a resource
    #[command(name = "scaffold-types")]
    ScaffoldTypes {
        /// Resource kind
        resource: String,

        /// Service name (e.g. spanner)
        #[arg(long)]
        service: String,

        /// API version (e.g. v1beta1)
        #[arg(long)]
        version: String,

        /// Proto package (e.g. google.spanner.admin.instance.v1)
        #[arg(long)]
        proto_package: String,

        /// Proto message name
        #[arg(long)]
        proto_message: String,

        /// Resource description for the doc comment
        #[arg(long)]
        description: Option<String>,
    },

    /// Scaffold the identity file for a resource
    #[command(name = "scaffold-identity")]
    ScaffoldIdentity {
        /// Resource kind
        resource: String,

        /// Service name
        #[arg(long)]
        service: String,

        /// API version
        #[arg(long)]
        version: String,

        /// Resource name format (e.g. projects/{project}/locations/{location}/widgets/{widget})
        #[arg(long)]
        name_format: String,
    },

    /// Scaffold the direct controller for a resource
    #[command(name = "scaffold-controller")]
    ScaffoldController {
        /// Resource kind
        resource: String,

        /// Service name
        #[arg(long)]
        service: String,

        /// API version
        #[arg(long)]
        version: String,

        /// Proto package
        #[arg(long)]
        proto_package: String,

        /// Proto message name
        #[arg(long)]
        proto_message: String,
    },

    /// Scaffold the mock GCP server for a resource
    #[command(name = "scaffold-mockgcp")]
    ScaffoldMockGcp {
        /// Resource kind
        resource: String,

        /// Service name
        #[arg(long)]
        service: String,

        /// Proto package
        #[arg(long)]
        proto_package: String,

        /// Proto message name
        #[arg(long)]
        proto_message: String,

        /// Resource name format
        #[arg(long)]
        name_format: String,
    },

    /// Run the repository's mapper generator for a resource
    #[command(name = "generate-mapper")]
    GenerateMapper {
        /// Resource kind
        resource: String,
    },

    /// Show the working tree status of the configured repository
    #[command(name = "git-status")]
    GitStatus,

    /// Create a validated commit with the configured identity
    Commit {
        /// Commit message (conventional commit format)
        message: String,

        /// Stage only these paths (repeatable; default stages everything)
        #[arg(long = "file")]
        files: Vec<String>,
    },
}

fn parse_field_type(s: &str) -> Result<FieldType, String> {
    FieldType::from_tag(&s.to_lowercase()).ok_or_else(|| {
        format!(
            "invalid field type '{}', expected: string, int64, bool, object, array",
            s
        )
    })
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let addr = cli
        .addr
        .unwrap_or_else(|| "http://127.0.0.1:7800".to_string());
    let client = Client::new(&addr, cli.token.as_deref());

    // Every subcommand talks to the daemon; wait for it with backoff.
    if let Err(e) = client.wait_for_ready().await {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }

    let result = match cli.command {
        Command::Find { resource, json } => run_find(&client, &resource, json).await,
        Command::Detect { resource, json } => run_detect(&client, &resource, json).await,
        Command::Status { resource, json } => run_status(&client, &resource, json).await,
        Command::Plan { resource, json } => run_plan(&client, &resource, json).await,
        Command::AddField {
            resource,
            field_name,
            field_type,
            proto_path,
            types_file,
            parent,
            description,
            json_name,
        } => {
            run_add_field(
                &client,
                resource,
                field_name,
                field_type,
                proto_path,
                types_file,
                parent,
                description,
                json_name,
            )
            .await
        }
        Command::ScaffoldTypes {
            resource,
            service,
            version,
            proto_package,
            proto_message,
            description,
        } => {
            run_scaffold(
                &client,
                client::ScaffoldTypesRequest {
                    resource,
                    service,
                    version,
                    proto_package,
                    proto_message,
                    description,
                },
            )
            .await
        }
        Command::ScaffoldIdentity {
            resource,
            service,
            version,
            name_format,
        } => {
            let req = client::ScaffoldIdentityRequest {
                resource,
                service,
                version,
                resource_name_format: name_format,
            };
            print_scaffolded(client.scaffold_identity(&req).await)
        }
        Command::ScaffoldController {
            resource,
            service,
            version,
            proto_package,
            proto_message,
        } => {
            let req = client::ScaffoldControllerRequest {
                resource,
                service,
                version,
                proto_package,
                proto_message,
            };
            print_scaffolded(client.scaffold_controller(&req).await)
        }
        Command::ScaffoldMockGcp {
            resource,
            service,
            proto_package,
            proto_message,
            name_format,
        } => {
            let req = client::ScaffoldMockGcpRequest {
                resource,
                service,
                proto_package,
                proto_message,
                resource_name_format: name_format,
            };
            print_scaffolded(client.scaffold_mockgcp(&req).await)
        }
        Command::GenerateMapper { resource } => run_generate_mapper(&client, &resource).await,
        Command::GitStatus => run_git_status(&client).await,
        Command::Commit { message, files } => run_commit(&client, &message, &files).await,
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), ClientError> {
    let rendered =
        serde_json::to_string_pretty(value).map_err(|e| ClientError::IoError(e.to_string()))?;
    println!("{}", rendered);
    Ok(())
}

async fn run_find(client: &Client, resource: &str, json: bool) -> Result<(), ClientError> {
    let location = client.find_resource(resource).await?;
    if json {
        return print_json(&location);
    }
    render::print_location(&location);
    Ok(())
}

async fn run_detect(client: &Client, resource: &str, json: bool) -> Result<(), ClientError> {
    let info = client.controller_type(resource).await?;
    if json {
        return print_json(&info);
    }
    render::print_controller_type(&info);
    Ok(())
}

async fn run_status(client: &Client, resource: &str, json: bool) -> Result<(), ClientError> {
    let status = client.migration_status(resource).await?;
    if json {
        return print_json(&status);
    }
    render::print_migration_status(&status);
    Ok(())
}

async fn run_plan(client: &Client, resource: &str, json: bool) -> Result<(), ClientError> {
    let plan = client.migration_plan(resource).await?;
    if json {
        return print_json(&plan);
    }
    render::print_migration_plan(&plan);
    Ok(())
}

async fn run_add_field(
    client: &Client,
    resource: String,
    field_name: String,
    field_type: FieldType,
    proto_path: String,
    types_file: Option<String>,
    parent: Option<String>,
    description: Option<String>,
    json_name: Option<String>,
) -> Result<(), ClientError> {
    // Without an explicit types file, insert into the one the daemon locates.
    let types_file = match types_file {
        Some(path) => path,
        None => client.find_resource(&resource).await?.types_file,
    };

    let req = client::AddFieldRequest {
        types_file,
        spec: FieldSpec {
            resource,
            field_name,
            field_type: field_type.as_str().to_string(),
            proto_path,
            parent_type: parent,
            description,
            json_name,
        },
    };

    let response = client.add_field(&req).await?;
    println!("Added field to {}", response.types_file);
    println!();
    print!("{}", response.rendered);
    if !response.rendered.ends_with('\n') {
        println!();
    }
    Ok(())
}

async fn run_scaffold(
    client: &Client,
    req: client::ScaffoldTypesRequest,
) -> Result<(), ClientError> {
    print_scaffolded(client.scaffold_types(&req).await)
}

fn print_scaffolded(
    result: Result<client::ScaffoldResponse, ClientError>,
) -> Result<(), ClientError> {
    let scaffolded = result?;
    println!("{}", scaffolded.message);
    Ok(())
}

async fn run_generate_mapper(client: &Client, resource: &str) -> Result<(), ClientError> {
    let output = client.generate_mapper(resource).await?;
    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}

async fn run_git_status(client: &Client) -> Result<(), ClientError> {
    let status = client.git_status().await?;
    render::print_git_status(&status);
    Ok(())
}

async fn run_commit(client: &Client, message: &str, files: &[String]) -> Result<(), ClientError> {
    client.commit(message, files).await?;
    println!(
        "Committed: {}",
        message.lines().next().unwrap_or_default()
    );
    Ok(())
}
