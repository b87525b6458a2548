//! Domus - hostel accommodation management service
//!
//! Tracks room occupancy across hostels, allocates rooms to student
//! batches and admin-approved internship applicants, and walks
//! internship applications through the faculty/HOD/admin/caretaker
//! approval chain. `serve` runs the TCP service; the other subcommands
//! are thin clients and provisioning helpers.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use domus_core::{ChainContacts, Database};
use domus_net::{ActorInfo, Client, CohortSpec, HostelKind, Request, Response, RoleKind, Server};

mod config;
mod seed;
mod service;

use config::Config;
use service::HostelService;

type AnyError = Box<dyn std::error::Error>;

#[derive(Parser)]
#[command(name = "domus", about = "Hostel accommodation and internship housing service")]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the TCP service
    Serve,

    /// Provision demo hostels, rooms, batches, students and applications
    Seed,

    /// Run the allocation engine through a running server
    Allocate {
        /// Batch to allocate (conflicts with --internship)
        #[arg(long, conflicts_with = "internship")]
        batch: Option<String>,

        /// Allocate the internship pool instead of a batch
        #[arg(long)]
        internship: bool,

        /// Target hostel code
        #[arg(long)]
        hostel: String,

        /// Admission filter: Boys, Girls or Mixed
        #[arg(long)]
        hostel_type: String,

        /// Server address; defaults to localhost on the configured port
        #[arg(long)]
        addr: Option<SocketAddr>,

        /// Caretaker name to act as
        #[arg(long, default_value = "cli")]
        actor: String,
    },

    /// House one admin-approved applicant in a named room
    Assign {
        /// Application ID
        #[arg(long)]
        application: uuid::Uuid,

        /// Target room code
        #[arg(long)]
        room: String,

        /// Server address; defaults to localhost on the configured port
        #[arg(long)]
        addr: Option<SocketAddr>,

        /// Caretaker name to act as
        #[arg(long, default_value = "cli")]
        actor: String,
    },

    /// Show the vacancy overview from a running server
    Vacancies {
        /// Server address; defaults to localhost on the configured port
        #[arg(long)]
        addr: Option<SocketAddr>,

        /// Caretaker name to act as
        #[arg(long, default_value = "cli")]
        actor: String,
    },
}

fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Serve => serve(&config),
        Command::Seed => seed_database(&config),
        Command::Allocate {
            batch,
            internship,
            hostel,
            hostel_type,
            addr,
            actor,
        } => run_allocation(&config, batch, internship, hostel, &hostel_type, addr, actor),
        Command::Assign {
            application,
            room,
            addr,
            actor,
        } => run_assignment(&config, application, room, addr, actor),
        Command::Vacancies { addr, actor } => show_vacancies(&config, addr, actor),
    };

    if let Err(e) = result {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

fn open_database(config: &Config) -> Result<Database, AnyError> {
    let db_path = config.database_path()?;
    let db = Database::open(&db_path)?;
    tracing::info!(
        path = %db_path.display(),
        schema_version = db.schema_version(),
        "Database ready"
    );
    Ok(db)
}

fn serve(config: &Config) -> Result<(), AnyError> {
    let db = open_database(config)?;
    let service = Arc::new(HostelService::new(
        Arc::new(Mutex::new(db)),
        ChainContacts {
            hod_email: config.contacts.hod_email.clone(),
            admin_email: config.contacts.admin_email.clone(),
        },
    ));

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let server = Server::start(config.port, service).await?;
        tracing::info!(addr = %server.addr(), "Domus service running, Ctrl-C to stop");
        tokio::signal::ctrl_c().await?;
        server.shutdown();
        Ok(())
    })
}

fn seed_database(config: &Config) -> Result<(), AnyError> {
    let db = open_database(config)?;
    seed::run(&db)?;
    Ok(())
}

fn parse_hostel_kind(s: &str) -> Result<HostelKind, AnyError> {
    match s {
        "Boys" => Ok(HostelKind::Boys),
        "Girls" => Ok(HostelKind::Girls),
        "Mixed" => Ok(HostelKind::Mixed),
        other => Err(format!("unknown hostel type '{other}' (expected Boys, Girls or Mixed)").into()),
    }
}

fn default_addr(config: &Config) -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], config.port))
}

fn run_allocation(
    config: &Config,
    batch: Option<String>,
    internship: bool,
    hostel: String,
    hostel_type: &str,
    addr: Option<SocketAddr>,
    actor: String,
) -> Result<(), AnyError> {
    let cohort = if internship {
        CohortSpec::InternshipPool
    } else {
        let batch_no = batch.ok_or("either --batch or --internship is required")?;
        CohortSpec::Batch { batch_no }
    };

    let request = Request::Allocate {
        actor: ActorInfo {
            name: actor,
            role: RoleKind::Caretaker,
        },
        cohort,
        hostel_no: hostel,
        hostel_type: parse_hostel_kind(hostel_type)?,
    };

    let addr = addr.unwrap_or_else(|| default_addr(config));
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let mut client = Client::connect(addr).await?;
        match client.request(&request).await? {
            Response::Allocation {
                success: true,
                updated_entities,
                ..
            } => {
                println!("Allocation succeeded.");
                for entity in updated_entities.unwrap_or_default() {
                    println!("  {}  {} ({})", entity.id, entity.name, entity.gender);
                }
            }
            Response::Allocation { message, .. } => {
                println!("{}", message.unwrap_or_else(|| "Allocation failed.".into()));
            }
            Response::Error { message } => return Err(message.into()),
            other => return Err(format!("unexpected response: {other:?}").into()),
        }
        Ok(())
    })
}

fn run_assignment(
    config: &Config,
    application: uuid::Uuid,
    room: String,
    addr: Option<SocketAddr>,
    actor: String,
) -> Result<(), AnyError> {
    let request = Request::AssignIntern {
        actor: ActorInfo {
            name: actor,
            role: RoleKind::Caretaker,
        },
        application_id: application,
        room_no: room,
    };

    let addr = addr.unwrap_or_else(|| default_addr(config));
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let mut client = Client::connect(addr).await?;
        match client.request(&request).await? {
            Response::Assigned { room_no } => {
                println!("Applicant housed in room {room_no}.");
            }
            Response::Error { message } => return Err(message.into()),
            other => return Err(format!("unexpected response: {other:?}").into()),
        }
        Ok(())
    })
}

fn show_vacancies(
    config: &Config,
    addr: Option<SocketAddr>,
    actor: String,
) -> Result<(), AnyError> {
    let request = Request::VacancyOverview {
        actor: ActorInfo {
            name: actor,
            role: RoleKind::Caretaker,
        },
    };

    let addr = addr.unwrap_or_else(|| default_addr(config));
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let mut client = Client::connect(addr).await?;
        match client.request(&request).await? {
            Response::Vacancies { hostels } => {
                for hostel in hostels {
                    println!(
                        "{}  {} ({}): {} free beds",
                        hostel.hostel_no,
                        hostel.name,
                        match hostel.hostel_type {
                            HostelKind::Boys => "Boys",
                            HostelKind::Girls => "Girls",
                            HostelKind::Mixed => "Mixed",
                        },
                        hostel.unoccupied_beds
                    );
                }
            }
            Response::Error { message } => return Err(message.into()),
            other => return Err(format!("unexpected response: {other:?}").into()),
        }
        Ok(())
    })
}
