use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{debug, info};
use tabled::{Table, Tabled};

use homepass::{Account, Credentials, Device, Region};

#[derive(Parser)]
#[command(name = "homepass")]
#[command(about = "A CLI for listing the locations and devices of a Plume Homepass account")]
#[command(version)]
struct Cli {
    /// Email for the Homepass account
    #[arg(long, env = "HOMEPASS_EMAIL")]
    email: Option<String>,

    /// Password for the Homepass account (optional, will prompt if not provided)
    #[arg(long, env = "HOMEPASS_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Override the regional API base URL
    #[arg(long, env = "HOMEPASS_BASE_URL", hide = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all locations of the account
    Locations,
    /// List the devices known at one or all locations
    Devices {
        /// Location id (defaults to every location of the account)
        #[arg(long)]
        location: Option<String>,
        /// Only show devices that are currently connected
        #[arg(long)]
        connected: bool,
    },
}

#[derive(Tabled)]
struct LocationRow {
    #[tabled(rename = "Location")]
    id: String,
}

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "State")]
    state: String,
}

impl DeviceRow {
    fn new(location: &str, device: &Device<'_>) -> Self {
        Self {
            location: location.to_string(),
            name: device.name().to_string(),
            mac: device.mac().to_string(),
            state: device.connection_state().to_string(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let email = cli.email.ok_or_else(|| {
        anyhow::anyhow!(
            "Email is required. Provide via --email or HOMEPASS_EMAIL environment variable."
        )
    })?;

    let password = match cli.password {
        Some(password) => password,
        None => rpassword::prompt_password("Homepass password: ")?,
    };

    let credentials = Credentials::new(email, password);
    let account = match cli.base_url {
        Some(base_url) => Account::with_base_url(credentials, base_url),
        None => Account::with_region(credentials, Region::default()),
    };
    debug!("Using API at {}", account.base_url());

    match cli.command {
        Commands::Locations => {
            info!("Fetching location list...");
            let locations = account.list_locations().await?;

            if locations.is_empty() {
                println!("No locations found for this account.");
                return Ok(());
            }

            let rows: Vec<LocationRow> = locations
                .iter()
                .map(|location| LocationRow {
                    id: location.id().to_string(),
                })
                .collect();
            println!("{}", Table::new(&rows));
        }
        Commands::Devices {
            location,
            connected,
        } => {
            let locations = account.list_locations().await?;
            let locations: Vec<_> = match location {
                Some(id) => {
                    let selected: Vec<_> = locations
                        .into_iter()
                        .filter(|location| location.id() == id)
                        .collect();
                    if selected.is_empty() {
                        return Err(anyhow::anyhow!("Location {} not found.", id));
                    }
                    selected
                }
                None => locations,
            };

            let mut rows: Vec<DeviceRow> = Vec::new();
            for location in &locations {
                info!("Fetching devices for location {}...", location.id());
                for device in location.list_devices().await? {
                    if connected && !device.is_connected() {
                        continue;
                    }
                    rows.push(DeviceRow::new(location.id(), &device));
                }
            }

            if rows.is_empty() {
                println!("No devices found.");
                return Ok(());
            }

            println!("{}", Table::new(&rows));
        }
    }

    Ok(())
}
