use log::debug;

use crate::account::Account;
use crate::error::{Error, Result};
use crate::types::{DeviceRecord, DevicesResponse};

/// Connection state the service reports for a device that is online
pub const CONNECTION_STATE_CONNECTED: &str = "connected";

/// A Homepass location, grouping the nodes and known devices of one site
#[derive(Debug, Clone)]
pub struct Location<'a> {
    account: &'a Account,
    id: String,
}

impl<'a> Location<'a> {
    pub fn new(account: &'a Account, id: String) -> Self {
        Self { account, id }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn account(&self) -> &'a Account {
        self.account
    }

    pub async fn location_url(&self) -> Result<String> {
        Ok(format!(
            "{}/Locations/{}",
            self.account.account_url().await?,
            self.id
        ))
    }

    /// List the devices known at this location, in response order
    pub async fn list_devices(&self) -> Result<Vec<Device<'a>>> {
        debug!("Fetching devices for location: {}", self.id);

        let url = format!("{}/Devices", self.location_url().await?);
        let response = self.account.authenticated_request(&url).await?;

        let status = response.status();
        let response_text = response.text().await?;
        if !status.is_success() {
            return Err(Error::Api(format!(
                "Failed to fetch devices for location {} ({}): {}",
                self.id, status, response_text
            )));
        }

        let devices_response: DevicesResponse = serde_json::from_str(&response_text)?;
        debug!(
            "Found {} devices at location {}",
            devices_response.devices.len(),
            self.id
        );

        Ok(devices_response
            .devices
            .into_iter()
            .map(|record| Device::from_record(self.account, record))
            .collect())
    }
}

/// Snapshot of a device as last reported by its location.
///
/// Does not refresh itself; list the location's devices again to observe
/// state changes.
#[derive(Debug, Clone)]
pub struct Device<'a> {
    account: &'a Account,
    mac: String,
    connection_state: String,
    name: String,
}

impl<'a> Device<'a> {
    pub fn new(account: &'a Account, mac: String, connection_state: String, name: String) -> Self {
        Self {
            account,
            mac,
            connection_state,
            name,
        }
    }

    fn from_record(account: &'a Account, record: DeviceRecord) -> Self {
        Self::new(account, record.mac, record.connection_state, record.name)
    }

    pub fn account(&self) -> &'a Account {
        self.account
    }

    pub fn mac(&self) -> &str {
        &self.mac
    }

    pub fn connection_state(&self) -> &str {
        &self.connection_state
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_connected(&self) -> bool {
        self.connection_state == CONNECTION_STATE_CONNECTED
    }
}
