use embassy_time::Duration;

pub(crate) const WIFI_SSID: &str = env!("WIFI_SSID");
pub(crate) const WIFI_PASSWORD: &str = env!("WIFI_PASSWORD");

pub(crate) const BUILD_VERSION: &str = env!("BUILD_VERSION");

/// DHCP hostname
pub(crate) const HOSTNAME: &str = "myrtio-rf";

/// TCP port the command server listens on
pub(crate) const COMMAND_SERVER_PORT: u16 = 1000;

/// How long the server waits for a free queue slot per command
pub(crate) const ENQUEUE_TIMEOUT: Duration = Duration::from_secs(10);

/// How long the dispatcher waits for a command before looping
pub(crate) const DEQUEUE_TIMEOUT: Duration = Duration::from_secs(100);

/// RMT memory blocks for the TX channel (64 pulse codes each)
pub(crate) const RMT_MEMORY_BLOCKS: u8 = 2;

#[macro_export]
macro_rules! rf_tx_gpio {
    ($p:expr) => {
        $p.GPIO13
    };
}
