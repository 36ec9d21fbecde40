use core::str::FromStr;

use heapless::String;

use embassy_net::{DhcpConfig, Runner, Stack, StackResources};
use embassy_time::{Duration, Timer};
use esp_hal::peripherals::WIFI;
use esp_hal::rng::Rng;
use esp_radio::wifi::{Config as WifiConfig, WifiController, WifiDevice};
use static_cell::make_static;

use crate::infrastructure::config;

/// Command server socket plus DHCP
const MAX_CONNECTIONS: usize = 3;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub(crate) fn init_network_stack(
    wifi_device: WIFI<'static>,
) -> (
    Stack<'static>,
    Runner<'static, WifiDevice<'static>>,
    WifiController<'static>,
) {
    let esp_radio_ctrl = &*make_static!(esp_radio::init().expect("Failed to init radio"));
    let (controller, interfaces) =
        esp_radio::wifi::new(esp_radio_ctrl, wifi_device, WifiConfig::default())
            .expect("Failed to init wifi");
    let mut dhcp_config = DhcpConfig::default();
    let hostname = String::from_str(config::HOSTNAME).expect("Invalid hostname");
    dhcp_config.hostname = Some(hostname);

    let net_config = embassy_net::Config::dhcpv4(dhcp_config);

    let network_resources = make_static!(StackResources::<MAX_CONNECTIONS>::new());
    let (stack, runner) =
        embassy_net::new(interfaces.sta, net_config, network_resources, get_seed());

    (stack, runner, controller)
}

fn get_seed() -> u64 {
    let rng = Rng::new();
    u64::from(rng.random()) << 32 | u64::from(rng.random())
}

/// Wait until the station is associated
pub(crate) async fn wait_for_link(stack: Stack<'_>) {
    while !stack.is_link_up() {
        Timer::after(POLL_INTERVAL).await;
    }
}

/// Wait for the DHCP lease and return the IPv4 configuration
pub(crate) async fn wait_for_ip(stack: Stack<'_>) -> embassy_net::StaticConfigV4 {
    loop {
        if let Some(config) = stack.config_v4() {
            return config;
        }
        Timer::after(POLL_INTERVAL).await;
    }
}
