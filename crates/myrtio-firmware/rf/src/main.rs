#![no_std]
#![no_main]
#![feature(type_alias_impl_trait)]

mod infrastructure;

use embassy_executor::Spawner;
use embassy_time::Duration;
use log::info;

use esp_alloc as _;
use esp_backtrace as _;
use esp_hal::{clock::CpuClock, timer::timg::TimerGroup};

use myrtio_rf::CommandQueue;

use crate::infrastructure::config;
use crate::infrastructure::drivers::{
    EspRmtTransmitter, init_network_stack, wait_for_ip, wait_for_link,
};
use crate::infrastructure::tasks::{
    command_server_task, dispatcher_task, network_runner_task, wifi_connection_task,
};

esp_bootloader_esp_idf::esp_app_desc!();

// static_cell::make_static! in main causes a compiler error
macro_rules! mk_static {
    ($t:ty, $val:expr) => {{
        static STATIC_CELL: static_cell::StaticCell<$t> = static_cell::StaticCell::new();
        #[deny(unused_attributes)]
        let x = STATIC_CELL.uninit().write(($val));
        x
    }};
}

#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    esp_println::logger::init_logger_from_env();
    info!("myrtio-rf {}", config::BUILD_VERSION);

    // Initialize hardware
    let hal_config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(hal_config);

    // Heap for the radio driver
    esp_alloc::heap_allocator!(size: 72 * 1024);

    // Start rtos
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    // Command queue shared by the server (producer) and the dispatcher (consumer)
    let queue: &'static CommandQueue = mk_static!(CommandQueue, CommandQueue::new());

    // Initialize RMT and spawn the transmission loop
    let transmitter = EspRmtTransmitter::new(peripherals.RMT, crate::rf_tx_gpio!(peripherals))
        .expect("Failed to init RMT transmitter");
    spawner.spawn(dispatcher_task(queue, transmitter)).ok();

    // Initialize network stack and spawn network tasks
    let (stack, runner, controller) = init_network_stack(peripherals.WIFI);
    spawner.spawn(wifi_connection_task(controller)).ok();
    spawner.spawn(network_runner_task(runner)).ok();

    // Commands are only accepted once the station has an address
    wait_for_link(stack).await;
    info!("network: link up, waiting for DHCP");
    let ip_config = wait_for_ip(stack).await;
    info!("network: address {}", ip_config.address);

    spawner.spawn(command_server_task(stack, queue)).ok();

    loop {
        embassy_time::Timer::after(Duration::from_secs(5)).await;
    }
}
