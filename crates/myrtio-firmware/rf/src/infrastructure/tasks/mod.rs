pub(crate) mod command_server;
pub(crate) mod dispatcher;
pub(crate) mod network;

pub(crate) use command_server::command_server_task;
pub(crate) use dispatcher::dispatcher_task;
pub(crate) use network::{network_runner_task, wifi_connection_task};
