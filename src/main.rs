use bevy::log::LogPlugin;
use bevy::prelude::*;
use clap::Parser;
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::runtime::Runtime;

use serial_push::bridge::{EventBus, LocalBridge};
use serial_push::config::AppConfig;
use serial_push::console::run_console;
use serial_push::error::Result as HostResult;
use serial_push::host::{default_registry, run_dispatcher};
use serial_push::serial::port::open_port;
use serial_push::serial::{SerialTasks, TxQueue, spawn_serial_host};
use serial_push::serial_ui::{MainViewState, SerialUiPlugin};
use serial_push::view::MainView;

/// Keeps the host tasks alive for as long as the window is open.
#[derive(Resource)]
struct HostRuntime {
    _runtime: Runtime,
    _tasks: SerialTasks,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::parse();
    config.validate()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    if config.console {
        run_console_mode(&config, runtime)
    } else {
        run_window_mode(&config, runtime)
    }
}

/// Opens the port, spawns the serial and dispatcher tasks and returns the
/// view wired to them.
fn start_host(config: &AppConfig, runtime: &Runtime) -> HostResult<(MainView, SerialTasks)> {
    let bus = EventBus::new();
    let queue = TxQueue::new();
    let (bridge, requests) = LocalBridge::new(Arc::clone(&bus));

    let _guard = runtime.enter();
    let port = open_port(&config.port_settings())?;
    let tasks = spawn_serial_host(port, queue.clone(), bus, config.writer_timing());
    runtime.spawn(run_dispatcher(default_registry(queue), requests));

    Ok((MainView::new(Arc::new(bridge)), tasks))
}

fn run_console_mode(config: &AppConfig, runtime: Runtime) -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    let (mut view, tasks) = start_host(config, &runtime)?;
    let result = runtime.block_on(run_console(
        &mut view,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    ));
    tasks.abort();
    Ok(result?)
}

fn run_window_mode(config: &AppConfig, runtime: Runtime) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::new();
    // Logging is installed while the plugins are added, before the port opens.
    app.add_plugins(
        DefaultPlugins
            .set(LogPlugin {
                filter: format!("{},wgpu=error,naga=warn", config.log_level),
                ..default()
            })
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Serial Push".to_string(),
                    ..default()
                }),
                ..default()
            }),
    );

    let (view, tasks) = start_host(config, &runtime)?;
    app.insert_resource(HostRuntime {
        _runtime: runtime,
        _tasks: tasks,
    })
    .insert_resource(MainViewState(view))
    .add_plugins(SerialUiPlugin)
    .run();
    Ok(())
}
