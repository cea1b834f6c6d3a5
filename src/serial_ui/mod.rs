//! # Serial UI Module
//!
//! Bevy + egui rendering of the [`MainView`]. One centered column:
//! - the last received line
//! - the input field with the push button
//! - the last error, in red, when there is one
//!
//! The view is mounted once at startup and unmounted when the app exits.

pub mod ui;

use crate::view::MainView;
use bevy::app::AppExit;
use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPlugin, EguiPrimaryContextPass, egui};
use ui::{draw_error_ui, draw_received_ui, draw_send_ui};

/// The view, owned by the Bevy world.
#[derive(Resource)]
pub struct MainViewState(pub MainView);

/// Plugin for the serial UI. Expects [`MainViewState`] to be inserted.
pub struct SerialUiPlugin;

impl Plugin for SerialUiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin::default())
            .insert_resource(ClearColor(Color::srgb(0.96875, 0.96875, 0.96875)))
            .add_systems(Startup, (setup_camera_system, mount_main_view))
            .add_systems(Last, unmount_on_exit)
            .add_systems(
                EguiPrimaryContextPass,
                (
                    pump_main_view, // apply received events first
                    main_view_ui,
                )
                    .chain(),
            );
    }
}

fn setup_camera_system(mut commands: Commands) {
    // Basic 2D camera required for egui overlay.
    commands.spawn(Camera2d);
}

/// System: subscribe the view once.
fn mount_main_view(mut view: ResMut<MainViewState>) {
    if let Err(e) = view.0.mount() {
        log::error!("[serial_ui] Could not subscribe to received data: {e}");
    }
}

/// System: apply queued events and finished commands.
fn pump_main_view(mut view: ResMut<MainViewState>) {
    view.0.pump();
}

/// System: release the subscription on exit.
fn unmount_on_exit(mut view: ResMut<MainViewState>, mut exit_events: MessageReader<AppExit>) {
    if !exit_events.is_empty() {
        exit_events.clear();
        log::info!("[serial_ui] App exit detected, unmounting view");
        view.0.unmount();
    }
}

fn main_view_ui(mut contexts: EguiContexts, mut view: ResMut<MainViewState>) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() / 3.0);
            draw_received_ui(ui, &view.0);
            ui.add_space(10.0);
            draw_send_ui(ui, &mut view.0);
            ui.add_space(10.0);
            draw_error_ui(ui, &view.0);
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{EventBus, LocalBridge, SERIAL_RECEIVER};
    use serde_json::json;
    use std::sync::Arc;

    /// App running only the view lifecycle systems, without window or egui.
    fn lifecycle_app() -> (App, Arc<EventBus>) {
        let bus = EventBus::new();
        let (bridge, _requests) = LocalBridge::new(Arc::clone(&bus));
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(MainViewState(MainView::new(Arc::new(bridge))))
            .add_systems(Startup, mount_main_view)
            .add_systems(Update, pump_main_view)
            .add_systems(Last, unmount_on_exit);
        (app, bus)
    }

    #[test]
    fn test_mounted_once_across_frames() {
        let (mut app, bus) = lifecycle_app();
        app.update();
        assert_eq!(bus.listener_count(SERIAL_RECEIVER), 1);

        app.update();
        app.update();
        assert_eq!(bus.listener_count(SERIAL_RECEIVER), 1);
        assert!(app.world().resource::<MainViewState>().0.is_mounted());
    }

    #[test]
    fn test_received_line_reaches_resource() {
        let (mut app, bus) = lifecycle_app();
        app.update();

        bus.emit(SERIAL_RECEIVER, &json!("OK")).unwrap();
        app.update();
        assert_eq!(
            app.world().resource::<MainViewState>().0.last_received(),
            "receive: OK"
        );
    }

    #[test]
    fn test_unmounted_on_app_exit() {
        let (mut app, bus) = lifecycle_app();
        app.update();
        assert_eq!(bus.listener_count(SERIAL_RECEIVER), 1);

        app.world_mut().write_message(AppExit::Success);
        app.update();
        assert_eq!(bus.listener_count(SERIAL_RECEIVER), 0);
        assert!(!app.world().resource::<MainViewState>().0.is_mounted());
    }
}
