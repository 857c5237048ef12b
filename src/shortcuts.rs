use serde::Serialize;

/// Global shortcuts and the frontend action each one triggers
pub const SHORTCUTS: &[(&str, ShortcutAction)] = &[
    ("Ctrl+D", ShortcutAction::OpenDocument),
    ("Alt+Space", ShortcutAction::FocusSearch),
];

/// Payload of the "shortcut-triggered" event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShortcutAction {
    /// Open the document picker for a new analysis
    OpenDocument,
    /// Focus the summary search box
    FocusSearch,
}

/// Action bound to an accelerator string, if any (case-insensitive)
pub fn action_for(accelerator: &str) -> Option<ShortcutAction> {
    SHORTCUTS
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(accelerator))
        .map(|(_, action)| *action)
}

/// Manages global keyboard shortcuts for the application
///
/// Each registered shortcut emits a "shortcut-triggered" event carrying a
/// `ShortcutAction`; the frontend decides what to do with it. Registration
/// failures are logged and skipped, shortcuts are a non-fatal feature.
#[cfg(feature = "desktop")]
pub struct ShortcutManager {
    app_handle: tauri::AppHandle,
}

#[cfg(feature = "desktop")]
impl ShortcutManager {
    pub fn new(app_handle: tauri::AppHandle) -> Self {
        Self { app_handle }
    }

    /// Register every entry in `SHORTCUTS`
    pub fn register_shortcuts(&self) {
        use tauri::Emitter;
        use tauri_plugin_global_shortcut::{GlobalShortcutExt, ShortcutState};

        for &(accelerator, action) in SHORTCUTS {
            let result = self.app_handle.global_shortcut().on_shortcut(
                accelerator,
                move |app, _shortcut, event| {
                    // Only handle key press events (not release)
                    if event.state == ShortcutState::Pressed {
                        tracing::debug!(accelerator, ?action, "Shortcut pressed");
                        if let Err(e) = app.emit("shortcut-triggered", action) {
                            tracing::warn!("Failed to emit shortcut-triggered event: {}", e);
                        }
                    }
                },
            );

            if let Err(e) = result {
                tracing::warn!("Failed to register global shortcut {}: {}", accelerator, e);
            }
        }
    }
}
