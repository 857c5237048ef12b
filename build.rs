fn main() {
    // Only the desktop shell needs Tauri's codegen (tauri.conf.json, icons, capabilities)
    #[cfg(feature = "desktop")]
    tauri_build::build();
}
