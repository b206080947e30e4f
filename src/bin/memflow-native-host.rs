//! Native Messaging Host for MemFlow
//!
//! This binary runs as a standalone native messaging host for the MemFlow host plugin.
//! It communicates via stdin/stdout using the native messaging protocol; logs go to stderr.

use env_logger::{Env, Target};
use log::error;
use memflow_lib::{get_db_path, native_host, open_preferences};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Stderr)
        .init();

    let prefs = match get_db_path().and_then(|path| open_preferences(&path)) {
        Ok(prefs) => prefs,
        Err(e) => {
            error!("MemFlow initialization failed: {e}");
            std::process::exit(1);
        }
    };

    let frames = native_host::spawn_frame_reader(std::io::stdin());
    let mut host = native_host::NativeHost::new(prefs);

    // Runs until the host closes the connection; EOF is a clean shutdown
    if let Err(e) = host.run(frames, std::io::stdout()).await {
        error!("Native host error: {e}");
        std::process::exit(1);
    }
}
