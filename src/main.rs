// Open the image, serve it. That's the whole job.

use std::path::Path;
use std::process::exit;
use std::sync::Arc;

use log::error;
use log::info;

use chainfs::server::config_struct::ServerConfig;
use chainfs::server::server_struct::FileServer;
use chainfs::volume::manager::manager_struct::Volume;

fn main() {
    env_logger::init();

    // Volume sizing. Flexible, but reopening an existing image with
    // different numbers reformats it.
    const DISK: &str = "filesystem.img";
    const BLOCK_SIZE: u32 = 256; // bytes per block
    const MAX_FILES: u32 = 128; // file entry slots
    const MAX_BLOCKS: u32 = 1024; // data blocks

    let total_bytes: u32 = 24 // header
        + MAX_FILES * 16 // entry records
        + MAX_BLOCKS * 4 // node records
        + MAX_BLOCKS * BLOCK_SIZE; // data

    let volume = match Volume::open(
        Path::new(DISK),
        total_bytes,
        BLOCK_SIZE,
        MAX_FILES,
        MAX_BLOCKS,
    ) {
        Ok(volume) => Arc::new(volume),
        Err(failed) => {
            error!("Could not open the volume image at {DISK}: {failed}");
            exit(1);
        }
    };
    info!("Volume open: {DISK} ({total_bytes} bytes, {MAX_FILES} entries, {MAX_BLOCKS} blocks)");

    const PORT: u16 = 12345;
    let config = ServerConfig::sensible_defaults(PORT);
    let server = FileServer::new(volume, config);

    // This blocks until the listener dies.
    if let Err(failed) = server.start() {
        error!("Server stopped: {failed}");
        exit(1);
    }
}
