//! Bleeper Bikes dockless bike snapshot API. No key, no parameters.

pub const SNAPSHOT_URL: &str = "https://bleeperbike.staging.derilinx.com/last_snapshot";
