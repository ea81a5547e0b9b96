//! Application-wide constants and default values
//!
//! Centralized location for all hard-coded names and defaults

/// Document layout constants
pub mod layout {
    /// Root group and default node of every document
    pub const WORLD: &str = "World";

    /// Scope holding every imported model
    pub const MODELS: &str = "Models";

    /// Fixed bucket between `Models` and the per-model group
    pub const MODEL_BUCKET: &str = "glass_Xform";

    /// Scope holding cameras, lights and the limbo backdrop
    pub const SETUP: &str = "Setup";

    /// Marker that makes a segment a transform-bearing group
    pub const GROUP_MARKER: &str = "_Xform";

    /// Prefix of per-release scopes
    pub const RELEASE_PREFIX: &str = "Release_";

    pub const CAMERAS_PATH: &str = "/World/Setup/Cameras";
    pub const LIGHTS_PATH: &str = "/World/Setup/Lights";
    pub const LIMBO_PATH: &str = "/World/Setup/Limbo";
}

/// Turntable animation authored on the model bucket group
pub mod turntable {
    pub const FIRST_FRAME: i32 = 1;
    pub const LAST_FRAME: i32 = 8;

    /// Rotation added per frame, in degrees
    pub const STEP_DEGREES: f32 = -45.0;
}

/// Visibility defaults
pub mod visibility {
    /// Infrastructure scopes kept visible while isolating a model
    pub const DEFAULT_KEEP_SCOPES: [&str; 4] = ["Models", "Setup", "Lights", "Cameras"];
}

/// Scope listing filters
pub mod scopes {
    /// Scope name suffixes holding materials, never offered for selection
    pub const MATERIAL_SUFFIXES: [&str; 2] = ["Looks", "mtl"];

    /// Maximum number of `/`-separated components of a selectable scope path
    pub const MAX_PATH_COMPONENTS: usize = 7;
}

/// Asset location defaults
pub mod assets {
    /// URI prefix of remotely addressed assets
    pub const DEFAULT_REMOTE_PREFIX: &str = "omniverse://";

    /// Folder between the brand and model folders in the asset library
    pub const MODELS_FOLDER: &str = "01_Models";

    /// Folder holding per-SKU payload files
    pub const SKU_FOLDER: &str = "sku";

    /// Extension of payload files
    pub const PAYLOAD_EXTENSION: &str = "usd";

    /// Template library folder under the templates directory
    pub const TEMPLATE_FOLDER: &str = "ABC";
}

/// Notification display durations
pub mod notify {
    pub const DEFAULT_INFO_SECS: u64 = 5;
    pub const DEFAULT_WARNING_SECS: u64 = 10;
}

/// Capture pipeline defaults
pub mod capture {
    pub const DEFAULT_RESOLUTION: &str = "2048x2048";
    pub const DEFAULT_START_FRAME: i32 = 1;
    pub const DEFAULT_END_FRAME: i32 = 8;
    pub const DEFAULT_EXTENSION: &str = "png";

    /// Interval between output file checks (milliseconds)
    pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

    /// Wall-clock budget for a single SKU's frames (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 300;
}
