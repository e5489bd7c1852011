pub mod capsule;
pub mod daemon;
pub mod init;
pub mod version;

pub use capsule::Capsule;
pub use daemon::Daemon;
pub use init::Init;
pub use version::Version;
