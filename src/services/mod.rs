pub mod community;
pub mod report;
pub mod scan;
pub mod server;
pub mod watch;

pub use community::CommunityService;
pub use report::ReportService;
pub use scan::{CycleReport, ScanService};
pub use server::ServerService;
pub use watch::WatchService;
