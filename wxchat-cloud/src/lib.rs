mod error;
mod iam;
mod powervs;
mod schematics;
mod workspace;

pub use error::CloudError;
pub use iam::IamClient;
pub use powervs::PowerVsClient;
pub use schematics::SchematicsClient;
pub use workspace::{format_workspaces, WorkspaceRecord};
