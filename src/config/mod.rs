mod paths;
mod service;
mod settings;
mod wskprops;

pub use paths::*;
pub use service::ServiceDescriptor;
pub use settings::Settings;
pub use wskprops::WskProps;
