pub mod profile;
pub mod template;

pub use profile::ProfileId;
pub use template::TemplateKind;
