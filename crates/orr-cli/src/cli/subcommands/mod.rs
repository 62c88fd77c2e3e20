mod template;
mod user;

pub use template::TemplateCommands;
pub use user::UserCommands;
