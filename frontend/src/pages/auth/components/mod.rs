pub mod field;
pub mod forms;

pub use field::FormField;
pub use forms::{LoginForm, RegisterForm};
