mod session;

pub use session::{login, login_page, logout};
