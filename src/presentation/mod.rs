//! Upload flow state and the HTML it renders to.

pub mod page;
pub mod session;
pub mod view;
pub mod widgets;

pub use page::render_page;
pub use session::{SelectedFile, Session, SessionState};
pub use view::{ScoreBand, Tab};
