//! TUI widgets.

mod format;
mod help;
mod notifications;
mod post_list;
mod status_bar;
mod summary;
mod tab_bar;
mod trade_list;

pub use format::{format_age, format_currency};
pub use help::HelpPanel;
pub use notifications::{render_error, render_error_banner, render_notification};
pub use post_list::PostList;
pub use status_bar::StatusBar;
pub use summary::SummaryBanner;
pub use tab_bar::TabBar;
pub use trade_list::TradeList;
