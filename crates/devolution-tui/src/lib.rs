pub mod app;
pub mod capability;
pub mod event;
pub mod input;
pub mod layout;
pub mod scroll;
pub mod theme;
pub mod widgets;

pub use app::App;
pub use capability::EnvProbe;
pub use theme::Theme;
