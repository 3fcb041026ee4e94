pub mod admin;
pub mod events;
pub mod health;
pub mod load;
pub mod promos;
pub mod render;

pub use admin::{
    clear_cache, create_item, delete_item, get_item, get_settings, update_item, update_settings,
};
pub use events::stream_events;
pub use health::health_check;
pub use load::load_promos;
pub use promos::get_promos;
pub use render::render_promos;
