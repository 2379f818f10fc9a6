pub mod helpers;

pub use helpers::TestLink;
pub use test_protocol::{protocol, Avatar, ClientHero, GamePlugin, Inventory, Marker, ServerHero, Tether};
