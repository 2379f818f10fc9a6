mod link;

pub use link::TestLink;
