/// The field mask is a single 32-bit word
pub const MAX_REPLICATED_FIELDS: usize = 32;
