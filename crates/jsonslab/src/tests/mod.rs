mod arbitrary;
mod parse_bad;
mod utils;
