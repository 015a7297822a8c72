mod decode_good;
mod utils;
