mod parse_good;
mod roundtrip;
