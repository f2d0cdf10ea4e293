mod common;

mod test_advanced_effects;
