/* src/config/tests/mod.rs */

mod parsing;
