//! Crate-level pipeline tests with faked model, index, and translation
//! backends.
