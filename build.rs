fn main() {
    // ESP-IDF link arguments and environment are only needed for the
    // firmware binary; host builds (library + tests) skip embuild entirely.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
