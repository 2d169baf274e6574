fn main() {
    // Emit ESP-IDF link arguments only for on-target firmware builds.
    // Host builds (default features) need none of the sysenv plumbing.
    if std::env::var("CARGO_FEATURE_ESPIDF").is_ok() {
        embuild::espidf::sysenv::output();
    }
}
