fn main() {
    // ESP-IDF link arguments are only meaningful for the watch itself; host
    // builds (library tests, the simulator) skip them.
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }
}
