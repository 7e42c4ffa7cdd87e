fn main() {
    // The Slint frontend only exists on Windows
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("windows") {
        slint_build::compile("ui/floatdict.slint").expect("Slint build failed");
    }
}
