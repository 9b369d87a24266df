#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    driver::run()
}

// The browser build is driven through the `Simulator` binding instead
#[cfg(target_arch = "wasm32")]
fn main() {}
