//! Regenerates `include/annotator.h` when the `header` feature is enabled.

fn main() {
    #[cfg(feature = "header")]
    generate_header();

    println!("cargo:rerun-if-changed=cbindgen.toml");
    println!("cargo:rerun-if-changed=src/ffi");
}

#[cfg(feature = "header")]
fn generate_header() {
    use std::path::PathBuf;

    let crate_dir = match std::env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => dir,
        Err(_) => return,
    };
    let output_dir = PathBuf::from(&crate_dir).join("include");
    if let Err(e) = std::fs::create_dir_all(&output_dir) {
        println!("cargo:warning=cannot create include dir: {}", e);
        return;
    }

    match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_config(cbindgen::Config::from_root_or_default(&crate_dir))
        .generate()
    {
        Ok(bindings) => {
            bindings.write_to_file(output_dir.join("annotator.h"));
        }
        Err(e) => println!("cargo:warning=header generation failed: {}", e),
    }
}
