use std::env;
use std::fs;
use std::path::Path;

fn main() {
    embed_levels();
}

/// Every `<name>.csv` under `levels/` must have a `<name>.json` metadata sibling.
fn level_names(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut names = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().is_some_and(|e| e == "csv")
            && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
        {
            let json_path = path.with_extension("json");
            if !json_path.exists() {
                panic!("level {stem} has no metadata file {}", json_path.display());
            }
            println!("cargo:rerun-if-changed={}", path.display());
            println!("cargo:rerun-if-changed={}", json_path.display());
            names.push(stem.to_string());
        }
    }
    // Keeps the generated file stable. Play order is decided in `levels::names`.
    names.sort();
    names
}

fn embed_levels() {
    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    let dest_path = Path::new(&out_dir).join("levels.rs");
    let levels_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../levels");
    println!("cargo:rerun-if-changed={}", levels_dir.display());

    let mut code = String::from("pub(crate) static LEVEL_DATA: &[(&str, &str, &str)] = &[\n");
    for name in level_names(&levels_dir) {
        code.push_str(&format!(
            "    ({name:?}, include_str!(concat!(env!(\"CARGO_MANIFEST_DIR\"), \"/../levels/{name}.csv\")), include_str!(concat!(env!(\"CARGO_MANIFEST_DIR\"), \"/../levels/{name}.json\"))),\n",
        ));
    }
    code.push_str("];\n");

    let unchanged = fs::read_to_string(&dest_path).is_ok_and(|existing| existing == code);
    if !unchanged {
        fs::write(&dest_path, code).expect("write embedded level table");
    }
}
