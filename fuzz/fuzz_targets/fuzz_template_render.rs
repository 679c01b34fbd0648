#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Placeholder scanning slices on byte offsets; must never panic
        let vars = [("TENANT_ID", "t"), ("PROVIDER_WORKSPACE_ID", "p")];
        let _ = fabric_wall::templates::render("fuzz", content, vars);
    }
});
