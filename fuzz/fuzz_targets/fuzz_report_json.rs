#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(report) = serde_json::from_slice::<fabric_wall::ValidationReport>(data) {
        let _ = report.file_name();
        let _ = report.is_success();
    }
});
