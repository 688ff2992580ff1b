#![no_main]

use libfuzzer_sys::fuzz_target;
use throwgen::backend::ThrowHelperGenerator;
use throwgen::frontend::manifest::Manifest;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Loading, lowering and generation must report failures, never panic
        if let Ok(manifest) = Manifest::from_json("fuzz.json", s) {
            let _ = ThrowHelperGenerator::default().run_pass(&manifest);
        }
    }
});
